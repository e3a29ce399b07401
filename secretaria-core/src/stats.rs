//! Course summary statistics

use serde::{Deserialize, Serialize};

use crate::entities::Course;
use crate::enums::Status;

/// Counts and mean duration over a tenant's course list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStats {
    pub total: usize,
    pub active: usize,
    /// Every course that is not active, unknown statuses included.
    pub inactive: usize,
    /// Mean duration in months, rounded half up. Zero for an empty list.
    pub average_duration: u32,
}

impl CourseStats {
    pub fn from_courses(courses: &[Course]) -> Self {
        let total = courses.len();
        if total == 0 {
            return Self::default();
        }

        let active = courses
            .iter()
            .filter(|c| c.situacao == Status::Active)
            .count();
        let sum: u64 = courses.iter().map(|c| u64::from(c.duracao)).sum();
        let n = total as u64;
        let average = (2 * sum + n) / (2 * n);

        Self {
            total,
            active,
            inactive: total - active,
            average_duration: u32::try_from(average).unwrap_or(u32::MAX),
        }
    }
}
