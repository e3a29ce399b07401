//! Generic async state holder and page cursor.

use std::fmt::Display;
use std::future::Future;

use tracing::debug;

use crate::loading::LoadingFlag;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Data, loading flag and error message for one async operation.
#[derive(Debug)]
pub struct AsyncState<T> {
    data: Option<T>,
    loading: LoadingFlag,
    error: Option<String>,
}

impl<T> Default for AsyncState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: LoadingFlag::new(),
            error: None,
        }
    }
}

impl<T: Clone> AsyncState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Await `fut`, storing its value or its error message.
    ///
    /// A failure keeps the previous data and returns `None`.
    pub async fn execute<F, E>(&mut self, fut: F) -> Option<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let _loading = self.loading.enter();
        self.error = None;
        match fut.await {
            Ok(value) => {
                self.data = Some(value.clone());
                Some(value)
            }
            Err(err) => {
                debug!(error = %err, "async operation failed");
                self.error = Some(err.to_string());
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.data = None;
        self.error = None;
    }
}

/// 1-based page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    pub fn next(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> usize {
        self.page_size
    }

    /// The current page's slice of `items`; empty past the end.
    pub fn page_of<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}
