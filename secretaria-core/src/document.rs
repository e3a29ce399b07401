//! Brazilian document and phone rules.
//!
//! Inputs are accepted with any punctuation; only ASCII digits are considered.

/// Strip every non-digit character.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn digit_values(digits: &str) -> Vec<u32> {
    digits.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Mod-11 check digit over `digits`, weights descending from `digits.len() + 1`.
fn cpf_check_digit(digits: &[u32]) -> u32 {
    let first_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (first_weight - i as u32))
        .sum();
    let remainder = (sum * 10) % 11;
    if remainder == 10 {
        0
    } else {
        remainder
    }
}

/// Validate a CPF with the two-pass mod-11 checksum.
///
/// Rejects anything that is not exactly 11 digits after stripping punctuation,
/// and sequences of one repeated digit (which pass the checksum trivially).
pub fn is_valid_cpf(raw: &str) -> bool {
    let digits = digit_values(&digits_only(raw));
    if digits.len() != 11 {
        return false;
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }
    cpf_check_digit(&digits[..9]) == digits[9] && cpf_check_digit(&digits[..10]) == digits[10]
}

/// Validate a Brazilian phone number.
///
/// 10 digits (landline) or 11 digits (mobile), area code 11..=99, and mobiles
/// must carry a `9` right after the area code.
pub fn is_valid_phone(raw: &str) -> bool {
    let digits = digits_only(raw);
    if digits.len() != 10 && digits.len() != 11 {
        return false;
    }
    let area_code: u32 = match digits[..2].parse() {
        Ok(code) => code,
        Err(_) => return false,
    };
    if !(11..=99).contains(&area_code) {
        return false;
    }
    if digits.len() == 11 && digits.as_bytes()[2] != b'9' {
        return false;
    }
    true
}

/// Compute the two check digits for a 9-digit CPF base.
///
/// Returns `None` when `base` does not hold exactly nine digits.
pub fn cpf_check_digits(base: &str) -> Option<(u32, u32)> {
    let mut digits = digit_values(&digits_only(base));
    if digits.len() != 9 {
        return None;
    }
    let first = cpf_check_digit(&digits);
    digits.push(first);
    let second = cpf_check_digit(&digits);
    Some((first, second))
}

/// Format as `000.000.000-00`; input is returned unchanged if it is not 11 digits.
pub fn format_cpf(raw: &str) -> String {
    let d = digits_only(raw);
    if d.len() != 11 {
        return raw.to_string();
    }
    format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
}

/// Format as `(00) 00000-0000` or `(00) 0000-0000`; other lengths are returned unchanged.
pub fn format_phone(raw: &str) -> String {
    let d = digits_only(raw);
    match d.len() {
        11 => format!("({}) {}-{}", &d[0..2], &d[2..7], &d[7..11]),
        10 => format!("({}) {}-{}", &d[0..2], &d[2..6], &d[6..10]),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_valid_cpfs() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
        assert!(is_valid_cpf("111.444.777-35"));
        assert!(is_valid_cpf("390.533.447-05"));
    }

    #[test]
    fn test_cpf_rejects_repeated_digits() {
        for d in 0..=9 {
            let cpf = d.to_string().repeat(11);
            assert!(!is_valid_cpf(&cpf), "{} must be rejected", cpf);
        }
    }

    #[test]
    fn test_cpf_rejects_bad_lengths() {
        assert!(!is_valid_cpf(""));
        assert!(!is_valid_cpf("5299822472"));
        assert!(!is_valid_cpf("529982247251"));
    }

    #[test]
    fn test_cpf_rejects_altered_check_digit() {
        assert!(!is_valid_cpf("52998224726"));
        assert!(!is_valid_cpf("52998224735"));
    }

    #[test]
    fn test_cpf_check_digits() {
        assert_eq!(cpf_check_digits("529982247"), Some((2, 5)));
        assert_eq!(cpf_check_digits("12345"), None);
    }

    #[test]
    fn test_phone_rules() {
        assert!(is_valid_phone("(11) 98888-7777"));
        assert!(is_valid_phone("1133334444"));
        assert!(is_valid_phone("99 3333-4444"));
        assert!(!is_valid_phone("11 88888-7777"));
        assert!(!is_valid_phone("1033334444"));
        assert!(!is_valid_phone("0933334444"));
        assert!(!is_valid_phone("113333444"));
        assert!(!is_valid_phone("119888877770"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cpf("123"), "123");
        assert_eq!(format_phone("11988887777"), "(11) 98888-7777");
        assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
        assert_eq!(format_phone("12"), "12");
    }

    proptest! {
        #[test]
        fn prop_generated_cpf_is_valid(base in "[0-9]{9}") {
            let (a, b) = cpf_check_digits(&base).unwrap();
            let cpf = format!("{}{}{}", base, a, b);
            let repeated = cpf.chars().all(|c| c == cpf.as_bytes()[0] as char);
            prop_assert_eq!(is_valid_cpf(&cpf), !repeated);
        }

        #[test]
        fn prop_altering_last_digit_invalidates(base in "[0-9]{9}", bump in 1u32..10) {
            let (a, b) = cpf_check_digits(&base).unwrap();
            let altered = (b + bump) % 10;
            let cpf = format!("{}{}{}", base, a, altered);
            prop_assert!(!is_valid_cpf(&cpf));
        }

        #[test]
        fn prop_landline_area_codes(area in 0u32..100, rest in "[0-9]{8}") {
            let phone = format!("{:02}{}", area, rest);
            prop_assert_eq!(is_valid_phone(&phone), (11..=99).contains(&area));
        }

        #[test]
        fn prop_mobile_requires_nine(area in 11u32..100, third in 0u32..10, rest in "[0-9]{8}") {
            let phone = format!("{}{}{}", area, third, rest);
            prop_assert_eq!(is_valid_phone(&phone), third == 9);
        }
    }
}
