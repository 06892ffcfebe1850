use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub const GRADE_MESSAGE: &str = "Grade must be a number between 1 and 6.";
pub const WEIGHT_MESSAGE: &str = "Weight must be a number between 0 and 1 (e.g., 0.4 for 40%).";
pub const DUE_DATE_MESSAGE: &str = "Due date must be a valid date (YYYY-MM-DD).";

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证新账号密码
///
/// - 至少 8 个字符
/// - 同时包含大写字母、小写字母和数字
/// - 不能是常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    const WEAK_PASSWORDS: [&str; 7] = [
        "password1",
        "qwerty123",
        "admin1234",
        "welcome1",
        "abcd1234",
        "student1",
        "letmein1",
    ];
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 成绩：1 到 6 之间的数字
pub fn parse_grade(raw: &str) -> Result<f64, &'static str> {
    match raw.trim().parse::<f64>() {
        Ok(grade) if grade.is_finite() && (1.0..=6.0).contains(&grade) => Ok(grade),
        _ => Err(GRADE_MESSAGE),
    }
}

/// 权重：空白视为未设置，否则必须在 0 到 1 之间
pub fn parse_weight(raw: &str) -> Result<Option<f64>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(weight) if weight.is_finite() && (0.0..=1.0).contains(&weight) => Ok(Some(weight)),
        _ => Err(WEIGHT_MESSAGE),
    }
}

/// 截止日期：空白视为未设置，否则为 YYYY-MM-DD
pub fn parse_due_date(raw: &str) -> Result<Option<chrono::NaiveDate>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DUE_DATE_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("Semester2024").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_missing_character_classes() {
        let result = validate_password("abcdefgh");
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
        assert_eq!(
            validate_password("abcdefgh").error_message(),
            "Password must contain at least one uppercase letter; Password must contain at least one digit"
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_email() {
        assert!(validate_email("ada@uni.example.org").is_ok());
        assert!(validate_email("no-at-sign.example.org").is_err());
        assert!(validate_email("ada@localhost").is_err());
    }

    #[test]
    fn test_grade_bounds() {
        assert_eq!(parse_grade("1"), Ok(1.0));
        assert_eq!(parse_grade(" 5.5 "), Ok(5.5));
        assert_eq!(parse_grade("6"), Ok(6.0));
        assert_eq!(parse_grade("0.9"), Err(GRADE_MESSAGE));
        assert_eq!(parse_grade("6.1"), Err(GRADE_MESSAGE));
        assert_eq!(parse_grade("abc"), Err(GRADE_MESSAGE));
        assert_eq!(parse_grade("NaN"), Err(GRADE_MESSAGE));
    }

    #[test]
    fn test_weight_bounds() {
        assert_eq!(parse_weight(""), Ok(None));
        assert_eq!(parse_weight("0"), Ok(Some(0.0)));
        assert_eq!(parse_weight("0.4"), Ok(Some(0.4)));
        assert_eq!(parse_weight("1"), Ok(Some(1.0)));
        assert_eq!(parse_weight("1.5"), Err(WEIGHT_MESSAGE));
        assert_eq!(parse_weight("-0.1"), Err(WEIGHT_MESSAGE));
    }

    #[test]
    fn test_due_date() {
        assert_eq!(parse_due_date("  "), Ok(None));
        assert_eq!(
            parse_due_date("2025-01-31"),
            Ok(chrono::NaiveDate::from_ymd_opt(2025, 1, 31))
        );
        assert_eq!(parse_due_date("31.01.2025"), Err(DUE_DATE_MESSAGE));
    }
}
