use once_cell::sync::Lazy;
use regex::Regex;

const MAX_NAME_LEN: usize = 255;

// 名称中不允许出现控制字符
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\p{Cc}]+$").expect("Invalid name regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

/// 校验标题、标签、项目名等展示名称
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("must not be empty");
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err("must be at most 255 characters long");
    }
    if !NAME_RE.is_match(trimmed) {
        return Err("must not contain control characters");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 满分必须为正的有限数
pub fn validate_max_points(max_points: f64) -> Result<(), &'static str> {
    if !max_points.is_finite() || max_points <= 0.0 {
        return Err("maxPoints must be greater than 0");
    }
    Ok(())
}

/// 权重取值 [0, 1]
pub fn validate_weight(weight: f64) -> Result<(), &'static str> {
    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
        return Err("weight must be between 0 and 1");
    }
    Ok(())
}

/// 分数只要求非负，允许超过满分
pub fn validate_score(score: f64) -> Result<(), &'static str> {
    if !score.is_finite() || score < 0.0 {
        return Err("score must be greater than or equal to 0");
    }
    Ok(())
}

/// 分组人数与数量必须为正整数
pub fn validate_positive(value: i32) -> Result<(), &'static str> {
    if value < 1 {
        return Err("must be a positive integer");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Grille Livrable 1").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("bad\u{7}name").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@school.test").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(validate_max_points(5.0).is_ok());
        assert!(validate_max_points(0.0).is_err());
        assert!(validate_max_points(f64::NAN).is_err());

        assert!(validate_weight(0.0).is_ok());
        assert!(validate_weight(1.0).is_ok());
        assert!(validate_weight(1.01).is_err());
        assert!(validate_weight(-0.1).is_err());

        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(42.0).is_ok());
        assert!(validate_score(-1.0).is_err());

        assert!(validate_positive(1).is_ok());
        assert!(validate_positive(0).is_err());
    }
}
