use super::ApiError;
use crate::clients::wikipedia::is_valid_language_code;

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MAX_LIMIT: u64 = 100;
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between {MIN_LIMIT} and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

pub fn validate_keyword(keyword: &str) -> Result<&str, ApiError> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Err(ApiError::field("keyword", "The keyword field is required."));
    }
    if trimmed.chars().count() > 255 {
        return Err(ApiError::field(
            "keyword",
            "The keyword may not be greater than 255 characters.",
        ));
    }
    Ok(trimmed)
}

pub fn validate_text<'a>(field: &str, text: &'a str) -> Result<&'a str, ApiError> {
    const MAX_CHARS: usize = 10_000;

    if text.trim().is_empty() {
        return Err(ApiError::field(field, format!("The {field} field is required.")));
    }
    if text.chars().count() > MAX_CHARS {
        return Err(ApiError::field(
            field,
            format!("The {field} may not be greater than {MAX_CHARS} characters."),
        ));
    }
    Ok(text)
}

pub fn validate_language(code: &str) -> Result<String, ApiError> {
    let code = code.trim().to_ascii_lowercase();
    if !is_valid_language_code(&code) {
        return Err(ApiError::field(
            "target",
            format!("'{code}' is not a valid language code."),
        ));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(100).is_ok());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(101).is_err());
    }

    #[test]
    fn test_validate_keyword() {
        assert_eq!(validate_keyword("  Rust ").unwrap(), "Rust");
        assert!(validate_keyword("   ").is_err());
        assert!(validate_keyword(&"a".repeat(256)).is_err());
        assert_eq!(validate_keyword("تهران").unwrap(), "تهران");
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("prompt", "hello").is_ok());
        assert!(validate_text("prompt", " \n").is_err());
    }

    #[test]
    fn test_validate_language() {
        assert_eq!(validate_language("FA").unwrap(), "fa");
        assert_eq!(validate_language("zh-TW").unwrap(), "zh-tw");
        assert!(validate_language("e").is_err());
        assert!(validate_language("en.evil.com").is_err());
    }
}
