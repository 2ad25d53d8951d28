use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

/// 密码最小长度
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters long");
    }
    Ok(())
}

/// 姓名：去除首尾空白，至少 2 个字符，每个单词首字母大写
pub fn normalize_name(name: &str) -> Result<String, &'static str> {
    let trimmed = name.trim();
    if trimmed.chars().count() < 2 {
        return Err("First and last name must be at least 2 characters long");
    }
    Ok(title_case(trimmed))
}

/// 工号：去除首尾空白，至少 3 个字符，转为大写
pub fn normalize_employee_code(code: &str) -> Result<String, &'static str> {
    let trimmed = code.trim();
    if trimmed.chars().count() < 3 {
        return Err("Employee code must be at least 3 characters long");
    }
    Ok(trimmed.to_uppercase())
}

/// 可选文本：去除首尾空白，空串视为未提供，超过上限时报错
pub fn normalize_optional_text(
    value: Option<&str>,
    max_chars: usize,
    field: &str,
) -> Result<Option<String>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max_chars => Err(format!(
            "{field} cannot exceed {max_chars} characters"
        )),
        Some(text) => Ok(Some(text.to_string())),
    }
}

fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("maria.lopez@school.edu").is_ok());
        assert!(validate_email("maria.lopez").is_err());
        assert!(validate_email("@school.edu").is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_password("abc12").is_err());
        assert!(validate_password("abc123").is_ok());
    }

    #[test]
    fn test_name_is_trimmed_and_title_cased() {
        assert_eq!(normalize_name("  maría josé ").unwrap(), "María José");
        assert_eq!(normalize_name("o'NEIL").unwrap(), "O'Neil");
        assert!(normalize_name(" a ").is_err());
    }

    #[test]
    fn test_employee_code_is_upper_cased() {
        assert_eq!(normalize_employee_code(" emp001 ").unwrap(), "EMP001");
        assert!(normalize_employee_code("e1").is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(normalize_optional_text(Some("   "), 10, "description"), Ok(None));
        assert_eq!(
            normalize_optional_text(Some(" hello "), 10, "description"),
            Ok(Some("hello".to_string()))
        );
        assert!(normalize_optional_text(Some("hello world!"), 10, "description").is_err());
    }
}
