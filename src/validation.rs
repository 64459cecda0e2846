use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PHONE_JUNK_REGEX: Regex = Regex::new(r"[\s\-()+]").unwrap();
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

fn phone_digits(raw: &str) -> String {
    PHONE_JUNK_REGEX.replace_all(raw, "").to_string()
}

// A phone number is 10 or 11 digits once the formatting characters
// (spaces, dashes, parentheses, plus) are stripped.
pub fn validate_phone(raw: &str) -> Result<(), String> {
    let digits = phone_digits(raw);
    if digits.len() != 10 && digits.len() != 11 {
        return Err("Номер телефона должен содержать 10 или 11 цифр".to_string());
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Номер телефона должен содержать только цифры".to_string());
    }
    Ok(())
}

// Normalizes an already validated number to +7XXXXXXXXXX.
pub fn format_phone(raw: &str) -> String {
    let digits = phone_digits(raw);
    match digits.len() {
        11 if digits.starts_with('8') => format!("+7{}", &digits[1..]),
        11 => format!("+{}", digits),
        10 => format!("+7{}", digits),
        _ => raw.to_string(),
    }
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_phones_pass() {
        assert!(validate_phone("+7 (999) 123-45-67").is_ok());
        assert!(validate_phone("8 999 123 45 67").is_ok());
        assert!(validate_phone("9991234567").is_ok());
    }

    #[test]
    fn wrong_length_or_letters_fail() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("799912345678").is_err());
        assert!(validate_phone("phone123456").is_err());
    }

    #[test]
    fn phones_normalize_to_plus_seven() {
        assert_eq!(format_phone("8 (999) 123-45-67"), "+79991234567");
        assert_eq!(format_phone("+7 999 123 45 67"), "+79991234567");
        assert_eq!(format_phone("9991234567"), "+79991234567");
    }

    #[test]
    fn email_format_check() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("a.b@mail.ru"));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("user@no-dot"));
        assert!(!validate_email("spaces in@mail.ru"));
    }
}
