use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").unwrap());

const PASSWORD_SPECIALS: &str = "~@#$%^&*+=`|{}:;!.?\"()[]-_";

pub fn email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// At least one uppercase letter, one lowercase letter and one digit,
/// 8 to 25 characters, specials from a fixed set permitted.
pub fn password(value: &str) -> bool {
    let len = value.chars().count();
    if !(8..=25).contains(&len) {
        return false;
    }
    let mut upper = false;
    let mut lower = false;
    let mut digit = false;
    for c in value.chars() {
        match c {
            'A'..='Z' => upper = true,
            'a'..='z' => lower = true,
            '0'..='9' => digit = true,
            c if PASSWORD_SPECIALS.contains(c) => {}
            _ => return false,
        }
    }
    upper && lower && digit
}

pub fn pseudo(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn file_name(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn extension(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_lowercase())
}
