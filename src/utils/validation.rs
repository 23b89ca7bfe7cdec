use crate::utils::error::{Result, WirelessError};

/// Whole-value checks run once settings are assembled, before touching the radio.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Character count (not bytes) must fall within `min..=max`.
pub fn validate_length(field_name: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(WirelessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Length must be between {} and {} characters", min, max),
        });
    }
    Ok(())
}

/// Borrow a value that must be present, naming the dotted config key when it is not.
pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| WirelessError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// Interface names and similar identifiers; whitespace alone does not count.
pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WirelessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Inclusive bounds, used for the retry counters.
pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(WirelessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_length_counts_chars() {
        assert!(validate_length("ssid", "ab", 2, 32).is_ok());
        assert!(validate_length("ssid", "a", 2, 32).is_err());
        assert!(validate_length("ssid", &"x".repeat(32), 2, 32).is_ok());
        assert!(validate_length("ssid", &"x".repeat(33), 2, 32).is_err());
        // two chars, four bytes
        assert!(validate_length("ssid", "ßß", 2, 3).is_ok());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("attempts", 1u8, 1, 9).is_ok());
        assert!(validate_range("attempts", 9u8, 1, 9).is_ok());
        assert!(validate_range("attempts", 0u8, 1, 9).is_err());
        assert!(validate_range("attempts", 10u8, 1, 9).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("home".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("network.ssid", &present).unwrap(), "home");
        match validate_required_field("network.ssid", &missing) {
            Err(WirelessError::MissingConfigError { field }) => assert_eq!(field, "network.ssid"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("network.interface", "wlan0").is_ok());
        assert!(validate_non_empty_string("network.interface", "  ").is_err());
    }
}
