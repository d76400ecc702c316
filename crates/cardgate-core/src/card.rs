//! Card records and field validation

use std::fmt;
use std::str::FromStr;

use crate::digest::PinDigest;
use crate::error::CardError;
use crate::expiry::ExpiryDate;

/// Field delimiter of the record store line format
pub const FIELD_DELIMITER: char = ',';

/// Default maximum card number length
pub const DEFAULT_MAX_CARD_NUMBER_LEN: usize = 19;

/// Minimum PIN length
pub const MIN_PIN_LENGTH: usize = 4;
/// Maximum PIN length
pub const MAX_PIN_LENGTH: usize = 12;

/// Access role of a cardholder.
///
/// Only `admin` is privileged. Any other tag, known or not, gets user access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
    /// Unrecognised role tag, kept verbatim
    Other(String),
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Other(tag) => tag,
        }
    }
}

impl FromStr for Role {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.contains(FIELD_DELIMITER) || s.chars().any(char::is_whitespace) {
            return Err(CardError::InvalidRole);
        }
        Ok(match s {
            "admin" => Role::Admin,
            "user" => Role::User,
            other => Role::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One issued card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub card_number: String,
    pub holder_name: String,
    pub expiry: ExpiryDate,
    pub pin_digest: PinDigest,
    pub role: Role,
}

impl CardRecord {
    pub fn new(
        card_number: impl Into<String>,
        holder_name: impl Into<String>,
        expiry: ExpiryDate,
        pin_digest: PinDigest,
        role: Role,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            holder_name: holder_name.into(),
            expiry,
            pin_digest,
            role,
        }
    }

    /// Encode as a store line (without the trailing newline)
    pub fn to_line(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.card_number,
            self.holder_name,
            self.expiry,
            self.pin_digest,
            self.role,
            d = FIELD_DELIMITER
        )
    }

    /// Decode a store line.
    ///
    /// Fields are not re-validated against registration rules beyond what is
    /// needed to rebuild typed values, so records written by older versions
    /// with looser input still load.
    pub fn from_line(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        let [card_number, holder_name, expiry, digest, role] = fields[..] else {
            return Err(format!("expected 5 fields, found {}", fields.len()));
        };

        if card_number.is_empty() {
            return Err("empty card number".to_string());
        }

        let expiry = expiry.parse::<ExpiryDate>().map_err(|e| e.to_string())?;
        let pin_digest = PinDigest::from_hex(digest).map_err(|e| e.to_string())?;
        let role = role.trim().parse::<Role>().map_err(|e| e.to_string())?;

        Ok(Self::new(card_number, holder_name, expiry, pin_digest, role))
    }
}

/// Validate a card number as read from the terminal
pub fn validate_card_number(card_number: &str, max_len: usize) -> Result<(), CardError> {
    let valid = !card_number.is_empty()
        && card_number.chars().count() <= max_len
        && !card_number.contains(FIELD_DELIMITER)
        && !card_number.chars().any(char::is_whitespace);

    if valid {
        Ok(())
    } else {
        Err(CardError::InvalidCardNumber { max: max_len })
    }
}

/// Separator between audit line segments, never allowed inside a name
const AUDIT_SEPARATOR: char = '|';

/// Validate and normalise a holder name.
///
/// Control characters and U+FFFD (left behind by undecodable input) are
/// rejected along with the store and audit separators.
pub fn validate_holder_name(name: &str) -> Result<String, CardError> {
    let name = name.trim();
    let forbidden = |c: char| {
        c == FIELD_DELIMITER
            || c == AUDIT_SEPARATOR
            || c == char::REPLACEMENT_CHARACTER
            || c.is_control()
    };
    if name.is_empty() || name.chars().any(forbidden) {
        return Err(CardError::InvalidHolderName);
    }
    Ok(name.to_string())
}

/// Validate PIN format
pub fn validate_pin(pin: &str, min_len: usize, max_len: usize) -> Result<(), CardError> {
    if pin.len() < min_len || pin.len() > max_len || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardError::InvalidPin(min_len, max_len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> CardRecord {
        CardRecord::new(
            "1111222233334444",
            "Alice Liddell",
            "12/30".parse().unwrap(),
            PinDigest::of("4321"),
            Role::Admin,
        )
    }

    #[test]
    fn test_line_format() {
        let line = alice().to_line();
        assert_eq!(
            line,
            format!(
                "1111222233334444,Alice Liddell,12/30,{},admin",
                PinDigest::of("4321")
            )
        );
        assert_eq!(CardRecord::from_line(&format!("{line}\r\n")).unwrap(), alice());
    }

    #[test]
    fn test_from_line_rejects_wrong_field_count() {
        assert!(CardRecord::from_line("1234,Bob,01/30,admin").is_err());
        assert!(CardRecord::from_line("1234,Bob,Jr,01/30,abc,admin").is_err());
    }

    #[test]
    fn test_unknown_role_defaults_to_limited() {
        let role: Role = "superuser".parse().unwrap();
        assert_eq!(role, Role::Other("superuser".to_string()));
        assert!(!role.is_admin());
        assert!("admin".parse::<Role>().unwrap().is_admin());
        // Role check is exact, not case-folded
        assert!(!"Admin".parse::<Role>().unwrap().is_admin());
    }

    #[test]
    fn test_role_validation() {
        assert_eq!("".parse::<Role>(), Err(CardError::InvalidRole));
        assert_eq!("ad,min".parse::<Role>(), Err(CardError::InvalidRole));
        assert_eq!("super user".parse::<Role>(), Err(CardError::InvalidRole));
    }

    #[test]
    fn test_card_number_validation() {
        assert!(validate_card_number("1111222233334444", 19).is_ok());
        assert!(validate_card_number("", 19).is_err());
        assert!(validate_card_number("12345678901234567890", 19).is_err());
        assert!(validate_card_number("1234,5678", 19).is_err());
        assert!(validate_card_number("1234 5678", 19).is_err());
    }

    #[test]
    fn test_holder_name_validation() {
        assert_eq!(validate_holder_name("  Alice  ").unwrap(), "Alice");
        assert!(validate_holder_name("   ").is_err());
        assert!(validate_holder_name("Smith, John").is_err());
        assert!(validate_holder_name("Bob | Status: Access Granted").is_err());
        assert!(validate_holder_name("Jos\u{FFFD}").is_err());
        assert!(validate_holder_name("Line\nBreak").is_err());
        assert_eq!(validate_holder_name("Jos\u{e9} Garc\u{ed}a").unwrap(), "Jos\u{e9} Garc\u{ed}a");
    }

    #[test]
    fn test_pin_validation() {
        assert!(validate_pin("1234", MIN_PIN_LENGTH, MAX_PIN_LENGTH).is_ok());
        assert!(validate_pin("123", MIN_PIN_LENGTH, MAX_PIN_LENGTH).is_err());
        assert!(validate_pin("1234567890123", MIN_PIN_LENGTH, MAX_PIN_LENGTH).is_err());
        assert!(validate_pin("12a4", MIN_PIN_LENGTH, MAX_PIN_LENGTH).is_err());
    }
}
