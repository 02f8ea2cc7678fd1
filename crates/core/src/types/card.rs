//! Payment card types.
//!
//! Type-safe wrappers for the card data entered on the purchase form. Only
//! shape and checksum are verified; nothing here talks to a payment provider.

use core::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("Invalid regex"));

/// Card brand selected on the purchase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
}

/// Error returned when the selected card brand is unknown or missing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown card brand: {0:?}")]
pub struct CardBrandError(pub String);

impl CardBrand {
    /// Number of digits a card of this brand carries.
    #[must_use]
    pub const fn digits(self) -> usize {
        match self {
            Self::Amex => 15,
            Self::Visa | Self::Mastercard => 16,
        }
    }

    /// Number of digits of the security code.
    #[must_use]
    pub const fn cvv_digits(self) -> usize {
        match self {
            Self::Amex => 4,
            Self::Visa | Self::Mastercard => 3,
        }
    }

    /// Returns the form value for this brand.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
        }
    }

    /// Check a security code for this brand.
    #[must_use]
    pub fn accepts_cvv(self, cvv: &str) -> bool {
        let cvv = cvv.trim();
        cvv.len() == self.cvv_digits() && cvv.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CardBrand {
    type Err = CardBrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "visa" => Ok(Self::Visa),
            "mastercard" => Ok(Self::Mastercard),
            "amex" => Ok(Self::Amex),
            other => Err(CardBrandError(other.to_owned())),
        }
    }
}

/// Errors that can occur when parsing a [`CardNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CardNumberError {
    /// Something other than digits, spaces or dashes.
    #[error("El número de tarjeta solo puede contener dígitos.")]
    NonDigit,
    /// Digit count does not match the brand.
    #[error("El número de tarjeta debe tener {expected} dígitos.")]
    WrongLength {
        /// Digits required by the brand.
        expected: usize,
    },
    /// Luhn checksum failed.
    #[error("El número de tarjeta no es válido.")]
    Checksum,
}

/// A card number that passed the brand length and Luhn checks.
///
/// Stored as bare digits. `Debug` and `Display` only reveal the last four.
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(String);

impl CardNumber {
    /// Parse a card number for the given brand.
    ///
    /// Spaces and dashes are ignored, so the grouped form produced by
    /// [`format_card_number`] parses back.
    ///
    /// # Errors
    ///
    /// Returns an error on foreign characters, a digit count that does not
    /// match the brand, or a failed Luhn checksum.
    pub fn parse(s: &str, brand: CardBrand) -> Result<Self, CardNumberError> {
        let mut digits = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' => {}
                _ => return Err(CardNumberError::NonDigit),
            }
        }

        if digits.len() != brand.digits() {
            return Err(CardNumberError::WrongLength {
                expected: brand.digits(),
            });
        }

        if !luhn_valid(&digits) {
            return Err(CardNumberError::Checksum);
        }

        Ok(Self(digits))
    }

    /// Returns the last four digits.
    #[must_use]
    pub fn last_four(&self) -> &str {
        self.0.get(self.0.len().saturating_sub(4)..).unwrap_or("")
    }

    /// Returns the masked form, e.g. `•••• 4242`.
    #[must_use]
    pub fn masked(&self) -> String {
        format!("•••• {}", self.last_four())
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CardNumber").field(&self.masked()).finish()
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Luhn (mod 10) checksum over a string of ASCII digits.
///
/// Returns `false` for empty input or any non-digit.
#[must_use]
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let mut sum = 0;
    for (i, b) in digits.bytes().rev().enumerate() {
        if !b.is_ascii_digit() {
            return false;
        }
        let mut d = u32::from(b - b'0');
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Group the digits of a card number in blocks of four, dropping anything else.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Errors that can occur when parsing a [`CardExpiry`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CardExpiryError {
    /// Not in `YYYY-MM` form or month out of range.
    #[error("La fecha de caducidad no es válida.")]
    Invalid,
}

/// Card expiry as entered on the form (`YYYY-MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    last_day: NaiveDate,
}

impl CardExpiry {
    /// Parse a `YYYY-MM` expiry.
    ///
    /// # Errors
    ///
    /// Returns [`CardExpiryError::Invalid`] if the input is malformed.
    pub fn parse(s: &str) -> Result<Self, CardExpiryError> {
        let caps = EXPIRY_RE.captures(s.trim()).ok_or(CardExpiryError::Invalid)?;
        let year: i32 = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or(CardExpiryError::Invalid)?;
        let month: u32 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or(CardExpiryError::Invalid)?;

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CardExpiryError::Invalid)?;
        let last_day = first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or(CardExpiryError::Invalid)?;

        Ok(Self { last_day })
    }

    /// Last calendar day on which the card is still valid.
    #[must_use]
    pub const fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Expiry year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.last_day.year()
    }

    /// Expiry month (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.last_day.month()
    }

    /// A card is expired once `today` is past the last day of its month.
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        today > self.last_day
    }
}
