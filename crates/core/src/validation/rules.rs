//! Field-level predicates shared by every form.
//!
//! All lengths are counted in characters after trimming, so accented names
//! such as "Ana Gómez" are measured the way a visitor reads them.

use chrono::{Datelike, NaiveDate};

/// Minimum length for names and card holder names.
pub const MIN_NAME_LENGTH: usize = 3;

/// Minimum length of each surname part.
pub const MIN_SURNAME_PART_LENGTH: usize = 3;

/// Minimum number of surname parts.
pub const MIN_SURNAME_PARTS: usize = 2;

/// Minimum login length.
pub const MIN_LOGIN_LENGTH: usize = 5;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum number of digits in a password.
pub const MIN_PASSWORD_DIGITS: usize = 2;

/// Youngest age allowed to register.
pub const MIN_AGE_YEARS: u32 = 14;

/// Oldest plausible age.
pub const MAX_AGE_YEARS: u32 = 120;

/// Minimum tip title length.
pub const MIN_TIP_TITLE_LENGTH: usize = 15;

/// Minimum tip description length.
pub const MIN_TIP_DESCRIPTION_LENGTH: usize = 30;

/// Accepted avatar image formats (extension or MIME subtype).
pub const AVATAR_FORMATS: &[&str] = &["webp", "png", "jpg", "jpeg"];

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Name or card holder: at least three characters.
#[must_use]
pub fn is_valid_name(value: &str) -> bool {
    char_len(value) >= MIN_NAME_LENGTH
}

/// Surname: at least two words, each three characters or longer.
#[must_use]
pub fn is_valid_surname(value: &str) -> bool {
    let parts: Vec<&str> = value.split_whitespace().collect();
    parts.len() >= MIN_SURNAME_PARTS
        && parts
            .iter()
            .all(|part| part.chars().count() >= MIN_SURNAME_PART_LENGTH)
}

/// Login: at least five characters.
#[must_use]
pub fn is_valid_login(value: &str) -> bool {
    char_len(value) >= MIN_LOGIN_LENGTH
}

/// Password strength: length, both cases, two digits and a symbol.
///
/// A symbol is any character that is neither alphanumeric nor whitespace.
#[must_use]
pub fn is_strong_password(value: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digits = 0;
    let mut symbol = false;

    for c in value.chars() {
        if c.is_lowercase() {
            lower = true;
        } else if c.is_uppercase() {
            upper = true;
        } else if c.is_ascii_digit() {
            digits += 1;
        } else if !c.is_alphanumeric() && !c.is_whitespace() {
            symbol = true;
        }
    }

    value.chars().count() >= MIN_PASSWORD_LENGTH
        && lower
        && upper
        && digits >= MIN_PASSWORD_DIGITS
        && symbol
}

/// Reasons a birth date is rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthDateError {
    #[error("La fecha de nacimiento no es válida.")]
    Invalid,
    #[error("La fecha de nacimiento no puede estar en el futuro.")]
    InFuture,
    #[error("Debes tener al menos {} años.", MIN_AGE_YEARS)]
    TooYoung,
    #[error("La edad no puede superar los {} años.", MAX_AGE_YEARS)]
    TooOld,
}

/// Whole years between `birth` and `today`.
#[must_use]
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    if today < birth {
        return 0;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Parse a `YYYY-MM-DD` birth date and check the age window.
///
/// # Errors
///
/// Returns a [`BirthDateError`] for an unparseable or impossible date, a
/// date after `today`, or an age outside 14..=120.
pub fn parse_birth_date(value: &str, today: NaiveDate) -> Result<NaiveDate, BirthDateError> {
    let birth = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| BirthDateError::Invalid)?;

    if birth > today {
        return Err(BirthDateError::InFuture);
    }

    let age = age_on(birth, today);
    if age < MIN_AGE_YEARS {
        return Err(BirthDateError::TooYoung);
    }
    if age > MAX_AGE_YEARS {
        return Err(BirthDateError::TooOld);
    }

    Ok(birth)
}

/// Avatar upload: the file extension or the declared MIME type must be an
/// accepted image format.
#[must_use]
pub fn is_allowed_avatar(file_name: &str, declared_type: Option<&str>) -> bool {
    let by_extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .is_some_and(|ext| AVATAR_FORMATS.contains(&ext.as_str()));

    let by_type = declared_type
        .map(|t| t.trim().to_lowercase())
        .is_some_and(|t| {
            let subtype = t.strip_prefix("image/").unwrap_or(&t);
            AVATAR_FORMATS.contains(&subtype)
        });

    by_extension || by_type
}

/// Tip title long enough to be useful.
#[must_use]
pub fn is_valid_tip_title(value: &str) -> bool {
    char_len(value) >= MIN_TIP_TITLE_LENGTH
}

/// Tip description long enough to be useful.
#[must_use]
pub fn is_valid_tip_description(value: &str) -> bool {
    char_len(value) >= MIN_TIP_DESCRIPTION_LENGTH
}
