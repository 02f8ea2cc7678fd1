//! Site forms and their validated counterparts.
//!
//! Each form is plain data as typed by the visitor. `validate` checks every
//! rule, collects all violations, and on success returns a normalized value
//! that the rest of the system can trust.

use core::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{CardBrand, CardExpiry, CardNumber, Email};
use crate::validation::ValidationErrors;
use crate::validation::rules;

/// Where the bytes of an uploaded avatar come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSource {
    /// Already in memory.
    Bytes(Vec<u8>),
    /// A file chosen on disk; read when the registration is submitted.
    Path(PathBuf),
}

/// An avatar image attached to a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    /// Original file name, used for the extension check.
    pub file_name: String,
    /// MIME type declared by the picker, if any.
    pub declared_type: Option<String>,
    /// Image contents.
    pub source: AvatarSource,
}

impl AvatarUpload {
    /// An avatar whose bytes are already loaded.
    #[must_use]
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            declared_type: None,
            source: AvatarSource::Bytes(bytes),
        }
    }

    /// An avatar read from `path` on submit.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_name,
            declared_type: None,
            source: AvatarSource::Path(path),
        }
    }

    /// Set the declared MIME type.
    #[must_use]
    pub fn with_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    /// MIME type to use in the stored data URL.
    #[must_use]
    pub fn mime_type(&self) -> String {
        if let Some(declared) = &self.declared_type
            && declared.starts_with("image/")
        {
            return declared.to_lowercase();
        }
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg".to_owned(),
            "webp" => "image/webp".to_owned(),
            _ => "image/png".to_owned(),
        }
    }
}

/// Registration form as submitted.
#[derive(Clone, Default, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    /// Repeated email; must match when present.
    #[serde(default)]
    pub email_confirmation: Option<String>,
    /// `YYYY-MM-DD`.
    pub birth_date: String,
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub accepts_privacy: bool,
    #[serde(skip)]
    pub avatar: Option<AvatarUpload>,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("email", &self.email)
            .field("birth_date", &self.birth_date)
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .field("accepts_privacy", &self.accepts_privacy)
            .field("avatar", &self.avatar.as_ref().map(|a| &a.file_name))
            .finish_non_exhaustive()
    }
}

/// A registration that passed every rule.
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub surname: String,
    /// Lower-cased address.
    pub email: Email,
    pub birth_date: NaiveDate,
    pub login: String,
    pub password: String,
    pub avatar: Option<AvatarUpload>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Check every registration rule as of `today`.
    ///
    /// # Errors
    ///
    /// Returns all violated rules at once.
    pub fn validate(&self, today: NaiveDate) -> Result<Registration, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check(
            rules::is_valid_name(&self.name),
            "name",
            "El nombre debe tener al menos 3 caracteres.",
        );
        errors.check(
            rules::is_valid_surname(&self.surname),
            "surname",
            "Los apellidos deben tener al menos dos palabras de 3 caracteres.",
        );

        let email = Email::parse(&self.email).map(|e| e.normalized());
        if email.is_err() {
            errors.push("email", "El correo electrónico no es válido.");
        }
        if let (Ok(email), Some(confirmation)) = (&email, &self.email_confirmation)
            && !email.matches(confirmation)
        {
            errors.push("email_confirmation", "Los correos electrónicos no coinciden.");
        }

        let birth_date = rules::parse_birth_date(&self.birth_date, today);
        if let Err(e) = &birth_date {
            errors.push("birth_date", e.to_string());
        }

        errors.check(
            rules::is_valid_login(&self.login),
            "login",
            "El login debe tener al menos 5 caracteres.",
        );
        errors.check(
            rules::is_strong_password(&self.password),
            "password",
            "La contraseña debe tener al menos 8 caracteres, mayúsculas, minúsculas, \
             dos números y un símbolo.",
        );
        errors.check(
            self.accepts_privacy,
            "privacy",
            "Debes aceptar la política de privacidad.",
        );

        if let Some(avatar) = &self.avatar {
            errors.check(
                rules::is_allowed_avatar(&avatar.file_name, avatar.declared_type.as_deref()),
                "avatar",
                "La imagen debe ser webp, png, jpg o jpeg.",
            );
        }

        match (email, birth_date) {
            (Ok(email), Ok(birth_date)) if errors.is_empty() => Ok(Registration {
                name: self.name.trim().to_owned(),
                surname: self.surname.split_whitespace().collect::<Vec<_>>().join(" "),
                email,
                birth_date,
                login: self.login.trim().to_owned(),
                password: self.password.clone(),
                avatar: self.avatar.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Purchase form as submitted.
#[derive(Clone, Default, Deserialize)]
pub struct PurchaseForm {
    pub buyer_name: String,
    pub buyer_email: String,
    /// `visa`, `mastercard` or `amex`; empty when nothing was selected.
    pub card_brand: String,
    pub card_number: String,
    pub holder_name: String,
    /// `YYYY-MM`.
    pub expiry: String,
    pub cvv: String,
}

impl fmt::Debug for PurchaseForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PurchaseForm")
            .field("buyer_name", &self.buyer_name)
            .field("buyer_email", &self.buyer_email)
            .field("card_brand", &self.card_brand)
            .field("card_number", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// A purchase that passed every rule.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub buyer_name: String,
    pub buyer_email: Email,
    pub brand: CardBrand,
    pub card: CardNumber,
    pub holder_name: String,
    pub expiry: CardExpiry,
}

impl PurchaseForm {
    /// Check every purchase rule as of `today`.
    ///
    /// Card number, CVV and expiry are brand-aware: 15 digits and a 4-digit
    /// CVV for `amex`, 16 and 3 otherwise, Luhn always, and the card stays
    /// valid through the last day of its expiry month.
    ///
    /// # Errors
    ///
    /// Returns all violated rules at once.
    pub fn validate(&self, today: NaiveDate) -> Result<Purchase, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check(
            rules::is_valid_name(&self.buyer_name),
            "buyer_name",
            "El nombre debe tener al menos 3 caracteres.",
        );
        let buyer_email = Email::parse(&self.buyer_email);
        if buyer_email.is_err() {
            errors.push("buyer_email", "El correo electrónico no es válido.");
        }

        let brand = self.card_brand.parse::<CardBrand>();
        let card = match &brand {
            Ok(brand) => {
                let card = CardNumber::parse(&self.card_number, *brand);
                if let Err(e) = &card {
                    errors.push("card_number", e.to_string());
                }
                if !brand.accepts_cvv(&self.cvv) {
                    errors.push(
                        "cvv",
                        format!("El CVV debe tener {} dígitos.", brand.cvv_digits()),
                    );
                }
                card.ok()
            }
            Err(_) => {
                errors.push("card_brand", "Selecciona un tipo de tarjeta.");
                None
            }
        };

        errors.check(
            rules::is_valid_name(&self.holder_name),
            "holder_name",
            "El titular debe tener al menos 3 caracteres.",
        );

        let expiry = match CardExpiry::parse(&self.expiry) {
            Ok(expiry) if expiry.is_expired_on(today) => {
                errors.push("expiry", "La fecha de caducidad no puede estar vencida.");
                None
            }
            Ok(expiry) => Some(expiry),
            Err(e) => {
                errors.push("expiry", e.to_string());
                None
            }
        };

        match (buyer_email, brand, card, expiry) {
            (Ok(buyer_email), Ok(brand), Some(card), Some(expiry)) if errors.is_empty() => {
                Ok(Purchase {
                    buyer_name: self.buyer_name.trim().to_owned(),
                    buyer_email,
                    brand,
                    card,
                    holder_name: self.holder_name.trim().to_owned(),
                    expiry,
                })
            }
            _ => Err(errors),
        }
    }
}

/// New travel tip as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TipForm {
    pub title: String,
    pub description: String,
}

impl TipForm {
    /// Check the minimum lengths and return the trimmed title and description.
    ///
    /// # Errors
    ///
    /// Returns every violated rule.
    pub fn validate(&self) -> Result<(String, String), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            rules::is_valid_tip_title(&self.title),
            "title",
            format!(
                "El título debe tener al menos {} caracteres.",
                rules::MIN_TIP_TITLE_LENGTH
            ),
        );
        errors.check(
            rules::is_valid_tip_description(&self.description),
            "description",
            format!(
                "La descripción debe tener al menos {} caracteres.",
                rules::MIN_TIP_DESCRIPTION_LENGTH
            ),
        );
        errors.into_result((
            self.title.trim().to_owned(),
            self.description.trim().to_owned(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn registration() -> RegistrationForm {
        RegistrationForm {
            name: "Ana Gómez".to_owned(),
            surname: "Gómez Díaz".to_owned(),
            email: "A@B.com".to_owned(),
            email_confirmation: None,
            birth_date: "2006-01-20".to_owned(),
            login: "anag1".to_owned(),
            password: "Abcd12!@".to_owned(),
            accepts_privacy: true,
            avatar: Some(AvatarUpload::from_bytes("me.png", vec![0x89, b'P', b'N', b'G'])),
        }
    }

    fn purchase() -> PurchaseForm {
        PurchaseForm {
            buyer_name: "Ana".to_owned(),
            buyer_email: "ana@viajes.es".to_owned(),
            card_brand: "visa".to_owned(),
            card_number: "4242 4242 4242 4242".to_owned(),
            holder_name: "Ana Gómez".to_owned(),
            expiry: "2026-06".to_owned(),
            cvv: "123".to_owned(),
        }
    }

    #[test]
    fn test_registration_valid_is_normalized() {
        let valid = registration().validate(today()).unwrap();
        assert_eq!(valid.email.as_str(), "a@b.com");
        assert_eq!(valid.name, "Ana Gómez");
        assert_eq!(valid.login, "anag1");
    }

    #[test]
    fn test_registration_reports_every_rule() {
        let form = RegistrationForm {
            name: "Al".to_owned(),
            surname: "Gómez".to_owned(),
            email: "not-an-email".to_owned(),
            email_confirmation: None,
            birth_date: "2020-01-01".to_owned(),
            login: "ana".to_owned(),
            password: "password".to_owned(),
            accepts_privacy: false,
            avatar: Some(AvatarUpload::from_bytes("me.gif", vec![1])),
        };
        let errors = form.validate(today()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            [
                "name",
                "surname",
                "email",
                "birth_date",
                "login",
                "password",
                "privacy",
                "avatar"
            ]
        );
    }

    #[test]
    fn test_registration_confirmation_mismatch() {
        let mut form = registration();
        form.email_confirmation = Some("a@b.com ".to_owned());
        assert!(form.validate(today()).is_ok());

        form.email_confirmation = Some("other@b.com".to_owned());
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(
            errors.for_field("email_confirmation"),
            Some("Los correos electrónicos no coinciden.")
        );
    }

    #[test]
    fn test_registration_debug_hides_password() {
        let debug = format!("{:?}", registration());
        assert!(!debug.contains("Abcd12!@"));
    }

    #[test]
    fn test_avatar_mime_type() {
        assert_eq!(AvatarUpload::from_bytes("a.JPG", vec![]).mime_type(), "image/jpeg");
        assert_eq!(
            AvatarUpload::from_bytes("blob", vec![])
                .with_type("image/webp")
                .mime_type(),
            "image/webp"
        );
        assert_eq!(AvatarUpload::from_path("/tmp/me.png").file_name, "me.png");
    }

    #[test]
    fn test_purchase_valid() {
        let valid = purchase().validate(today()).unwrap();
        assert_eq!(valid.brand, CardBrand::Visa);
        assert_eq!(valid.card.last_four(), "4242");
    }

    #[test]
    fn test_purchase_amex_rules() {
        let mut form = purchase();
        form.card_brand = "amex".to_owned();
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(
            errors.for_field("card_number"),
            Some("El número de tarjeta debe tener 15 dígitos.")
        );
        assert_eq!(errors.for_field("cvv"), Some("El CVV debe tener 4 dígitos."));

        form.card_number = "3782 822463 10005".to_owned();
        form.cvv = "1234".to_owned();
        assert!(form.validate(today()).is_ok());
    }

    #[test]
    fn test_purchase_expired_and_missing_brand() {
        let mut form = purchase();
        form.expiry = "2026-05".to_owned();
        form.card_brand = String::new();
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(
            errors.for_field("expiry"),
            Some("La fecha de caducidad no puede estar vencida.")
        );
        assert_eq!(
            errors.for_field("card_brand"),
            Some("Selecciona un tipo de tarjeta.")
        );
    }

    #[test]
    fn test_purchase_luhn_failure() {
        let mut form = purchase();
        form.card_number = "4242 4242 4242 4241".to_owned();
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.for_field("card_number"),
            Some("El número de tarjeta no es válido.")
        );
    }

    #[test]
    fn test_tip_form() {
        let ok = TipForm {
            title: "  Viaja ligero siempre ".to_owned(),
            description: "Una mochila de 40 litros basta para todo.".to_owned(),
        };
        let (title, _) = ok.validate().unwrap();
        assert_eq!(title, "Viaja ligero siempre");

        let short = TipForm {
            title: "Corto tí".to_owned(),
            description: "Una mochila de 40 litros basta para todo.".to_owned(),
        };
        let errors = short.validate().unwrap_err();
        assert_eq!(
            errors.summary(),
            "El título debe tener al menos 15 caracteres."
        );
    }
}
