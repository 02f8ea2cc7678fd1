//! Purchase flow: "buy" buttons, the confirmation page and its form.

use chrono::{Local, NaiveDate};

use mochileros_core::PurchaseForm;

use crate::error::{AppError, add_breadcrumb};
use crate::state::SiteState;
use crate::views::{FormOutcome, Navigation};

/// Alert shown when the purchase form is rejected.
pub const REVIEW_FORM: &str = "Revisa los datos del formulario.";

/// Alert shown when a purchase is accepted.
pub const PURCHASE_DONE: &str = "Compra realizada";

/// Message left under an accepted purchase form.
pub const PURCHASE_SUCCESS: &str = "Compra realizada con éxito.";

/// Handle a "buy" button: allow one entry to the confirmation page and go
/// there.
pub fn buy(state: &SiteState) -> Navigation {
    state.purchases().mark_entry();
    add_breadcrumb("purchase", "Buy pressed", None);
    Navigation::to(state.config().confirmation_url.clone())
}

/// Open the confirmation page.
///
/// # Errors
///
/// Returns a redirect home unless a "buy" in this tab allowed the entry.
/// The entry is consumed, so reloading the page is refused.
pub fn enter_confirmation(state: &SiteState) -> Result<(), Navigation> {
    if state.purchases().consume_entry() {
        add_breadcrumb("purchase", "Entered confirmation page", None);
        Ok(())
    } else {
        tracing::debug!("Confirmation page opened without a buy action");
        Err(Navigation::to(state.config().home_url.clone()))
    }
}

/// Handle purchase form submission, checking the card against today.
pub fn submit_purchase(state: &SiteState, form: &PurchaseForm) -> FormOutcome {
    submit_purchase_on(state, form, Local::now().date_naive())
}

/// Handle purchase form submission as of `today`.
///
/// No payment is made; an accepted form is acknowledged and cleared.
pub fn submit_purchase_on(_state: &SiteState, form: &PurchaseForm, today: NaiveDate) -> FormOutcome {
    match form.validate(today) {
        Ok(purchase) => {
            tracing::info!(
                brand = purchase.brand.as_str(),
                card = %purchase.card,
                "Purchase accepted"
            );
            FormOutcome::success(PURCHASE_SUCCESS).with_alert(PURCHASE_DONE)
        }
        Err(errors) => FormOutcome::failure(&AppError::from(errors)).with_alert(REVIEW_FORM),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn form() -> PurchaseForm {
        PurchaseForm {
            buyer_name: "Ana".to_string(),
            buyer_email: "ana@b.com".to_string(),
            card_brand: "visa".to_string(),
            card_number: "4111 1111 1111 1111".to_string(),
            holder_name: "Ana Gómez".to_string(),
            expiry: "2026-06".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_buy_then_enter_once() {
        let state = SiteState::in_memory(SiteConfig::default());
        assert!(enter_confirmation(&state).is_err());

        assert_eq!(
            buy(&state),
            Navigation::to(state.config().confirmation_url.clone())
        );
        assert!(enter_confirmation(&state).is_ok());
        assert_eq!(
            enter_confirmation(&state),
            Err(Navigation::to(state.config().home_url.clone()))
        );
    }

    #[test]
    fn test_valid_purchase_is_acknowledged() {
        let state = SiteState::in_memory(SiteConfig::default());
        let outcome = submit_purchase_on(&state, &form(), today());
        assert!(outcome.is_success());
        assert_eq!(outcome.message.text, PURCHASE_SUCCESS);
        assert_eq!(outcome.alert.as_deref(), Some(PURCHASE_DONE));
        assert!(outcome.reset_form);
    }

    #[test]
    fn test_invalid_purchase_lists_every_field() {
        let state = SiteState::in_memory(SiteConfig::default());
        let mut bad = form();
        bad.card_number = "4111 1111 1111 1112".to_string();
        bad.cvv = "12".to_string();
        bad.expiry = "2026-05".to_string();

        let outcome = submit_purchase_on(&state, &bad, today());
        assert!(!outcome.is_success());
        assert_eq!(outcome.alert.as_deref(), Some(REVIEW_FORM));
        assert!(outcome.field_error("card_number").is_some());
        assert!(outcome.field_error("cvv").is_some());
        assert_eq!(
            outcome.field_error("expiry"),
            Some("La fecha de caducidad no puede estar vencida.")
        );
        assert!(!outcome.reset_form);
    }
}
