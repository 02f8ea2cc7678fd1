//! Purchase commands.
//!
//! The purchase-entry flag lives in tab storage, which does not outlive one
//! CLI invocation; `purchase` therefore runs the whole flow in one go.

use clap::Args;
use mochileros_core::{PurchaseForm, format_card_number};
use mochileros_storefront::pages;
use mochileros_storefront::state::SiteState;
use mochileros_storefront::views::Navigation;

use super::{CommandError, show_navigation, show_outcome};

/// Purchase form fields.
#[derive(Debug, Args)]
pub struct PurchaseArgs {
    /// Buyer name
    #[arg(long)]
    buyer_name: String,

    /// Buyer email
    #[arg(long)]
    buyer_email: String,

    /// Card brand (`visa`, `mastercard` or `amex`)
    #[arg(long)]
    brand: String,

    /// Card number; grouped in blocks of four before submission
    #[arg(long)]
    number: String,

    /// Card holder name
    #[arg(long)]
    holder: String,

    /// Expiry month (`YYYY-MM`)
    #[arg(long)]
    expiry: String,

    /// Card verification code
    #[arg(long)]
    cvv: String,

    /// Skip the "buy" button; the confirmation page will refuse entry
    #[arg(long)]
    skip_buy: bool,
}

impl From<PurchaseArgs> for PurchaseForm {
    fn from(args: PurchaseArgs) -> Self {
        Self {
            buyer_name: args.buyer_name,
            buyer_email: args.buyer_email,
            card_brand: args.brand,
            card_number: format_card_number(&args.number),
            holder_name: args.holder,
            expiry: args.expiry,
            cvv: args.cvv,
        }
    }
}

/// Press "buy", enter the confirmation page and submit the form.
pub fn purchase(state: &SiteState, args: PurchaseArgs) -> Result<(), CommandError> {
    if !args.skip_buy {
        show_navigation(&pages::buy(state));
    }
    confirm(state)?;
    show_outcome(&pages::submit_purchase(state, &PurchaseForm::from(args)))
}

/// Enter the confirmation page.
pub fn confirm(state: &SiteState) -> Result<(), CommandError> {
    match pages::enter_confirmation(state) {
        Ok(()) => {
            tracing::info!(page = %state.config().confirmation_url, "Confirmation page open");
            Ok(())
        }
        Err(navigation) => {
            show_navigation(&navigation);
            let to = match navigation {
                Navigation::Redirect { to, .. } => to.to_string(),
                Navigation::Reload => state.config().confirmation_url.to_string(),
            };
            Err(CommandError::Refused(to))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_is_grouped_like_the_form_field() {
        let args = PurchaseArgs {
            buyer_name: "Ana".to_string(),
            buyer_email: "ana@b.com".to_string(),
            brand: "amex".to_string(),
            number: "3782-822463-10005".to_string(),
            holder: "Ana Gómez".to_string(),
            expiry: "2027-01".to_string(),
            cvv: "1234".to_string(),
            skip_buy: false,
        };
        let form = PurchaseForm::from(args);
        assert_eq!(form.card_number, "3782 8224 6310 005");
        assert_eq!(form.card_brand, "amex");
    }
}
