//! Travel tips page.

use mochileros_core::TipForm;

use crate::error::AppError;
use crate::models::TipRecord;
use crate::state::SiteState;
use crate::views::FormOutcome;

/// Shown after a tip is added.
pub const TIP_ADDED: &str = "Consejo publicado.";

/// Tips to list, newest first.
#[must_use]
pub fn tips_page(state: &SiteState) -> Vec<TipRecord> {
    state.tips().load_tips()
}

/// Handle tip form submission. Returns the outcome and the list to render.
pub fn submit_tip(state: &SiteState, form: &TipForm) -> (FormOutcome, Vec<TipRecord>) {
    match state.tips().add_tip(&form.title, &form.description) {
        Ok(tips) => (FormOutcome::success(TIP_ADDED), tips),
        Err(errors) => (
            FormOutcome::failure(&AppError::from(errors)),
            state.tips().load_tips(),
        ),
    }
}
