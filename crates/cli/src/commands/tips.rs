//! Travel tip commands.

use mochileros_core::TipForm;
use mochileros_storefront::pages;
use mochileros_storefront::state::SiteState;

use super::{CommandError, show_outcome};

/// Log every tip, newest first.
pub fn list(state: &SiteState) {
    for (i, tip) in pages::tips_page(state).iter().enumerate() {
        tracing::info!(n = i + 1, url = ?tip.url, "{}: {}", tip.title, tip.description);
    }
}

/// Add a tip.
pub fn add(state: &SiteState, title: String, description: String) -> Result<(), CommandError> {
    let (outcome, tips) = pages::submit_tip(state, &TipForm { title, description });
    show_outcome(&outcome)?;
    tracing::info!(count = tips.len(), "Tips stored");
    Ok(())
}
