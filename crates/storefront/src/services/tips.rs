//! Travel tip list.

use std::sync::Arc;

use mochileros_core::{TipForm, ValidationErrors};

use crate::models::TipRecord;
use crate::storage::{Storage, keys, read_json, write_json};

/// Maximum number of tips kept; older ones are evicted.
pub const MAX_TIPS: usize = 20;

/// Tips shown before anyone has added one.
fn default_tips() -> Vec<TipRecord> {
    vec![
        TipRecord::new(
            "Viaja ligero de equipaje",
            "Una mochila de cabina te ahorra esperas, tasas y espalda dolorida.",
        ),
        TipRecord::new(
            "Reserva con antelación",
            "Los vuelos y albergues más baratos se agotan semanas antes de la salida.",
        ),
        TipRecord::new(
            "Lleva copias de tus documentos",
            "Guarda una copia digital del pasaporte y del seguro de viaje por si pierdes los originales.",
        ),
    ]
}

/// Tip store service.
#[derive(Clone)]
pub struct TipStore {
    storage: Arc<dyn Storage>,
}

impl TipStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Current tips, newest first.
    ///
    /// The default list is written on first access. Unreadable data yields
    /// the default list without overwriting what is stored.
    #[must_use]
    pub fn load_tips(&self) -> Vec<TipRecord> {
        match read_json::<Vec<TipRecord>>(self.storage.as_ref(), keys::TIPS) {
            Ok(Some(tips)) => tips,
            Ok(None) => {
                let tips = default_tips();
                self.save_tips(&tips);
                tips
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read tips");
                default_tips()
            }
        }
    }

    fn save_tips(&self, tips: &[TipRecord]) {
        if let Err(e) = write_json(self.storage.as_ref(), keys::TIPS, tips) {
            tracing::warn!(error = %e, "Could not save tips");
        }
    }

    /// Validate and prepend a tip, then trim the list to [`MAX_TIPS`].
    ///
    /// The returned list is what the page shows. It is saved only when the
    /// stored list could be read; unreadable data is never overwritten and a
    /// failed write is logged.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` if the title or description is too short;
    /// the list is left unchanged.
    pub fn add_tip(&self, title: &str, description: &str) -> Result<Vec<TipRecord>, ValidationErrors> {
        let form = TipForm {
            title: title.to_owned(),
            description: description.to_owned(),
        };
        let (title, description) = form.validate()?;

        let (mut tips, writable) = match read_json(self.storage.as_ref(), keys::TIPS) {
            Ok(stored) => (stored.unwrap_or_else(default_tips), true),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read tips; new tip not saved");
                (default_tips(), false)
            }
        };
        tips.insert(0, TipRecord::new(title, description));
        tips.truncate(MAX_TIPS);
        if writable {
            self.save_tips(&tips);
        }

        tracing::debug!(count = tips.len(), "Tip added");
        Ok(tips)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const DESCRIPTION: &str = "Una descripción suficientemente larga para el consejo.";

    fn store() -> (TipStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (TipStore::new(storage.clone()), storage)
    }

    #[test]
    fn test_first_load_seeds_defaults() {
        let (store, storage) = store();
        let tips = store.load_tips();
        assert_eq!(tips, default_tips());
        assert!(storage.get_item(keys::TIPS).unwrap().is_some());
    }

    #[test]
    fn test_add_tip_prepends() {
        let (store, _) = store();
        let tips = store.add_tip("Cambia moneda en destino", DESCRIPTION).unwrap();
        assert_eq!(tips.len(), 4);
        assert_eq!(tips[0].title, "Cambia moneda en destino");
        assert_eq!(store.load_tips(), tips);
    }

    #[test]
    fn test_list_is_capped_and_oldest_evicted() {
        let (store, _) = store();
        for i in 0..25 {
            store.add_tip(&format!("Consejo número {i:02} largo"), DESCRIPTION).unwrap();
        }
        let tips = store.load_tips();
        assert_eq!(tips.len(), MAX_TIPS);
        assert_eq!(tips[0].title, "Consejo número 24 largo");
        assert_eq!(tips[MAX_TIPS - 1].title, "Consejo número 05 largo");
    }

    #[test]
    fn test_short_tip_rejected_without_change() {
        let (store, _) = store();
        let before = store.load_tips();
        let err = store.add_tip("Corto", "También corto").unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(store.load_tips(), before);
    }

    #[test]
    fn test_corrupt_tips_fall_back_to_defaults() {
        let (store, storage) = store();
        storage.set_item(keys::TIPS, "nope").unwrap();
        assert_eq!(store.load_tips(), default_tips());
        assert_eq!(storage.get_item(keys::TIPS).unwrap().as_deref(), Some("nope"));
    }

    #[test]
    fn test_add_tip_never_overwrites_corrupt_list() {
        let (store, storage) = store();
        storage.set_item(keys::TIPS, "nope").unwrap();

        let tips = store.add_tip("Cambia moneda en destino", DESCRIPTION).unwrap();
        assert_eq!(tips.len(), 4);
        assert_eq!(tips[0].title, "Cambia moneda en destino");
        assert_eq!(storage.get_item(keys::TIPS).unwrap().as_deref(), Some("nope"));
    }

    #[test]
    fn test_add_tip_over_quota_shows_tip_without_saving() {
        let storage = Arc::new(MemoryStorage::with_quota(64));
        let store = TipStore::new(storage.clone());

        let tips = store.add_tip("Cambia moneda en destino", DESCRIPTION).unwrap();
        assert_eq!(tips.len(), 4);
        assert_eq!(tips[0].title, "Cambia moneda en destino");
        assert_eq!(storage.get_item(keys::TIPS).unwrap(), None);
        assert_eq!(store.load_tips(), default_tips());
    }

    #[test]
    fn test_add_tip_with_storage_disabled() {
        let (store, storage) = store();
        storage.set_available(false);

        let tips = store.add_tip("Cambia moneda en destino", DESCRIPTION).unwrap();
        assert_eq!(tips[0].title, "Cambia moneda en destino");

        storage.set_available(true);
        assert_eq!(storage.get_item(keys::TIPS).unwrap(), None);
    }
}
