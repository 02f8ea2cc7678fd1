//! Purchase-entry gate.
//!
//! The confirmation page may only be entered right after a "buy" action in
//! the same tab. The flag lives in ephemeral storage and is consumed on the
//! first entry.

use std::sync::Arc;

use crate::storage::{Storage, keys};

const ENTRY_VALUE: &str = "1";

/// Guards entry to the purchase confirmation page.
#[derive(Clone)]
pub struct PurchaseGate {
    storage: Arc<dyn Storage>,
}

impl PurchaseGate {
    /// Create a gate over tab-scoped storage.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Record that the visitor pressed "buy".
    pub fn mark_entry(&self) {
        if let Err(e) = self.storage.set_item(keys::PURCHASE_ENTRY, ENTRY_VALUE) {
            tracing::warn!(error = %e, "Could not mark purchase entry");
        }
    }

    /// Whether entry is allowed. The flag is removed so a reload is refused.
    ///
    /// Any storage failure refuses entry.
    #[must_use]
    pub fn consume_entry(&self) -> bool {
        let allowed = match self.storage.get_item(keys::PURCHASE_ENTRY) {
            Ok(value) => value.as_deref() == Some(ENTRY_VALUE),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read purchase entry");
                return false;
            }
        };
        if !allowed {
            return false;
        }
        if let Err(e) = self.storage.remove_item(keys::PURCHASE_ENTRY) {
            tracing::warn!(error = %e, "Could not consume purchase entry");
            return false;
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_entry_is_consumed_once() {
        let gate = PurchaseGate::new(Arc::new(MemoryStorage::new()));
        assert!(!gate.consume_entry());

        gate.mark_entry();
        assert!(gate.consume_entry());
        assert!(!gate.consume_entry());
    }

    #[test]
    fn test_unexpected_value_refuses_entry() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(keys::PURCHASE_ENTRY, "yes").unwrap();
        assert!(!PurchaseGate::new(storage).consume_entry());
    }

    #[test]
    fn test_unavailable_storage_refuses_entry() {
        let storage = Arc::new(MemoryStorage::new());
        let gate = PurchaseGate::new(storage.clone());
        gate.mark_entry();
        storage.set_available(false);
        assert!(!gate.consume_entry());
    }
}
