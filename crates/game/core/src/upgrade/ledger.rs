use std::collections::BTreeMap;

use crate::state::UpgradeId;

use super::LedgerError;

/// Per-unit count of how many times each upgrade is currently active.
///
/// Absent entries are zero. Entries that drop back to zero are removed so two
/// ledgers with the same active set compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeLedger {
    counts: BTreeMap<UpgradeId, u32>,
}

impl UpgradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, upgrade: UpgradeId) -> u32 {
        self.counts.get(&upgrade).copied().unwrap_or(0)
    }

    pub fn is_active(&self, upgrade: UpgradeId) -> bool {
        self.count(upgrade) > 0
    }

    /// Adds one activation and returns the new count.
    pub fn increment(&mut self, upgrade: UpgradeId) -> u32 {
        let count = self.counts.entry(upgrade).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Removes one activation and returns the new count.
    ///
    /// Fails without touching the ledger when the upgrade is not active.
    pub fn decrement(&mut self, upgrade: UpgradeId) -> Result<u32, LedgerError> {
        let Some(count) = self.counts.get_mut(&upgrade) else {
            return Err(LedgerError::Underflow { upgrade });
        };
        *count -= 1;
        let remaining = *count;
        if remaining == 0 {
            self.counts.remove(&upgrade);
        }
        Ok(remaining)
    }

    /// Active upgrades in ascending id order.
    pub fn active(&self) -> impl Iterator<Item = (UpgradeId, u32)> + '_ {
        self.counts.iter().map(|(&upgrade, &count)| (upgrade, count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWORD: UpgradeId = UpgradeId(1);

    #[test]
    fn counts_stack_and_unwind() {
        let mut ledger = UpgradeLedger::new();
        assert_eq!(ledger.increment(SWORD), 1);
        assert_eq!(ledger.increment(SWORD), 2);
        assert_eq!(ledger.decrement(SWORD), Ok(1));
        assert!(ledger.is_active(SWORD));
        assert_eq!(ledger.decrement(SWORD), Ok(0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn decrement_below_zero_is_rejected() {
        let mut ledger = UpgradeLedger::new();
        assert_eq!(
            ledger.decrement(SWORD),
            Err(LedgerError::Underflow { upgrade: SWORD })
        );
        assert_eq!(ledger.count(SWORD), 0);
    }
}
