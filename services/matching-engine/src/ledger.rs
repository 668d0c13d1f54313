//! Account ledger
//!
//! A dense slot table from account id to account record. Ids are assigned
//! by the front-end and may have holes, so the table grows in fixed
//! chunks with vacant slots observable. Accounts live for the life of the
//! process.

use types::account::Account;
use types::ids::AccountId;

const CHUNK: usize = 64;

#[derive(Debug, Default)]
pub struct AccountLedger {
    slots: Vec<Option<Account>>,
    created: usize,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a slot, creating the account on first sight. The stored
    /// name never changes afterwards: the first name offered wins.
    pub fn lookup_or_create(&mut self, id: AccountId, name: &str) -> &mut Account {
        let idx = id.index();
        while idx >= self.slots.len() {
            self.slots.resize_with(self.slots.len() + CHUNK, || None);
        }
        if self.slots[idx].is_none() {
            self.created += 1;
        }
        self.slots[idx].get_or_insert_with(|| Account::new(name))
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.slots.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.slots.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }

    /// Allocated slots (known-id upper bound for lookups).
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Accounts actually created.
    pub fn len(&self) -> usize {
        self.created
    }

    pub fn is_empty(&self) -> bool {
        self.created == 0
    }

    /// Occupied slots in id order.
    pub fn iter(&self) -> impl Iterator<Item = (AccountId, &Account)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|acc| (AccountId(idx as u32), acc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_lookup() {
        let mut ledger = AccountLedger::new();
        ledger.lookup_or_create(AccountId(3), "XYZ123");
        assert_eq!(ledger.get(AccountId(3)).map(|a| a.name.as_str()), Some("XYZ123"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_first_name_wins() {
        let mut ledger = AccountLedger::new();
        ledger.lookup_or_create(AccountId(0), "FIRST");
        ledger.lookup_or_create(AccountId(0), "SECOND");
        assert_eq!(ledger.get(AccountId(0)).map(|a| a.name.as_str()), Some("FIRST"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_holes_are_observable() {
        let mut ledger = AccountLedger::new();
        ledger.lookup_or_create(AccountId(0), "A");
        ledger.lookup_or_create(AccountId(7), "B");
        assert!(ledger.get(AccountId(5)).is_none());
        assert_eq!(ledger.slot_count(), CHUNK);
    }

    #[test]
    fn test_chunked_growth() {
        let mut ledger = AccountLedger::new();
        ledger.lookup_or_create(AccountId(CHUNK as u32), "FAR");
        assert_eq!(ledger.slot_count(), 2 * CHUNK);
        assert!(ledger.get(AccountId(0)).is_none());
    }

    #[test]
    fn test_iter_in_slot_order() {
        let mut ledger = AccountLedger::new();
        ledger.lookup_or_create(AccountId(9), "LATE");
        ledger.lookup_or_create(AccountId(2), "EARLY");
        let names: Vec<&str> = ledger.iter().map(|(_, a)| a.name.as_str()).collect();
        assert_eq!(names, vec!["EARLY", "LATE"]);
    }
}
