// In-process backend. Nothing survives a restart.
use std::collections::HashMap;

use super::StorageBackend;
use crate::{
    models::{Account, ItemId, NewSupplyItem, SupplyItem},
    Result,
};

/// Accounts and per-account item lists held in memory
#[derive(Debug)]
pub struct MemoryBackend {
    accounts: HashMap<String, Account>,
    items: HashMap<String, Vec<SupplyItem>>,
    next_id: i64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            items: HashMap::new(),
            next_id: 1,
        }
    }

    fn find_mut(&mut self, owner: &str, id: ItemId) -> Option<&mut SupplyItem> {
        self.items
            .get_mut(owner)?
            .iter_mut()
            .find(|item| item.id == id)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryBackend {
    fn find_account(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.accounts.get(email).cloned())
    }

    fn insert_account(&mut self, account: &Account) -> Result<bool> {
        if self.accounts.contains_key(&account.email) {
            return Ok(false);
        }
        self.accounts
            .insert(account.email.clone(), account.clone());
        Ok(true)
    }

    fn insert_item(&mut self, owner: &str, item: NewSupplyItem) -> Result<SupplyItem> {
        // Monotonic, so ids are never recycled after a removal
        let id = ItemId(self.next_id);
        self.next_id += 1;

        let item = item.into_item(id);
        self.items
            .entry(owner.to_string())
            .or_default()
            .push(item.clone());
        Ok(item)
    }

    fn get_item(&self, owner: &str, id: ItemId) -> Result<Option<SupplyItem>> {
        Ok(self
            .items
            .get(owner)
            .and_then(|items| items.iter().find(|item| item.id == id))
            .cloned())
    }

    fn update_item(
        &mut self,
        owner: &str,
        id: ItemId,
        amount_left: f64,
        usage_per_day: f64,
    ) -> Result<bool> {
        match self.find_mut(owner, id) {
            Some(item) => {
                item.amount_left = amount_left;
                item.usage_per_day = usage_per_day;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_item(&mut self, owner: &str, id: ItemId) -> Result<bool> {
        let Some(items) = self.items.get_mut(owner) else {
            return Ok(false);
        };
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() != before)
    }

    fn list_items(&self, owner: &str) -> Result<Vec<SupplyItem>> {
        Ok(self.items.get(owner).cloned().unwrap_or_default())
    }
}
