// Storage adapters - the registry and credential store only talk to the trait
pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use crate::{
    models::{Account, ItemId, NewSupplyItem, SupplyItem},
    Result,
};

/// Trait for storage backends - keeps business logic independent of where data lives
///
/// Every item operation takes the owner's email. An item owned by someone else
/// must look exactly like a missing one.
#[cfg_attr(test, mockall::automock)]
pub trait StorageBackend {
    fn find_account(&self, email: &str) -> Result<Option<Account>>;

    /// Store a new account. Returns false if the email is already taken.
    fn insert_account(&mut self, account: &Account) -> Result<bool>;

    /// Append an item and return it with its freshly assigned id
    fn insert_item(&mut self, owner: &str, item: NewSupplyItem) -> Result<SupplyItem>;

    fn get_item(&self, owner: &str, id: ItemId) -> Result<Option<SupplyItem>>;

    /// Overwrite quantity fields. Returns false if the item wasn't found.
    fn update_item(
        &mut self,
        owner: &str,
        id: ItemId,
        amount_left: f64,
        usage_per_day: f64,
    ) -> Result<bool>;

    /// Returns false if the item wasn't found.
    fn delete_item(&mut self, owner: &str, id: ItemId) -> Result<bool>;

    /// All items for `owner`, oldest first
    fn list_items(&self, owner: &str) -> Result<Vec<SupplyItem>>;
}

// Lets the backend be picked at runtime from config
impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn find_account(&self, email: &str) -> Result<Option<Account>> {
        (**self).find_account(email)
    }

    fn insert_account(&mut self, account: &Account) -> Result<bool> {
        (**self).insert_account(account)
    }

    fn insert_item(&mut self, owner: &str, item: NewSupplyItem) -> Result<SupplyItem> {
        (**self).insert_item(owner, item)
    }

    fn get_item(&self, owner: &str, id: ItemId) -> Result<Option<SupplyItem>> {
        (**self).get_item(owner, id)
    }

    fn update_item(
        &mut self,
        owner: &str,
        id: ItemId,
        amount_left: f64,
        usage_per_day: f64,
    ) -> Result<bool> {
        (**self).update_item(owner, id, amount_left, usage_per_day)
    }

    fn delete_item(&mut self, owner: &str, id: ItemId) -> Result<bool> {
        (**self).delete_item(owner, id)
    }

    fn list_items(&self, owner: &str) -> Result<Vec<SupplyItem>> {
        (**self).list_items(owner)
    }
}
