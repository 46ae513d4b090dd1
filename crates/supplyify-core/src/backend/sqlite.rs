// SQLite backend - bridges SupplyDatabase with the StorageBackend trait
use supplyify_store::{NewSupplyRow, SupplyDatabase, SupplyRow, UserRow};
use tracing::debug;

use super::StorageBackend;
use crate::{
    models::{Account, ItemId, NewSupplyItem, SupplyItem},
    Error, Result,
};

/// Wrapper around SupplyDatabase that implements StorageBackend
///
/// Each call is its own auto-committed statement. Two sessions editing the
/// same item race and the last write wins.
pub struct SqliteBackend {
    db: SupplyDatabase,
}

impl SqliteBackend {
    pub fn open(db_path: &str) -> Result<Self> {
        let db = SupplyDatabase::new(db_path).map_err(storage_error)?;
        Ok(Self { db })
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = SupplyDatabase::open_in_memory().map_err(storage_error)?;
        Ok(Self { db })
    }
}

impl StorageBackend for SqliteBackend {
    fn find_account(&self, email: &str) -> Result<Option<Account>> {
        let row = self.db.find_user(email).map_err(storage_error)?;
        Ok(row.map(user_to_account))
    }

    fn insert_account(&mut self, account: &Account) -> Result<bool> {
        self.db
            .insert_user(&account.email, &account.password_hash)
            .map_err(storage_error)
    }

    fn insert_item(&mut self, owner: &str, item: NewSupplyItem) -> Result<SupplyItem> {
        let id = self
            .db
            .insert_supply(&NewSupplyRow {
                email: owner,
                name: &item.name,
                link: &item.link,
                amount_left: item.amount_left,
                usage_per_day: item.usage_per_day,
                added_on: item.added_on,
            })
            .map_err(storage_error)?;

        debug!("Inserted supply row {}", id);
        Ok(item.into_item(ItemId(id)))
    }

    fn get_item(&self, owner: &str, id: ItemId) -> Result<Option<SupplyItem>> {
        let row = self.db.get_supply(owner, id.0).map_err(storage_error)?;
        Ok(row.map(row_to_item))
    }

    fn update_item(
        &mut self,
        owner: &str,
        id: ItemId,
        amount_left: f64,
        usage_per_day: f64,
    ) -> Result<bool> {
        self.db
            .update_supply(owner, id.0, amount_left, usage_per_day)
            .map_err(storage_error)
    }

    fn delete_item(&mut self, owner: &str, id: ItemId) -> Result<bool> {
        self.db.delete_supply(owner, id.0).map_err(storage_error)
    }

    fn list_items(&self, owner: &str) -> Result<Vec<SupplyItem>> {
        let rows = self.db.list_supplies(owner).map_err(storage_error)?;
        Ok(rows.into_iter().map(row_to_item).collect())
    }
}

fn storage_error(e: impl std::fmt::Display) -> Error {
    Error::StorageError(e.to_string())
}

fn user_to_account(row: UserRow) -> Account {
    Account {
        email: row.email,
        password_hash: row.password_hash,
    }
}

fn row_to_item(row: SupplyRow) -> SupplyItem {
    SupplyItem {
        id: ItemId(row.id),
        name: row.name,
        link: row.link,
        amount_left: row.amount_left,
        usage_per_day: row.usage_per_day,
        added_on: row.added_on,
    }
}
