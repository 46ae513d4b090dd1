// SQLite-backed persistence for accounts and tracked supplies
// Every statement auto-commits; there is no cross-statement locking

pub mod database;

pub use database::{NewSupplyRow, SupplyDatabase, SupplyRow, UserRow};
