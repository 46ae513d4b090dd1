use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use tracing::debug;

/// Supply database using SQLite
///
/// Two tables: `users` keyed by email, and `supplies` grouped by owner email.
/// Item ids come from AUTOINCREMENT so they are never handed out twice, even
/// after the newest row is deleted.
pub struct SupplyDatabase {
    conn: Connection,
}

/// Stored account row. Only the password hash ever hits disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub email: String,
    pub password_hash: String,
}

/// Stored supply row
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub link: String,
    pub amount_left: f64,
    pub usage_per_day: f64,
    pub added_on: DateTime<Utc>,
}

/// Supply row before the database has assigned an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplyRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub link: &'a str,
    pub amount_left: f64,
    pub usage_per_day: f64,
    pub added_on: DateTime<Utc>,
}

impl SupplyDatabase {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // Initialize schema on first run
        Self::init_schema(&conn)?;

        debug!("Opened supply database at {}", db_path);
        Ok(Self { conn })
    }

    /// Throwaway database, handy for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                email TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS supplies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                name TEXT NOT NULL,
                link TEXT NOT NULL,
                amount_left REAL NOT NULL,
                usage_per_day REAL NOT NULL,
                added_on TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_supplies_email ON supplies(email)",
            [],
        )?;

        Ok(())
    }

    /// Insert a user. Returns false if the email is already taken.
    pub fn insert_user(&self, email: &str, password_hash: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO users (email, password_hash) VALUES (?1, ?2)",
            params![email, password_hash],
        )?;
        Ok(changed == 1)
    }

    pub fn find_user(&self, email: &str) -> Result<Option<UserRow>> {
        self.conn
            .query_row(
                "SELECT email, password_hash FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok(UserRow {
                        email: row.get(0)?,
                        password_hash: row.get(1)?,
                    })
                },
            )
            .optional()
    }

    /// Insert a supply row and return its new id
    pub fn insert_supply(&self, supply: &NewSupplyRow<'_>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO supplies (email, name, link, amount_left, usage_per_day, added_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                supply.email,
                supply.name,
                supply.link,
                supply.amount_left,
                supply.usage_per_day,
                supply.added_on,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_supply(&self, email: &str, id: i64) -> Result<Option<SupplyRow>> {
        self.conn
            .query_row(
                "SELECT id, email, name, link, amount_left, usage_per_day, added_on
                 FROM supplies WHERE id = ?1 AND email = ?2",
                params![id, email],
                Self::map_supply,
            )
            .optional()
    }

    /// Overwrite quantity fields. Returns false if no row matched.
    pub fn update_supply(
        &self,
        email: &str,
        id: i64,
        amount_left: f64,
        usage_per_day: f64,
    ) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE supplies SET amount_left = ?1, usage_per_day = ?2
             WHERE id = ?3 AND email = ?4",
            params![amount_left, usage_per_day, id, email],
        )?;
        Ok(changed > 0)
    }

    /// Returns false if no row matched.
    pub fn delete_supply(&self, email: &str, id: i64) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM supplies WHERE id = ?1 AND email = ?2",
            params![id, email],
        )?;
        Ok(changed > 0)
    }

    /// All supplies for one owner in insertion order
    pub fn list_supplies(&self, email: &str) -> Result<Vec<SupplyRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, name, link, amount_left, usage_per_day, added_on
             FROM supplies WHERE email = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![email], Self::map_supply)?;
        rows.collect()
    }

    fn map_supply(row: &Row<'_>) -> Result<SupplyRow> {
        Ok(SupplyRow {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            link: row.get(3)?,
            amount_left: row.get(4)?,
            usage_per_day: row.get(5)?,
            added_on: row.get(6)?,
        })
    }
}
