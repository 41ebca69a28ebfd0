use crate::error::{Result, RewardsError};
use crate::model::{Customer, Transaction, ValidTransaction};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Persistence boundary for customers and their transactions
///
/// Implementations must persist a customer and its transactions atomically:
/// either everything from `save_customer` is visible afterwards or nothing is.
pub trait CustomerStore: Send + Sync {
    /// Insert the customer, then each transaction with the assigned customer id
    fn save_customer(&self, name: &str, transactions: &[ValidTransaction]) -> Result<Customer>;

    /// Transactions of one customer with `start <= date <= end`, in insertion order
    fn find_transactions_between(
        &self,
        customer_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>>;

    /// Customer with all of its transactions
    fn find_customer(&self, customer_id: i64) -> Result<Option<Customer>>;

    /// Remove a customer and, by cascade, its transactions. Returns false if absent.
    fn delete_customer(&self, customer_id: i64) -> Result<bool>;
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Cascading deletes rely on this, SQLite leaves it off by default
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // ==========================================================================
    // Customers Table
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS customers (
            customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_name TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Transactions Table (owned by customers)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            transaction_id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id INTEGER NOT NULL
                REFERENCES customers(customer_id) ON DELETE CASCADE,
            amount REAL NOT NULL CHECK (amount > 0),
            date TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_customer_date
         ON transactions(customer_id, date)",
        [],
    )?;

    Ok(())
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        transaction_id: row.get(0)?,
        customer_id: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
    })
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// SQLite-backed store; one connection shared behind a mutex
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RewardsError::Unhandled("database connection lock poisoned".to_string()))
    }

    pub fn count_customers(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl CustomerStore for SqliteStore {
    fn save_customer(&self, name: &str, transactions: &[ValidTransaction]) -> Result<Customer> {
        let mut conn = self.lock()?;

        // Dropping `db_tx` without commit rolls everything back
        let db_tx = conn.transaction()?;

        db_tx.execute(
            "INSERT INTO customers (customer_name) VALUES (?1)",
            params![name],
        )?;
        let customer_id = db_tx.last_insert_rowid();

        let mut saved = Vec::with_capacity(transactions.len());
        {
            let mut stmt = db_tx.prepare(
                "INSERT INTO transactions (customer_id, amount, date) VALUES (?1, ?2, ?3)",
            )?;

            for tx in transactions {
                let transaction_id = stmt.insert(params![customer_id, tx.amount, tx.date])?;
                saved.push(Transaction {
                    transaction_id,
                    amount: tx.amount,
                    date: tx.date,
                    customer_id,
                });
            }
        }

        db_tx.commit()?;

        debug!(customer_id, transactions = saved.len(), "customer persisted");

        Ok(Customer {
            customer_id,
            customer_name: name.to_string(),
            transactions: saved,
        })
    }

    fn find_transactions_between(
        &self,
        customer_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT transaction_id, customer_id, amount, date
             FROM transactions
             WHERE customer_id = ?1 AND date BETWEEN ?2 AND ?3
             ORDER BY transaction_id",
        )?;

        let transactions = stmt
            .query_map(params![customer_id, start, end], transaction_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(customer_id, %start, %end, found = transactions.len(), "transactions in range");

        Ok(transactions)
    }

    fn find_customer(&self, customer_id: i64) -> Result<Option<Customer>> {
        let conn = self.lock()?;

        let name: Option<String> = conn
            .query_row(
                "SELECT customer_name FROM customers WHERE customer_id = ?1",
                params![customer_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(customer_name) = name else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT transaction_id, customer_id, amount, date
             FROM transactions
             WHERE customer_id = ?1
             ORDER BY transaction_id",
        )?;
        let transactions = stmt
            .query_map(params![customer_id], transaction_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(Customer {
            customer_id,
            customer_name,
            transactions,
        }))
    }

    fn delete_customer(&self, customer_id: i64) -> Result<bool> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM customers WHERE customer_id = ?1",
            params![customer_id],
        )?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Helper function to build a validated transaction
    fn valid(amount: f64, on: &str) -> ValidTransaction {
        ValidTransaction {
            amount,
            date: date(on),
        }
    }

    #[test]
    fn test_save_assigns_ids() {
        let store = SqliteStore::open_in_memory().unwrap();

        let customer = store
            .save_customer("John", &[valid(120.0, "2024-01-15"), valid(60.0, "2024-02-01")])
            .unwrap();

        assert!(customer.customer_id > 0);
        assert_eq!(customer.customer_name, "John");
        assert_eq!(customer.transactions.len(), 2);
        assert!(customer.transactions[0].transaction_id < customer.transactions[1].transaction_id);
        assert!(customer.transactions.iter().all(|t| t.customer_id == customer.customer_id));

        let loaded = store.find_customer(customer.customer_id).unwrap();
        assert_eq!(loaded, Some(customer));
    }

    #[test]
    fn test_range_is_inclusive_and_per_customer() {
        let store = SqliteStore::open_in_memory().unwrap();

        let john = store
            .save_customer(
                "John",
                &[
                    valid(120.0, "2023-12-31"),
                    valid(70.0, "2024-01-01"),
                    valid(80.0, "2024-06-30"),
                    valid(90.0, "2024-07-01"),
                ],
            )
            .unwrap();
        store.save_customer("Jane", &[valid(500.0, "2024-03-01")]).unwrap();

        let found = store
            .find_transactions_between(john.customer_id, date("2024-01-01"), date("2024-06-30"))
            .unwrap();

        let amounts: Vec<f64> = found.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![70.0, 80.0]);
    }

    #[test]
    fn test_unknown_customer() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.find_customer(42).unwrap(), None);
        assert!(!store.delete_customer(42).unwrap());
    }

    #[test]
    fn test_failed_batch_persists_nothing() {
        let store = SqliteStore::open_in_memory().unwrap();

        // Second row violates the amount CHECK constraint
        let result = store.save_customer("John", &[valid(120.0, "2024-01-15"), valid(-5.0, "2024-01-16")]);

        assert!(matches!(result, Err(RewardsError::Storage(_))));
        assert_eq!(store.count_customers().unwrap(), 0);
        assert_eq!(store.count_transactions().unwrap(), 0);
    }

    #[test]
    fn test_delete_cascades_to_transactions() {
        let store = SqliteStore::open_in_memory().unwrap();
        let customer = store
            .save_customer("John", &[valid(120.0, "2024-01-15"), valid(60.0, "2024-02-01")])
            .unwrap();
        let other = store.save_customer("Jane", &[valid(75.0, "2024-02-01")]).unwrap();

        assert!(store.delete_customer(customer.customer_id).unwrap());

        assert_eq!(store.count_customers().unwrap(), 1);
        assert_eq!(store.count_transactions().unwrap(), 1);
        assert!(store.find_customer(other.customer_id).unwrap().is_some());
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rewards.db");

        let customer_id = {
            let store = SqliteStore::open(&path).unwrap();
            store.save_customer("John", &[valid(120.0, "2024-04-15")]).unwrap().customer_id
        };

        let reopened = SqliteStore::open(&path).unwrap();
        let customer = reopened.find_customer(customer_id).unwrap().unwrap();
        assert_eq!(customer.transactions[0].date, date("2024-04-15"));
    }
}
