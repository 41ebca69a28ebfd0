// 📥 CSV Import - bulk customer creation
//
// Expected header: customer_name,amount,date
// Rows for the same customer are gathered into one batch, customers keep the
// order in which they first appear in the file.

use crate::model::{NewCustomer, NewTransaction};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ImportRow {
    customer_name: String,
    amount: Option<f64>,
    date: Option<String>,
}

/// Parse CSV rows into one creation request per customer name
pub fn read_customers<R: Read>(reader: R) -> Result<Vec<NewCustomer>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut customers: Vec<NewCustomer> = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        // +2: header line plus 1-based numbering
        let row: ImportRow = result.with_context(|| format!("Failed to parse CSV line {}", index + 2))?;
        let tx = NewTransaction {
            amount: row.amount,
            date: row.date,
        };

        let existing = customers
            .iter_mut()
            .find(|c| c.customer_name.as_deref() == Some(row.customer_name.as_str()));

        match existing {
            Some(customer) => customer.transactions.get_or_insert_with(Vec::new).push(tx),
            None => customers.push(NewCustomer::new(&row.customer_name, vec![tx])),
        }
    }

    Ok(customers)
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<NewCustomer>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {:?}", csv_path))?;
    read_customers(file)
}
