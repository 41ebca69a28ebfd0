use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use customer_rewards::import::load_csv;
use customer_rewards::{init_tracing, Config, RewardsService, SqliteStore};

const USAGE: &str = "Usage:
  customer-rewards import <file.csv>
  customer-rewards rewards <customer_id> <start YYYY-MM-DD> <end YYYY-MM-DD>
  customer-rewards delete <customer_id>";

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env();

    match args.get(1).map(String::as_str) {
        Some("import") if args.len() == 3 => run_import(&config, Path::new(&args[2])),
        Some("rewards") if args.len() == 5 => run_rewards(&config, &args[2], &args[3], &args[4]),
        Some("delete") if args.len() == 3 => run_delete(&config, &args[2]),
        _ => bail!("{}", USAGE),
    }
}

fn open_service(config: &Config) -> Result<(Arc<SqliteStore>, RewardsService)> {
    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database at {:?}", config.db_path))?;
    let store = Arc::new(store);
    let service = RewardsService::new(store.clone());
    Ok((store, service))
}

fn parse_customer_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .with_context(|| format!("Customer ID must be a positive number, got '{}'", raw))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}': expected YYYY-MM-DD", raw))
}

fn run_import(config: &Config, csv_path: &Path) -> Result<()> {
    let customers = load_csv(csv_path)?;
    info!(customers = customers.len(), path = ?csv_path, "loaded CSV");

    let (store, service) = open_service(config)?;

    let mut imported = 0;
    let mut rejected = 0;

    for request in customers {
        let name = request.customer_name.clone().unwrap_or_default();
        match service.add_customer(request) {
            Ok(saved) => {
                imported += 1;
                println!("{}\t{}", saved.customer_id, saved.customer_name);
            }
            Err(e) if e.status_code() == 400 => {
                rejected += 1;
                warn!(customer_name = %name, error = %e, "skipping customer");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let total = store.count_customers()?;
    info!(imported, rejected, total, "import finished");

    Ok(())
}

fn run_rewards(config: &Config, customer_id: &str, start: &str, end: &str) -> Result<()> {
    let customer_id = parse_customer_id(customer_id)?;
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    let (_, service) = open_service(config)?;
    let report = service.calculate_rewards(customer_id, Some(start), Some(end))?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn run_delete(config: &Config, customer_id: &str) -> Result<()> {
    let customer_id = parse_customer_id(customer_id)?;

    let (_, service) = open_service(config)?;
    service.delete_customer(customer_id)?;

    println!("Deleted customer {}", customer_id);

    Ok(())
}
