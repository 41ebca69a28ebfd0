// Rewards Service - validation, persistence and aggregation in one place
// Both the HTTP API and the CLI go through this type.

use crate::db::CustomerStore;
use crate::error::{Result, RewardsError};
use crate::model::{Customer, NewCustomer, ValidTransaction};
use crate::rewards::{aggregate, RewardsReport};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct RewardsService {
    store: Arc<dyn CustomerStore>,
}

impl RewardsService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        RewardsService { store }
    }

    /// Validate and persist a customer with its transactions
    ///
    /// The whole batch is rejected if any transaction is invalid; nothing
    /// reaches the store in that case.
    pub fn add_customer(&self, request: NewCustomer) -> Result<Customer> {
        request.validate_fields()?;

        let name = request.customer_name.unwrap_or_default();
        let submitted = request.transactions.unwrap_or_default();
        info!(customer_name = %name, transactions = submitted.len(), "saving customer");

        let transactions = submitted
            .iter()
            .map(|tx| tx.validate())
            .collect::<Result<Vec<ValidTransaction>>>()
            .map_err(|e| {
                warn!(error = %e, "rejecting customer batch");
                e
            })?;

        let saved = self.store.save_customer(&name, &transactions)?;

        info!(customer_id = saved.customer_id, "customer saved");
        Ok(saved)
    }

    /// Monthly and total reward points for one customer over `[start, end]`
    pub fn calculate_rewards(
        &self,
        customer_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<RewardsReport> {
        info!(customer_id, "calculating rewards");

        if customer_id <= 0 {
            return Err(RewardsError::InvalidRequest(
                "Customer ID must be a positive number.".to_string(),
            ));
        }

        let (Some(start), Some(end)) = (start, end) else {
            return Err(RewardsError::InvalidRequest(
                "Start date and end date cannot be null.".to_string(),
            ));
        };

        if start > end {
            return Err(RewardsError::InvalidRequest(
                "Start date cannot be after end date.".to_string(),
            ));
        }

        let transactions = self.store.find_transactions_between(customer_id, start, end)?;
        if transactions.is_empty() {
            return Err(RewardsError::CustomerNotFound(format!(
                "No transactions found for customer ID: {}",
                customer_id
            )));
        }

        let summary = aggregate(&transactions);

        // Looked up only after the range check, so an existing customer with
        // nothing in range is still reported as not found above.
        let customer = self.store.find_customer(customer_id)?.ok_or_else(|| {
            RewardsError::CustomerNotFound(format!("Customer not found for ID: {}", customer_id))
        })?;

        info!(customer_id, total = summary.total, "reward calculation completed");
        Ok(RewardsReport::new(customer, summary))
    }

    /// Remove a customer and all of its transactions
    pub fn delete_customer(&self, customer_id: i64) -> Result<()> {
        if customer_id <= 0 {
            return Err(RewardsError::InvalidRequest(
                "Customer ID must be a positive number.".to_string(),
            ));
        }

        if self.store.delete_customer(customer_id)? {
            info!(customer_id, "customer deleted");
            Ok(())
        } else {
            Err(RewardsError::CustomerNotFound(format!(
                "Customer not found for ID: {}",
                customer_id
            )))
        }
    }
}
