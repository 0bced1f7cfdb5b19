//! Bank list, balances, account data and statements

use bankly_domain::constants::{DEFAULT_BANK_LIST_PRODUCT, DEFAULT_CLOSURE_REASON};
use bankly_domain::{EventsQuery, Reason, Result, StatementQuery};
use serde_json::Value;

use super::{json_body, pairs, Bankly};
use crate::api::CallOptions;

impl Bankly {
    /// `GET /banklist`; `product` defaults to `None`
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_bank_list(&self, product: Option<&str>) -> Result<Value> {
        let product = product.unwrap_or(DEFAULT_BANK_LIST_PRODUCT);
        self.client.get("/banklist", pairs([("product", product)]), CallOptions::new()).await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_balance(&self, branch: &str, account: &str) -> Result<Value> {
        self.client
            .get("/account/balance", pairs([("branch", branch), ("account", account)]), CallOptions::new())
            .await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_account(&self, account: &str, include_balance: bool) -> Result<Value> {
        let include_balance = include_balance.to_string();
        self.client
            .get(
                &format!("/accounts/{account}"),
                pairs([("includeBalance", include_balance.as_str())]),
                CallOptions::new(),
            )
            .await
    }

    /// Income report of `year`, or of the current calendar year
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_income_report(&self, account: &str, year: Option<&str>) -> Result<Value> {
        self.client
            .get(&format!("/accounts/{account}/income-report"), calendar(year), CallOptions::new())
            .await
    }

    /// Printable income report
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_income_report_print(&self, account: &str, year: Option<&str>) -> Result<Value> {
        self.client
            .get(&format!("/accounts/{account}/income-report/print"), calendar(year), CallOptions::new())
            .await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_statement(&self, query: &StatementQuery) -> Result<Value> {
        self.client.get("/account/statement", query.to_pairs(), CallOptions::new()).await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_events(&self, query: &EventsQuery) -> Result<Value> {
        self.client.get("/events", query.to_pairs(), CallOptions::new()).await
    }

    /// Close an account; `reason` defaults to `HOLDER_REQUEST`
    ///
    /// # Errors
    ///
    /// `Validation` for an empty reason, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn close_account(
        &self,
        account: &str,
        reason: Option<&str>,
        correlation_id: Option<&str>,
    ) -> Result<Value> {
        let body = json_body(&Reason { reason: reason.unwrap_or(DEFAULT_CLOSURE_REASON).to_string() })?;
        self.client
            .patch(&format!("/accounts/{account}/closure"), body, CallOptions::correlated(correlation_id))
            .await
    }
}

fn calendar(year: Option<&str>) -> Vec<(String, String)> {
    year.map(|year| pairs([("calendar", year)])).unwrap_or_default()
}
