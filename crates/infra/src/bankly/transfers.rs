//! Fund transfers

use bankly_domain::{FundTransfer, Result, TransferParty};
use serde_json::Value;

use super::{json_body, pairs, Bankly};
use crate::api::CallOptions;

impl Bankly {
    /// Transfer `amount` cents from `sender` to `recipient`
    ///
    /// The sender's bank code is dropped before sending.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad amount or party, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn transfer(
        &self,
        amount: i64,
        description: &str,
        sender: TransferParty,
        recipient: TransferParty,
        correlation_id: Option<&str>,
    ) -> Result<Value> {
        let body = json_body(&FundTransfer::new(amount, description, sender, recipient))?;
        self.client.post("/fund-transfers", body, CallOptions::correlated(correlation_id)).await
    }

    /// Page through the transfers of an account
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_transfer_funds(
        &self,
        branch: &str,
        account: &str,
        page_size: u32,
        next_page: Option<&str>,
    ) -> Result<Value> {
        let page_size = page_size.to_string();
        let mut query = pairs([("branch", branch), ("account", account), ("pageSize", page_size.as_str())]);
        if let Some(next_page) = next_page {
            query.push(("nextPage".to_string(), next_page.to_string()));
        }
        self.client.get("/fund-transfers", query, CallOptions::new()).await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn find_transfer_fund_by_auth_code(
        &self,
        branch: &str,
        account: &str,
        authentication_code: &str,
    ) -> Result<Value> {
        self.client
            .get(
                &format!("/fund-transfers/{authentication_code}"),
                pairs([("branch", branch), ("account", account)]),
                CallOptions::new(),
            )
            .await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_transfer_status(
        &self,
        branch: &str,
        account: &str,
        authentication_id: &str,
    ) -> Result<Value> {
        self.client
            .get(
                &format!("/fund-transfers/{authentication_id}/status"),
                pairs([("branch", branch), ("account", account)]),
                CallOptions::new(),
            )
            .await
    }
}
