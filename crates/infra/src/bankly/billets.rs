//! Bill payments and bank slips

use bankly_domain::{BillPayment, CancelBillet, DepositBillet, Result};
use serde_json::{json, Value};

use super::{json_body, Bankly};
use crate::api::{CallOptions, RawResponse, RequestBody};

impl Bankly {
    /// Validate a bill's typeable line or barcode before paying it
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn payment_validate(&self, code: &str, correlation_id: &str) -> Result<Value> {
        self.client
            .post(
                "/bill-payment/validate",
                RequestBody::Json(json!({ "code": code })),
                CallOptions::new().correlation_id(correlation_id),
            )
            .await
    }

    /// # Errors
    ///
    /// `Validation` for an invalid payment, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn payment_confirm(&self, payment: &BillPayment, correlation_id: &str) -> Result<Value> {
        let body = json_body(payment)?;
        self.client
            .post("/bill-payment/confirm", body, CallOptions::new().correlation_id(correlation_id))
            .await
    }

    /// Issue a billet
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid billet, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn deposit_billet(&self, billet: &DepositBillet) -> Result<Value> {
        let body = json_body(billet)?;
        self.client.post("/bankslip", body, CallOptions::new()).await
    }

    /// The billet PDF, as sent by the bank
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn print_billet(&self, authentication_code: &str) -> Result<RawResponse> {
        self.client
            .get_raw(&format!("/bankslip/{authentication_code}/pdf"), Vec::new(), CallOptions::new())
            .await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_billet(&self, branch: &str, account: &str, authentication_code: &str) -> Result<Value> {
        self.client
            .get(
                &format!("/bankslip/branch/{branch}/number/{account}/{authentication_code}"),
                Vec::new(),
                CallOptions::new(),
            )
            .await
    }

    /// Billets whose status changed since `datetime`
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_billet_by_date(&self, datetime: &str) -> Result<Value> {
        self.client.get(&format!("/bankslip/searchstatus/{datetime}"), Vec::new(), CallOptions::new()).await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_billet_by_barcode(&self, barcode: &str) -> Result<Value> {
        self.client.get(&format!("/bankslip/{barcode}"), Vec::new(), CallOptions::new()).await
    }

    /// # Errors
    ///
    /// `Validation` for an invalid cancellation, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn cancel_billet(&self, cancel: &CancelBillet) -> Result<Value> {
        let body = json_body(cancel)?;
        self.client.delete("/bankslip/cancel", body, CallOptions::new()).await
    }
}
