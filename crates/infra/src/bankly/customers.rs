//! Customer onboarding, document analysis and customer accounts

use bankly_domain::constants::{
    DEFAULT_CLOSURE_REASON, DEFAULT_DOCUMENT_RESULT_LEVEL, DEFAULT_RESULT_LEVEL,
};
use bankly_domain::{Attachment, BusinessCustomer, Customer, DocumentAnalysis, PaymentAccount, Reason, Result};
use serde_json::Value;

use super::{json_body, pairs, Bankly};
use crate::api::{CallOptions, RequestBody};

impl Bankly {
    /// Upload a document image for analysis
    ///
    /// # Errors
    ///
    /// `Validation` for an unusable attachment, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn document_analysis(
        &self,
        document: &str,
        analysis: &DocumentAnalysis,
        correlation_id: Option<&str>,
    ) -> Result<Value> {
        let body = RequestBody::Multipart(analysis.to_multipart()?);
        self.client
            .post(
                &format!("/document-analysis/{document}/deepface"),
                body,
                CallOptions::correlated(correlation_id),
            )
            .await
    }

    /// Results of earlier analyses, one `token` per upload
    ///
    /// `result_level` defaults to `ONLY_STATUS`.
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_document_analysis(
        &self,
        document: &str,
        tokens: &[String],
        result_level: Option<&str>,
        correlation_id: Option<&str>,
    ) -> Result<Value> {
        let mut query: Vec<(String, String)> =
            tokens.iter().map(|token| ("token".to_string(), token.clone())).collect();
        query.push((
            "resultLevel".to_string(),
            result_level.unwrap_or(DEFAULT_DOCUMENT_RESULT_LEVEL).to_string(),
        ));
        self.client
            .get(&format!("/document-analysis/{document}"), query, CallOptions::correlated(correlation_id))
            .await
    }

    /// Register or update a person
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid customer, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn customer(
        &self,
        document: &str,
        customer: &Customer,
        correlation_id: Option<&str>,
    ) -> Result<Value> {
        let body = json_body(customer)?;
        self.client
            .put(&format!("/customers/{document}"), body, CallOptions::correlated(correlation_id))
            .await
    }

    /// Register or update a business
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid customer, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn business_customer(
        &self,
        document: &str,
        customer: &BusinessCustomer,
        correlation_id: Option<&str>,
    ) -> Result<Value> {
        let body = json_body(customer)?;
        self.client
            .put(&format!("/business/{document}"), body, CallOptions::correlated(correlation_id))
            .await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn cancel_customer(
        &self,
        document: &str,
        reason: Option<&str>,
        correlation_id: Option<&str>,
    ) -> Result<Value> {
        let body = cancellation(reason)?;
        self.client
            .patch(&format!("/customers/{document}/cancel"), body, CallOptions::correlated(correlation_id))
            .await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn cancel_business(
        &self,
        document: &str,
        reason: Option<&str>,
        correlation_id: Option<&str>,
    ) -> Result<Value> {
        let body = cancellation(reason)?;
        self.client
            .patch(&format!("/business/{document}/cancel"), body, CallOptions::correlated(correlation_id))
            .await
    }

    /// `result_level` defaults to `DETAILED`
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_customer(&self, document: &str, result_level: Option<&str>) -> Result<Value> {
        self.client
            .get(&format!("/customers/{document}"), result_level_query(result_level), CallOptions::new())
            .await
    }

    /// `result_level` defaults to `DETAILED`
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_business_customer(&self, document: &str, result_level: Option<&str>) -> Result<Value> {
        self.client
            .get(&format!("/business/{document}"), result_level_query(result_level), CallOptions::new())
            .await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_customer_accounts(&self, document: &str) -> Result<Value> {
        self.client.get(&format!("/customers/{document}/accounts"), Vec::new(), CallOptions::new()).await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_business_customer_accounts(&self, document: &str) -> Result<Value> {
        self.client.get(&format!("/business/{document}/accounts"), Vec::new(), CallOptions::new()).await
    }

    /// # Errors
    ///
    /// `Validation` for an unknown account type, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn create_customer_account(&self, document: &str, account: &PaymentAccount) -> Result<Value> {
        let body = json_body(account)?;
        self.client.post(&format!("/customers/{document}/accounts"), body, CallOptions::new()).await
    }

    /// # Errors
    ///
    /// `Validation` for an unknown account type, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn create_business_customer_account(
        &self,
        document: &str,
        account: &PaymentAccount,
    ) -> Result<Value> {
        let body = json_body(account)?;
        self.client.post(&format!("/business/{document}/accounts"), body, CallOptions::new()).await
    }
}

fn cancellation(reason: Option<&str>) -> Result<RequestBody> {
    json_body(&Reason { reason: reason.unwrap_or(DEFAULT_CLOSURE_REASON).to_string() })
}

fn result_level_query(result_level: Option<&str>) -> Vec<(String, String)> {
    pairs([("resultLevel", result_level.unwrap_or(DEFAULT_RESULT_LEVEL))])
}
