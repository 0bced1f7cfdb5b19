//! Webhook messages and holder limits

use bankly_domain::{LimitsUpdate, Result, WebhookMessagesQuery};
use serde_json::{json, Value};

use super::{json_body, Bankly};
use crate::api::{CallOptions, RequestBody};

impl Bankly {
    /// Webhook deliveries processed in a date window
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_webhook_messages(&self, query: &WebhookMessagesQuery) -> Result<Value> {
        self.client.get("/webhooks/processed-messages", query.to_pairs(), CallOptions::new()).await
    }

    /// Deliver a processed webhook message again
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn reprocess_webhook_message(&self, idempotency_key: &str) -> Result<Value> {
        self.client
            .post(
                &format!("/webhooks/processed-messages/{idempotency_key}"),
                RequestBody::Json(json!([])),
                CallOptions::new(),
            )
            .await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_feature_limits(&self, document: &str, limit_type: &str, feature: &str) -> Result<Value> {
        self.client
            .get(
                &format!("/holders/{document}/limits/{limit_type}/features/{feature}"),
                Vec::new(),
                CallOptions::new(),
            )
            .await
    }

    /// Change a holder's maximum limits
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid update, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn update_customer_limits(&self, document: &str, limits: &LimitsUpdate) -> Result<Value> {
        let body = json_body(limits)?;
        self.client.put(&format!("/holders/{document}/max-limits"), body, CallOptions::new()).await
    }
}
