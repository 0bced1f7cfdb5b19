//! PIX addressing keys, cash-out and QR codes
//!
//! Calls made on behalf of a PIX user carry `x-bkly-pix-user-id` with that
//! user's document number.

use bankly_domain::{
    PixCashout, PixDynamicQrCode, PixEntries, PixQrCodeData, PixStaticQrCode, Result,
};
use serde_json::Value;

use super::{json_body, Bankly};
use crate::api::{CallOptions, RequestBody};

impl Bankly {
    /// Link an addressing key to an account
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid key or account, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn register_pix_key(&self, entries: &PixEntries) -> Result<Value> {
        let body = json_body(entries)?;
        self.client.post("/pix/entries", body, CallOptions::new()).await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_pix_addressing_keys(&self, account: &str) -> Result<Value> {
        self.client.get(&format!("/accounts/{account}/addressing-keys"), Vec::new(), CallOptions::new()).await
    }

    /// Look up the account behind `key` on behalf of `document`
    ///
    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn get_pix_addressing_key_value(&self, document: &str, key: &str) -> Result<Value> {
        let options = self.pix_user_options(document);
        self.client.get(&format!("/pix/entries/{key}"), Vec::new(), options).await
    }

    /// # Errors
    ///
    /// See [`crate::api::ApiClient::execute`]
    pub async fn delete_pix_addressing_key_value(&self, key: &str) -> Result<Value> {
        self.client.delete(&format!("/pix/entries/{key}"), RequestBody::Empty, CallOptions::new()).await
    }

    /// Send a PIX payment
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid cash-out, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn pix_cashout(&self, cashout: &impl PixCashout, correlation_id: &str) -> Result<Value> {
        let body = json_body(cashout)?;
        self.client.post("/pix/cash-out", body, CallOptions::new().correlation_id(correlation_id)).await
    }

    /// Return a received PIX payment
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid refund, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn pix_refund(&self, refund: &impl PixCashout) -> Result<Value> {
        let body = json_body(refund)?;
        self.client.post("/pix/cash-out:refund", body, CallOptions::new()).await
    }

    /// Create a static QR code on behalf of `document`
    ///
    /// # Errors
    ///
    /// `Validation` for invalid QR code data, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn qr_code(&self, document: &str, data: &PixStaticQrCode) -> Result<Value> {
        let body = json_body(data)?;
        let options = self.pix_user_options(document);
        self.client.post("/pix/qrcodes/static/transfer", body, options).await
    }

    /// Create a dynamic QR code on behalf of `document`
    ///
    /// # Errors
    ///
    /// `Validation` for invalid QR code data, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn dynamic_qr_code(&self, document: &str, data: &PixDynamicQrCode) -> Result<Value> {
        let body = json_body(data)?;
        let options = self.pix_user_options(document);
        self.client.post("/pix/qrcodes/dynamic/payment", body, options).await
    }

    /// Decode a QR code on behalf of the payload's document number
    ///
    /// # Errors
    ///
    /// `Validation` for an empty code or document, otherwise see
    /// [`crate::api::ApiClient::execute`]
    pub async fn qr_code_decode(&self, data: &PixQrCodeData) -> Result<Value> {
        let body = json_body(data)?;
        let options = self.pix_user_options(&data.document_number);
        self.client.post("/pix/qrcodes/decode", body, options).await
    }
}
