//! PIX payloads: addressing keys, cash-out, refunds and QR codes

use serde::{Deserialize, Serialize};

use super::payload::Payload;
use crate::validation::{StringValidator, Validator};

const KEY_TYPES: [&str; 5] = ["CPF", "CNPJ", "PHONE", "EMAIL", "EVP"];
const ACCOUNT_TYPES: [&str; 3] = ["CHECKING", "SAVINGS", "PAYMENT"];

/// PIX addressing key (alias resolving to an account)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressingKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

impl Payload for AddressingKey {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "type",
            &self.key_type,
            &StringValidator::new().one_of(&KEY_TYPES).message("addressing key type is not valid"),
        );
        // Random (EVP) keys are generated by the bank and sent without a value.
        if self.key_type != "EVP" {
            v.check(
                "value",
                &self.value,
                &StringValidator::new().not_empty().message("addressing key value should be a string"),
            );
        }
    }
}

/// Account reference inside PIX payloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixAccount {
    pub branch: String,
    pub number: String,
    #[serde(rename = "type")]
    pub account_type: String,
}

impl Payload for PixAccount {
    fn validate_fields(&self, v: &mut Validator) {
        let digits = StringValidator::new().not_empty().digits_only();
        v.check("branch", &self.branch, &digits.clone().message("branch should be a numeric string"))
            .check("number", &self.number, &digits.message("account number should be a numeric string"))
            .check(
                "type",
                &self.account_type,
                &StringValidator::new().one_of(&ACCOUNT_TYPES).message("account type is not valid"),
            );
    }
}

/// Body of `POST /pix/entries`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixEntries {
    pub addressing_key: AddressingKey,
    pub account: PixAccount,
}

impl Payload for PixEntries {
    fn validate_fields(&self, v: &mut Validator) {
        v.nested("addressingKey", |v| self.addressing_key.validate_fields(v))
            .nested("account", |v| self.account.validate_fields(v));
    }
}

/// Financial institution identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub ispb: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compe: Option<String>,
    pub name: String,
}

/// Holder and account of one side of a PIX cash-out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub account: PixAccount,
    pub bank: Bank,
    pub document_number: String,
    pub name: String,
}

impl Payload for BankAccount {
    fn validate_fields(&self, v: &mut Validator) {
        v.nested("account", |v| self.account.validate_fields(v))
            .check(
                "bank.ispb",
                &self.bank.ispb,
                &StringValidator::new().not_empty().digits_only().message("bank ispb should be a numeric string"),
            )
            .check(
                "documentNumber",
                &self.document_number,
                &StringValidator::new().not_empty().digits_only().message("document number should be a numeric string"),
            )
            .check("name", &self.name, &StringValidator::new().not_empty().message("name should be a string"));
    }
}

/// Any body accepted by the PIX cash-out and refund endpoints
pub trait PixCashout: Payload {}

fn check_amount(v: &mut Validator, amount: &str) {
    v.check(
        "amount",
        amount,
        &StringValidator::new().positive_number().message("amount should be a numeric string and greater than zero"),
    );
}

fn check_description(v: &mut Validator, description: &str) {
    v.check(
        "description",
        description,
        &StringValidator::new().not_empty().message("cashout description should be a string"),
    );
}

fn check_initialization(v: &mut Validator, actual: &str, expected: &str) {
    if actual.trim().is_empty() {
        v.add_error("initializationType", "initialization type should be a string");
    } else if actual != expected {
        v.add_error("initializationType", "this initialization type is not valid");
    }
}

fn check_end_to_end(v: &mut Validator, end_to_end_id: &str) {
    v.check(
        "endToEndId",
        end_to_end_id,
        &StringValidator::new().not_empty().message("end to end id should be a string"),
    );
}

/// Cash-out with manually entered recipient account data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixCashoutManual {
    pub amount: String,
    pub description: String,
    pub sender: BankAccount,
    pub recipient: BankAccount,
    pub initialization_type: String,
}

impl PixCashoutManual {
    pub fn new(amount: impl Into<String>, description: impl Into<String>, sender: BankAccount, recipient: BankAccount) -> Self {
        Self {
            amount: amount.into(),
            description: description.into(),
            sender,
            recipient,
            initialization_type: "Manual".to_string(),
        }
    }
}

impl Payload for PixCashoutManual {
    fn validate_fields(&self, v: &mut Validator) {
        check_amount(v, &self.amount);
        check_description(v, &self.description);
        v.nested("sender", |v| self.sender.validate_fields(v))
            .nested("recipient", |v| self.recipient.validate_fields(v));
        check_initialization(v, &self.initialization_type, "Manual");
    }
}

impl PixCashout for PixCashoutManual {}

/// Cash-out to an addressing key previously resolved by the bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixCashoutKey {
    pub amount: String,
    pub description: String,
    pub sender: BankAccount,
    pub recipient: BankAccount,
    pub initialization_type: String,
    pub end_to_end_id: String,
}

impl PixCashoutKey {
    pub fn new(
        amount: impl Into<String>,
        description: impl Into<String>,
        sender: BankAccount,
        recipient: BankAccount,
        end_to_end_id: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            description: description.into(),
            sender,
            recipient,
            initialization_type: "Key".to_string(),
            end_to_end_id: end_to_end_id.into(),
        }
    }
}

impl Payload for PixCashoutKey {
    fn validate_fields(&self, v: &mut Validator) {
        check_amount(v, &self.amount);
        check_description(v, &self.description);
        v.nested("sender", |v| self.sender.validate_fields(v))
            .nested("recipient", |v| self.recipient.validate_fields(v));
        check_initialization(v, &self.initialization_type, "Key");
        check_end_to_end(v, &self.end_to_end_id);
    }
}

impl PixCashout for PixCashoutKey {}

/// Cash-out paying a decoded static QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixCashoutStaticQrCode {
    pub amount: String,
    pub description: String,
    pub sender: BankAccount,
    pub initialization_type: String,
    pub end_to_end_id: String,
}

impl PixCashoutStaticQrCode {
    pub fn new(
        amount: impl Into<String>,
        description: impl Into<String>,
        sender: BankAccount,
        end_to_end_id: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            description: description.into(),
            sender,
            initialization_type: "StaticQrCode".to_string(),
            end_to_end_id: end_to_end_id.into(),
        }
    }
}

impl Payload for PixCashoutStaticQrCode {
    fn validate_fields(&self, v: &mut Validator) {
        check_amount(v, &self.amount);
        check_description(v, &self.description);
        v.nested("sender", |v| self.sender.validate_fields(v));
        check_initialization(v, &self.initialization_type, "StaticQrCode");
        check_end_to_end(v, &self.end_to_end_id);
    }
}

impl PixCashout for PixCashoutStaticQrCode {}

/// Refund of a received PIX
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixRefund {
    pub bank_account: PixAccount,
    pub amount: String,
    pub description: String,
    pub authentication_code: String,
    /// `BE08` (bank error), `FR01` (fraud), `MD06` (customer request), `SL02`
    pub refund_code: String,
}

impl Payload for PixRefund {
    fn validate_fields(&self, v: &mut Validator) {
        v.nested("bankAccount", |v| self.bank_account.validate_fields(v));
        check_amount(v, &self.amount);
        check_description(v, &self.description);
        v.check(
            "authenticationCode",
            &self.authentication_code,
            &StringValidator::new().not_empty().message("authentication code should be a string"),
        )
        .check(
            "refundCode",
            &self.refund_code,
            &StringValidator::new().one_of(&["BE08", "FR01", "MD06", "SL02"]).message("refund code is not valid"),
        );
    }
}

impl PixCashout for PixRefund {}

/// Payer address on dynamic QR codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub zip_code: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Payload for Location {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "zipCode",
            &self.zip_code,
            &StringValidator::new().not_empty().digits_only().message("zip code should be a numeric string"),
        )
        .check("city", &self.city, &StringValidator::new().not_empty().message("city should be a string"));
    }
}

/// Payer identified on a dynamic QR code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payer {
    pub name: String,
    pub document_number: String,
    /// `CUSTOMER` or `BUSINESS`
    #[serde(rename = "type")]
    pub payer_type: String,
    pub address: Location,
}

impl Payload for Payer {
    fn validate_fields(&self, v: &mut Validator) {
        v.check("name", &self.name, &StringValidator::new().not_empty().message("payer name should be a string"))
            .check(
                "documentNumber",
                &self.document_number,
                &StringValidator::new().not_empty().digits_only().message("document number should be a numeric string"),
            )
            .check(
                "type",
                &self.payer_type,
                &StringValidator::new().one_of(&["CUSTOMER", "BUSINESS"]).message("payer type is not valid"),
            )
            .nested("address", |v| self.address.validate_fields(v));
    }
}

/// Body of `POST /pix/qrcodes/static/transfer`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixStaticQrCode {
    pub addressing_key: AddressingKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conciliation_id: Option<String>,
    pub recipient_name: String,
    pub location: Location,
}

impl Payload for PixStaticQrCode {
    fn validate_fields(&self, v: &mut Validator) {
        v.nested("addressingKey", |v| self.addressing_key.validate_fields(v))
            .check(
                "recipientName",
                &self.recipient_name,
                &StringValidator::new().not_empty().message("recipient name should be a string"),
            )
            .nested("location", |v| self.location.validate_fields(v));
        if let Some(amount) = &self.amount {
            check_amount(v, amount);
        }
    }
}

/// Free-form key/value shown to the payer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalData {
    pub name: String,
    pub value: String,
}

/// Body of `POST /pix/qrcodes/dynamic/payment`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixDynamicQrCode {
    pub recipient_name: String,
    pub addressing_key: AddressingKey,
    pub conciliation_id: String,
    pub amount: String,
    pub single_payment: bool,
    /// `NOT_ALLOWED`, `ALLOWED` or `FREE`
    pub change_amount_type: String,
    /// RFC 3339 timestamp
    pub expires_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<Payer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_request_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub additional_data: Vec<AdditionalData>,
}

impl Payload for PixDynamicQrCode {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "recipientName",
            &self.recipient_name,
            &StringValidator::new().not_empty().message("recipient name should be a string"),
        )
        .nested("addressingKey", |v| self.addressing_key.validate_fields(v))
        .check(
            "conciliationId",
            &self.conciliation_id,
            &StringValidator::new().not_empty().max_length(25).message("conciliation id should be a string up to 25 characters"),
        )
        .check(
            "changeAmountType",
            &self.change_amount_type,
            &StringValidator::new()
                .one_of(&["NOT_ALLOWED", "ALLOWED", "FREE"])
                .message("change amount type is not valid"),
        )
        .ensure(
            "expiresAt",
            chrono::DateTime::parse_from_rfc3339(&self.expires_at).is_ok(),
            "expires at should be an RFC 3339 timestamp",
        );
        check_amount(v, &self.amount);
        if let Some(payer) = &self.payer {
            v.nested("payer", |v| payer.validate_fields(v));
        }
    }
}

/// Body of `POST /pix/qrcodes/decode`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixQrCodeData {
    /// EMV payload read from the QR code
    pub encoded_value: String,
    /// Document of the user decoding the code, sent as the PIX user id
    pub document_number: String,
}

impl Payload for PixQrCodeData {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "encodedValue",
            &self.encoded_value,
            &StringValidator::new().not_empty().message("encoded value should be a string"),
        )
        .check(
            "documentNumber",
            &self.document_number,
            &StringValidator::new().not_empty().digits_only().message("document number should be a numeric string"),
        );
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn bank_account(document: &str) -> BankAccount {
        BankAccount {
            account: PixAccount { branch: "0001".into(), number: "1234567".into(), account_type: "CHECKING".into() },
            bank: Bank { ispb: "13140088".into(), compe: Some("332".into()), name: "Acesso".into() },
            document_number: document.into(),
            name: "Maria da Silva".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::fixtures::bank_account;
    use super::*;

    #[test]
    fn test_static_qr_cashout_messages() {
        let mut cashout = PixCashoutStaticQrCode::new("0", "", bank_account("12345678909"), "");
        cashout.initialization_type = "Manual".into();

        let err = cashout.validate().unwrap_err();
        assert!(err.mentions("amount should be a numeric string and greater than zero"));
        assert!(err.mentions("cashout description should be a string"));
        assert!(err.mentions("this initialization type is not valid"));
        assert!(err.mentions("end to end id should be a string"));

        cashout.initialization_type = String::new();
        assert!(cashout.validate().unwrap_err().mentions("initialization type should be a string"));
    }

    #[test]
    fn test_static_qr_cashout_body() {
        let cashout = PixCashoutStaticQrCode::new("10.00", "coffee", bank_account("12345678909"), "E123");
        let body = cashout.to_body().unwrap();
        assert_eq!(body["initializationType"], json!("StaticQrCode"));
        assert_eq!(body["endToEndId"], json!("E123"));
        assert_eq!(body["sender"]["account"]["type"], json!("CHECKING"));
    }

    #[test]
    fn test_sender_is_validated() {
        let mut sender = bank_account("12345678909");
        sender.account.branch = "x".into();
        let err = PixCashoutManual::new("1", "d", sender, bank_account("98765432100")).validate().unwrap_err();
        assert_eq!(err.field_errors("sender.account.branch").len(), 1);
    }

    #[test]
    fn test_evp_key_may_omit_value() {
        let key = AddressingKey { key_type: "EVP".into(), value: String::new() };
        assert!(key.validate().is_ok());
        let email = AddressingKey { key_type: "EMAIL".into(), value: String::new() };
        assert!(email.validate().is_err());
    }

    #[test]
    fn test_qr_code_data_serializes_document_number() {
        let data = PixQrCodeData { encoded_value: "000201...".into(), document_number: "12345678909".into() };
        assert_eq!(data.to_body().unwrap(), json!({"encodedValue": "000201...", "documentNumber": "12345678909"}));
    }

    #[test]
    fn test_dynamic_qr_checks_expiry() {
        let qr = PixDynamicQrCode {
            recipient_name: "Loja".into(),
            addressing_key: AddressingKey { key_type: "EVP".into(), value: "abc".into() },
            conciliation_id: "order-1".into(),
            amount: "25.00".into(),
            change_amount_type: "NOT_ALLOWED".into(),
            expires_at: "tomorrow".into(),
            ..PixDynamicQrCode::default()
        };
        assert!(qr.validate().unwrap_err().mentions("expires at should be an RFC 3339 timestamp"));
    }
}
