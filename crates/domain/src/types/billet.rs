//! Billet (boleto) and bill payment payloads

use serde::{Deserialize, Serialize};

use super::customer::Address;
use super::payload::Payload;
use crate::validation::{StringValidator, Validator};

/// Account a billet is issued from or cancelled on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountRef {
    pub branch: String,
    pub number: String,
}

impl Payload for BankAccountRef {
    fn validate_fields(&self, v: &mut Validator) {
        let digits = StringValidator::new().not_empty().digits_only();
        v.check("branch", &self.branch, &digits.clone().message("branch should be a numeric string"))
            .check("number", &self.number, &digits.message("account number should be a numeric string"));
    }
}

/// Billet payer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BilletPayer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
    pub document: String,
    pub address: Address,
}

impl Payload for BilletPayer {
    fn validate_fields(&self, v: &mut Validator) {
        v.check("name", &self.name, &StringValidator::new().not_empty().message("payer name should be a string"))
            .check(
                "document",
                &self.document,
                &StringValidator::new().not_empty().digits_only().message("payer document should be a numeric string"),
            )
            .nested("address", |v| self.address.validate_fields(v));
    }
}

/// Body of `POST /bankslip`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositBillet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub document_number: String,
    /// Decimal amount as a string, e.g. `"100.50"`
    pub amount: String,
    /// `YYYY-MM-DD`
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emission_fee: Option<bool>,
    pub closed_payment: bool,
    /// `Deposit` or `Levy`
    #[serde(rename = "type")]
    pub billet_type: String,
    pub account: BankAccountRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<BilletPayer>,
}

impl Payload for DepositBillet {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "documentNumber",
            &self.document_number,
            &StringValidator::new().not_empty().digits_only().message("document number should be a numeric string"),
        )
        .check(
            "amount",
            &self.amount,
            &StringValidator::new().positive_number().message("amount should be a numeric string and greater than zero"),
        )
        .check(
            "dueDate",
            &self.due_date,
            &StringValidator::new()
                .pattern(r"^\d{4}-\d{2}-\d{2}$")
                .map(|s| s.message("due date should be a YYYY-MM-DD string"))
                .unwrap_or_default(),
        )
        .check(
            "type",
            &self.billet_type,
            &StringValidator::new().one_of(&["Deposit", "Levy"]).message("billet type is not valid"),
        )
        .nested("account", |v| self.account.validate_fields(v));

        if let Some(payer) = &self.payer {
            v.nested("payer", |v| payer.validate_fields(v));
        }
    }
}

/// Body of `DELETE /bankslip/cancel`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBillet {
    pub authentication_code: String,
    pub account: BankAccountRef,
}

impl Payload for CancelBillet {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "authenticationCode",
            &self.authentication_code,
            &StringValidator::new().not_empty().message("authentication code should be a string"),
        )
        .nested("account", |v| self.account.validate_fields(v));
    }
}

/// Body of `POST /bill-payment/confirm`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPayment {
    /// Id returned by `/bill-payment/validate`
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub bank_branch: String,
    pub bank_account: String,
}

impl Payload for BillPayment {
    fn validate_fields(&self, v: &mut Validator) {
        v.check("id", &self.id, &StringValidator::new().not_empty().message("payment id should be a string"))
            .ensure("amount", self.amount > 0.0, "amount should be greater than zero")
            .check(
                "bankBranch",
                &self.bank_branch,
                &StringValidator::new().not_empty().digits_only().message("bank branch should be a numeric string"),
            )
            .check(
                "bankAccount",
                &self.bank_account,
                &StringValidator::new().not_empty().digits_only().message("bank account should be a numeric string"),
            );
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn deposit() -> DepositBillet {
        DepositBillet {
            document_number: "12345678909".into(),
            amount: "150.00".into(),
            due_date: "2030-01-15".into(),
            billet_type: "Deposit".into(),
            account: BankAccountRef { branch: "0001".into(), number: "1234567".into() },
            ..DepositBillet::default()
        }
    }

    #[test]
    fn test_deposit_serializes_type_key() {
        let body = deposit().to_body().unwrap();
        assert_eq!(body["type"], json!("Deposit"));
        assert_eq!(body["account"], json!({"branch": "0001", "number": "1234567"}));
        assert!(body.get("payer").is_none());
    }

    #[test]
    fn test_deposit_rejects_bad_amount_and_date() {
        let bad = DepositBillet { amount: "0".into(), due_date: "15/01/2030".into(), ..deposit() };
        let err = bad.validate().unwrap_err();
        assert!(err.mentions("amount should be a numeric string and greater than zero"));
        assert!(err.mentions("due date should be a YYYY-MM-DD string"));
    }

    #[test]
    fn test_cancel_requires_code() {
        let cancel = CancelBillet {
            authentication_code: String::new(),
            account: BankAccountRef { branch: "0001".into(), number: "1".into() },
        };
        assert_eq!(cancel.validate().unwrap_err().field_errors("authenticationCode").len(), 1);
    }
}
