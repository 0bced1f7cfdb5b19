//! Fund transfer (TED/internal) payloads

use serde::{Deserialize, Serialize};

use super::payload::Payload;
use crate::validation::{RangeValidator, StringValidator, Validator};

/// One side of a fund transfer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferParty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    pub branch: String,
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Payload for TransferParty {
    fn validate_fields(&self, v: &mut Validator) {
        let digits = StringValidator::new().not_empty().digits_only();
        v.check("branch", &self.branch, &digits.clone().message("branch should be a numeric string"))
            .check("account", &self.account, &digits.message("account should be a numeric string"));
    }
}

/// Body of `POST /fund-transfers`
///
/// The sender's bank code is never sent: the sender is always an account at
/// the bank itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundTransfer {
    /// Amount in cents
    pub amount: i64,
    pub description: String,
    sender: TransferParty,
    pub recipient: TransferParty,
}

impl FundTransfer {
    /// Build a transfer, dropping the sender's bank code
    pub fn new(
        amount: i64,
        description: impl Into<String>,
        mut sender: TransferParty,
        recipient: TransferParty,
    ) -> Self {
        sender.bank_code = None;
        Self { amount, description: description.into(), sender, recipient }
    }

    /// Sender as it will be sent
    pub fn sender(&self) -> &TransferParty {
        &self.sender
    }
}

impl Payload for FundTransfer {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "amount",
            &self.amount,
            &RangeValidator::empty().greater_than(0).message("amount should be greater than zero"),
        )
        .check(
            "description",
            &self.description,
            &StringValidator::new().not_empty().message("description should be a string"),
        )
        .nested("sender", |v| self.sender.validate_fields(v))
        .nested("recipient", |v| self.recipient.validate_fields(v));
    }
}
