//! Account payloads and queries

use serde::{Deserialize, Serialize};

use super::payload::Payload;
use crate::validation::{StringValidator, Validator};

/// Body of `POST /customers/{document}/accounts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAccount {
    pub account_type: String,
}

impl Default for PaymentAccount {
    fn default() -> Self {
        Self { account_type: "PAYMENT_ACCOUNT".to_string() }
    }
}

impl Payload for PaymentAccount {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "accountType",
            &self.account_type,
            &StringValidator::new().one_of(&["PAYMENT_ACCOUNT"]).message("account type is not valid"),
        );
    }
}

/// Query of `GET /account/statement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementQuery {
    pub branch: String,
    pub account: String,
    pub offset: u32,
    pub limit: u32,
    pub details: bool,
    pub details_level_basic: bool,
}

impl StatementQuery {
    /// Statement of an account with the default paging
    pub fn new(branch: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            account: account.into(),
            offset: 1,
            limit: 20,
            details: true,
            details_level_basic: true,
        }
    }

    /// Query pairs in wire order
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("branch".into(), self.branch.clone()),
            ("account".into(), self.account.clone()),
            ("offset".into(), self.offset.to_string()),
            ("limit".into(), self.limit.to_string()),
            ("details".into(), self.details.to_string()),
            ("detailsLevelBasic".into(), self.details_level_basic.to_string()),
        ]
    }
}

/// Query of `GET /events`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsQuery {
    pub branch: String,
    pub account: String,
    pub page: u32,
    pub page_size: u32,
    pub include_details: bool,
    pub card_proxy: Vec<String>,
    pub begin_date_time: Option<String>,
    pub end_date_time: Option<String>,
}

impl EventsQuery {
    /// Events of an account with the default paging
    pub fn new(branch: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            account: account.into(),
            page: 1,
            page_size: 20,
            include_details: true,
            card_proxy: Vec::new(),
            begin_date_time: None,
            end_date_time: None,
        }
    }

    /// Query pairs in wire order; absent filters are omitted
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("branch".to_string(), self.branch.clone()),
            ("account".to_string(), self.account.clone()),
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
            ("includeDetails".to_string(), self.include_details.to_string()),
        ];
        pairs.extend(self.card_proxy.iter().map(|proxy| ("cardProxy".to_string(), proxy.clone())));
        if let Some(begin) = &self.begin_date_time {
            pairs.push(("beginDateTime".to_string(), begin.clone()));
        }
        if let Some(end) = &self.end_date_time {
            pairs.push(("endDateTime".to_string(), end.clone()));
        }
        pairs
    }
}
