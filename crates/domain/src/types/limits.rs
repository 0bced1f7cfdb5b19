//! Holder limits and webhook message queries

use serde::{Deserialize, Serialize};

use super::payload::Payload;
use crate::validation::{StringValidator, Validator};

/// Body of `PUT /holders/{document}/max-limits`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsUpdate {
    /// e.g. `PIX_CASH_OUT`, `TED_CASH_OUT`
    pub feature_name: String,
    /// `DAY` or `MONTH`
    pub cycle_type: String,
    /// `DAYTIME` or `NIGHTLY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub amount: f64,
}

impl Payload for LimitsUpdate {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "featureName",
            &self.feature_name,
            &StringValidator::new().not_empty().message("feature name should be a string"),
        )
        .check(
            "cycleType",
            &self.cycle_type,
            &StringValidator::new().one_of(&["DAY", "MONTH"]).message("cycle type is not valid"),
        )
        .ensure("amount", self.amount.is_finite() && self.amount >= 0.0, "amount should not be negative");
    }
}

/// Query of `GET /webhooks/processed-messages`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookMessagesQuery {
    pub start_date: String,
    pub end_date: String,
    pub state: Option<String>,
    pub event_name: Option<String>,
    pub context: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl WebhookMessagesQuery {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            state: None,
            event_name: None,
            context: None,
            page: 1,
            page_size: 100,
        }
    }

    /// Query pairs in wire order; unset filters are left out
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let optional = [("state", &self.state), ("eventName", &self.event_name), ("context", &self.context)];

        let mut pairs =
            vec![("startDate".to_string(), self.start_date.clone()), ("endDate".to_string(), self.end_date.clone())];
        pairs.extend(
            optional.into_iter().filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone()))),
        );
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("pageSize".to_string(), self.page_size.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_query_skips_unset_filters() {
        let mut query = WebhookMessagesQuery::new("2024-01-01", "2024-01-31");
        query.event_name = Some("PIX_CASH_IN_WAS_RECEIVED".into());

        let pairs = query.to_pairs();
        let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["startDate", "endDate", "eventName", "page", "pageSize"]);
        assert!(pairs.contains(&("pageSize".into(), "100".into())));
    }

    #[test]
    fn test_limits_validation() {
        let update = LimitsUpdate {
            feature_name: "PIX_CASH_OUT".into(),
            cycle_type: "WEEK".into(),
            level: None,
            amount: -1.0,
        };
        let err = update.validate().unwrap_err();
        assert!(err.mentions("cycle type is not valid"));
        assert!(err.mentions("amount should not be negative"));
    }
}
