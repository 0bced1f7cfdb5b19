//! Customer registration payloads

use serde::{Deserialize, Serialize};

use super::payload::Payload;
use crate::validation::{StringValidator, Validator};

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub zip_code: String,
    pub address_line: String,
    pub building_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Payload for Address {
    fn validate_fields(&self, v: &mut Validator) {
        let required = |message: &str| StringValidator::new().not_empty().message(message);

        v.check(
            "zipCode",
            &self.zip_code,
            &StringValidator::new().not_empty().digits_only().message("zip code should be a numeric string"),
        )
        .check("addressLine", &self.address_line, &required("address should be a string"))
        .check("buildingNumber", &self.building_number, &required("number should be a numeric or string"))
        .check("neighborhood", &self.neighborhood, &required("neighborhood should be a string"))
        .check("city", &self.city, &required("city should be a string"))
        .check("state", &self.state, &required("state should be a string"))
        .check("country", &self.country, &required("country should be a string"));
    }
}

/// Phone number split into country code and national number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub country_code: String,
    pub number: String,
}

impl Payload for Phone {
    fn validate_fields(&self, v: &mut Validator) {
        let digits = StringValidator::new().not_empty().digits_only();
        v.check("countryCode", &self.country_code, &digits.clone().message("country code should be a numeric string"))
            .check("number", &self.number, &digits.message("phone number should be a numeric string"));
    }
}

/// Individual (CPF) customer registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub register_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_name: Option<String>,
    pub birth_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    pub email: String,
    pub phone: Phone,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_income: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assisted_by: Option<String>,
}

impl Payload for Customer {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "registerName",
            &self.register_name,
            &StringValidator::new().not_empty().message("register name should be a string"),
        )
        .check(
            "birthDate",
            &self.birth_date,
            &StringValidator::new()
                .pattern(r"^\d{4}-\d{2}-\d{2}$")
                .map(|s| s.message("birth date should be a YYYY-MM-DD string"))
                .unwrap_or_default(),
        )
        .ensure("email", self.email.contains('@'), "email should be a valid email address")
        .nested("phone", |v| self.phone.validate_fields(v))
        .nested("address", |v| self.address.validate_fields(v));
    }
}

/// Legal representative of a business customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalRepresentative {
    pub document_number: String,
    pub register_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_name: Option<String>,
    pub phone: Phone,
    pub address: Address,
    pub birth_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    pub email: String,
}

impl Payload for LegalRepresentative {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "documentNumber",
            &self.document_number,
            &StringValidator::new().not_empty().digits_only().message("document number should be a numeric string"),
        )
        .check(
            "registerName",
            &self.register_name,
            &StringValidator::new().not_empty().message("register name should be a string"),
        )
        .ensure("email", self.email.contains('@'), "email should be a valid email address")
        .nested("phone", |v| self.phone.validate_fields(v))
        .nested("address", |v| self.address.validate_fields(v));
    }
}

/// Business (CNPJ) customer registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCustomer {
    pub business_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trading_name: Option<String>,
    pub business_email: String,
    /// `MEI`, `EI`, `EIRELI`, `LTDA`, `SA`
    pub business_type: String,
    /// `MEI`, `ME`, `EPP`
    pub business_size: String,
    pub business_address: Address,
    pub legal_representative: LegalRepresentative,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_annual_billing: Option<String>,
}

impl Payload for BusinessCustomer {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "businessName",
            &self.business_name,
            &StringValidator::new().not_empty().message("business name should be a string"),
        )
        .ensure(
            "businessEmail",
            self.business_email.contains('@'),
            "business email should be a valid email address",
        )
        .check(
            "businessType",
            &self.business_type,
            &StringValidator::new()
                .one_of(&["MEI", "EI", "EIRELI", "LTDA", "SA"])
                .message("business type is not valid"),
        )
        .check(
            "businessSize",
            &self.business_size,
            &StringValidator::new().one_of(&["MEI", "ME", "EPP"]).message("business size is not valid"),
        )
        .nested("businessAddress", |v| self.business_address.validate_fields(v))
        .nested("legalRepresentative", |v| self.legal_representative.validate_fields(v));
    }
}

/// Cancellation/closure reason body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub reason: String,
}

impl Payload for Reason {
    fn validate_fields(&self, v: &mut Validator) {
        v.check("reason", &self.reason, &StringValidator::new().not_empty().message("reason should be a string"));
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn address() -> Address {
        Address {
            zip_code: "01310100".into(),
            address_line: "Avenida Paulista".into(),
            building_number: "1000".into(),
            complement: None,
            neighborhood: "Bela Vista".into(),
            city: "Sao Paulo".into(),
            state: "SP".into(),
            country: "BR".into(),
        }
    }

    pub fn customer() -> Customer {
        Customer {
            register_name: "Maria da Silva".into(),
            birth_date: "1990-05-17".into(),
            email: "maria@example.com".into(),
            phone: Phone { country_code: "55".into(), number: "11999990000".into() },
            address: address(),
            ..Customer::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::fixtures::{address, customer};
    use super::*;

    #[test]
    fn test_address_messages() {
        let bad = Address { zip_code: "01310-100".into(), city: String::new(), ..address() };
        let err = bad.validate().unwrap_err();
        assert!(err.mentions("zip code should be a numeric string"));
        assert!(err.mentions("city should be a string"));
        assert_eq!(err.error_count(), 2);
    }

    #[test]
    fn test_customer_serializes_camel_case_and_skips_none() {
        let body = customer().to_body().unwrap();
        assert_eq!(body["registerName"], json!("Maria da Silva"));
        assert_eq!(body["address"]["zipCode"], json!("01310100"));
        assert!(body.get("socialName").is_none());
    }

    #[test]
    fn test_nested_errors_are_prefixed() {
        let mut bad = customer();
        bad.address.state = String::new();
        bad.birth_date = "17/05/1990".into();

        let err = bad.validate().unwrap_err();
        assert_eq!(err.field_errors("address.state").len(), 1);
        assert_eq!(err.field_errors("birthDate").len(), 1);
    }
}
