//! Payload contracts
//!
//! Every request body handed to the facade is a [`Payload`]: serializable to
//! JSON and able to report field problems before anything is sent. Document
//! uploads additionally implement [`Attachment`] to describe their multipart
//! shape.

use serde::Serialize;
use serde_json::Value;

use crate::errors::Result;
use crate::validation::{ValidationError, ValidationResult, Validator};

/// Serializable request body with optional validation
pub trait Payload: Serialize {
    /// Record field problems into `v`.
    ///
    /// Nested payloads call this on their children inside
    /// [`Validator::nested`].
    fn validate_fields(&self, _v: &mut Validator) {}

    /// Validate the payload on its own
    ///
    /// # Errors
    /// Returns every field problem found.
    fn validate(&self) -> ValidationResult<()> {
        let mut v = Validator::new();
        self.validate_fields(&mut v);
        v.finish()
    }

    /// Validate, then serialize to a JSON value
    ///
    /// # Errors
    /// Returns [`crate::BanklyError::Validation`] if validation fails or the
    /// value cannot be represented as JSON.
    fn to_body(&self) -> Result<Value> {
        self.validate()?;
        serde_json::to_value(self)
            .map_err(|e| ValidationError::field("payload", format!("cannot serialize: {e}")).into())
    }
}

impl Payload for Value {}

/// A single file part of a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// Form field name the file is sent under
    pub field_name: String,
    pub file_name: String,
    pub contents: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Multipart body: text fields plus exactly one named file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub file: FileAttachment,
}

/// Upload payload sent as multipart/form-data
pub trait Attachment {
    /// Record field problems into `v`
    fn validate_fields(&self, _v: &mut Validator) {}

    /// Text fields sent alongside the file
    ///
    /// # Errors
    /// Returns a validation error if a field cannot be encoded.
    fn form_fields(&self) -> ValidationResult<Vec<(String, String)>>;

    /// The file part
    fn file(&self) -> FileAttachment;

    /// Validate, then describe the multipart body
    ///
    /// # Errors
    /// Returns every field problem found.
    fn to_multipart(&self) -> ValidationResult<MultipartBody> {
        let mut v = Validator::new();
        self.validate_fields(&mut v);
        v.finish()?;
        Ok(MultipartBody { fields: self.form_fields()?, file: self.file() })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::BanklyError;

    #[derive(Serialize)]
    struct Named {
        name: String,
    }

    impl Payload for Named {
        fn validate_fields(&self, v: &mut Validator) {
            v.ensure("name", !self.name.is_empty(), "name should be a string");
        }
    }

    #[test]
    fn test_to_body_validates_first() {
        let err = Named { name: String::new() }.to_body().unwrap_err();
        assert!(matches!(err, BanklyError::Validation(ref e) if e.mentions("name should be a string")));
    }

    #[test]
    fn test_to_body_serializes() {
        assert_eq!(Named { name: "Ana".into() }.to_body().unwrap(), json!({"name": "Ana"}));
    }

    #[test]
    fn test_raw_json_is_a_payload() {
        assert_eq!(json!({"a": 1}).to_body().unwrap(), json!({"a": 1}));
    }
}
