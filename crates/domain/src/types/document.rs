//! Document analysis upload

use serde_json::{Map, Value};

use super::payload::{Attachment, FileAttachment};
use crate::validation::{StringValidator, ValidationError, ValidationResult, Validator};

const DOCUMENT_TYPES: [&str; 4] = ["RG", "CNH", "SELFIE", "RNE"];
const DOCUMENT_SIDES: [&str; 2] = ["FRONT", "BACK"];

/// Image of an identity document or selfie sent for analysis
///
/// Sent as multipart/form-data: the metadata as text fields and the image
/// under the `image` field.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAnalysis {
    /// `RG`, `CNH`, `SELFIE` or `RNE`
    pub document_type: String,
    /// `FRONT` or `BACK`
    pub document_side: String,
    pub provider: String,
    pub provider_metadata: Map<String, Value>,
    pub file_name: String,
    pub contents: Vec<u8>,
    pub mime_type: Option<String>,
}

impl DocumentAnalysis {
    /// Form field the image is attached under
    pub const FIELD_NAME: &'static str = "image";

    pub fn new(
        document_type: impl Into<String>,
        document_side: impl Into<String>,
        file_name: impl Into<String>,
        contents: Vec<u8>,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            document_side: document_side.into(),
            provider: "BANKLY".to_string(),
            provider_metadata: Map::new(),
            file_name: file_name.into(),
            contents,
            mime_type: None,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>, metadata: Map<String, Value>) -> Self {
        self.provider = provider.into();
        self.provider_metadata = metadata;
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

impl Attachment for DocumentAnalysis {
    fn validate_fields(&self, v: &mut Validator) {
        v.check(
            "documentType",
            &self.document_type,
            &StringValidator::new().one_of(&DOCUMENT_TYPES).message("document type is not valid"),
        )
        .check(
            "documentSide",
            &self.document_side,
            &StringValidator::new().one_of(&DOCUMENT_SIDES).message("document side is not valid"),
        )
        .check("provider", &self.provider, &StringValidator::new().not_empty().message("provider should be a string"))
        .check("fileName", &self.file_name, &StringValidator::new().not_empty().message("file name should be a string"))
        .ensure("image", !self.contents.is_empty(), "image should not be empty");

        if let Some(mime) = &self.mime_type {
            v.check("image", mime, &StringValidator::new().mime_type());
        }
    }

    fn form_fields(&self) -> ValidationResult<Vec<(String, String)>> {
        let metadata = serde_json::to_string(&self.provider_metadata)
            .map_err(|e| ValidationError::field("providerMetadata", format!("cannot encode metadata: {e}")))?;
        Ok(vec![
            ("documentType".to_string(), self.document_type.clone()),
            ("documentSide".to_string(), self.document_side.clone()),
            ("provider".to_string(), self.provider.clone()),
            ("providerMetadata".to_string(), metadata),
        ])
    }

    fn file(&self) -> FileAttachment {
        FileAttachment {
            field_name: Self::FIELD_NAME.to_string(),
            file_name: self.file_name.clone(),
            contents: self.contents.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}
