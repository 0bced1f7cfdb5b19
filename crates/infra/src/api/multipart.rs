//! multipart/form-data encoding for document uploads

use bankly_domain::{MultipartBody, ValidationError};
use reqwest::multipart::{Form, Part};

/// Text fields first, then the single file part under its field name
///
/// # Errors
/// Returns a validation error if the attachment's MIME type is not valid.
pub fn build_form(body: MultipartBody) -> Result<Form, ValidationError> {
    let MultipartBody { fields, file } = body;

    let mut part = Part::bytes(file.contents).file_name(file.file_name);
    if let Some(mime) = file.mime_type {
        part = part
            .mime_str(&mime)
            .map_err(|_| ValidationError::field(file.field_name.clone(), format!("invalid mime type: {mime}")))?;
    }

    let form = fields.into_iter().fold(Form::new(), |form, (name, value)| form.text(name, value));
    Ok(form.part(file.field_name, part))
}
