//! Multipart form extractor for file uploads.

use crate::errors::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// A single uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Lowercased extension of the client-supplied file name.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// A parsed `multipart/form-data` body.
///
/// Parts that carry a file name are treated as the uploaded file (only one
/// is accepted); every other part is read as a text field.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if field.file_name().is_some() {
                if form.file.is_some() {
                    return Err(AppError::BadRequest(
                        "Only one file may be uploaded per request".to_string(),
                    ));
                }
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Parses a required text field.
    pub fn parse_field<T>(&self, name: &str) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self
            .field(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing form field '{}'", name)))?;
        raw.trim()
            .parse()
            .map_err(|e: T::Err| AppError::BadRequest(format!("Invalid form field '{}': {}", name, e)))
    }

    /// Takes the uploaded file, rejecting forms without one or with an
    /// empty one.
    pub fn take_file(&mut self) -> Result<UploadedFile, AppError> {
        match self.file.take() {
            Some(file) if !file.bytes.is_empty() => Ok(file),
            Some(_) => Err(AppError::BadRequest("Uploaded file is empty".to_string())),
            None => Err(AppError::BadRequest("Missing file part".to_string())),
        }
    }
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        UploadForm::from_multipart(multipart).await
    }
}
