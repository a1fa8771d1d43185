//! Multipart form reading shared by the upload endpoints.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};

use super::UploadedFile;
use crate::errors::AppError;

/// Form field carrying the resume file.
pub const RESUME_FIELD: &str = "resume";

/// A fully buffered multipart submission: the resume file (if any) plus every
/// text field by name.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub resume: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == RESUME_FIELD {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                if !data.is_empty() {
                    form.resume = Some(UploadedFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A text field, trimmed, or `None` when absent or blank.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        UploadForm::read(multipart).await
    }
}
