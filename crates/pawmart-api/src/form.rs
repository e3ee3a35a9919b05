// Request bodies
//
// JSON for plain mutations, multipart for anything carrying a binary
// attachment (pet/product/blog images, profile photos). Attachments are
// request-only values; they never reach cached state.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use crate::error::Error;

/// A binary file sent with a multipart request.
#[derive(Clone)]
pub struct Attachment {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Bytes,
}

impl Attachment {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Text fields plus attachments for a multipart request.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub attachments: Vec<Attachment>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Flatten a JSON object into text fields. Strings are sent verbatim,
    /// other scalars and nested values as their JSON text; nulls are skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut form = Self::new();
        if let Some(map) = value.as_object() {
            for (key, value) in map {
                match value {
                    serde_json::Value::Null => {}
                    serde_json::Value::String(s) => form.fields.push((key.clone(), s.clone())),
                    other => form.fields.push((key.clone(), other.to_string())),
                }
            }
        }
        form
    }

    pub(crate) fn into_form(self) -> Result<Form, Error> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for attachment in self.attachments {
            let mut part = Part::bytes(attachment.bytes.to_vec()).file_name(attachment.file_name);
            if let Some(mime) = attachment.mime {
                part = part
                    .mime_str(&mime)
                    .map_err(|e| Error::Client(format!("invalid attachment mime type: {e}")))?;
            }
            form = form.part(attachment.field, part);
        }
        Ok(form)
    }
}

/// Body of a mutating request.
#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(FormPayload),
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<FormPayload> for Body {
    fn from(form: FormPayload) -> Self {
        Self::Multipart(form)
    }
}
