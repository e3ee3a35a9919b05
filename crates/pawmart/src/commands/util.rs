//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde_json::Value;

use pawmart_api::{Attachment, Body, FormPayload};
use pawmart_core::{EntityId, ListQuery, Outcome, SortOrder};

use crate::cli::{ListArgs, PayloadArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Build a request body from `--from-file` / `--image`. An image turns the
/// body into multipart with the JSON fields as text parts.
pub fn payload_body(args: &PayloadArgs) -> Result<Body, CliError> {
    let json = match &args.from_file {
        Some(path) => read_json_file(path)?,
        None => Value::Object(serde_json::Map::new()),
    };

    let Some(image) = &args.image else {
        return Ok(Body::from(json));
    };

    let bytes = std::fs::read(image)?;
    let file_name = image
        .file_name()
        .map_or_else(|| "image".into(), |n| n.to_string_lossy().into_owned());
    let form = FormPayload::from_json(&json).attach(Attachment::new("image", file_name, bytes));
    Ok(Body::from(form))
}

/// Translate list flags into a client-side query.
pub fn list_query(args: &ListArgs) -> Result<ListQuery, CliError> {
    let mut query = ListQuery::new().page(args.page, args.limit);
    if let Some(term) = &args.search {
        query = query.search(term.clone());
    }
    for filter in &args.filter {
        let (field, value) = filter.split_once('=').ok_or_else(|| CliError::Validation {
            field: "filter".into(),
            reason: format!("expected FIELD=VALUE, got '{filter}'"),
        })?;
        query = query.filter(field.trim(), value.trim());
    }
    if let Some(field) = &args.sort {
        let order = if args.desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        query = query.sort_by(field.clone(), order);
    }
    Ok(query)
}

/// Turn a rejected operation into the CLI's error for it.
pub fn fulfilled<T>(outcome: Outcome<T>) -> Result<T, CliError> {
    outcome.into_result().map_err(CliError::from)
}

pub fn entity_id(raw: &str) -> EntityId {
    EntityId::from(raw)
}

/// Table cell text for an optional field.
pub fn cell(text: Option<String>) -> String {
    text.unwrap_or_else(|| "-".into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn list_args() -> ListArgs {
        ListArgs {
            search: None,
            filter: Vec::new(),
            sort: None,
            desc: false,
            page: 1,
            limit: 25,
        }
    }

    #[test]
    fn filters_split_on_equals() {
        let mut args = list_args();
        args.filter = vec!["species = dog".into()];
        args.sort = Some("price".into());
        args.desc = true;
        let query = list_query(&args).unwrap();
        assert_eq!(query.filters, vec![("species".into(), "dog".into())]);
        assert_eq!(query.order, SortOrder::Descending);
        assert_eq!(query.per_page, 25);
    }

    #[test]
    fn malformed_filter_is_a_usage_error() {
        let mut args = list_args();
        args.filter = vec!["species".into()];
        assert!(matches!(list_query(&args), Err(CliError::Validation { .. })));
    }

    #[test]
    fn from_file_without_image_stays_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pet.json");
        std::fs::write(&path, r#"{"name":"Rex"}"#).unwrap();
        let body = payload_body(&PayloadArgs {
            from_file: Some(path),
            image: None,
        })
        .unwrap();
        assert!(matches!(body, Body::Json(ref v) if v["name"] == "Rex"));
    }

    #[test]
    fn image_switches_to_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("rex.png");
        std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();
        let body = payload_body(&PayloadArgs {
            from_file: None,
            image: Some(image),
        })
        .unwrap();
        let Body::Multipart(form) = body else {
            panic!("expected multipart");
        };
        assert_eq!(form.attachments.len(), 1);
        assert_eq!(form.attachments[0].file_name, "rex.png");
    }
}
