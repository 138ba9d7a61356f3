//! Shape checks for create/update bodies.

use bookshelf_http::error::AppError;
use serde_json::{Map, Value};

use crate::modules::books::models::{BookPatch, NewBook};

const REQUIRED_TEXT_FIELDS: [&str; 3] = ["title", "author", "genre"];
const PUBLISHED_YEAR_INVALID: &str = "Published year must be a valid number";
const AVAILABLE_COPIES_INVALID: &str = "Available copies must be a non-negative number";

/// Validate a create body; every violation is a 400 before any state changes.
pub fn parse_new_book(body: &Value) -> Result<NewBook, AppError> {
    let fields = as_object(body)?;

    let values = REQUIRED_TEXT_FIELDS.map(|name| text(fields.get(name)));
    let [Some(title), Some(author), Some(genre)] = values else {
        let missing: Vec<&str> = REQUIRED_TEXT_FIELDS
            .into_iter()
            .zip(values)
            .filter_map(|(name, value)| value.is_none().then_some(name))
            .collect();
        return Err(AppError::validation(format!(
            "Title, author, and genre are required; missing: {}",
            missing.join(", ")
        )));
    };

    let published_year =
        integer(fields.get("publishedYear")).ok_or_else(|| AppError::validation(PUBLISHED_YEAR_INVALID))?;
    let available_copies = copies(fields.get("availableCopies"))
        .ok_or_else(|| AppError::validation(AVAILABLE_COPIES_INVALID))?;

    Ok(NewBook {
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        published_year,
        available_copies,
    })
}

/// Validate an update body; only fields that are present are checked.
/// Unrecognised keys, including `id` and `createdAt`, are ignored.
pub fn parse_patch(body: &Value) -> Result<BookPatch, AppError> {
    let fields = as_object(body)?;

    let mut patch = BookPatch::default();
    for (name, slot) in [
        ("title", &mut patch.title),
        ("author", &mut patch.author),
        ("genre", &mut patch.genre),
    ] {
        if let Some(value) = fields.get(name) {
            let value = text(Some(value))
                .ok_or_else(|| AppError::validation(format!("{name} must be a non-empty string")))?;
            *slot = Some(value.to_string());
        }
    }

    if let Some(value) = fields.get("publishedYear") {
        patch.published_year =
            Some(integer(Some(value)).ok_or_else(|| AppError::validation(PUBLISHED_YEAR_INVALID))?);
    }

    if let Some(value) = fields.get("availableCopies") {
        patch.available_copies =
            Some(copies(Some(value)).ok_or_else(|| AppError::validation(AVAILABLE_COPIES_INVALID))?);
    }

    if let Some(value) = fields.get("isAvailable") {
        patch.is_available = Some(
            value
                .as_bool()
                .ok_or_else(|| AppError::validation("isAvailable must be a boolean"))?,
        );
    }

    Ok(patch)
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object()
        .ok_or_else(|| AppError::validation("Request body must be a JSON object"))
}

/// A string with at least one non-whitespace character.
fn text(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn integer(value: Option<&Value>) -> Option<i64> {
    value.and_then(Value::as_i64)
}

fn copies(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .and_then(|copies| u32::try_from(copies).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(error: AppError) -> String {
        match error {
            AppError::Validation { message } => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_create_body_is_accepted() {
        let book = parse_new_book(&json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "SciFi",
            "publishedYear": 1965,
            "availableCopies": 0
        }))
        .unwrap();

        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.genre, "SciFi");
        assert_eq!(book.published_year, 1965);
        assert_eq!(book.available_copies, 0);
    }

    #[test]
    fn missing_text_fields_are_listed() {
        let error = parse_new_book(&json!({
            "title": "Dune",
            "author": "  ",
            "publishedYear": 1965,
            "availableCopies": 1
        }))
        .unwrap_err();

        assert_eq!(
            message(error),
            "Title, author, and genre are required; missing: author, genre"
        );
    }

    #[test]
    fn non_numeric_year_is_rejected() {
        let error = parse_new_book(&json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "SciFi",
            "publishedYear": "1965",
            "availableCopies": 1
        }))
        .unwrap_err();

        assert_eq!(message(error), PUBLISHED_YEAR_INVALID);
    }

    #[test]
    fn negative_or_missing_copies_are_rejected() {
        for copies in [json!(-1), json!(1.5), json!(null), json!("3")] {
            let error = parse_new_book(&json!({
                "title": "Dune",
                "author": "Frank Herbert",
                "genre": "SciFi",
                "publishedYear": 1965,
                "availableCopies": copies
            }))
            .unwrap_err();
            assert_eq!(message(error), AVAILABLE_COPIES_INVALID);
        }
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        let error = parse_new_book(&json!(["Dune"])).unwrap_err();
        assert_eq!(message(error), "Request body must be a JSON object");

        assert!(parse_patch(&json!("title")).is_err());
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = parse_patch(&json!({ "availableCopies": 0, "isAvailable": true })).unwrap();
        assert_eq!(
            patch,
            BookPatch {
                available_copies: Some(0),
                is_available: Some(true),
                ..BookPatch::default()
            }
        );

        assert_eq!(parse_patch(&json!({})).unwrap(), BookPatch::default());
    }

    #[test]
    fn patch_ignores_identity_fields() {
        let patch = parse_patch(&json!({
            "id": "forged",
            "createdAt": "1970-01-01T00:00:00Z",
            "genre": "Poetry"
        }))
        .unwrap();
        assert_eq!(patch.genre.as_deref(), Some("Poetry"));
        assert_eq!(patch.title, None);
    }

    #[test]
    fn patch_rejects_bad_types() {
        assert_eq!(
            message(parse_patch(&json!({ "title": "" })).unwrap_err()),
            "title must be a non-empty string"
        );
        assert_eq!(
            message(parse_patch(&json!({ "publishedYear": "soon" })).unwrap_err()),
            PUBLISHED_YEAR_INVALID
        );
        assert_eq!(
            message(parse_patch(&json!({ "availableCopies": -2 })).unwrap_err()),
            AVAILABLE_COPIES_INVALID
        );
        assert_eq!(
            message(parse_patch(&json!({ "isAvailable": "no" })).unwrap_err()),
            "isAvailable must be a boolean"
        );
    }
}
