//! Request extractors that report failures as [`AppError`].
//!
//! axum's stock `Json`, `Path` and `Query` rejections answer with plain-text
//! 400/422 bodies. These wrappers keep every client error in the `detail`
//! shape used by the rest of the API.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header, request::Parts, HeaderMap},
};
use serde::de::DeserializeOwned;

use super::dto::ListQuery;
use super::error::AppError;
use crate::api::FieldError;
use crate::models::ItemId;

/// JSON body decoded with field paths preserved for error reporting.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Err(AppError::UnsupportedMediaType);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Rejected {
                status: rejection.status(),
                detail: rejection.body_text(),
            })?;

        decode_body(&bytes).map(ValidatedJson)
    }
}

/// Decode a JSON body, turning serde failures into located field errors.
pub fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::validation(FieldError::new(
            ["body"],
            "Field required",
            "missing",
        )));
    }

    let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let mut loc = vec!["body".to_string()];
        loc.extend(
            err.path()
                .iter()
                .map(|segment| segment.to_string())
                .filter(|segment| segment != "?" && !segment.is_empty()),
        );

        let inner = err.into_inner();
        let (msg, kind) = if inner.is_syntax() || inner.is_eof() {
            (format!("JSON decode error: {}", inner), "json_invalid")
        } else {
            (inner.to_string(), "type_error")
        };
        AppError::validation(FieldError::new(loc, msg, kind))
    })
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// The `{item_id}` path segment parsed as an [`ItemId`].
#[derive(Debug, Clone, Copy)]
pub struct ItemPath(pub ItemId);

impl<S> FromRequestParts<S> for ItemPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || {
            AppError::validation(FieldError::new(
                ["path", "item_id"],
                "Input should be a valid integer, unable to parse string as an integer",
                "int_parsing",
            ))
        };

        // Segments that do not percent-decode to UTF-8 are rejected here.
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        raw.parse::<i64>()
            .map(|id| ItemPath(ItemId::new(id)))
            .map_err(|_| invalid())
    }
}

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ListQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::validation(FieldError::new(
                    ["query"],
                    rejection.body_text(),
                    "query_invalid",
                ))
            })?;
        Ok(query)
    }
}
