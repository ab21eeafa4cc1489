//! Data Transfer Objects for the HTTP API.
//!
//! Item request and response bodies live in [`crate::api`]; this module holds
//! the HTTP-only shapes.

use serde::{Deserialize, Serialize};

use crate::api::{FieldError, ValidationResult};

/// Raw query string of `GET /items/`.
///
/// Values are kept as text so that malformed numbers surface as field errors
/// from [`ListQuery::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<String>,
    pub limit: Option<String>,
}

/// Validated offset/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl ListQuery {
    /// Parse `skip` (default 0) and `limit` (default `default_limit`).
    pub fn resolve(&self, default_limit: usize) -> ValidationResult<Page> {
        let mut errors = Vec::new();
        let skip = parse_non_negative("skip", self.skip.as_deref(), 0, &mut errors);
        let limit = parse_non_negative("limit", self.limit.as_deref(), default_limit, &mut errors);

        if errors.is_empty() {
            Ok(Page { skip, limit })
        } else {
            Err(errors)
        }
    }
}

fn parse_non_negative(
    field: &str,
    raw: Option<&str>,
    default: usize,
    errors: &mut Vec<FieldError>,
) -> usize {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 0 => usize::try_from(value).unwrap_or(usize::MAX),
        Ok(_) => {
            errors.push(FieldError::new(
                ["query", field],
                "Input should be greater than or equal to 0",
                "greater_than_equal",
            ));
            default
        }
        Err(_) => {
            errors.push(FieldError::new(
                ["query", field],
                "Input should be a valid integer, unable to parse string as an integer",
                "int_parsing",
            ));
            default
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(skip: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            skip: skip.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_defaults_apply_when_absent() {
        let page = ListQuery::default().resolve(100).unwrap();
        assert_eq!(page, Page { skip: 0, limit: 100 });
    }

    #[test]
    fn test_explicit_values() {
        let page = query(Some("5"), Some("0")).resolve(100).unwrap();
        assert_eq!(page, Page { skip: 5, limit: 0 });
    }

    #[test]
    fn test_reports_every_bad_field() {
        let errors = query(Some("-1"), Some("ten")).resolve(100).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].loc, vec!["query", "skip"]);
        assert_eq!(errors[0].kind, "greater_than_equal");
        assert_eq!(errors[1].loc, vec!["query", "limit"]);
        assert_eq!(errors[1].kind, "int_parsing");
    }
}
