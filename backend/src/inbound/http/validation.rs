//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies carry strings; these helpers parse them into closed domain
//! types and build `invalid_request` errors with stable field details when
//! parsing fails. Semantic validation (lengths, ranges) stays in the domain
//! constructors.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{ApplicationDecision, Category, Error, ExperienceLevel};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidTimestamp,
    InvalidDecimal,
    InvalidChoice,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidDecimal => "invalid_decimal",
            Self::InvalidChoice => "invalid_choice",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be a valid UUID"),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|_| {
                    let name = field.as_str();
                    field_error(
                        field,
                        format!("{name} must be an RFC 3339 timestamp"),
                        ErrorCode::InvalidTimestamp,
                        &raw,
                    )
                })
        })
        .transpose()
}

pub(crate) fn parse_optional_decimal(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<BigDecimal>, Error> {
    value
        .map(|raw| {
            BigDecimal::from_str(raw.trim()).map_err(|_| {
                let name = field.as_str();
                field_error(
                    field,
                    format!("{name} must be a decimal number"),
                    ErrorCode::InvalidDecimal,
                    &raw,
                )
            })
        })
        .transpose()
}

pub(crate) fn parse_category(value: &str, field: FieldName) -> Result<Category, Error> {
    value.parse::<Category>().map_err(|err| {
        field_error(field, err.to_string(), ErrorCode::InvalidChoice, value)
    })
}

pub(crate) fn parse_optional_experience_level(
    value: Option<String>,
    field: FieldName,
) -> Result<ExperienceLevel, Error> {
    match value {
        Some(raw) => raw.parse::<ExperienceLevel>().map_err(|err| {
            field_error(field, err.to_string(), ErrorCode::InvalidChoice, &raw)
        }),
        None => Ok(ExperienceLevel::default()),
    }
}

pub(crate) fn parse_decision(value: &str, field: FieldName) -> Result<ApplicationDecision, Error> {
    value.parse::<ApplicationDecision>().map_err(|_| {
        field_error(
            field,
            "Invalid status. Must be \"accepted\" or \"rejected\"".to_owned(),
            ErrorCode::InvalidChoice,
            value,
        )
    })
}
