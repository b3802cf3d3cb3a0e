//! Schema validation shared by every write payload.
//!
//! Field-level rules are declared with `validator` derives on the payload
//! types. This module turns the unordered `ValidationErrors` map into a
//! single `AppError::Validation` naming the first offending field, using the
//! field order each payload declares.

use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::{AppError, AppResult};

/// A payload whose shape can be checked before it reaches storage.
pub trait Schema: Validate {
    /// Fields in declaration order; decides which violation is reported first.
    const FIELDS: &'static [&'static str];

    /// Run every field rule and report the first offending field.
    fn check(&self) -> AppResult<()> {
        self.validate()
            .map_err(|errors| first_violation(&errors, Self::FIELDS))
    }
}

/// Pick the violation whose field comes first in `order`.
pub fn first_violation(errors: &ValidationErrors, order: &[&str]) -> AppError {
    let mut violations: Vec<(usize, String, String)> = errors
        .field_errors()
        .iter()
        .filter_map(|(field, errs)| {
            let field = field.to_string();
            let rank = order
                .iter()
                .position(|known| *known == field)
                .unwrap_or(order.len());
            errs.first()
                .map(|err| (rank, field.clone(), describe(&field, err)))
        })
        .collect();

    violations.sort();

    match violations.into_iter().next() {
        Some((_, field, message)) => AppError::validation(format!("{}: {}", field, message)),
        None => AppError::validation("payload is invalid"),
    }
}

fn describe(field: &str, err: &ValidationError) -> String {
    if let Some(message) = err.message.as_ref() {
        return message.to_string();
    }
    match &*err.code {
        "required" => "is required".to_string(),
        "range" => "is out of range".to_string(),
        "email" => "is not a valid email address".to_string(),
        _ => format!("{} is invalid", field),
    }
}

/// Unwrap a required field, reporting it by name when absent.
pub fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::validation(format!("{}: is required", field)))
}
