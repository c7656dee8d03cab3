use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Failure reported by the remote backend with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFailure {
    status: u16,
    message: String,
    field_errors: Vec<FieldError>,
}

/// One validation message returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field, when the backend identified one.
    pub field: Option<String>,
    /// Human-readable message.
    pub message: String,
}

/// Validation messages split between form fields and the form itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrorRouting {
    /// Messages keyed by the form field they belong to.
    pub by_field: BTreeMap<String, Vec<String>>,
    /// Messages without a known target field.
    pub general: Vec<String>,
}

impl ServerFailure {
    /// Creates a failure without field-level messages.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    /// Attaches field-level validation messages.
    #[must_use]
    pub fn with_field_errors(mut self, field_errors: Vec<FieldError>) -> Self {
        self.field_errors = field_errors;
        self
    }

    /// Returns the HTTP status reported by the backend.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the top-level failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns field-level validation messages.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Routes field-level messages to the fields a form knows about.
    ///
    /// Messages naming an unknown field, or no field at all, become general
    /// form-level errors. The top-level message is only used as a general error
    /// when no field-level message was returned.
    #[must_use]
    pub fn route_field_errors(&self, known_fields: &[&str]) -> FormErrorRouting {
        let mut routing = FormErrorRouting::default();

        for error in &self.field_errors {
            match error
                .field
                .as_deref()
                .map(str::trim)
                .filter(|field| known_fields.contains(field))
            {
                Some(field) => routing
                    .by_field
                    .entry(field.to_owned())
                    .or_default()
                    .push(error.message.clone()),
                None => routing.general.push(error.message.clone()),
            }
        }

        if self.field_errors.is_empty() && !self.message.trim().is_empty() {
            routing.general.push(self.message.clone());
        }

        routing
    }
}

impl Display for ServerFailure {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "status {}: {}", self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldError, ServerFailure};

    #[test]
    fn known_fields_are_routed_to_the_field() {
        let failure = ServerFailure::new(400, "validation failed").with_field_errors(vec![
            FieldError {
                field: Some("email".to_owned()),
                message: "email is already taken".to_owned(),
            },
            FieldError {
                field: Some("tenant".to_owned()),
                message: "tenant is locked".to_owned(),
            },
            FieldError {
                field: None,
                message: "try again later".to_owned(),
            },
        ]);

        let routing = failure.route_field_errors(&["email", "username"]);

        assert_eq!(
            routing.by_field.get("email"),
            Some(&vec!["email is already taken".to_owned()])
        );
        assert_eq!(
            routing.general,
            vec!["tenant is locked".to_owned(), "try again later".to_owned()]
        );
    }

    #[test]
    fn top_level_message_is_general_without_field_errors() {
        let routing = ServerFailure::new(500, "boom").route_field_errors(&["name"]);
        assert!(routing.by_field.is_empty());
        assert_eq!(routing.general, vec!["boom".to_owned()]);
    }
}
