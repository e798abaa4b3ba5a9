/*
 * Responsibility
 * - request/response DTOs for /user
 * - validate() turns an untyped JSON body into NewUser or a list of field errors
 */
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::repos::user_repo::UserRow;

// Local part may not start with a dot and may not contain "..", both checked outside the regex.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email regex is valid")
});

pub fn is_valid_email(candidate: &str) -> bool {
    !candidate.starts_with('.') && !candidate.contains("..") && EMAIL_RE.is_match(candidate)
}

/// A single failing field, reported back to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub code: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }
}

/// Payload of `POST /user/create` after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl NewUser {
    pub fn validate(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(obj) = payload.as_object() else {
            return Err(vec![FieldError::new(
                "",
                "invalid_type",
                format!("Expected object, received {}", type_name(payload)),
            )]);
        };

        let mut errors = Vec::new();

        let id = required_string(obj, "id", &mut errors);
        if let Some(id) = &id
            && id.is_empty()
        {
            errors.push(FieldError::new(
                "id",
                "too_small",
                "String must contain at least 1 character(s)",
            ));
        }

        let email = required_string(obj, "email", &mut errors);
        if let Some(email) = &email
            && !is_valid_email(email)
        {
            errors.push(FieldError::new("email", "invalid_string", "Invalid email"));
        }

        let name = match obj.get("name") {
            None => None,
            Some(Value::String(s)) if s.is_empty() => {
                errors.push(FieldError::new(
                    "name",
                    "too_small",
                    "String must contain at least 1 character(s)",
                ));
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                errors.push(invalid_type("name", other));
                None
            }
        };

        match (id, email) {
            (Some(id), Some(email)) if errors.is_empty() => Ok(Self { id, email, name }),
            _ => Err(errors),
        }
    }
}

fn required_string(
    obj: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(invalid_type(field, other));
            None
        }
        None => {
            errors.push(FieldError::new(field, "invalid_type", "Required"));
            None
        }
    }
}

fn invalid_type(field: &str, got: &Value) -> FieldError {
    FieldError::new(
        field,
        "invalid_type",
        format!("Expected string, received {}", type_name(got)),
    )
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
        }
    }
}
