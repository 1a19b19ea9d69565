//! Directory entity and request body validation.

use crate::error::AppError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Column width of `name` in the directories table.
pub const NAME_MAX_LEN: usize = 255;

/// A persisted directory: a named group of email addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Directory {
    pub id: i64,
    pub name: String,
    pub emails: Vec<String>,
}

/// Validated body of a create request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDirectory {
    pub name: String,
    pub emails: Vec<String>,
}

/// Validated body of a patch request. `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryPatch {
    pub name: Option<String>,
    pub emails: Option<Vec<String>>,
}

fn body_to_object(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

fn validate_name(s: &str) -> Result<(), AppError> {
    if s.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if s.contains('\0') {
        return Err(AppError::BadRequest("name must not contain NUL characters".into()));
    }
    if s.chars().count() > NAME_MAX_LEN {
        return Err(AppError::BadRequest(format!(
            "name must be at most {} characters",
            NAME_MAX_LEN
        )));
    }
    Ok(())
}

fn string_list(items: Vec<Value>) -> Result<Vec<String>, AppError> {
    items
        .into_iter()
        .map(|v| match v {
            // PostgreSQL text cannot hold NUL.
            Value::String(s) if s.contains('\0') => Err(AppError::BadRequest(
                "emails must not contain NUL characters".into(),
            )),
            Value::String(s) => Ok(s),
            _ => Err(AppError::BadRequest("emails must contain only strings".into())),
        })
        .collect()
}

impl NewDirectory {
    /// Requires an object with a text `name` and an `emails` array of text.
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let mut obj = body_to_object(body)?;
        let name = match obj.remove("name") {
            Some(Value::String(s)) => s,
            Some(_) => return Err(AppError::BadRequest("name must be a string".into())),
            None => return Err(AppError::BadRequest("name is required".into())),
        };
        validate_name(&name)?;
        let emails = match obj.remove("emails") {
            Some(Value::Array(items)) => string_list(items)?,
            Some(_) => return Err(AppError::BadRequest("emails must be an array".into())),
            None => return Err(AppError::BadRequest("emails is required".into())),
        };
        Ok(NewDirectory { name, emails })
    }
}

impl DirectoryPatch {
    /// Only a text `name` and an array `emails` are taken; present fields of
    /// other types are ignored. Nothing is applied if any check fails.
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let mut obj = body_to_object(body)?;
        let name = match obj.remove("name") {
            Some(Value::String(s)) => {
                validate_name(&s)?;
                Some(s)
            }
            _ => None,
        };
        let emails = match obj.remove("emails") {
            Some(Value::Array(items)) => Some(string_list(items)?),
            _ => None,
        };
        Ok(DirectoryPatch { name, emails })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.emails.is_none()
    }

    pub fn apply(self, directory: &mut Directory) {
        if let Some(name) = self.name {
            directory.name = name;
        }
        if let Some(emails) = self.emails {
            directory.emails = emails;
        }
    }
}
