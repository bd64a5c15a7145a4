//! Wire JSON to validated user inputs.
//!
//! Every field of the body is checked and all failures are reported
//! together, keyed by wire field name. Coercion is deliberately loose:
//! numbers are accepted for text fields and numeric strings for integer
//! fields.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{FieldKind, NewUser, UserField, UserPatch};

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const REQUIRED: &str = "This field is required.";
const NULL: &str = "This field may not be null.";
const BLANK: &str = "This field may not be blank.";
const NOT_A_STRING: &str = "Not a valid string.";
const NOT_AN_INTEGER: &str = "A valid integer is required.";

/// Field name to the list of problems found with it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("invalid user payload ({} field(s) rejected)", .0.len())]
pub struct ValidationErrors(pub FieldErrors);

impl ValidationErrors {
    fn push(&mut self, key: &str, message: impl Into<String>) {
        self.0.entry(key.to_string()).or_default().push(message.into());
    }

    fn non_field(message: String) -> Self {
        let mut errors = Self::default();
        errors.push(NON_FIELD_ERRORS, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }
}

/// Validate a creation body: every writable field must be present.
pub fn deserialize_new(body: &Value) -> Result<NewUser, ValidationErrors> {
    let map = as_object(body)?;
    let mut errors = ValidationErrors::default();
    let patch = read_fields(map, &mut errors);
    for field in UserField::WRITABLE {
        if !map.contains_key(field.as_str()) {
            errors.push(field.as_str(), REQUIRED);
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    NewUser::try_from(patch).map_err(|missing| {
        let mut errors = ValidationErrors::default();
        for field in missing {
            errors.push(field.as_str(), REQUIRED);
        }
        errors
    })
}

/// Validate an update body: any subset of writable fields.
pub fn deserialize_patch(body: &Value) -> Result<UserPatch, ValidationErrors> {
    let map = as_object(body)?;
    let mut errors = ValidationErrors::default();
    let patch = read_fields(map, &mut errors);
    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(ValidationErrors::non_field(format!(
            "Invalid data. Expected a dictionary, but got {}.",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn read_fields(map: &Map<String, Value>, errors: &mut ValidationErrors) -> UserPatch {
    let mut reader = FieldReader { map, errors };
    UserPatch {
        first_name: reader.text(UserField::FirstName),
        last_name: reader.text(UserField::LastName),
        company_name: reader.text(UserField::CompanyName),
        age: reader.integer(UserField::Age),
        city: reader.text(UserField::City),
        state: reader.text(UserField::State),
        zip: reader.integer(UserField::Zip),
        email: reader.text(UserField::Email),
        web: reader.text(UserField::Web),
    }
}

struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    errors: &'a mut ValidationErrors,
}

impl<'a> FieldReader<'a> {
    /// Present, non-null value of `field`; absence is the caller's concern.
    fn present(&mut self, field: UserField) -> Option<&'a Value> {
        let map = self.map;
        match map.get(field.as_str())? {
            Value::Null => {
                self.errors.push(field.as_str(), NULL);
                None
            }
            value => Some(value),
        }
    }

    fn text(&mut self, field: UserField) -> Option<String> {
        let raw = match self.present(field)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.errors.push(field.as_str(), NOT_A_STRING);
                return None;
            }
        };
        let text = raw.trim();
        if text.is_empty() {
            self.errors.push(field.as_str(), BLANK);
            return None;
        }
        if let FieldKind::Text {
            max_length: Some(max),
        } = field.kind()
        {
            if text.chars().count() > max {
                self.errors.push(
                    field.as_str(),
                    format!("Ensure this field has no more than {max} characters."),
                );
                return None;
            }
        }
        Some(text.to_string())
    }

    fn integer(&mut self, field: UserField) -> Option<i64> {
        let coerced = match self.present(field)? {
            Value::Number(n) => n.as_i64().or_else(|| whole_float(n.as_f64()?)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        if coerced.is_none() {
            self.errors.push(field.as_str(), NOT_AN_INTEGER);
        }
        coerced
    }
}

fn whole_float(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn complete() -> Value {
        json!({
            "first_name": "James",
            "last_name": "Smith",
            "company_name": "ABC Corp",
            "age": 35,
            "city": "NYC",
            "state": "NY",
            "zip": 10001,
            "email": "james@example.com",
            "web": "http://abc.com"
        })
    }

    #[test]
    fn complete_body_creates_new_user() {
        let user = deserialize_new(&complete()).unwrap();
        assert_eq!(user.first_name, "James");
        assert_eq!(user.age, 35);
        assert_eq!(user.zip, 10001);
    }

    #[test]
    fn each_missing_field_is_reported_as_required() {
        for field in UserField::WRITABLE {
            let mut body = complete();
            body.as_object_mut().unwrap().remove(field.as_str());
            let errors = deserialize_new(&body).unwrap_err();
            assert_eq!(errors.0.len(), 1, "{field}");
            assert_eq!(errors.get(field.as_str()), Some(&[REQUIRED.to_string()][..]));
        }
    }

    #[test]
    fn empty_body_reports_all_nine_fields() {
        let errors = deserialize_new(&json!({})).unwrap_err();
        assert_eq!(errors.0.len(), 9);
    }

    #[test]
    fn errors_from_several_fields_are_collected() {
        let mut body = complete();
        body["age"] = json!("old");
        body["city"] = json!(null);
        body["state"] = json!("   ");
        body.as_object_mut().unwrap().remove("web");
        let errors = deserialize_new(&body).unwrap_err();
        assert_eq!(errors.get("age"), Some(&[NOT_AN_INTEGER.to_string()][..]));
        assert_eq!(errors.get("city"), Some(&[NULL.to_string()][..]));
        assert_eq!(errors.get("state"), Some(&[BLANK.to_string()][..]));
        assert_eq!(errors.get("web"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn integers_accept_numeric_strings_and_whole_floats() {
        let mut body = complete();
        body["age"] = json!(" 41 ");
        body["zip"] = json!(90001.0);
        let user = deserialize_new(&body).unwrap();
        assert_eq!(user.age, 41);
        assert_eq!(user.zip, 90001);
    }

    #[test]
    fn integers_reject_fractions_and_booleans() {
        let errors = deserialize_patch(&json!({"age": 35.5, "zip": true})).unwrap_err();
        assert_eq!(errors.get("age"), Some(&[NOT_AN_INTEGER.to_string()][..]));
        assert_eq!(errors.get("zip"), Some(&[NOT_AN_INTEGER.to_string()][..]));
    }

    #[test]
    fn text_accepts_numbers_trims_and_rejects_other_types() {
        let patch = deserialize_patch(&json!({"city": 42, "state": "  TX  "})).unwrap();
        assert_eq!(patch.city.as_deref(), Some("42"));
        assert_eq!(patch.state.as_deref(), Some("TX"));

        let errors = deserialize_patch(&json!({"city": ["NYC"], "email": false})).unwrap_err();
        assert_eq!(errors.get("city"), Some(&[NOT_A_STRING.to_string()][..]));
        assert_eq!(errors.get("email"), Some(&[NOT_A_STRING.to_string()][..]));
    }

    #[test]
    fn text_longer_than_column_is_rejected() {
        let errors = deserialize_patch(&json!({
            "first_name": "x".repeat(101),
            "company_name": "y".repeat(255),
        }))
        .unwrap_err();
        assert_eq!(
            errors.get("first_name"),
            Some(&["Ensure this field has no more than 100 characters.".to_string()][..])
        );
        assert!(errors.get("company_name").is_none());
    }

    #[test]
    fn patch_keeps_absent_fields_unset_and_ignores_unknown_keys() {
        let patch = deserialize_patch(&json!({"age": 36, "id": 99, "nickname": "J"})).unwrap();
        assert_eq!(
            patch,
            UserPatch {
                age: Some(36),
                ..UserPatch::default()
            }
        );
    }

    #[test]
    fn non_object_body_is_a_non_field_error() {
        let errors = deserialize_new(&json!([1, 2])).unwrap_err();
        assert_eq!(
            errors.get(NON_FIELD_ERRORS),
            Some(&["Invalid data. Expected a dictionary, but got array.".to_string()][..])
        );
    }

    #[test]
    fn errors_serialize_as_a_plain_mapping() {
        let errors = deserialize_new(&json!({"first_name": "Ann"})).unwrap_err();
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["last_name"], json!([REQUIRED]));
        assert!(value.get("first_name").is_none());
    }
}
