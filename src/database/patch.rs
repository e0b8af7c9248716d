use serde_json::{Map, Value};

use crate::database::models::Employee;

/// Field that can never be written through a patch.
pub const ID_FIELD: &str = "id";

/// Writable employee fields, by their JSON names.
const PATCHABLE_FIELDS: &[&str] = &["firstName", "lastName", "email"];

/// Errors raised while reading a patch body
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("Expected a JSON object")]
    NotAnObject,
    #[error("Field '{0}' cannot be changed")]
    ImmutableField(&'static str),
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("Field '{field}' must be a {expected}")]
    TypeMismatch { field: String, expected: &'static str },
}

impl PatchError {
    /// JSON name of the offending field, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            PatchError::NotAnObject => None,
            PatchError::ImmutableField(field) => Some(field),
            PatchError::UnknownField(field) => Some(field),
            PatchError::TypeMismatch { field, .. } => Some(field),
        }
    }
}

/// A sparse set of employee field updates.
///
/// Built from a JSON object through an explicit whitelist: every key must be
/// one of the writable fields and carry a string. `id` and unknown keys are
/// errors, never silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl EmployeePatch {
    pub fn from_json(json: Value) -> Result<Self, PatchError> {
        match json {
            Value::Object(map) => Self::from_map(map),
            _ => Err(PatchError::NotAnObject),
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Result<Self, PatchError> {
        // The identifier check wins over any other problem in the body
        if map.contains_key(ID_FIELD) {
            return Err(PatchError::ImmutableField(ID_FIELD));
        }

        let mut patch = Self::default();
        for (key, value) in map {
            let slot = match key.as_str() {
                "firstName" => &mut patch.first_name,
                "lastName" => &mut patch.last_name,
                "email" => &mut patch.email,
                _ => return Err(PatchError::UnknownField(key)),
            };
            match value {
                Value::String(text) => *slot = Some(text),
                _ => {
                    return Err(PatchError::TypeMismatch {
                        field: key,
                        expected: "string",
                    })
                }
            }
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    /// Names of the fields this patch touches, in declaration order
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let present = [
            self.first_name.is_some(),
            self.last_name.is_some(),
            self.email.is_some(),
        ];
        PATCHABLE_FIELDS
            .iter()
            .zip(present)
            .filter_map(|(name, set)| set.then_some(*name))
            .collect()
    }

    /// Overlay this patch onto `base`. The identifier always comes from `base`.
    pub fn apply(&self, base: &Employee) -> Employee {
        Employee {
            id: base.id,
            first_name: self
                .first_name
                .clone()
                .unwrap_or_else(|| base.first_name.clone()),
            last_name: self
                .last_name
                .clone()
                .unwrap_or_else(|| base.last_name.clone()),
            email: self.email.clone().unwrap_or_else(|| base.email.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Employee {
        Employee::new("Ali", "Veli", "ali@x.com").with_id(3)
    }

    #[test]
    fn overwrites_only_present_fields() {
        let patch = EmployeePatch::from_json(json!({"firstName": "Ayse"})).unwrap();
        let merged = patch.apply(&base());
        assert_eq!(merged.first_name, "Ayse");
        assert_eq!(merged.last_name, "Veli");
        assert_eq!(merged.email, "ali@x.com");
        assert_eq!(merged.id, 3);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let patch =
            EmployeePatch::from_json(json!({"lastName": "Yilmaz", "email": "y@x.com"})).unwrap();
        let once = patch.apply(&base());
        let twice = patch.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_patch_keeps_snapshot() {
        let patch = EmployeePatch::from_json(json!({})).unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&base()), base());
    }

    #[test]
    fn rejects_identifier_whatever_its_value() {
        for id in [json!(3), json!(0), json!(null), json!("3")] {
            let err = EmployeePatch::from_json(json!({"id": id, "firstName": "X"})).unwrap_err();
            assert_eq!(err, PatchError::ImmutableField("id"));
        }
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = EmployeePatch::from_json(json!({"salary": "1000"})).unwrap_err();
        assert_eq!(err, PatchError::UnknownField("salary".to_string()));
        assert_eq!(err.field(), Some("salary"));
    }

    #[test]
    fn rejects_incompatible_values() {
        for value in [json!(42), json!(null), json!(["a"]), json!({"a": 1}), json!(true)] {
            let err = EmployeePatch::from_json(json!({"email": value})).unwrap_err();
            assert!(matches!(err, PatchError::TypeMismatch { ref field, .. } if field == "email"));
        }
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert_eq!(
            EmployeePatch::from_json(json!(["firstName"])).unwrap_err(),
            PatchError::NotAnObject
        );
    }

    #[test]
    fn reports_touched_fields() {
        let patch = EmployeePatch::from_json(json!({"email": "e", "firstName": "f"})).unwrap();
        assert_eq!(patch.touched_fields(), vec!["firstName", "email"]);
    }
}
