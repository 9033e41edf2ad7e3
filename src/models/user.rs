use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::AppError;

/// User as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub address: String,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
}

impl UserDocument {
    /// New document stamped with the current time. `_id` is left to the store.
    pub fn from_new(user: NewUser) -> Self {
        UserDocument {
            id: None,
            name: user.name,
            email: user.email,
            age: user.age,
            address: user.address,
            created_at: bson::DateTime::now(),
        }
    }

    /// Replaces the four editable fields; `_id` and `createdAt` are kept.
    pub fn apply(&mut self, user: NewUser) {
        self.name = user.name;
        self.email = user.email;
        self.age = user.age;
        self.address = user.address;
    }
}

/// User record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// ObjectId as a 24 character hex string
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: doc.name,
            email: doc.email,
            age: doc.age,
            address: doc.address,
            created_at: DateTime::from_timestamp_millis(doc.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

/// Validated editable fields of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub address: String,
}

/// Raw request body for create and update.
///
/// Fields stay untyped here so that `"30"` and `30` are both accepted for
/// `age`, and numbers are accepted for the text fields. [`UserPayload::validate`]
/// is the only way to turn it into a [`NewUser`]. Built from a JSON object only,
/// see the `TryFrom<Value>` impl.
#[derive(Debug, Default, utoipa::ToSchema)]
pub struct UserPayload {
    #[schema(value_type = String, example = "Ann")]
    pub name: Option<Value>,
    #[schema(value_type = String, example = "a@x.com")]
    pub email: Option<Value>,
    #[schema(value_type = i32, example = 30)]
    pub age: Option<Value>,
    #[schema(value_type = String, example = "1 Main St")]
    pub address: Option<Value>,
}

impl TryFrom<Value> for UserPayload {
    type Error = AppError;

    fn try_from(body: Value) -> Result<Self, AppError> {
        let Value::Object(mut fields) = body else {
            return Err(AppError::Validation(
                "Request body must be a JSON object".to_string(),
            ));
        };

        Ok(UserPayload {
            name: fields.remove("name"),
            email: fields.remove("email"),
            age: fields.remove("age"),
            address: fields.remove("address"),
        })
    }
}

impl UserPayload {
    pub fn validate(self) -> Result<NewUser, AppError> {
        let name = required_text("name", self.name)?;
        let email = required_text("email", self.email)?;
        let age = required_age(self.age)?;
        let address = required_text("address", self.address)?;

        Ok(NewUser {
            name,
            email,
            age,
            address,
        })
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("{} is required", field))
}

fn required_text(field: &str, value: Option<Value>) -> Result<String, AppError> {
    let text = match value {
        None | Some(Value::Null) => return Err(missing(field)),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(_) => return Err(AppError::Validation(format!("{} must be a string", field))),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(missing(field));
    }
    Ok(trimmed.to_string())
}

fn required_age(value: Option<Value>) -> Result<i32, AppError> {
    let malformed = || AppError::Validation("age must be an integer".to_string());

    match value {
        None | Some(Value::Null) => Err(missing("age")),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).map_err(|_| malformed());
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => {
                    Ok(f as i32)
                }
                _ => Err(malformed()),
            }
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(missing("age"));
            }
            trimmed.parse::<i32>().map_err(|_| malformed())
        }
        Some(_) => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> UserPayload {
        UserPayload::try_from(value).unwrap()
    }

    #[test]
    fn test_validate_complete_payload() {
        let user = payload(json!({
            "name": "Ann",
            "email": "a@x.com",
            "age": 30,
            "address": "1 Main St"
        }))
        .validate()
        .unwrap();

        assert_eq!(
            user,
            NewUser {
                name: "Ann".into(),
                email: "a@x.com".into(),
                age: 30,
                address: "1 Main St".into(),
            }
        );
    }

    #[test]
    fn test_age_is_coerced_from_string_and_integral_float() {
        let from_string = payload(json!({
            "name": "Ann", "email": "a@x.com", "age": " 42 ", "address": "x"
        }))
        .validate()
        .unwrap();
        assert_eq!(from_string.age, 42);

        let from_float = payload(json!({
            "name": "Ann", "email": "a@x.com", "age": 42.0, "address": "x"
        }))
        .validate()
        .unwrap();
        assert_eq!(from_float.age, 42);
    }

    #[test]
    fn test_numeric_text_fields_are_stringified() {
        let user = payload(json!({
            "name": 123, "email": "a@x.com", "age": 1, "address": 7
        }))
        .validate()
        .unwrap();
        assert_eq!(user.name, "123");
        assert_eq!(user.address, "7");
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        let full = json!({"name": "Ann", "email": "a@x.com", "age": 30, "address": "1 Main St"});

        for field in ["name", "email", "age", "address"] {
            let mut body = full.clone();
            body.as_object_mut().unwrap().remove(field);

            match payload(body).validate() {
                Err(AppError::Validation(msg)) => assert_eq!(msg, format!("{} is required", field)),
                other => panic!("expected validation error for {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_blank_and_null_count_as_missing() {
        let blank = payload(json!({"name": "   ", "email": "a@x.com", "age": 30, "address": "x"}));
        assert!(matches!(blank.validate(), Err(AppError::Validation(m)) if m == "name is required"));

        let null_age = payload(json!({"name": "Ann", "email": "a@x.com", "age": null, "address": "x"}));
        assert!(matches!(null_age.validate(), Err(AppError::Validation(m)) if m == "age is required"));
    }

    #[test]
    fn test_malformed_age_is_rejected() {
        for age in [json!("thirty"), json!(30.5), json!(true), json!([30]), json!(1e12)] {
            let body = payload(json!({"name": "Ann", "email": "a@x.com", "age": age, "address": "x"}));
            assert!(
                matches!(body.validate(), Err(AppError::Validation(m)) if m == "age must be an integer"),
                "age {:?} should be rejected",
                age
            );
        }
    }

    #[test]
    fn test_document_conversion_keeps_identity() {
        let id = ObjectId::new();
        let doc = UserDocument {
            id: Some(id),
            name: "Ann".into(),
            email: "a@x.com".into(),
            age: 30,
            address: "1 Main St".into(),
            created_at: bson::DateTime::from_millis(1_700_000_000_123),
        };

        let user = User::from(doc);
        assert_eq!(user.id, id.to_hex());
        assert_eq!(user.created_at.timestamp_millis(), 1_700_000_000_123);

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["age"], 30);
    }

    #[test]
    fn test_non_object_bodies_are_rejected() {
        for body in [
            json!(["Ann", "a@x.com", 30, "1 Main St"]),
            json!("Ann"),
            json!(30),
            Value::Null,
        ] {
            match UserPayload::try_from(body.clone()) {
                Err(AppError::Validation(msg)) => {
                    assert_eq!(msg, "Request body must be a JSON object")
                }
                other => panic!("body {:?} should be rejected, got {:?}", body, other),
            }
        }
    }
}
