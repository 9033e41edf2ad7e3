use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::models::User;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/users";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: StatusCode, message: String },
}

/// Editable fields as entered in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub address: String,
}

impl From<&User> for UserForm {
    fn from(user: &User) -> Self {
        UserForm {
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
            address: user.address.clone(),
        }
    }
}

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// The four calls the directory makes against the user API.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, ClientError>;
    async fn create(&self, form: &UserForm) -> Result<User, ClientError>;
    async fn update(&self, id: &str, form: &UserForm) -> Result<User, ClientError>;
    /// Returns the confirmation message.
    async fn delete(&self, id: &str) -> Result<String, ClientError>;
}

pub struct HttpDirectoryApi {
    http: Client,
    base_url: String,
}

impl HttpDirectoryApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<MessageBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| fallback.to_string());

        log::debug!("API responded {}: {}", status, message);
        Err(ClientError::Api { status, message })
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    async fn list(&self) -> Result<Vec<User>, ClientError> {
        Self::send(self.http.get(self.url("getUsers")), "Failed to fetch users").await
    }

    async fn create(&self, form: &UserForm) -> Result<User, ClientError> {
        Self::send(
            self.http.post(self.url("addUsers")).json(form),
            "Failed to add user",
        )
        .await
    }

    async fn update(&self, id: &str, form: &UserForm) -> Result<User, ClientError> {
        let path = format!("updateUser/{}", urlencoding::encode(id));
        Self::send(self.http.put(self.url(&path)).json(form), "Failed to update user").await
    }

    async fn delete(&self, id: &str) -> Result<String, ClientError> {
        let path = format!("deleteUser/{}", urlencoding::encode(id));
        let body: MessageBody =
            Self::send(self.http.delete(self.url(&path)), "Failed to delete user").await?;
        Ok(body.message.unwrap_or_else(|| "User deleted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_joined_once() {
        let api = HttpDirectoryApi::new("http://localhost:3000/api/users/");
        assert_eq!(api.url("getUsers"), "http://localhost:3000/api/users/getUsers");
    }

    #[test]
    fn test_form_prefill_from_user() {
        let user = User {
            id: "65f0c0ffee0000000000abcd".into(),
            name: "Ann".into(),
            email: "a@x.com".into(),
            age: 30,
            address: "1 Main St".into(),
            created_at: chrono::Utc::now(),
        };
        let form = UserForm::from(&user);
        assert_eq!(form.name, "Ann");
        assert_eq!(form.age, 30);
        assert_eq!(
            serde_json::to_value(&form).unwrap(),
            serde_json::json!({"name": "Ann", "email": "a@x.com", "age": 30, "address": "1 Main St"})
        );
    }
}
