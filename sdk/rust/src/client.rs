use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use reqwest::Client as HttpClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserList {
    pub users: Vec<User>,
    pub count: usize,
}

/// Fields sent on create and update. `None` fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// Status code returned by the service, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

pub struct UserClient {
    client: Client,
    base_url: String,
}

impl UserClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<Status, ClientError> {
        decode(self.client.get(self.url("/health")).send().await?).await
    }

    /// Readiness; a draining service answers with an `Api` error carrying 503.
    pub async fn ready(&self) -> Result<Status, ClientError> {
        decode(self.client.get(self.url("/ready")).send().await?).await
    }

    pub async fn list(&self) -> Result<UserList, ClientError> {
        decode(self.client.get(self.url("/users")).send().await?).await
    }

    pub async fn get(&self, id: u64) -> Result<User, ClientError> {
        decode(self.client.get(self.url(&format!("/users/{id}"))).send().await?).await
    }

    pub async fn create(&self, fields: &UserFields) -> Result<User, ClientError> {
        let resp = self.client.post(self.url("/users")).json(fields).send().await?;
        decode(resp).await
    }

    pub async fn update(&self, id: u64, fields: &UserFields) -> Result<User, ClientError> {
        let resp = self
            .client
            .put(self.url(&format!("/users/{id}")))
            .json(fields)
            .send()
            .await?;
        decode(resp).await
    }

    /// Delete a user, returning the service's confirmation message.
    pub async fn delete(&self, id: u64) -> Result<String, ClientError> {
        #[derive(Deserialize)]
        struct Deleted {
            message: String,
        }
        let resp = self
            .client
            .delete(self.url(&format!("/users/{id}")))
            .send()
            .await?;
        decode::<Deleted>(resp).await.map(|d| d.message)
    }

    /// Raw Prometheus exposition text.
    pub async fn metrics(&self) -> Result<String, ClientError> {
        let resp = self.client.get(self.url("/metrics")).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &text));
        }
        Ok(text)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await?;
        return Err(api_error(status, &text));
    }
    Ok(resp.json().await?)
}

fn api_error(status: StatusCode, text: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(text)
        .map(|body| body.error)
        .or_else(|_| {
            serde_json::from_str::<Status>(text).map(|body| body.status)
        })
        .unwrap_or_else(|_| text.to_string());
    ClientError::Api { status, message }
}
