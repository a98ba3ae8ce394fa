//! HTTP client for the chat and presence API

use buddy_core::{Message, StatusRecord};
use reqwest::Response;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{SendRequest, StatusRequest};

/// Client handle for one server
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Post a chat message. An empty recipient makes it public.
    pub async fn send_message(&self, user: &str, text: &str, recipient: &str) -> Result<()> {
        let body = SendRequest {
            user: Some(user.to_string()),
            text: Some(text.to_string()),
            recipient: Some(recipient.to_string()),
        };

        let response = self.http.post(self.url("/send")).json(&body).send().await?;
        check(response).await?;

        debug!(user, recipient, "Message sent");
        Ok(())
    }

    /// Fetch every message visible to `user`, oldest first
    pub async fn list_messages(&self, user: &str) -> Result<Vec<Message>> {
        let response = self
            .http
            .get(self.url("/messages"))
            .query(&[("user", user)])
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Set the status (and optional note) for `user`
    pub async fn set_status(&self, user: &str, status: &str, message: &str) -> Result<()> {
        let body = StatusRequest {
            user: Some(user.to_string()),
            status: Some(status.to_string()),
            message: Some(message.to_string()),
        };

        let response = self.http.post(self.url("/status")).json(&body).send().await?;
        check(response).await?;

        debug!(user, status, "Status updated on server");
        Ok(())
    }

    /// Fetch stored statuses for `users`. Unknown names are absent from the result.
    pub async fn get_statuses(&self, users: &[String]) -> Result<Vec<StatusRecord>> {
        let response = self
            .http
            .get(self.url("/status"))
            .query(&[("users", users.join(","))])
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }
}

/// Turn a non-2xx response into [`Error::Rejected`]
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = Client::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/status"), "http://localhost:3000/status");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = Client::new(format!("http://{}", addr));
        let err = client.get_statuses(&["alice".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
