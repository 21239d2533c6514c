use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfmarkError};

/// Default endpoint for the hosted signup integration.
pub const DEFAULT_BASE_URL: &str = "https://no23.lavina.tech";

/// Payload for the remote signup call. Field order matters: the request
/// signature is computed over the serialized body, so serialization must
/// stay stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub name: String,
    pub email: String,
    pub key: String,
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Client for the optional remote signup integration. Isolated from the
/// local credential gate; nothing here touches the slot store.
pub struct SignupClient {
    client: reqwest::Client,
    base_url: String,
}

impl SignupClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Keyed request signature: hex MD5 digest of the shared secret
    /// concatenated with the serialized payload.
    pub fn sign(payload: &AuthPayload) -> Result<String> {
        let body = serde_json::to_string(payload)?;
        Ok(format!("{:x}", md5::compute(format!("{}{}", payload.secret, body))))
    }

    /// POST the payload to `{base_url}/signup` with `Key` and `Sign`
    /// headers. Non-2xx responses and unparseable bodies are logged and
    /// surfaced as `Api` errors; nothing is retried.
    pub async fn signup(&self, payload: &AuthPayload) -> Result<SignupResponse> {
        let body = serde_json::to_string(payload)?;
        let sign = format!("{:x}", md5::compute(format!("{}{}", payload.secret, body)));
        let url = format!("{}/signup", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Key", &payload.key)
            .header("Sign", sign)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "signup request failed");
                ShelfmarkError::Http(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(url = %url, status = status.as_u16(), "signup rejected");
            return Err(ShelfmarkError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(url = %url, error = %e, "unparseable signup response");
            ShelfmarkError::Api {
                status: status.as_u16(),
                message: format!("invalid response body: {e}"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> AuthPayload {
        AuthPayload {
            name: "Reader".to_string(),
            email: "reader@example.com".to_string(),
            key: "api-key".to_string(),
            secret: "api-secret".to_string(),
        }
    }

    #[test]
    fn test_sign_is_stable_hex_md5() {
        let sign = SignupClient::sign(&payload()).unwrap();
        assert_eq!(sign.len(), 32);
        assert!(sign.chars().all(|c| c.is_ascii_hexdigit()));
        // Same payload, same signature.
        assert_eq!(sign, SignupClient::sign(&payload()).unwrap());
    }

    #[test]
    fn test_sign_depends_on_secret() {
        let mut other = payload();
        other.secret = "different".to_string();
        assert_ne!(
            SignupClient::sign(&payload()).unwrap(),
            SignupClient::sign(&other).unwrap()
        );
    }

    #[tokio::test]
    async fn test_signup_success() {
        let mut server = mockito::Server::new_async().await;
        let expected_sign = SignupClient::sign(&payload()).unwrap();

        let mock = server
            .mock("POST", "/signup")
            .match_header("key", "api-key")
            .match_header("sign", expected_sign.as_str())
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"success":true,"token":"tok123","message":"welcome"}"#)
            .create_async()
            .await;

        let client = SignupClient::new(server.url());
        let response = client.signup(&payload()).await.unwrap();

        mock.assert_async().await;
        assert!(response.success);
        assert_eq!(response.token.as_deref(), Some("tok123"));
        assert_eq!(response.message.as_deref(), Some("welcome"));
    }

    #[tokio::test]
    async fn test_signup_non_2xx_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/signup")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let client = SignupClient::new(server.url());
        let err = client.signup(&payload()).await.unwrap_err();
        assert!(matches!(
            err,
            ShelfmarkError::Api { status: 403, message } if message == "forbidden"
        ));
    }

    #[tokio::test]
    async fn test_signup_unparseable_body_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/signup")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = SignupClient::new(server.url());
        let err = client.signup(&payload()).await.unwrap_err();
        assert!(matches!(err, ShelfmarkError::Api { status: 200, .. }));
    }
}
