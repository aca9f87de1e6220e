use crate::auth::AuthProvider;
use crate::endpoint::{Endpoint, InfoResponse};
use crate::error::{Error, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SIGN_PATH: &str = "/api/v1/signer/sign";
const AUTH_SIGN_PATH: &str = "/api/v1/signer/authsign";
const INFO_PATH: &str = "/api/v1/signer/info";

/// Response envelope every remote operation returns.
///
/// Signed payloads travel base64-encoded in `result`; the info operation
/// returns a structured record there instead.
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Request envelope for authenticated signing. Token and request travel
/// base64-encoded so the payload stays opaque bytes end to end.
#[derive(Debug, Serialize)]
struct AuthEnvelope {
    token: String,
    request: String,
}

/// HTTP-backed [`Endpoint`] for one remote signer.
pub struct HttpEndpoint {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEndpoint {
    /// Create an endpoint for one remote address.
    ///
    /// The address is not validated here; a malformed address fails at
    /// call time like any other endpoint failure.
    pub fn new(address: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: address.trim_end_matches('/').to_string(),
        }
    }

    /// The remote address this endpoint talks to.
    pub fn address(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let envelope: ResponseEnvelope = response.json().await?;
        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| "remote reported failure without detail".to_string());
            return Err(Error::Remote(message));
        }
        envelope
            .result
            .ok_or_else(|| Error::InvalidResponse("missing result".to_string()))
    }

    fn decode_payload(result: Value) -> Result<Vec<u8>> {
        let encoded = result
            .as_str()
            .ok_or_else(|| Error::InvalidResponse("result is not a string".to_string()))?;
        STANDARD
            .decode(encoded)
            .map_err(|e| Error::InvalidResponse(format!("result is not valid base64: {e}")))
    }
}

#[async_trait]
impl Endpoint for HttpEndpoint {
    async fn auth_sign(
        &self,
        request: &[u8],
        identifier: &[u8],
        provider: &dyn AuthProvider,
    ) -> Result<Vec<u8>> {
        let token = provider.token(request, identifier)?;
        let envelope = AuthEnvelope {
            token: STANDARD.encode(token),
            request: STANDARD.encode(request),
        };
        let body = serde_json::to_vec(&envelope)?;
        let result = self.post(AUTH_SIGN_PATH, body).await?;
        Self::decode_payload(result)
    }

    async fn sign(&self, request_json: &[u8]) -> Result<Vec<u8>> {
        let result = self.post(SIGN_PATH, request_json.to_vec()).await?;
        Self::decode_payload(result)
    }

    async fn info(&self, request_json: &[u8]) -> Result<InfoResponse> {
        let result = self.post(INFO_PATH, request_json.to_vec()).await?;
        serde_json::from_value(result).map_err(Error::Json)
    }
}
