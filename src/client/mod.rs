pub mod controller;
pub mod render;
pub mod repl;

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use std::error::Error as StdError;
use std::time::Duration;
use url::Url;

use crate::error::ClientError;
use crate::models::wire::{ ErrorBody, SendMessageRequest, SendMessageResponse };

pub use self::controller::{ ChatController, SendState };

pub const DEFAULT_CHAT_ID: &str = "default";

/// The client's view of the relay endpoint.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send_message(
        &self,
        chat_id: &str,
        request: &SendMessageRequest
    ) -> Result<SendMessageResponse, ClientError>;
}

pub struct HttpRelayClient {
    http: HttpClient,
    base_url: Url,
}

impl HttpRelayClient {
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let base_url = Url::parse(base_url).map_err(|e|
            format!("Invalid relay URL '{}': {}", base_url, e)
        )?;
        if base_url.cannot_be_a_base() {
            return Err(format!("Relay URL '{}' cannot be used as a base", base_url).into());
        }

        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// `{base}/api/chat/{chat_id}/send`, with the id percent-encoded as one segment.
    pub fn send_url(&self, chat_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "chat", chat_id, "send"]);
        }
        url
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn send_message(
        &self,
        chat_id: &str,
        request: &SendMessageRequest
    ) -> Result<SendMessageResponse, ClientError> {
        let url = self.send_url(chat_id);
        debug!("POST {}", url);

        let resp = self.http
            .post(url)
            .json(request)
            .send().await
            .map_err(|e| ClientError::NetworkFailure(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = match resp.json::<ErrorBody>().await {
                Ok(body) =>
                    match body.details {
                        Some(details) => format!("{} ({}: {})", status, body.error, details),
                        None => format!("{} ({})", status, body.error),
                    }
                Err(_) => status.to_string(),
            };
            return Err(ClientError::NetworkFailure(detail));
        }

        resp.json::<SendMessageResponse>().await.map_err(|e|
            ClientError::NetworkFailure(format!("invalid response body: {}", e))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_url_appends_path_segments() {
        let client = HttpRelayClient::new("http://localhost:3001", None).unwrap();
        assert_eq!(client.send_url("default").as_str(), "http://localhost:3001/api/chat/default/send");

        let nested = HttpRelayClient::new("http://host/relay/", None).unwrap();
        assert_eq!(nested.send_url("a b").as_str(), "http://host/relay/api/chat/a%20b/send");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(HttpRelayClient::new("not a url", None).is_err());
        assert!(HttpRelayClient::new("mailto:coach@example.com", None).is_err());
    }
}
