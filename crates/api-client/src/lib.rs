use crate::error::ApiError;
use crate::request::{API_KEY_HEADER, CONTENT_TYPE_HEADER, SIGNATURE_HEADER};
use async_trait::async_trait;
use chrono::Utc;
use configuration::{ClientSettings, Credentials};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use translator::Payload;

pub mod auth;
pub mod error;
pub mod request;
pub mod responses;

// --- Public API ---
pub use request::{RequestDescription, SignedRequest};
pub use responses::{ApiErrorResponse, SmartTradeResponse};

/// The outcome of [`TradeApi::send`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "result", rename_all = "snake_case")]
pub enum Dispatch {
    /// The request was transmitted and the API accepted it.
    Sent(SmartTradeResponse),
    /// Dry run: the request that would have been sent.
    DryRun(RequestDescription),
}

/// The interface the engine uses to submit smart trades, allowing the
/// underlying implementation (live or fake) to be swapped out.
#[async_trait]
pub trait TradeApi: Send + Sync {
    /// Signs the payload and either transmits it or, when `dry_run` is set,
    /// returns the description of the request without sending anything.
    async fn send(&self, payload: &Payload, dry_run: bool) -> Result<Dispatch, ApiError>;
}

/// A concrete implementation of [`TradeApi`] for the 3Commas smart trade API.
#[derive(Clone)]
pub struct SmartTradeClient {
    client: reqwest::Client,
    base_url: String,
    /// Path component of `base_url` (e.g. `/public/api`), part of what gets signed.
    base_path: String,
    timeout: Duration,
    credentials: Credentials,
}

impl SmartTradeClient {
    pub fn new(credentials: Credentials, settings: ClientSettings) -> Result<Self, ApiError> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidUrl(base_url.clone(), e.to_string()))?;
        let base_path = parsed.path().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("translator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            client,
            base_url,
            base_path,
            timeout: settings.timeout,
            credentials,
        })
    }

    /// Builds and signs the request for `payload` at the given Unix timestamp.
    pub fn prepare(&self, payload: &Payload, timestamp: i64) -> Result<SignedRequest, ApiError> {
        let body = payload.to_json()?;
        let method = payload.endpoint.method();
        let path = format!("{}{}", self.base_path, payload.endpoint.path());
        let signature = auth::signature_header(
            &self.credentials.api_secret,
            timestamp,
            method,
            &path,
            &body,
        );

        let headers = BTreeMap::from([
            (API_KEY_HEADER.to_string(), self.credentials.api_key.clone()),
            (SIGNATURE_HEADER.to_string(), signature),
            (CONTENT_TYPE_HEADER.to_string(), "application/json".to_string()),
        ]);

        Ok(SignedRequest {
            method,
            url: format!("{}{}", self.base_url, payload.endpoint.path()),
            headers,
            body,
        })
    }

    async fn transmit(&self, request: SignedRequest) -> Result<SmartTradeResponse, ApiError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        tracing::debug!(method = request.method, url = %request.url, "Sending signed request.");
        let response = self
            .client
            .post(&request.url)
            .headers(headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if status.is_success() {
            serde_json::from_str::<SmartTradeResponse>(&text).map_err(|e| {
                ApiError::Deserialization(format!("{e}. Original text: {text}"))
            })
        } else {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|api_error| api_error.describe())
                .unwrap_or(text);
            tracing::warn!(status = status.as_u16(), %message, "API rejected the request.");
            Err(ApiError::Upstream {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Transport(error)
        }
    }
}

#[async_trait]
impl TradeApi for SmartTradeClient {
    async fn send(&self, payload: &Payload, dry_run: bool) -> Result<Dispatch, ApiError> {
        let request = self.prepare(payload, Utc::now().timestamp())?;

        if dry_run {
            let description = request.describe();
            tracing::info!(
                method = %description.method,
                url = %description.url,
                body = %description.body,
                "Dry run enabled. Request not sent."
            );
            return Ok(Dispatch::DryRun(description));
        }

        let response = self.transmit(request).await?;
        tracing::info!(id = ?response.id, "Smart trade created.");
        Ok(Dispatch::Sent(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Intent, OrderSide, TradingPair};
    use rust_decimal_macros::dec;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use translator::Translator;

    fn credentials() -> Credentials {
        Credentials {
            api_key: "test-key-0001".to_string(),
            api_secret: "test-secret".to_string(),
            account_id: 12345,
        }
    }

    fn settings(base_url: &str) -> ClientSettings {
        ClientSettings {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    fn limit_buy() -> Payload {
        let pair = TradingPair::new("BTC", "USDT").unwrap();
        let intent = Intent::limit(OrderSide::Buy, pair, dec!(0.25), dec!(30000)).unwrap();
        Translator::new(12345).translate(&intent)
    }

    /// Accepts a single HTTP request, answers with the given status line and
    /// body, and hands the raw request text back through the receiver.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&received[..end]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if received.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&received).to_string());
        });

        (format!("http://{addr}/public/api"), rx)
    }

    #[test]
    fn signed_path_includes_the_base_path() {
        let client = SmartTradeClient::new(credentials(), ClientSettings::default()).unwrap();
        let payload = limit_buy();
        let request = client.prepare(&payload, 1_700_000_000).unwrap();

        let expected = auth::signature_header(
            "test-secret",
            1_700_000_000,
            "POST",
            "/public/api/ver1/smart_trades/create_simple_buy",
            &payload.to_json().unwrap(),
        );
        assert_eq!(request.headers[SIGNATURE_HEADER], expected);
        assert_eq!(
            request.url,
            "https://api.3commas.io/public/api/ver1/smart_trades/create_simple_buy"
        );
        assert_eq!(request.headers[API_KEY_HEADER], "test-key-0001");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = SmartTradeClient::new(credentials(), settings("not a url"));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_, _))));
    }

    #[tokio::test]
    async fn dry_run_never_touches_the_network() {
        // Nothing listens on port 9; a transmission attempt would fail.
        let client = SmartTradeClient::new(credentials(), settings("http://127.0.0.1:9/public/api")).unwrap();
        let payload = limit_buy();

        let Dispatch::DryRun(description) = client.send(&payload, true).await.unwrap() else {
            panic!("expected a dry run");
        };
        assert_eq!(description.method, "POST");
        assert_eq!(description.body, payload.to_json().unwrap());
        assert_eq!(description.headers[SIGNATURE_HEADER], "<redacted>");
        assert!(!format!("{description:?}").contains("test-secret"));
    }

    #[tokio::test]
    async fn dry_run_body_matches_transmitted_body() {
        let (base_url, received) = serve_once("200 OK", r#"{"id":777,"pair":"BTC_USDT"}"#).await;
        let client = SmartTradeClient::new(credentials(), settings(&base_url)).unwrap();
        let payload = limit_buy();

        let Dispatch::DryRun(description) = client.send(&payload, true).await.unwrap() else {
            panic!("expected a dry run");
        };
        client.send(&payload, false).await.unwrap();

        let raw = received.await.unwrap();
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        assert_eq!(body, description.body);
        assert!(head.starts_with("POST /public/api/ver1/smart_trades/create_simple_buy HTTP/1.1"));
    }

    #[tokio::test]
    async fn successful_send_returns_the_parsed_trade() {
        let (base_url, received) = serve_once(
            "200 OK",
            r#"{"id":777,"pair":"BTC_USDT","status":{"type":"created"}}"#,
        )
        .await;
        let client = SmartTradeClient::new(credentials(), settings(&base_url)).unwrap();

        let Dispatch::Sent(response) = client.send(&limit_buy(), false).await.unwrap() else {
            panic!("expected a transmitted request");
        };
        assert_eq!(response.id, Some(777));
        assert_eq!(response.pair.as_deref(), Some("BTC_USDT"));
        assert!(response.extra.contains_key("status"));

        let raw = received.await.unwrap().to_lowercase();
        assert!(raw.contains("apikey: test-key-0001"));
        assert!(raw.contains("signature: "));
        assert!(raw.contains("content-type: application/json"));
    }

    #[tokio::test]
    async fn rejected_request_carries_the_upstream_error() {
        let (base_url, _received) = serve_once(
            "422 Unprocessable Entity",
            r#"{"error":"record_invalid","error_description":"Invalid parameters"}"#,
        )
        .await;
        let client = SmartTradeClient::new(credentials(), settings(&base_url)).unwrap();

        match client.send(&limit_buy(), false).await {
            Err(ApiError::Upstream { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "record_invalid: Invalid parameters");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_error_body_is_passed_through() {
        let (base_url, _received) = serve_once("500 Internal Server Error", "upstream exploded").await;
        let client = SmartTradeClient::new(credentials(), settings(&base_url)).unwrap();

        match client.send(&limit_buy(), false).await {
            Err(error @ ApiError::Upstream { .. }) => {
                assert!(!error.is_retryable());
                assert!(error.to_string().contains("upstream exploded"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SmartTradeClient::new(credentials(), settings(&format!("http://{addr}"))).unwrap();
        let error = client.send(&limit_buy(), false).await.unwrap_err();
        assert!(matches!(error, ApiError::Transport(_)), "{error:?}");
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = SmartTradeClient::new(
            credentials(),
            ClientSettings {
                base_url: format!("http://{addr}"),
                timeout: Duration::from_millis(200),
            },
        )
        .unwrap();

        let error = client.send(&limit_buy(), false).await.unwrap_err();
        assert!(matches!(error, ApiError::Timeout(t) if t == Duration::from_millis(200)), "{error:?}");
    }
}
