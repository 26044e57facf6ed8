//! Temp Mail async client implementation.

use crate::error::{ApiErrorKind, Error};
use crate::models::{
    CreateEmailOptions, Domain, Email, ListMessagesOptions, Message, RateLimit,
};
use crate::Result;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

const BASE_URL: &str = "https://api.temp-mail.io";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const API_KEY_HEADER: &str = "X-API-Key";

const RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
const RATE_LIMIT_USED: &str = "X-RateLimit-Used";
const RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";

/// Largest `limit` the server accepts when listing messages.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Async client for the Temp Mail temporary email API.
///
/// Use [`Client::new`] for defaults or [`Client::builder`] for custom settings
/// like a different base URL, timeout, proxy, or user agent.
///
/// Every method is a single stateless HTTP call; the only state the client
/// retains is the most recently observed rate limit, exposed through
/// [`Client::last_rate_limit`].
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    last_rate_limit: Mutex<Option<RateLimit>>,
}

#[derive(Deserialize)]
struct DomainsResponse {
    domains: Vec<Domain>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<Message>,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Create a new client with default settings.
    ///
    /// # Examples
    /// ```no_run
    /// # use temp_mail_client::Client;
    /// # fn main() -> Result<(), temp_mail_client::Error> {
    /// let client = Client::new("my-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Create a new temporary email address.
    ///
    /// Pass [`CreateEmailOptions::default`] to let the server pick a random
    /// address. Conflicting option combinations (see [`CreateEmailOptions`])
    /// fail with [`Error::Validation`] before any request is sent.
    ///
    /// # Examples
    /// ```no_run
    /// # use temp_mail_client::{Client, CreateEmailOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), temp_mail_client::Error> {
    /// let client = Client::new("my-api-key")?;
    /// let email = client.create_email(CreateEmailOptions::default()).await?;
    /// println!("{}", email.email);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_email(&self, options: CreateEmailOptions) -> Result<Email> {
        validate_create_options(&options)?;

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(domain) = &options.domain {
            query.push(("domain", domain.clone()));
        }
        if let Some(prefix) = &options.prefix {
            query.push(("prefix", prefix.clone()));
        }
        if let Some(domain_type) = options.domain_type {
            query.push(("domain_type", domain_type.as_str().to_string()));
        }

        let response = self.request(Method::POST, "/v1/emails", &query).await?;
        json_body(response).await
    }

    /// List the domains available for new addresses, in server order.
    pub async fn list_domains(&self) -> Result<Vec<Domain>> {
        let response = self.request(Method::GET, "/v1/domains", &[]).await?;
        let body: DomainsResponse = json_body(response).await?;
        Ok(body.domains)
    }

    /// List messages received at an address, newest first.
    ///
    /// `options.limit` must be between 1 and [`MAX_PAGE_LIMIT`];
    /// `options.offset` is an opaque cursor from a previous page. Out-of-range
    /// limits and malformed addresses fail with [`Error::Validation`] before
    /// any request is sent.
    ///
    /// # Examples
    /// ```no_run
    /// # use temp_mail_client::{Client, ListMessagesOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), temp_mail_client::Error> {
    /// let client = Client::new("my-api-key")?;
    /// let messages = client
    ///     .list_email_messages("inbox@example.com", ListMessagesOptions::default())
    ///     .await?;
    /// for msg in messages {
    ///     println!("{}: {}", msg.from_addr, msg.subject);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_email_messages(
        &self,
        address: &str,
        options: ListMessagesOptions,
    ) -> Result<Vec<Message>> {
        validate_address(address)?;
        validate_list_options(&options)?;

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = options.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = &options.offset {
            query.push(("offset", offset.clone()));
        }

        let path = format!("/v1/emails/{address}/messages");
        let response = self.request(Method::GET, &path, &query).await?;
        let body: MessagesResponse = json_body(response).await?;
        Ok(body.messages)
    }

    /// Fetch a single message by id.
    ///
    /// Returns [`Error::Api`] with [`ApiErrorKind::NotFound`] when no such
    /// message exists.
    pub async fn get_message(&self, message_id: &str) -> Result<Message> {
        let path = format!("/v1/messages/{message_id}");
        let response = self.request(Method::GET, &path, &[]).await?;
        json_body(response).await
    }

    /// Fetch the raw source of a message (headers and body as delivered).
    pub async fn get_message_source_code(&self, message_id: &str) -> Result<String> {
        let path = format!("/v1/messages/{message_id}/source_code");
        let response = self.request(Method::GET, &path, &[]).await?;
        Ok(response.text().await?)
    }

    /// Download the binary content of an attachment.
    pub async fn download_attachment(&self, attachment_id: &str) -> Result<Vec<u8>> {
        let path = format!("/v1/attachments/{attachment_id}");
        let response = self.request(Method::GET, &path, &[]).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Delete a message.
    ///
    /// Deleting an already-deleted message surfaces the server's NotFound
    /// error; callers treating deletion as idempotent can ignore it via
    /// [`Error::is_not_found`].
    pub async fn delete_message(&self, message_id: &str) -> Result<()> {
        let path = format!("/v1/messages/{message_id}");
        self.request(Method::DELETE, &path, &[]).await?;
        Ok(())
    }

    /// Delete a temporary email address and all of its messages.
    pub async fn delete_email(&self, address: &str) -> Result<()> {
        validate_address(address)?;
        let path = format!("/v1/emails/{address}");
        self.request(Method::DELETE, &path, &[]).await?;
        Ok(())
    }

    /// Fetch the current rate-limit status for this API key.
    pub async fn get_rate_limit(&self) -> Result<RateLimit> {
        let response = self.request(Method::GET, "/v1/rate-limit", &[]).await?;
        json_body(response).await
    }

    /// The most recently observed rate limit, if any call has returned one.
    ///
    /// Updated from response headers on every call, last write wins. Under
    /// concurrent callers this is a convenience snapshot, not a source of
    /// truth; use [`Client::get_rate_limit`] for an authoritative read.
    pub fn last_rate_limit(&self) -> Option<RateLimit> {
        *self.last_rate_limit.lock().unwrap()
    }

    /// Common request pattern: send, record rate-limit headers, map the
    /// status to a typed error on failure.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;

        let rate_limit = rate_limit_from_headers(response.headers());
        if rate_limit.is_some() {
            *self.last_rate_limit.lock().unwrap() = rate_limit;
        }

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let reset = header_u64(response.headers(), RATE_LIMIT_RESET);
        let body = response.text().await.unwrap_or_default();
        Err(error_from_status(status, &body, reset))
    }
}

/// Decode a success body into `T`, reporting schema mismatches as
/// [`Error::Decode`] rather than an API error.
async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Map a non-success status to the matching error variant.
fn error_from_status(status: StatusCode, body: &str, reset: Option<u64>) -> Error {
    let detail: Option<serde_json::Value> = serde_json::from_str(body).ok();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Authentication(extract_error_message(detail.as_ref(), "invalid API key"))
        }
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimit {
            message: extract_error_message(detail.as_ref(), "rate limit exceeded"),
            reset,
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::Validation {
            message: extract_error_message(detail.as_ref(), "invalid request parameters"),
            detail,
        },
        StatusCode::NOT_FOUND => Error::Api {
            kind: ApiErrorKind::NotFound,
            status: status.as_u16(),
            message: extract_error_message(detail.as_ref(), "resource not found"),
            detail,
        },
        s if s.is_server_error() => Error::Api {
            kind: ApiErrorKind::Server,
            status: s.as_u16(),
            message: extract_error_message(
                detail.as_ref(),
                &format!("server error with status {s}"),
            ),
            detail,
        },
        s => Error::Api {
            kind: ApiErrorKind::Other,
            status: s.as_u16(),
            message: extract_error_message(
                detail.as_ref(),
                &format!("API request failed with status {s}"),
            ),
            detail,
        },
    }
}

/// Pull a human-readable message out of an error body.
///
/// Tries the current format `{"error": {"detail": ..}}` (or `"message"`), then
/// the legacy top-level `{"message": ..}`, then falls back to the default.
fn extract_error_message(detail: Option<&serde_json::Value>, default: &str) -> String {
    let Some(value) = detail else {
        return default.to_string();
    };

    if let Some(error) = value.get("error") {
        for key in ["detail", "message"] {
            if let Some(text) = error.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    value
        .get("message")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Parse the rate-limit headers the server attaches to every response.
///
/// Returns `None` when the limit header is absent, so a proxy or error page
/// without the headers never clobbers the last known value.
fn rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimit> {
    let limit = header_u64(headers, RATE_LIMIT_LIMIT)?;
    Some(RateLimit {
        limit,
        remaining: header_u64(headers, RATE_LIMIT_REMAINING).unwrap_or(0),
        used: header_u64(headers, RATE_LIMIT_USED).unwrap_or(0),
        reset: header_u64(headers, RATE_LIMIT_RESET).unwrap_or(0),
    })
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

fn address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$").unwrap())
}

fn validation_error(message: impl Into<String>) -> Error {
    Error::Validation {
        message: message.into(),
        detail: None,
    }
}

fn validate_address(address: &str) -> Result<()> {
    if !address_regex().is_match(address) {
        return Err(validation_error(format!(
            "'{address}' is not a valid email address"
        )));
    }
    Ok(())
}

fn validate_create_options(options: &CreateEmailOptions) -> Result<()> {
    if options.domain_type.is_some() && (options.domain.is_some() || options.prefix.is_some()) {
        return Err(validation_error(
            "domain_type cannot be combined with domain or prefix",
        ));
    }
    if let Some(domain) = &options.domain {
        if domain.is_empty() {
            return Err(validation_error("domain cannot be empty"));
        }
    }
    if let Some(prefix) = &options.prefix {
        if !prefix_regex().is_match(prefix) {
            return Err(validation_error(format!(
                "'{prefix}' is not a valid address prefix"
            )));
        }
    }
    Ok(())
}

fn validate_list_options(options: &ListMessagesOptions) -> Result<()> {
    if let Some(limit) = options.limit {
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(validation_error(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
            )));
        }
    }
    Ok(())
}

/// Builder for configuring a Temp Mail client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    proxy: Option<String>,
    user_agent: String,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Production base URL (`https://api.temp-mail.io`)
    /// - 30 second request timeout
    /// - No proxy
    /// - `temp-mail-client/<version>` user agent
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
            user_agent: format!("temp-mail-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Override the API base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout (default: 30 seconds).
    ///
    /// Covers the whole request, from connection to the last body byte.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a proxy URL (e.g., "http://127.0.0.1:8080").
    ///
    /// This uses reqwest's proxy support for all requests.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client.
    ///
    /// Fails with [`Error::Validation`] when the API key is empty or not a
    /// valid header value; no network request is made.
    ///
    /// # Examples
    /// ```no_run
    /// # use temp_mail_client::Client;
    /// # use std::time::Duration;
    /// # fn main() -> Result<(), temp_mail_client::Error> {
    /// let client = Client::builder("my-api-key")
    ///     .timeout(Duration::from_secs(10))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(validation_error("API key is required"));
        }

        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(&self.api_key)
            .map_err(|_| validation_error("API key is not a valid header value"))?;
        headers.insert(API_KEY_HEADER, key_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Client {
            http: builder.build()?,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            last_rate_limit: Mutex::new(None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DomainType;
    use serde_json::json;

    #[test]
    fn create_options_single_field_accepted() {
        assert!(validate_create_options(&CreateEmailOptions::default()).is_ok());
        assert!(validate_create_options(&CreateEmailOptions::with_domain("example.com")).is_ok());
        assert!(
            validate_create_options(&CreateEmailOptions::with_domain_type(DomainType::Premium))
                .is_ok()
        );
        assert!(validate_create_options(&CreateEmailOptions {
            prefix: Some("mytest".to_string()),
            ..Default::default()
        })
        .is_ok());
    }

    #[test]
    fn create_options_domain_with_prefix_accepted() {
        let options = CreateEmailOptions {
            domain: Some("example.com".to_string()),
            prefix: Some("mytest".to_string()),
            domain_type: None,
        };
        assert!(validate_create_options(&options).is_ok());
    }

    #[test]
    fn create_options_domain_type_conflicts() {
        let with_domain = CreateEmailOptions {
            domain: Some("example.com".to_string()),
            domain_type: Some(DomainType::Public),
            ..Default::default()
        };
        let with_prefix = CreateEmailOptions {
            prefix: Some("mytest".to_string()),
            domain_type: Some(DomainType::Public),
            ..Default::default()
        };
        assert!(matches!(
            validate_create_options(&with_domain),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            validate_create_options(&with_prefix),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn create_options_rejects_bad_prefix() {
        let options = CreateEmailOptions {
            prefix: Some("bad prefix@".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_create_options(&options),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn list_options_limit_bounds() {
        for limit in [1, 50, MAX_PAGE_LIMIT] {
            let options = ListMessagesOptions {
                limit: Some(limit),
                ..Default::default()
            };
            assert!(validate_list_options(&options).is_ok());
        }
        for limit in [0, MAX_PAGE_LIMIT + 1, u32::MAX] {
            let options = ListMessagesOptions {
                limit: Some(limit),
                ..Default::default()
            };
            assert!(matches!(
                validate_list_options(&options),
                Err(Error::Validation { .. })
            ));
        }
    }

    #[test]
    fn address_validation() {
        assert!(validate_address("user@example.com").is_ok());
        assert!(validate_address("u.ser+tag@mail.example.org").is_ok());
        for bad in ["", "no-at-sign", "@example.com", "user@", "a b@x.com", "user@nodot"] {
            assert!(validate_address(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn error_message_extraction_formats() {
        let current = json!({"error": {"detail": "domain is taken"}});
        assert_eq!(
            extract_error_message(Some(&current), "fallback"),
            "domain is taken"
        );

        let alt = json!({"error": {"message": "bad key"}});
        assert_eq!(extract_error_message(Some(&alt), "fallback"), "bad key");

        let legacy = json!({"message": "too many requests"});
        assert_eq!(
            extract_error_message(Some(&legacy), "fallback"),
            "too many requests"
        );

        let unknown = json!({"code": 17});
        assert_eq!(extract_error_message(Some(&unknown), "fallback"), "fallback");
        assert_eq!(extract_error_message(None, "fallback"), "fallback");
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            error_from_status(StatusCode::UNAUTHORIZED, "", None),
            Error::Authentication(_)
        ));
        assert!(matches!(
            error_from_status(StatusCode::FORBIDDEN, "", None),
            Error::Authentication(_)
        ));
        assert!(matches!(
            error_from_status(StatusCode::TOO_MANY_REQUESTS, "", Some(99)),
            Error::RateLimit {
                reset: Some(99),
                ..
            }
        ));
        assert!(matches!(
            error_from_status(StatusCode::BAD_REQUEST, "", None),
            Error::Validation { .. }
        ));
        assert!(matches!(
            error_from_status(StatusCode::UNPROCESSABLE_ENTITY, "", None),
            Error::Validation { .. }
        ));
        assert!(error_from_status(StatusCode::NOT_FOUND, "", None).is_not_found());
        assert!(matches!(
            error_from_status(StatusCode::BAD_GATEWAY, "", None),
            Error::Api {
                kind: ApiErrorKind::Server,
                status: 502,
                ..
            }
        ));
        assert!(matches!(
            error_from_status(StatusCode::IM_A_TEAPOT, "", None),
            Error::Api {
                kind: ApiErrorKind::Other,
                status: 418,
                ..
            }
        ));
    }

    #[test]
    fn status_mapping_reads_error_body() {
        let body = r#"{"error": {"detail": "message not found"}}"#;
        match error_from_status(StatusCode::NOT_FOUND, body, None) {
            Error::Api { message, .. } => assert_eq!(message, "message not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rate_limit_headers_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from_static("100"));
        headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from_static("42"));
        headers.insert(RATE_LIMIT_USED, HeaderValue::from_static("58"));
        headers.insert(RATE_LIMIT_RESET, HeaderValue::from_static("2073044847"));

        assert_eq!(
            rate_limit_from_headers(&headers),
            Some(RateLimit {
                limit: 100,
                remaining: 42,
                used: 58,
                reset: 2073044847,
            })
        );
    }

    #[test]
    fn rate_limit_headers_absent() {
        assert_eq!(rate_limit_from_headers(&HeaderMap::new()), None);

        // Reset alone is not enough; the limit header gates the parse.
        let mut headers = HeaderMap::new();
        headers.insert(RATE_LIMIT_RESET, HeaderValue::from_static("123"));
        assert_eq!(rate_limit_from_headers(&headers), None);
    }

    #[test]
    fn builder_rejects_empty_api_key() {
        assert!(matches!(
            Client::builder("").build(),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn builder_trims_trailing_slash() {
        let client = Client::builder("key")
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
