//! Data models returned by and sent to the Temp Mail API.

use serde::{Deserialize, Serialize};

/// A temporary email address allocated by the service.
///
/// Addresses expire server-side once their [`ttl`](Email::ttl) elapses; the
/// client performs no local expiry tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// The full email address.
    pub email: String,
    /// Seconds until the address expires server-side.
    pub ttl: u64,
    /// Creation timestamp as reported by the server, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A message received at a temporary address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned message identifier.
    pub id: String,
    /// Sender address.
    #[serde(rename = "from")]
    pub from_addr: String,
    /// Recipient address.
    #[serde(rename = "to")]
    pub to_addr: String,
    /// Carbon-copy recipients, empty when the server omits them.
    #[serde(default)]
    pub cc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plaintext body.
    pub body_text: String,
    /// HTML body, when the message carries one.
    #[serde(default)]
    pub body_html: Option<String>,
    /// Received timestamp as reported by the server.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Attachment metadata; content is fetched separately.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Attachment metadata carried inside a [`Message`].
///
/// Binary content is downloaded on demand with
/// [`Client::download_attachment`](crate::Client::download_attachment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Server-assigned attachment identifier.
    pub id: String,
    /// Original filename.
    pub name: String,
    /// MIME type, when the server reports one.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// A domain available for temporary addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain name, e.g. `example.com`.
    pub name: String,
    /// Server-side domain classification.
    #[serde(rename = "type")]
    pub kind: DomainType,
}

/// Server-side classification of a [`Domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainType {
    /// Free domain available to every API key.
    Public,
    /// Customer-registered domain.
    Custom,
    /// Paid domain tier.
    Premium,
}

impl DomainType {
    /// Wire representation of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainType::Public => "public",
            DomainType::Custom => "custom",
            DomainType::Premium => "premium",
        }
    }
}

/// Rate-limit quota as reported by the server.
///
/// Delivered via `X-RateLimit-*` response headers on every call and as the
/// body of the rate-limit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    /// Total requests allowed in the current window.
    pub limit: u64,
    /// Requests remaining in the current window.
    pub remaining: u64,
    /// Requests consumed in the current window.
    #[serde(default)]
    pub used: u64,
    /// Unix timestamp (seconds) at which the window resets.
    pub reset: u64,
}

/// Options for [`Client::create_email`](crate::Client::create_email).
///
/// All fields default to unset, letting the server pick a random address.
/// `domain_type` conflicts with `domain` and with `prefix`: a concrete domain
/// already determines its type, and a prefix needs a concrete domain to attach
/// to. Conflicting combinations fail validation before any request is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateEmailOptions {
    /// Domain to allocate the address under.
    pub domain: Option<String>,
    /// Local part (before the `@`) to request.
    pub prefix: Option<String>,
    /// Ask the server to pick any domain of this type.
    pub domain_type: Option<DomainType>,
}

impl CreateEmailOptions {
    /// Options requesting an address under a specific domain.
    pub fn with_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            ..Self::default()
        }
    }

    /// Options requesting an address under any domain of the given type.
    pub fn with_domain_type(domain_type: DomainType) -> Self {
        Self {
            domain_type: Some(domain_type),
            ..Self::default()
        }
    }
}

/// Pagination options for
/// [`Client::list_email_messages`](crate::Client::list_email_messages).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMessagesOptions {
    /// Maximum number of messages to return; must be between 1 and
    /// [`MAX_PAGE_LIMIT`](crate::MAX_PAGE_LIMIT).
    pub limit: Option<u32>,
    /// Opaque server-defined cursor returned by a previous page.
    pub offset: Option<String>,
}
