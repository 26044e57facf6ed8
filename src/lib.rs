//! # Temp Mail Client
//! Asynchronous client for the Temp Mail temporary email REST API, providing typed methods to create inboxes, poll messages, download attachments, and track rate limits from Rust using [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust developers who need throwaway addresses in integration tests, demos, or automation scripts without running mail infrastructure: configure with an API key, obtain an address ([`Email`]), poll for messages ([`Message`]), then delete the inbox when done.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`, so ensure the chosen Tokio features (`rt-multi-thread` or `current_thread`) are available in your application.
//!
//! ## Out of scope
//! Not a general-purpose mail client or SMTP sender. It only wraps the Temp Mail service and inherits its availability, retention, and quota limits. No retries are performed; every failure surfaces immediately as a typed [`Error`].
//!
//! ## Errors
//! Non-success API statuses become one of the closed [`Error`] variants ([`Error::Authentication`], [`Error::RateLimit`], [`Error::Validation`], [`Error::Api`]); transport failures surface as [`Error::Transport`] and malformed success bodies as [`Error::Decode`]. Client-side parameter validation fails before any request is sent. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use temp_mail_client::{Client, CreateEmailOptions, ListMessagesOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), temp_mail_client::Error> {
//!     let client = Client::new("my-api-key")?;
//!     let email = client.create_email(CreateEmailOptions::default()).await?;
//!     println!("Created: {}", email.email);
//!
//!     let messages = client
//!         .list_email_messages(&email.email, ListMessagesOptions::default())
//!         .await?;
//!     for msg in messages {
//!         println!("From: {}, Subject: {}", msg.from_addr, msg.subject);
//!     }
//!
//!     client.delete_email(&email.email).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;

pub use client::{Client, ClientBuilder, MAX_PAGE_LIMIT};
pub use error::{ApiErrorKind, Error};
pub use models::{
    Attachment, CreateEmailOptions, Domain, DomainType, Email, ListMessagesOptions, Message,
    RateLimit,
};

/// Result type alias for Temp Mail operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
