//! Basic usage: create an inbox, poll it for messages, clean up.
//!
//! Run with `TEMPMAIL_API_KEY=... cargo run --example basic_usage`.

use std::time::Duration;
use temp_mail_client::{Client, CreateEmailOptions, ListMessagesOptions};

#[tokio::main]
async fn main() -> Result<(), temp_mail_client::Error> {
    let api_key = match std::env::var("TEMPMAIL_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("Please set the TEMPMAIL_API_KEY environment variable");
            return Ok(());
        }
    };

    let client = Client::new(api_key)?;

    let domains = client.list_domains().await?;
    println!("Available domains:");
    for domain in domains.iter().take(5) {
        println!("  {} ({})", domain.name, domain.kind.as_str());
    }

    // Let the server pick a random address.
    let email = client.create_email(CreateEmailOptions::default()).await?;
    println!("\nCreated email: {} (ttl {}s)", email.email, email.ttl);

    // Or request one under a specific domain.
    if let Some(domain) = domains.first() {
        let options = CreateEmailOptions {
            domain: Some(domain.name.clone()),
            prefix: Some("mytest".to_string()),
            ..Default::default()
        };
        let custom = client.create_email(options).await?;
        println!("Created custom email: {}", custom.email);
        client.delete_email(&custom.email).await?;
    }

    println!("\nYou can now send test emails to: {}", email.email);
    println!("Waiting 10 seconds to check for new messages...");
    tokio::time::sleep(Duration::from_secs(10)).await;

    let messages = client
        .list_email_messages(&email.email, ListMessagesOptions::default())
        .await?;
    println!("Messages in inbox: {}", messages.len());
    for msg in &messages {
        println!("  {}: {}", msg.from_addr, msg.subject);
    }

    if let Some(rate_limit) = client.last_rate_limit() {
        println!(
            "\nRate limit: {}/{} used, resets at {}",
            rate_limit.used, rate_limit.limit, rate_limit.reset
        );
    }

    client.delete_email(&email.email).await?;
    println!("Deleted {}", email.email);
    Ok(())
}
