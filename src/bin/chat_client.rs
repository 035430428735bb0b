//! Terminal chat client for the relay.
//!
//! Reads prompts from stdin and prints the transcript as replies arrive.
//! `/reconnect` opens a fresh connection; `/quit` or EOF exits.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_relay::client::{ChatSession, ClientError, SessionUpdate};
use chat_relay::domain::chat::{Message, Origin};

const DEFAULT_URL: &str = "ws://localhost:3000/ws";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they don't interleave with the transcript.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let url = std::env::var("CHAT_RELAY_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let mut session = ChatSession::connect(url).await?;
    println!("[{}] {}", session.status(), session.url());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut receiving = true;

    loop {
        tokio::select! {
            // Drain replies that already arrived before taking more input.
            biased;

            update = session.next_event(), if receiving => match update {
                Some(update) => print_update(&update),
                None => receiving = false,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "/quit" => break,
                    "/reconnect" => match session.reconnect().await {
                        Ok(()) => {
                            receiving = true;
                            println!("[{}]", session.status());
                        }
                        Err(e) => eprintln!("reconnect failed: {}", e),
                    },
                    _ => {
                        for update in session.drain_arrived() {
                            print_update(&update);
                        }
                        match session.send(&line).await {
                            Ok(true) => {
                                if let Some(message) = session.transcript().last() {
                                    print_message(message);
                                }
                            }
                            Ok(false) => {}
                            Err(ClientError::NotConnected) => {
                                eprintln!("not connected, type /reconnect");
                            }
                            Err(e) => eprintln!("send failed: {}", e),
                        }
                    }
                }
            }
        }
        std::io::stdout().flush()?;
    }

    session.close().await.ok();
    Ok(())
}

fn print_update(update: &SessionUpdate) {
    match update {
        SessionUpdate::Appended(message) => print_message(message),
        SessionUpdate::StatusChanged(status) => println!("[{}]", status),
    }
}

fn print_message(message: &Message) {
    let prefix = match message.origin() {
        Origin::User => "you>",
        Origin::Ai => "ai>",
        Origin::System => "system>",
    };
    println!("{} {} {}", message.at().clock_time(), prefix, message.text());
}
