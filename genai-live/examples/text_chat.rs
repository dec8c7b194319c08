//! Text conversation example.
//!
//! Sends a few prompts over one live session and prints each reply as it
//! streams in.
//!
//! Run with:
//! ```bash
//! GOOGLE_API_KEY=your-key cargo run --example text_chat
//! ```
//!
//! Set `GOOGLE_GENAI_USE_VERTEXAI=true`, `GOOGLE_CLOUD_PROJECT` and
//! `GOOGLE_OAUTH_ACCESS_TOKEN` to talk to Vertex AI instead.

use futures::StreamExt;
use genai_live::prelude::*;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = LiveConnectConfig::new()
        .response_modalities(vec![Modality::Text])
        .system_instruction("You are a concise assistant.");
    let client = LiveClient::from_env()?.with_config(config);

    println!("Connecting with {} ...", client.provider().name());
    let mut session = client.connect("gemini-2.0-flash-exp").await?;

    for prompt in [
        "Hello! Who are you?",
        "Name three rivers in Europe.",
        "Which one is the longest?",
    ] {
        println!("\n> {}", prompt);
        session.send(prompt, true).await?;

        let mut turn = session.receive();
        while let Some(message) = turn.next().await {
            if let Some(text) = message?.text() {
                print!("{}", text);
                io::stdout().flush()?;
            }
        }
        println!();
    }

    session.close().await?;
    Ok(())
}
