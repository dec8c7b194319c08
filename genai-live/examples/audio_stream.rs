//! Realtime audio streaming example.
//!
//! Reads a raw 16 kHz mono PCM file, streams it to the model in small chunks,
//! and writes the audio the model sends back to `reply.pcm`.
//!
//! Run with:
//! ```bash
//! GOOGLE_API_KEY=your-key cargo run --example audio_stream -- input.pcm
//! ```

use bytes::Bytes;
use futures::StreamExt;
use genai_live::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CHUNK_SIZE: usize = 3200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: audio_stream <file.pcm>"))?;
    let audio = Bytes::from(tokio::fs::read(&path).await?);

    // Pace the chunks roughly in real time (100 ms each).
    let chunks: Vec<Bytes> = (0..audio.len())
        .step_by(CHUNK_SIZE)
        .map(|start| audio.slice(start..(start + CHUNK_SIZE).min(audio.len())))
        .collect();
    let source = futures::stream::iter(chunks).then(|chunk| async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        chunk
    });

    let client = LiveClient::from_env()?.with_config(
        LiveConnectConfig::new()
            .response_modalities(vec![Modality::Audio])
            .voice("Puck"),
    );
    let mut replies = client
        .start_stream("gemini-2.0-flash-exp", source, "audio/pcm;rate=16000")
        .await?;

    let mut reply = Vec::new();
    while let Some(message) = replies.next().await {
        let message = message?;
        for data in message.data() {
            reply.extend_from_slice(&data);
        }
        if message.is_turn_complete() {
            println!("Turn complete ({} bytes of audio so far)", reply.len());
        }
    }

    let mut session = replies.finish().await?;
    session.close().await?;

    tokio::fs::write("reply.pcm", &reply).await?;
    println!("Wrote {} bytes to reply.pcm", reply.len());
    Ok(())
}
