//! Example bot that answers `/hello` and logs group nudges.
//!
//! Run with: `cargo run --example echo_bot`
//!
//! Configure the endpoint with `MILKY_HOST`, `MILKY_PORT` (or
//! `MILKY_API_PORT` / `MILKY_EVENT_PORT`) and `MILKY_TOKEN`.

use chrono::DateTime;
use milky::prelude::*;
use serde_json::Value;

const GREETING: &str = "Hello! I am a Milky bot.";

fn format_time(time: Option<i64>) -> String {
    time.and_then(|t| DateTime::from_timestamp(t, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

async fn handle_message(client: MilkyClient, event: Event) -> anyhow::Result<()> {
    let content = extract_text(&event.segments()?);
    let peer_id = event.data["peer_id"].as_i64().unwrap_or_default();
    let scene = event.data["message_scene"].as_str().unwrap_or_default();
    let message_seq = event.data["message_seq"].as_i64().unwrap_or_default();

    tracing::info!(
        self_id = ?event.self_id,
        time = %format_time(event.time),
        scene,
        peer_id,
        %content,
        "message received"
    );

    if !content.contains("/hello") {
        return Ok(());
    }

    let reply = vec![Segment::reply(message_seq), Segment::text(GREETING)];
    let sent: Value = match scene {
        "group" => client.send_group_message(peer_id, reply).await?,
        "friend" => client.send_private_message(peer_id, reply).await?,
        _ => return Ok(()),
    };
    tracing::info!(message_seq = %sent["message_seq"], "reply sent");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = ClientBuilder::from_env()?.build()?;
    println!("Connecting to {}", client.event_url());

    client.subscribe("message_receive", |client, event| async move {
        if let Err(e) = handle_message(client, event).await {
            tracing::warn!(error = %e, "failed to handle message");
        }
    });

    client.subscribe("group_nudge", |_client, event| async move {
        tracing::info!(
            time = %format_time(event.time),
            group_id = %event.data["group_id"],
            sender_id = %event.data["sender_id"],
            receiver_id = %event.data["receiver_id"],
            "group nudge"
        );
    });

    let stopper = client.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("Shutting down...");
            stopper.shutdown();
        }
    });

    client.run().await?;
    println!("Bot stopped");
    Ok(())
}
