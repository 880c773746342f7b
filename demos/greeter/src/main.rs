//! Greeter Demo
//!
//! The classic Weft assembly: one file pipeline and two HTTP reply
//! pipelines, wired entirely by explicit construction.
//!
//! # Pipelines
//!
//! ```text
//! data/*.txt ──poll──▶ [file-input] ──▶ log_file
//!
//! GET /greet?name=X ──▶ [greet] ──▶ greet_handler ──▶ reply sink
//!
//! GET /greet2?name=X ──▶ [greet2-first] ──▶ prepare_greeting
//!                              │  (headers carried forward)
//!                              ▼
//!                        [greet2-second] ──▶ send_reply ──▶ reply sink
//! ```
//!
//! The `/greet2` chain is the interesting one: the first handler computes
//! the greeting and forwards a new message built with `Message::map`, so the
//! reply sink in the headers survives the hop and the second handler can
//! answer the original caller.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package greeter
//! curl 'http://127.0.0.1:8080/greet?name=Ann'
//! curl 'http://127.0.0.1:8080/greet2?name=Ben'
//! ```
//!
//! Configuration comes from `weft.toml` in the working directory (watched
//! directories, poll period, bind address, reply timeout) with `WEFT_*`
//! environment overrides.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use weft::prelude::*;

// ============================================================================
// Business Logic
// ============================================================================

/// The greeting "service" the pipelines call into. Opaque to the core.
fn say_hi(name: Option<&str>) -> String {
    format!("Hi, {}!", name.unwrap_or("stranger"))
}

// ============================================================================
// Handler Functions
// ============================================================================

/// File pipeline: log every newly polled file. Deduplication upstream means
/// a file is only ever seen here once.
async fn log_file(message: Message<FileEntry>) -> HandlerResult<FileEntry> {
    info!(file = %message.payload().file_name(), "processing polled file");
    Ok(None)
}

/// Single-hop pipeline: compute the greeting and answer the caller directly.
async fn greet_handler(message: Message<Params>) -> HandlerResult<Params> {
    let greeting = say_hi(message.payload().first("name"));
    if let Some(sink) = message.reply_sink() {
        if let Err(e) = sink.send(greeting) {
            warn!(error = %e, "greeting reply not delivered");
        }
    }
    Ok(None)
}

/// First hop of the chained pipeline: compute the greeting, stash it in the
/// params, and forward, carrying the headers so the reply sink survives.
async fn prepare_greeting(message: Message<Params>) -> HandlerResult<Params> {
    let greeting = say_hi(message.payload().first("name"));
    info!(greeting = %greeting, "computed greeting, forwarding downstream");

    Ok(Some(message.map(move |mut params| {
        params.set("name", greeting);
        params
    })))
}

/// Second hop of the chained pipeline: answer with the carried value.
async fn send_reply(message: Message<Params>) -> HandlerResult<Params> {
    let body = message.payload().first("name").unwrap_or_default().to_string();
    if let Some(sink) = message.reply_sink() {
        if let Err(e) = sink.send(body) {
            warn!(error = %e, "chained reply not delivered");
        }
    }
    Ok(None)
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigLoader::new().load()?;
    let mut runtime = WeftRuntime::from_config(config);

    // ========================================================================
    // File pipeline
    // ========================================================================

    let file_channel = Channel::new("file-input");
    file_channel.bind(handler_fn(log_file));
    // To also collect every polled file into one output file:
    // file_channel.bind(FileWriter::new("out/combined.txt"));

    let source_configs = runtime.config().sources.clone();
    for source_config in source_configs {
        let source = FileSource::builder()
            .directory(source_config.directory.clone())
            .pattern(source_config.pattern.clone())
            .period(source_config.poll_period())
            .output(Arc::clone(&file_channel))
            .build()?;
        runtime.add_source(source);
    }

    // ========================================================================
    // HTTP pipelines
    // ========================================================================

    // Single-hop: gateway -> greet -> reply.
    let greet_channel = Channel::new("greet");
    greet_channel.bind(handler_fn(greet_handler));

    // Chained: gateway -> greet2-first -> greet2-second -> reply.
    let chain_entry = Channel::new("greet2-first");
    let chain_reply = Channel::new("greet2-second");
    chain_entry.bind_forwarding(handler_fn(prepare_greeting), Arc::clone(&chain_reply));
    chain_reply.bind(handler_fn(send_reply));

    let http = runtime.config().http.clone();
    let gateway = HttpGateway::builder()
        .bind_addr(http.bind_addr.clone())
        .reply_timeout(http.reply_timeout())
        .get("/greet", greet_channel)
        .get("/greet2", chain_entry)
        .build()?;
    runtime.set_gateway(gateway);

    runtime.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_say_hi() {
        assert_eq!(say_hi(Some("Ann")), "Hi, Ann!");
        assert_eq!(say_hi(None), "Hi, stranger!");
    }
}
