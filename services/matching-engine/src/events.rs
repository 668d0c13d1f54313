//! Execution and ticker event stream
//!
//! Events go to a dedicated sink, distinct from the command-reply
//! channel. Each message is a routing header line, a JSON body and an
//! `END` frame line, flushed as a unit so a consumer can stream-parse the
//! feed. A failing sink is logged and otherwise ignored: the engine keeps
//! its one-reply-per-command cadence even if the feed consumer goes away.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use types::ids::OrderId;
use types::order::OrderMessage;
use types::quote::QuoteMessage;

/// Body of a ticker event: the full quote after a book change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerMessage {
    pub ok: bool,
    pub quote: QuoteMessage,
}

/// Body of an execution event: one participant's view of a cross. Each
/// cross produces two of these, standing participant first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMessage {
    pub ok: bool,
    pub account: String,
    pub venue: String,
    pub symbol: String,
    pub order: OrderMessage,
    pub standing_id: OrderId,
    pub incoming_id: OrderId,
    pub price: i32,
    pub filled: i32,
    pub filled_at: String,
    pub standing_complete: bool,
    pub incoming_complete: bool,
}

/// Append-only publisher for the event feed.
pub struct EventEmitter {
    sink: Box<dyn Write>,
}

impl EventEmitter {
    pub fn new(sink: Box<dyn Write>) -> Self {
        Self { sink }
    }

    /// Publish a ticker event.
    pub fn ticker(&mut self, venue: &str, symbol: &str, quote: &QuoteMessage) {
        let body = TickerMessage {
            ok: true,
            quote: quote.clone(),
        };
        self.publish(&format!("TICKER NONE {} {}", venue, symbol), &body);
    }

    /// Publish one participant's execution event.
    pub fn execution(&mut self, msg: &ExecutionMessage) {
        self.publish(
            &format!("EXECUTION {} {} {}", msg.account, msg.venue, msg.symbol),
            msg,
        );
    }

    fn publish<T: Serialize>(&mut self, header: &str, body: &T) {
        let json = match serde_json::to_string_pretty(body) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(%err, "event serialization failed");
                return;
            }
        };
        if let Err(err) = self.write_frame(header, &json) {
            tracing::warn!(%err, "event sink write failed");
        }
    }

    fn write_frame(&mut self, header: &str, body: &str) -> io::Result<()> {
        writeln!(self.sink, "{}", header)?;
        self.sink.write_all(body.as_bytes())?;
        self.sink.write_all(b"\nEND\n")?;
        self.sink.flush()
    }
}
