//! Command dispatcher
//!
//! Reads newline-terminated commands from the request channel, tokenizes
//! on whitespace, and writes exactly one reply per command on the reply
//! channel. Replies are framed by a line containing `END` and a flush;
//! the binary order book is the only unframed reply. Commands are
//! processed to completion in arrival order — the engine never suspends
//! mid-command.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use matching_engine::{Engine, OrderRequest};
use serde::Serialize;
use types::ids::OrderId;
use types::order::OrderMessage;

use crate::{scores, wire};

#[derive(Serialize)]
struct ErrorReply {
    ok: bool,
    error: String,
}

#[derive(Serialize)]
struct AccountOrdersReply<'a> {
    ok: bool,
    venue: &'a str,
    orders: Vec<OrderMessage>,
}

/// Run the dispatcher until the input channel closes. EOF is fatal: the
/// front-end owns this channel and never closes it while the venue is
/// meant to be live.
pub fn serve<R: BufRead, W: Write>(engine: &mut Engine, mut input: R, mut output: W) -> Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            reply(
                &mut output,
                &error_json("Unexpected EOF on stdin. Quitting."),
            )?;
            bail!("unexpected EOF on command input");
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.first().copied().unwrap_or("") {
            "ORDER" => handle_order(engine, &tokens, &mut output)?,
            "CANCEL" => {
                let payload = match engine.cancel(int_token(&tokens, 1)) {
                    Ok(id) => order_reply(engine, id)?,
                    Err(err) => error_json(&err.to_string()),
                };
                reply(&mut output, &payload)?;
            }
            "STATUS" => {
                let payload = match engine.status(int_token(&tokens, 1)) {
                    Ok(id) => order_reply(engine, id)?,
                    Err(err) => error_json(&err.to_string()),
                };
                reply(&mut output, &payload)?;
            }
            "STATUSALL" => {
                // Can return a stupid amount of data; rationing requests
                // is the front-end's problem.
                let payload = match engine.account_orders(int_token(&tokens, 1)) {
                    Ok(orders) => serde_json::to_string_pretty(&AccountOrdersReply {
                        ok: true,
                        venue: engine.venue(),
                        orders,
                    })?,
                    Err(err) => error_json(&err.to_string()),
                };
                reply(&mut output, &payload)?;
            }
            "QUOTE" => {
                let payload = serde_json::to_string_pretty(&engine.quote_message())?;
                reply(&mut output, &payload)?;
            }
            "ORDERBOOK_BINARY" => {
                // Binary reply: raw payload, no frame marker.
                output.write_all(&wire::encode_book(engine))?;
                output.flush()?;
            }
            "__ACC_FROM_ID__" => {
                let payload = match engine.account_name_of(int_token(&tokens, 1)) {
                    Some(name) => format!("OK {}", name),
                    None => "ERROR None".to_string(),
                };
                reply(&mut output, &payload)?;
            }
            "__DEBUG_MEMORY__" => {
                reply(&mut output, &engine.memory_stats().to_string())?;
            }
            "__TIMESTAMP__" => {
                let ts = engine.timestamp();
                reply(&mut output, &ts)?;
            }
            "__SCORES__" => {
                let page = scores::render(engine);
                reply(&mut output, &page)?;
            }
            _ => reply(&mut output, &error_json("Did not comprehend"))?,
        }
    }
}

fn handle_order<W: Write>(engine: &mut Engine, tokens: &[&str], output: &mut W) -> Result<()> {
    let req = OrderRequest {
        account_name: tokens.get(1).copied().unwrap_or("").to_string(),
        account_id: int_token(tokens, 2),
        qty: int_token(tokens, 3),
        price: int_token(tokens, 4),
        direction: int_token(tokens, 5),
        order_type: int_token(tokens, 6),
    };
    let payload = match engine.place(&req) {
        Ok(id) => order_reply(engine, id)?,
        Err(rejected) => error_json(&format!(
            "Backend error {} (account = {}, account_int = {}, qty = {}, price = {}, direction = {}, orderType = {})",
            rejected.code(),
            req.account_name,
            req.account_id,
            req.qty,
            req.price,
            req.direction,
            req.order_type,
        )),
    };
    reply(output, &payload)?;
    Ok(())
}

fn order_reply(engine: &Engine, id: OrderId) -> Result<String> {
    match engine.order_message(id) {
        Some(msg) => Ok(serde_json::to_string_pretty(&msg)?),
        None => Ok(error_json("No such ID")),
    }
}

fn error_json(message: &str) -> String {
    serde_json::to_string(&ErrorReply {
        ok: false,
        error: message.to_string(),
    })
    .unwrap_or_default()
}

/// Numeric tokens parse the way the legacy protocol reads them: a missing
/// or malformed token reads as zero.
fn int_token(tokens: &[&str], idx: usize) -> i64 {
    tokens.get(idx).and_then(|t| t.parse().ok()).unwrap_or(0)
}

/// Frame a reply: payload, newline, `END` line, flush.
fn reply<W: Write>(output: &mut W, payload: &str) -> io::Result<()> {
    output.write_all(payload.as_bytes())?;
    output.write_all(b"\nEND\n")?;
    output.flush()
}
