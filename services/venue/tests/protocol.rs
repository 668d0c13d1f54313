//! Dispatcher protocol conformance: one framed reply per command.

use matching_engine::{Engine, EngineConfig};
use serde_json::Value;
use venue::dispatch;

/// Run a command script to EOF, returning the raw reply bytes. EOF is a
/// dispatcher error by design, so the error itself is expected.
fn run_script(script: &str) -> Vec<u8> {
    let mut engine = Engine::new(EngineConfig::new("TESTEX", "FOO"));
    let mut output = Vec::new();
    let result = dispatch::serve(&mut engine, script.as_bytes(), &mut output);
    assert!(result.is_err(), "input exhaustion is fatal");
    output
}

/// Split framed output into reply payloads.
fn frames(output: &[u8]) -> Vec<String> {
    let text = String::from_utf8(output.to_vec()).expect("framed replies are UTF-8");
    text.split("\nEND\n")
        .filter(|frame| !frame.is_empty())
        .map(|frame| frame.to_string())
        .collect()
}

fn parse(frame: &str) -> Value {
    serde_json::from_str(frame).unwrap_or_else(|err| panic!("bad JSON {:?}: {}", frame, err))
}

#[test]
fn order_lifecycle_over_the_wire() {
    let output = run_script(
        "ORDER ABC 0 100 5000 1 1\n\
         QUOTE\n\
         STATUS 0\n\
         CANCEL 0\n\
         STATUSALL 0\n",
    );
    let frames = frames(&output);
    assert_eq!(frames.len(), 6, "five replies plus the EOF notice");

    let placed = parse(&frames[0]);
    assert_eq!(placed["ok"], true);
    assert_eq!(placed["id"], 0);
    assert_eq!(placed["open"], true);
    assert_eq!(placed["qty"], 100);
    assert_eq!(placed["originalQty"], 100);
    assert_eq!(placed["direction"], "buy");
    assert_eq!(placed["orderType"], "limit");
    assert_eq!(placed["account"], "ABC");
    assert_eq!(placed["venue"], "TESTEX");
    assert_eq!(placed["symbol"], "FOO");
    assert_eq!(placed["fills"], Value::Array(vec![]));

    let quote = parse(&frames[1]);
    assert_eq!(quote["bid"], 5000);
    assert_eq!(quote["bidSize"], 100);
    assert!(quote.get("ask").is_none());
    assert!(quote.get("last").is_none());

    let status = parse(&frames[2]);
    assert_eq!(status["open"], true);

    let cancelled = parse(&frames[3]);
    assert_eq!(cancelled["open"], false);
    assert_eq!(cancelled["qty"], 0);

    let all = parse(&frames[4]);
    assert_eq!(all["ok"], true);
    assert_eq!(all["venue"], "TESTEX");
    assert_eq!(all["orders"].as_array().unwrap().len(), 1);

    let eof = parse(&frames[5]);
    assert_eq!(eof["error"], "Unexpected EOF on stdin. Quitting.");
}

#[test]
fn admission_error_reply_carries_diagnostics() {
    let output = run_script("ORDER ABC 0 0 5000 1 1\n");
    let frames = frames(&output);
    let reply = parse(&frames[0]);
    assert_eq!(reply["ok"], false);
    assert_eq!(
        reply["error"],
        "Backend error 2 (account = ABC, account_int = 0, qty = 0, price = 5000, direction = 1, orderType = 1)"
    );
}

#[test]
fn lookup_error_strings() {
    let output = run_script(
        "STATUS 99\n\
         CANCEL 99\n\
         STATUS -1\n\
         STATUSALL 42\n\
         STATUSALL 999999\n\
         NONSENSE\n\
         \n",
    );
    let frames = frames(&output);
    assert_eq!(parse(&frames[0])["error"], "No such ID");
    assert_eq!(parse(&frames[1])["error"], "No such ID");
    assert_eq!(parse(&frames[2])["error"], "No such ID");
    assert_eq!(parse(&frames[3])["error"], "Account not known on this book");
    assert_eq!(parse(&frames[4])["error"], "Account not known on this book");
    assert_eq!(parse(&frames[5])["error"], "Did not comprehend");
    assert_eq!(parse(&frames[6])["error"], "Did not comprehend");
}

#[test]
fn introspection_verbs() {
    let output = run_script(
        "ORDER ABC 0 10 100 1 1\n\
         __ACC_FROM_ID__ 0\n\
         __ACC_FROM_ID__ 99\n\
         __TIMESTAMP__\n\
         __DEBUG_MEMORY__\n\
         __SCORES__\n",
    );
    let frames = frames(&output);

    assert_eq!(frames[1], "OK ABC");
    assert_eq!(frames[2], "ERROR None");

    let ts = &frames[3];
    assert!(ts.contains('T') && ts.ends_with('Z'), "timestamp: {}", ts);

    let stats = &frames[4];
    assert!(stats.contains("orders_stored: 1,"), "stats: {}", stats);
    assert!(stats.contains("accounts_created: 1,"));
    assert!(stats.contains("bid_levels_live: 1,"));

    let scores = &frames[5];
    assert!(scores.starts_with("<html>"));
    assert!(scores.contains("No trading activity yet."));
}

#[test]
fn scores_after_trading() {
    let output = run_script(
        "ORDER BUYER 0 10 250 1 1\n\
         ORDER SELLER 1 10 250 2 1\n\
         __SCORES__\n",
    );
    let frames = frames(&output);
    let scores = &frames[2];
    assert!(scores.contains("Current price: $2.50"));
    assert!(scores.contains("BUYER"));
    assert!(scores.contains("SELLER"));
}

#[test]
fn binary_orderbook_reply_is_unframed() {
    let mut engine = Engine::new(EngineConfig::new("TESTEX", "FOO"));
    let mut output = Vec::new();
    let script = "ORDERBOOK_BINARY\n";
    let result = dispatch::serve(&mut engine, script.as_bytes(), &mut output);
    assert!(result.is_err());

    // Empty book: two 8-byte zero flags, then the framed EOF notice.
    assert_eq!(&output[..16], &[0u8; 16]);
    let tail = String::from_utf8(output[16..].to_vec()).unwrap();
    assert!(tail.contains("Unexpected EOF"));
    assert!(tail.ends_with("\nEND\n"));
}

#[test]
fn binary_orderbook_with_resting_orders() {
    let mut engine = Engine::new(EngineConfig::new("TESTEX", "FOO"));
    let mut output = Vec::new();
    let script = "ORDER A 0 7 258 1 1\n\
                  ORDER B 1 9 772 2 1\n\
                  ORDERBOOK_BINARY\n";
    let result = dispatch::serve(&mut engine, script.as_bytes(), &mut output);
    assert!(result.is_err());

    // Skip the two framed order replies.
    let marker = b"\nEND\n";
    let mut idx = 0;
    for _ in 0..2 {
        let at = output[idx..]
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap();
        idx += at + marker.len();
    }
    let binary = &output[idx..idx + 32];
    let expected: Vec<u8> = [
        [0u8, 0, 0, 7], // bid qty
        [0, 0, 1, 2],   // bid price 258
        [0, 0, 0, 0],
        [0, 0, 0, 0],
        [0, 0, 0, 9],   // ask qty
        [0, 0, 3, 4],   // ask price 772
        [0, 0, 0, 0],
        [0, 0, 0, 0],
    ]
    .concat();
    assert_eq!(binary, &expected[..]);
}

#[test]
fn missing_order_tokens_read_as_zero() {
    // qty token absent: parses as 0, which is a silly value.
    let output = run_script("ORDER ABC 0\n");
    let frames = frames(&output);
    let reply = parse(&frames[0]);
    assert_eq!(reply["ok"], false);
    assert_eq!(
        reply["error"],
        "Backend error 2 (account = ABC, account_int = 0, qty = 0, price = 0, direction = 0, orderType = 0)"
    );
}
