#![allow(missing_docs)]
//! IPC server for the code review plugin
//!
//! Runs as a subprocess and answers JSON-RPC style requests over
//! stdin/stdout, one JSON document per line, so the web application's
//! server side can call the thread resolver and dialogue engine.
//!
//! ## Usage
//!
//! ```bash
//! cargo build --features ipc --bin code-review-ipc
//! CODE_REVIEW_MIN_DELAY_MS=500 ./code-review-ipc
//! ```
//!
//! Dialogue settings are read once at startup from `CODE_REVIEW_*`.
//!
//! ### Example Request
//! ```json
//! {"id": 1, "method": "getOrphans", "params": {"comments": [{"id": 2, "parentId": 1}]}}
//! ```
//!
//! ### Example Response
//! ```json
//! {"id": 1, "result": [{"id": 2, "parentId": 1, "authorKind": "human", "content": "", "isEnd": false, "deleted": false}]}
//! ```

use elizaos_plugin_code_review::interop::{handle_ipc_request_with, IpcRequest, IpcResponse};
use elizaos_plugin_code_review::{create_engine_from_env, DialogueEngine};
use std::io::{self, BufRead, Write};

fn write_response(stdout: &mut impl Write, response: &IpcResponse) {
    match serde_json::to_string(response) {
        Ok(output) => {
            writeln!(stdout, "{}", output).ok();
            stdout.flush().ok();
        }
        Err(e) => {
            eprintln!("[code-review-ipc] Error serializing response: {}", e);
        }
    }
}

fn main() {
    let engine = match create_engine_from_env() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("[code-review-ipc] {}, using default configuration", e);
            DialogueEngine::new()
        }
    };

    eprintln!("[code-review-ipc] Server started, waiting for requests...");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("[code-review-ipc] Error reading input: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<IpcRequest>(&line) {
            Ok(request) => handle_ipc_request_with(&engine, &request),
            Err(e) => IpcResponse {
                id: 0,
                result: None,
                error: Some(format!("Invalid JSON: {}", e)),
            },
        };

        write_response(&mut stdout, &response);
    }

    eprintln!("[code-review-ipc] Server shutting down");
}
