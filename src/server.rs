//! Newline-delimited JSON request loop.
//!
//! Each input line is one request. Every request runs on its own scoped
//! worker thread and its response line is written as soon as it is ready,
//! so responses may come back out of order; clients that pipeline requests
//! should send an `"id"`, which is echoed on the matching response.

use crate::tools::{ToolDispatcher, ToolRequest, ToolResponse};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info, warn};

/// Serves requests from `input` until end of input, then waits for every
/// in-flight request to finish.
pub fn serve<R, W>(dispatcher: &ToolDispatcher, input: R, output: W) -> io::Result<()>
where
    R: BufRead,
    W: Write + Send,
{
    info!("serving requests");

    let served = thread::scope(|s| -> io::Result<usize> {
        let (tx, rx) = mpsc::channel::<String>();

        let writer = s.spawn(move || -> io::Result<()> {
            let mut output = output;
            for line in rx {
                writeln!(output, "{line}")?;
                output.flush()?;
            }
            Ok(())
        });

        let mut served = 0;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            served += 1;

            let tx = tx.clone();
            s.spawn(move || {
                let response = respond(dispatcher, &line);
                match serde_json::to_string(&response) {
                    Ok(json) => {
                        // The writer only goes away if output failed; that error surfaces on join.
                        let _ = tx.send(json);
                    }
                    Err(e) => warn!("Could not encode response: {}", e),
                }
            });
        }
        drop(tx);

        writer
            .join()
            .map_err(|_| io::Error::other("response writer panicked"))??;
        Ok(served)
    })?;

    info!(served, "input closed");
    Ok(())
}

/// Handles one request line and returns its response object.
pub fn respond(dispatcher: &ToolDispatcher, line: &str) -> Value {
    let (id, response) = match serde_json::from_str::<Value>(line) {
        Ok(value) => {
            let id = value.get("id").cloned();
            let response = match serde_json::from_value::<ToolRequest>(value) {
                Ok(request) => {
                    debug!(tool = request.tool_name(), "request received");
                    dispatcher.handle(request)
                }
                Err(e) => ToolResponse::failure(format!("Invalid request: {e}")),
            };
            (id, response)
        }
        Err(e) => (None, ToolResponse::failure(format!("Invalid request: {e}"))),
    };

    let mut value = serde_json::to_value(&response).unwrap_or_else(|e| {
        serde_json::json!({"ok": false, "error": format!("Failed to encode response: {e}")})
    });
    if let (Some(id), Some(object)) = (id, value.as_object_mut()) {
        object.insert("id".to_string(), id);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::inventory::{Catalog, Inventory, Registry};
    use crate::paths::PathResolver;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn dispatcher(temp_dir: &TempDir) -> ToolDispatcher {
        ToolDispatcher::new(
            Engine::default(),
            PathResolver::new(Some(temp_dir.path().to_path_buf())),
            Inventory::new(
                Catalog::builtin(),
                Registry::new(temp_dir.path().join("registry.json")),
            ),
        )
    }

    fn run(dispatcher: &ToolDispatcher, input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve(dispatcher, Cursor::new(input.to_string()), &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_every_request_gets_one_response_with_its_id() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "hello").unwrap();
        let dispatcher = dispatcher(&temp_dir);

        let input = concat!(
            "{\"id\": 1, \"tool\": \"folder-stats\"}\n",
            "\n",
            "{\"id\": \"two\", \"tool\": \"check-updates\"}\n",
            "{\"id\": 3, \"tool\": \"folder-stats\", \"root\": \"/does/not/exist\"}\n",
        );
        let responses = run(&dispatcher, input);

        assert_eq!(responses.len(), 3);
        let by_id = |id: Value| {
            responses
                .iter()
                .find(|r| r["id"] == id)
                .cloned()
                .unwrap()
        };
        assert_eq!(by_id(serde_json::json!(1))["ok"], true);
        assert_eq!(by_id(serde_json::json!(1))["data"]["total_files"], 1);
        assert_eq!(by_id(serde_json::json!("two"))["data"]["count"], 0);
        assert_eq!(by_id(serde_json::json!(3))["ok"], false);
    }

    #[test]
    fn test_garbage_lines_get_error_envelopes() {
        let temp_dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&temp_dir);

        let responses = run(&dispatcher, "not json\n{\"id\": 7, \"tool\": \"nope\"}\n");

        assert_eq!(responses.len(), 2);
        for response in &responses {
            assert_eq!(response["ok"], false);
            assert!(
                response["error"]
                    .as_str()
                    .unwrap()
                    .starts_with("Invalid request")
            );
        }
        assert!(responses.iter().any(|r| r["id"] == 7));
    }

    #[test]
    fn test_respond_without_id() {
        let temp_dir = TempDir::new().unwrap();
        let response = respond(
            &dispatcher(&temp_dir),
            "{\"tool\": \"get-software-info\", \"name\": \"git\"}",
        );
        assert_eq!(response["ok"], true);
        assert_eq!(response["data"]["latest_version"], "2.43.0");
        assert!(response.get("id").is_none());
    }
}
