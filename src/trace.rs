//! Browser trace files
//!
//! One JSON event per line, tagged on `event`:
//!
//! ```text
//! {"event":"tabOpened","tabId":1,"url":"https://example.com/"}
//! {"event":"request","tabId":1,"url":"https://cdn.tracker.net/t.js"}
//! {"event":"pageLoad","tabId":1,"localStorage":[["k","v"]],"sessionStorage":[]}
//! {"event":"canvasRead","tabId":1,"method":"toDataURL"}
//! {"event":"cookie","url":"https://example.com/","name":"sid","value":"1","domain":".example.com"}
//! ```

use std::fs;
use std::path::Path;

use privscope_core::{CanvasMethod, StorageEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TraceEvent {
    TabOpened {
        #[serde(rename = "tabId")]
        tab_id: i64,
        url: String,
    },
    TabUpdated {
        #[serde(rename = "tabId")]
        tab_id: i64,
        url: String,
    },
    TabClosed {
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    Activate {
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    Request {
        #[serde(rename = "tabId")]
        tab_id: i64,
        url: String,
    },
    PageLoad {
        #[serde(rename = "tabId")]
        tab_id: i64,
        #[serde(rename = "localStorage", default)]
        local_storage: Vec<StorageEntry>,
        #[serde(rename = "sessionStorage", default)]
        session_storage: Vec<StorageEntry>,
    },
    CanvasRead {
        #[serde(rename = "tabId")]
        tab_id: i64,
        method: CanvasMethod,
    },
    Navigate {
        #[serde(rename = "tabId")]
        tab_id: i64,
        url: String,
    },
    Unload {
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    /// Raw runtime message, bypassing the sensors.
    Message {
        #[serde(rename = "tabId", default)]
        tab_id: Option<i64>,
        payload: Value,
    },
    Cookie {
        url: String,
        name: String,
        value: String,
        domain: String,
    },
}

impl TraceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TabOpened { .. } => "tabOpened",
            Self::TabUpdated { .. } => "tabUpdated",
            Self::TabClosed { .. } => "tabClosed",
            Self::Activate { .. } => "activate",
            Self::Request { .. } => "request",
            Self::PageLoad { .. } => "pageLoad",
            Self::CanvasRead { .. } => "canvasRead",
            Self::Navigate { .. } => "navigate",
            Self::Unload { .. } => "unload",
            Self::Message { .. } => "message",
            Self::Cookie { .. } => "cookie",
        }
    }
}

pub struct ParseResult {
    pub events: Vec<TraceEvent>,
    pub errors: Vec<ParseError>,
}

#[derive(Debug)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

pub fn parse_trace(path: &Path) -> Result<ParseResult, std::io::Error> {
    let content = fs::read_to_string(path)?;
    Ok(parse_lines(&content))
}

pub fn parse_lines(content: &str) -> ParseResult {
    let mut events = Vec::new();
    let mut errors = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<TraceEvent>(line) {
            Ok(event) => events.push(event),
            Err(e) => errors.push(ParseError {
                line: i + 1,
                message: e.to_string(),
            }),
        }
    }

    ParseResult { events, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_event_kind() {
        let content = r#"
{"event":"tabOpened","tabId":1,"url":"https://example.com/"}
{"event":"tabUpdated","tabId":1,"url":"https://example.com/a"}
{"event":"activate","tabId":1}
{"event":"request","tabId":-1,"url":"https://x.net/"}
{"event":"pageLoad","tabId":1,"localStorage":[["k","v"]]}
{"event":"canvasRead","tabId":1,"method":"getImageData"}
{"event":"navigate","tabId":1,"url":"https://evil.test/"}
{"event":"unload","tabId":1}
{"event":"message","payload":{"type":"canvasAccess","method":"toDataURL"}}
{"event":"cookie","url":"https://example.com/","name":"a","value":"b","domain":"example.com"}
{"event":"tabClosed","tabId":1}
"#;
        let result = parse_lines(content);
        assert!(result.errors.is_empty());
        let names: Vec<&str> = result.events.iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            [
                "tabOpened", "tabUpdated", "activate", "request", "pageLoad", "canvasRead",
                "navigate", "unload", "message", "cookie", "tabClosed"
            ]
        );
        assert_eq!(
            result.events[4],
            TraceEvent::PageLoad {
                tab_id: 1,
                local_storage: vec![("k".into(), "v".into())],
                session_storage: vec![],
            }
        );
        assert!(matches!(result.events[8], TraceEvent::Message { tab_id: None, .. }));
    }

    #[test]
    fn collects_errors_with_line_numbers() {
        let content = "{\"event\":\"activate\",\"tabId\":1}\n\nnot json\n{\"event\":\"teleport\"}\n";
        let result = parse_lines(content);
        assert_eq!(result.events.len(), 1);
        let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, [3, 4]);
    }
}
