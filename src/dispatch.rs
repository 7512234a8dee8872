// File: src/dispatch.rs
//! JSON-lines codec between a transport shell and [`NptEngine`].
//!
//! One request object per line, one response object per line:
//! `{"choice": 1, "name": "ann"}` answers `{"output": "Name 'ann' inserted successfully."}`.
//! A dump requested with an `accept` containing `text/html` answers `{"html": "..."}`.
use crate::core::engine::{NptEngine, Operation, Reply};
use crate::error::{NptError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub choice: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub accept: Option<String>,
}

impl Request {
    fn wants_html(&self) -> bool {
        self.accept.as_deref().map_or(false, |accept| accept.contains("text/html"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Output { output: String },
    Html { html: String },
    Error { error: String },
}

/// A response plus whether the shell should stop after sending it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub response: Response,
    pub shutdown: bool,
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Wraps dump text in a minimal HTML document.
pub fn render_html(dump: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>Name Prefix Tree (NPT)</title>\n</head>\n<body>\n<pre>{}</pre>\n</body>\n</html>\n",
        escape_html(dump)
    )
}

fn execute(engine: &mut NptEngine, request: Request) -> Result<Handled> {
    let wants_html = request.wants_html();
    let operation = Operation::from_choice(request.choice, request.name)?;
    Ok(match engine.execute(operation)? {
        Reply::Dump(text) if wants_html => Handled {
            response: Response::Html { html: render_html(&text) },
            shutdown: false,
        },
        Reply::Output(output) | Reply::Dump(output) => Handled {
            response: Response::Output { output },
            shutdown: false,
        },
        Reply::Shutdown(output) => Handled {
            response: Response::Output { output },
            shutdown: true,
        },
    })
}

/// Handles one parsed request. Failures become error responses.
pub fn handle_request(engine: &mut NptEngine, request: Request) -> Handled {
    execute(engine, request).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "request failed");
        Handled { response: Response::Error { error: e.to_string() }, shutdown: false }
    })
}

/// Parses and handles one request line.
pub fn handle_line(engine: &mut NptEngine, line: &str) -> Handled {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle_request(engine, request),
        Err(e) => {
            let e = NptError::from(e);
            tracing::warn!(error = %e, "malformed request");
            Handled { response: Response::Error { error: e.to_string() }, shutdown: false }
        }
    }
}

pub fn encode(response: &Response) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}
