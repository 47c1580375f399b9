//! Development request surface.
//!
//! A deliberately small synchronous HTTP loop over `std::net::TcpListener`:
//! requests are handled one at a time, each store operation running to
//! completion before the next connection is accepted. There is no in-process
//! parallelism; the only concurrency hazard is external writers mutating the
//! tickets directory between a scan and a write, which the store documents
//! and validate/fix repairs.
use crate::store::{CreateTicket, StoreError, TicketStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::time::Duration;

const JSON: &str = "application/json; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";
const MAX_BODY_BYTES: usize = 64 * 1024;

pub struct ServeConfig {
    pub root: PathBuf,
    pub port: u16,
}

/// Bind and serve until the process is terminated.
pub fn serve(config: ServeConfig) -> Result<()> {
    let listener = TcpListener::bind(("127.0.0.1", config.port))
        .with_context(|| format!("bind 127.0.0.1:{}", config.port))?;
    tracing::info!(
        port = config.port,
        root = %config.root.display(),
        "ticket server listening"
    );
    let mut store = TicketStore::new(config.root);
    for stream in listener.incoming() {
        let Ok(stream) = stream else { continue };
        if let Err(err) = handle_connection(stream, &mut store) {
            tracing::debug!(error = %err, "connection error");
        }
    }
    Ok(())
}

fn handle_connection(mut stream: TcpStream, store: &mut TicketStore) -> std::io::Result<()> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request(&mut stream)? else {
        return Ok(());
    };
    let response = dispatch(store, &request);
    write_response(&mut stream, &response)
}

#[derive(Debug)]
struct HttpRequest {
    method: String,
    path: String,
    body: Vec<u8>,
}

#[derive(Debug, PartialEq, Eq)]
struct HttpResponse {
    status: &'static str,
    content_type: &'static str,
    body: String,
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    url: Option<String>,
    #[serde(default)]
    updates: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct FixRequest {
    #[serde(default)]
    dir: Option<String>,
    #[serde(default)]
    prefix: Option<String>,
}

fn dispatch(store: &mut TicketStore, request: &HttpRequest) -> HttpResponse {
    let path = normalize_path(&request.path);
    let method = request.method.as_str();
    match path.as_str() {
        "/tickets" => {
            if method != "GET" {
                return method_not_allowed();
            }
            let dir = query_param(&request.path, "dir").unwrap_or_default();
            match store.list(&dir) {
                Ok(tickets) => json_ok(&tickets),
                Err(err) => error_response(&err),
            }
        }
        "/tickets/create" => {
            if method != "POST" {
                return method_not_allowed();
            }
            let create: CreateTicket = match serde_json::from_slice(&request.body) {
                Ok(create) => create,
                Err(_) => return bad_request("invalid JSON payload"),
            };
            match store.create(&create) {
                Ok(ticket) => json_ok(&ticket),
                Err(err) => error_response(&err),
            }
        }
        "/tickets/update" => {
            if method != "POST" {
                return method_not_allowed();
            }
            let update: UpdateRequest = match serde_json::from_slice(&request.body) {
                Ok(update) => update,
                Err(_) => return bad_request("invalid JSON payload"),
            };
            let Some(url) = update.url else {
                return bad_request("missing url");
            };
            match store.update(&url, &update.updates) {
                Ok(()) => json_ok(&serde_json::json!({ "ok": true })),
                Err(err) => error_response(&err),
            }
        }
        "/tickets/validate" => {
            if method != "GET" {
                return method_not_allowed();
            }
            let dir = query_param(&request.path, "dir").unwrap_or_default();
            let prefix = query_param(&request.path, "prefix");
            match store.validate(&dir, prefix.as_deref()) {
                Ok(issues) => json_ok(&issues),
                Err(err) => error_response(&err),
            }
        }
        "/tickets/fix" => {
            if method != "POST" {
                return method_not_allowed();
            }
            let fix: FixRequest = if request.body.is_empty() {
                FixRequest::default()
            } else {
                match serde_json::from_slice(&request.body) {
                    Ok(fix) => fix,
                    Err(_) => return bad_request("invalid JSON payload"),
                }
            };
            match store.fix(fix.dir.as_deref().unwrap_or(""), fix.prefix.as_deref()) {
                Ok(applied) => json_ok(&applied),
                Err(err) => error_response(&err),
            }
        }
        _ => HttpResponse {
            status: "404 Not Found",
            content_type: TEXT,
            body: "Not found.".to_string(),
        },
    }
}

fn json_ok<T: Serialize>(value: &T) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(body) => HttpResponse {
            status: "200 OK",
            content_type: JSON,
            body,
        },
        Err(err) => HttpResponse {
            status: "500 Internal Server Error",
            content_type: TEXT,
            body: err.to_string(),
        },
    }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse {
        status: "400 Bad Request",
        content_type: TEXT,
        body: message.to_string(),
    }
}

fn method_not_allowed() -> HttpResponse {
    HttpResponse {
        status: "405 Method Not Allowed",
        content_type: TEXT,
        body: "Method not allowed.".to_string(),
    }
}

fn error_response(err: &StoreError) -> HttpResponse {
    let status = match err {
        StoreError::NotFound { .. } => "404 Not Found",
        StoreError::BadRequest(_) => "400 Bad Request",
        StoreError::Io(_) | StoreError::Yaml(_) => "500 Internal Server Error",
    };
    HttpResponse {
        status,
        content_type: TEXT,
        body: err.to_string(),
    }
}

fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<HttpRequest>> {
    let mut buf = [0u8; 4096];
    let mut data = Vec::<u8>::new();
    loop {
        let read = match stream.read(&mut buf) {
            Ok(read) => read,
            Err(err)
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                break;
            }
            Err(err) => return Err(err),
        };
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);
        if data.windows(4).any(|w| w == b"\r\n\r\n") || data.len() > 8192 {
            break;
        }
    }
    if data.is_empty() {
        return Ok(None);
    }

    let header_end = data
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4)
        .unwrap_or(data.len());
    let header_bytes = &data[..header_end];
    let mut body = data[header_end..].to_vec();

    let header_text = String::from_utf8_lossy(header_bytes);
    let mut lines = header_text.split("\r\n");
    let Some(request_line) = lines.next() else {
        return Ok(None);
    };
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("/").to_string();

    let mut content_length: usize = 0;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            content_length = value.trim().parse::<usize>().unwrap_or(0);
        }
    }
    content_length = content_length.min(MAX_BODY_BYTES);

    while body.len() < content_length {
        let read = match stream.read(&mut buf) {
            Ok(read) => read,
            Err(err)
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                break;
            }
            Err(err) => return Err(err),
        };
        if read == 0 {
            break;
        }
        let take = read.min(content_length - body.len());
        body.extend_from_slice(&buf[..take]);
    }
    body.truncate(content_length);

    Ok(Some(HttpRequest { method, path, body }))
}

fn write_response(stream: &mut TcpStream, response: &HttpResponse) -> std::io::Result<()> {
    let mut headers = String::new();
    headers.push_str("HTTP/1.1 ");
    headers.push_str(response.status);
    headers.push_str("\r\nContent-Type: ");
    headers.push_str(response.content_type);
    headers.push_str("\r\nCache-Control: no-store\r\nContent-Length: ");
    headers.push_str(&response.body.len().to_string());
    headers.push_str("\r\n\r\n");
    stream.write_all(headers.as_bytes())?;
    stream.write_all(response.body.as_bytes())?;
    Ok(())
}

fn normalize_path(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw.split('?').next().unwrap_or(raw);
    let raw = raw.trim_end_matches('/');
    if raw.is_empty() {
        return "/".to_string();
    }
    raw.to_string()
}

fn query_param(raw: &str, key: &str) -> Option<String> {
    let query = raw.split_once('?')?.1;
    for pair in query.split('&') {
        let mut parts = pair.splitn(2, '=');
        if parts.next().unwrap_or("").trim() != key {
            continue;
        }
        let value = parts.next().unwrap_or("").trim();
        if value.is_empty() {
            return None;
        }
        return decode_query_value(value);
    }
    None
}

fn decode_query_value(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut idx = 0usize;
    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => {
                out.push(b' ');
                idx += 1;
            }
            b'%' if idx + 2 < bytes.len() => {
                let hex = |b: u8| match b {
                    b'0'..=b'9' => Some(b - b'0'),
                    b'a'..=b'f' => Some(b - b'a' + 10),
                    b'A'..=b'F' => Some(b - b'A' + 10),
                    _ => None,
                };
                let hi = hex(bytes[idx + 1])?;
                let lo = hex(bytes[idx + 2])?;
                out.push((hi << 4) | lo);
                idx += 3;
            }
            byte => {
                out.push(byte);
                idx += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
