//! HTTP/JSON-Protokoll zum Remote-Service
//!
//! Feld-Konvention: `status` (bool, `true` = erledigt).
//!
//! - Fetch:  `GET /api/status?deviceId=<id>` → `{"status":true}` (`<id>` percent-encoded)
//! - Submit: `POST /api/status` mit `{"deviceId":"..","status":true,"timestamp":".."}`
//!
//! Requests gehen als HTTP/1.0 mit `Connection: close` raus, die Antwort
//! wird bis EOF gelesen (kein Chunked Transfer Encoding).

use core::fmt::{self, Write};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::traits::RemoteError;

/// Pfad der Status-Ressource
pub const STATUS_PATH: &str = "/api/status";

/// Zeichen, die im Query-Wert unverändert bleiben (RFC 3986 "unreserved")
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Body für den Submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody<'a> {
    pub device_id: &'a str,
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<&'a str>,
}

/// Antwort auf den Fetch (weitere Felder werden ignoriert)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatusBody {
    pub status: bool,
}

/// Geparste HTTP-Antwort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse<'a> {
    pub status_code: u16,
    pub body: &'a [u8],
}

/// Empfangspuffer für eine Antwort, die bis EOF gelesen wird
///
/// Ist der Puffer voll, liefert [`spare`](Self::spare) einen 1-Byte-Überlauf.
/// Erst wenn dort noch Daten ankommen, ist die Antwort zu groß; eine Antwort,
/// die den Puffer exakt füllt, bleibt gültig.
pub struct ResponseBuffer<'a> {
    buf: &'a mut [u8],
    len: usize,
    overflow: [u8; 1],
}

impl<'a> ResponseBuffer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            overflow: [0],
        }
    }

    /// Ziel für den nächsten Read
    pub fn spare(&mut self) -> &mut [u8] {
        if self.len == self.buf.len() {
            &mut self.overflow
        } else {
            &mut self.buf[self.len..]
        }
    }

    /// Verbucht `n` gelesene Bytes; Daten nach vollem Puffer → `Protocol`
    pub fn commit(&mut self, n: usize) -> Result<(), RemoteError> {
        if n == 0 {
            return Ok(());
        }
        if self.len == self.buf.len() {
            return Err(RemoteError::Protocol);
        }
        self.len = (self.len + n).min(self.buf.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Serialisiert den Submit-Body in `buf`, liefert die Länge
pub fn encode_submit_body(body: &SubmitBody<'_>, buf: &mut [u8]) -> Result<usize, RemoteError> {
    serde_json_core::to_slice(body, buf).map_err(|_| RemoteError::Protocol)
}

/// Schreibt den Fetch-Request, `device_id` wird percent-encoded
pub fn write_fetch_request<W: Write>(out: &mut W, host: &str, device_id: &str) -> fmt::Result {
    let device_id = utf8_percent_encode(device_id, QUERY_VALUE);
    write!(
        out,
        "GET {STATUS_PATH}?deviceId={device_id} HTTP/1.0\r\n\
         Host: {host}\r\n\
         Accept: application/json\r\n\
         Connection: close\r\n\r\n"
    )
}

/// Schreibt den Submit-Request inklusive Body
pub fn write_submit_request<W: Write>(out: &mut W, host: &str, body: &str) -> fmt::Result {
    write!(
        out,
        "POST {STATUS_PATH} HTTP/1.0\r\n\
         Host: {host}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n\
         {body}",
        body.len()
    )
}

/// Zerlegt eine vollständige Antwort; Nicht-2xx wird zu `RemoteError::Service`
pub fn parse_response(raw: &[u8]) -> Result<HttpResponse<'_>, RemoteError> {
    let header_end = find(raw, b"\r\n\r\n").ok_or(RemoteError::Protocol)?;
    let head = &raw[..header_end];
    let body = &raw[header_end + 4..];

    let status_line_end = find(head, b"\r\n").unwrap_or(head.len());
    let status_line =
        core::str::from_utf8(&head[..status_line_end]).map_err(|_| RemoteError::Protocol)?;

    let mut parts = status_line.split(' ');
    let version = parts.next().ok_or(RemoteError::Protocol)?;
    if !version.starts_with("HTTP/1.") {
        return Err(RemoteError::Protocol);
    }
    let status_code: u16 = parts
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or(RemoteError::Protocol)?;

    if !(200..300).contains(&status_code) {
        return Err(RemoteError::Service(status_code));
    }

    Ok(HttpResponse { status_code, body })
}

/// Liest `status` aus dem Fetch-Body
pub fn parse_status_body(body: &[u8]) -> Result<bool, RemoteError> {
    serde_json_core::from_slice::<StatusBody>(body)
        .map(|(parsed, _)| parsed.status)
        .map_err(|_| RemoteError::Protocol)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok_response() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"status\":true}";
        let response = parse_response(raw).unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(parse_status_body(response.body), Ok(true));
    }

    #[test]
    fn test_parse_service_error() {
        let raw = b"HTTP/1.1 503 Service Unavailable\r\n\r\n";
        assert_eq!(parse_response(raw), Err(RemoteError::Service(503)));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_response(b"hello"), Err(RemoteError::Protocol));
        assert_eq!(
            parse_response(b"SSH-2.0 200\r\n\r\n"),
            Err(RemoteError::Protocol)
        );
    }
}
