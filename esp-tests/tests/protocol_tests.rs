//! Integration Tests für das HTTP/JSON-Protokoll zum Task-Service

use esp_core::RemoteError;
use esp_core::protocol::{
    ResponseBuffer, SubmitBody, encode_submit_body, parse_response, parse_status_body, write_fetch_request,
    write_submit_request,
};

fn encode(body: &SubmitBody<'_>) -> String {
    let mut buf = [0u8; 160];
    let len = encode_submit_body(body, &mut buf).unwrap();
    String::from_utf8(buf[..len].to_vec()).unwrap()
}

// ============================================================================
// Tests: Submit-Body
// ============================================================================

#[test]
fn test_submit_body_with_timestamp() {
    let json = encode(&SubmitBody {
        device_id: "desk-1",
        status: true,
        timestamp: Some("2026-01-05T01:00:00Z"),
    });
    assert_eq!(
        json,
        r#"{"deviceId":"desk-1","status":true,"timestamp":"2026-01-05T01:00:00Z"}"#
    );
}

#[test]
fn test_submit_body_without_timestamp() {
    let json = encode(&SubmitBody {
        device_id: "desk-1",
        status: false,
        timestamp: None,
    });
    assert_eq!(json, r#"{"deviceId":"desk-1","status":false}"#);
}

#[test]
fn test_submit_body_too_large_for_buffer() {
    let mut buf = [0u8; 8];
    let body = SubmitBody {
        device_id: "desk-1",
        status: true,
        timestamp: None,
    };
    assert_eq!(
        encode_submit_body(&body, &mut buf),
        Err(RemoteError::Protocol)
    );
}

// ============================================================================
// Tests: Request-Text
// ============================================================================

#[test]
fn test_fetch_request_text() {
    let mut out = String::new();
    write_fetch_request(&mut out, "tasks.example.org", "desk-1").unwrap();
    assert_eq!(
        out,
        "GET /api/status?deviceId=desk-1 HTTP/1.0\r\n\
         Host: tasks.example.org\r\n\
         Accept: application/json\r\n\
         Connection: close\r\n\r\n"
    );
}

#[test]
fn test_fetch_request_encodes_device_id() {
    let mut out = String::new();
    write_fetch_request(&mut out, "tasks.example.org", "desk 1/ä?x=y&z").unwrap();
    assert!(out.starts_with("GET /api/status?deviceId=desk%201%2F%C3%A4%3Fx%3Dy%26z HTTP/1.0\r\n"));

    let mut out = String::new();
    write_fetch_request(&mut out, "tasks.example.org", "desk-1.a_b~c").unwrap();
    assert!(out.starts_with("GET /api/status?deviceId=desk-1.a_b~c HTTP/1.0\r\n"));
}

#[test]
fn test_submit_request_text() {
    let body = r#"{"deviceId":"desk-1","status":true}"#;
    let mut out = String::new();
    write_submit_request(&mut out, "tasks.example.org", body).unwrap();

    assert!(out.starts_with("POST /api/status HTTP/1.0\r\n"));
    assert!(out.contains("Content-Type: application/json\r\n"));
    assert!(out.contains(&format!("Content-Length: {}\r\n", body.len())));
    assert!(out.ends_with(&format!("\r\n\r\n{body}")));
}

// ============================================================================
// Tests: Antworten
// ============================================================================

#[test]
fn test_status_response_round_trip() {
    let raw = b"HTTP/1.0 200 OK\r\nContent-Type: application/json\r\n\r\n{\"status\":false}";
    let response = parse_response(raw).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(parse_status_body(response.body), Ok(false));
}

#[test]
fn test_status_body_ignores_extra_fields() {
    let body = br#"{"deviceId":"desk-1","status":true,"updatedAt":"2026-01-05T01:00:00Z"}"#;
    assert_eq!(parse_status_body(body), Ok(true));
}

#[test]
fn test_status_body_missing_field() {
    assert_eq!(
        parse_status_body(br#"{"done":true}"#),
        Err(RemoteError::Protocol)
    );
    assert_eq!(parse_status_body(b""), Err(RemoteError::Protocol));
}

#[test]
fn test_non_success_status_codes() {
    assert_eq!(
        parse_response(b"HTTP/1.1 404 Not Found\r\n\r\n"),
        Err(RemoteError::Service(404))
    );
    assert_eq!(
        parse_response(b"HTTP/1.1 301 Moved Permanently\r\nLocation: /\r\n\r\n"),
        Err(RemoteError::Service(301))
    );
}

#[test]
fn test_created_is_success() {
    let response = parse_response(b"HTTP/1.1 201 Created\r\n\r\n").unwrap();
    assert_eq!(response.status_code, 201);
    assert!(response.body.is_empty());
}

#[test]
fn test_truncated_headers() {
    assert_eq!(
        parse_response(b"HTTP/1.1 200 OK\r\nContent-Type: app"),
        Err(RemoteError::Protocol)
    );
}

// ============================================================================
// Tests: Empfangspuffer
// ============================================================================

/// Liest `chunks` wie ein Socket (leerer Chunk = EOF) in einen Puffer
fn read_chunks(buf: &mut [u8], chunks: &[&[u8]]) -> Result<Vec<u8>, RemoteError> {
    let mut received = ResponseBuffer::new(buf);
    for chunk in chunks {
        let spare = received.spare();
        let n = chunk.len().min(spare.len());
        spare[..n].copy_from_slice(&chunk[..n]);
        if n == 0 {
            break;
        }
        received.commit(n)?;
    }
    Ok(received.filled().to_vec())
}

#[test]
fn test_response_exactly_filling_buffer() {
    let raw = b"HTTP/1.0 200 OK\r\n\r\n{\"status\":true}";
    let mut buf = [0u8; 34];
    assert_eq!(raw.len(), buf.len());

    let filled = read_chunks(&mut buf, &[&raw[..20], &raw[20..], b""]).unwrap();
    assert_eq!(filled, raw.to_vec());
    assert_eq!(parse_status_body(parse_response(&filled).unwrap().body), Ok(true));
}

#[test]
fn test_response_larger_than_buffer() {
    let raw = b"HTTP/1.0 200 OK\r\n\r\n{\"status\":true}";
    let mut buf = [0u8; 33];

    // erster Read füllt den Puffer, das letzte Byte landet im Überlauf
    assert_eq!(
        read_chunks(&mut buf, &[&raw[..33], &raw[33..], b""]),
        Err(RemoteError::Protocol)
    );
}

#[test]
fn test_response_buffer_spare_shrinks() {
    let mut buf = [0u8; 8];
    let mut received = ResponseBuffer::new(&mut buf);
    assert!(received.is_empty());
    assert_eq!(received.spare().len(), 8);

    received.commit(5).unwrap();
    assert_eq!(received.spare().len(), 3);
    received.commit(3).unwrap();
    assert_eq!(received.len(), 8);

    // voll: nur noch der 1-Byte-Überlauf, EOF bleibt erlaubt
    assert_eq!(received.spare().len(), 1);
    assert_eq!(received.commit(0), Ok(()));
    assert_eq!(received.commit(1), Err(RemoteError::Protocol));
}
