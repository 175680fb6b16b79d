//! Minimal HTTP/1.1 framing over a `TcpStream`.
//!
//! Just enough of the protocol for the two endpoints this service exposes:
//! read one request (request line, headers, Content-Length body) and write
//! one response. Every response carries a permissive CORS header because
//! the expected caller is an unauthenticated local tool.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;

/// Cap on accepted body size. The payloads here are short control strings;
/// anything larger is a misbehaving client.
const MAX_BODY_LEN: usize = 64 * 1024;

/// One parsed inbound request.
#[derive(Debug)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

/// Read a single request from `stream`.
///
/// Returns an `InvalidData` error for anything that is not a well-formed
/// request head; the caller answers those with a 400 and moves on.
pub fn read_request(stream: &mut TcpStream) -> std::io::Result<Request> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next()) {
        (Some(m), Some(t)) => (m.to_string(), t),
        _ => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "malformed request line",
            ))
        }
    };
    // Ignore any query string; routing is on the path alone.
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "bad content-length",
                    )
                })?;
            }
        }
    }
    if content_length > MAX_BODY_LEN {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "body too large",
        ));
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;
    Ok(Request { method, path, body })
}

/// Write one response with a JSON body and close-friendly headers.
pub fn write_response(
    stream: &mut TcpStream,
    status: u16,
    reason: &str,
    body: &[u8],
) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Connection: close\r\n\
         \r\n",
        status,
        reason,
        body.len()
    );
    stream.write_all(head.as_bytes())?;
    stream.write_all(body)?;
    stream.flush()?;
    Ok(())
}

/// Answer a CORS preflight: no body, allow everything.
pub fn write_preflight(stream: &mut TcpStream) -> std::io::Result<()> {
    let head = "HTTP/1.1 204 No Content\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
         Access-Control-Allow-Headers: Content-Type\r\n\
         Content-Length: 0\r\n\
         Connection: close\r\n\
         \r\n";
    stream.write_all(head.as_bytes())?;
    stream.flush()?;
    Ok(())
}
