//! Listener responsibilities:
//! - bind the configured port (bind failure is fatal and returned to the caller)
//! - accept connections on a detached background thread
//! - answer `POST /message` and `GET /ping`, 404 for everything else
//! - republish each accepted payload into the shared message cell
//!
//! Per-request failures are answered and logged, never allowed to take the
//! accept loop down. There is no shutdown path; the listener lives as long
//! as the process, matching how the surrounding host runs it.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

use log::{info, warn};

use crate::config::ListenerConfig;
use crate::http;
use crate::protocol::{ErrorResponse, PingResponse, UpdateAck, UpdateRequest};
use crate::state::SharedMessage;

/// Handle to the running listener. Dropping it does not stop the service;
/// it only carries the resolved bind address.
pub struct MessageListener {
    local_addr: SocketAddr,
}

impl MessageListener {
    /// Bind the configured port and start serving in the background.
    ///
    /// Returns quickly — the accept loop runs on its own thread. A bind
    /// error (port already taken, no permission) comes back synchronously.
    pub fn start(config: &ListenerConfig, message: SharedMessage) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", config.port))?;
        let handle = Self::spawn(listener, message)?;
        info!(
            "message listener started on port {} — test with: curl -X POST http://localhost:{}/message -H 'Content-Type: application/json' -d '{{\"message\": \"Hello from curl!\"}}'",
            config.port, config.port
        );
        Ok(handle)
    }

    /// Start serving on an already-bound socket. Split out from `start` so
    /// tests can use an ephemeral loopback port.
    fn spawn(listener: TcpListener, message: SharedMessage) -> std::io::Result<Self> {
        let local_addr = listener.local_addr()?;
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(mut stream) => {
                        let message = message.clone();
                        thread::spawn(move || handle_connection(&mut stream, &message));
                    }
                    Err(e) => warn!("error accepting connection: {}", e),
                }
            }
        });
        Ok(Self { local_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

/// Serve exactly one request on `stream`, then let the connection close.
fn handle_connection(stream: &mut TcpStream, message: &SharedMessage) {
    let request = match http::read_request(stream) {
        Ok(req) => req,
        Err(e) => {
            warn!("unreadable request: {}", e);
            let body = serde_json::to_vec(&ErrorResponse::new(e.to_string())).unwrap_or_default();
            let _ = http::write_response(stream, 400, "Bad Request", &body);
            return;
        }
    };

    let result = match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/message") => receive_message(stream, &request.body, message),
        ("GET", "/ping") => ping(stream, message),
        ("OPTIONS", _) => http::write_preflight(stream),
        _ => {
            let body =
                serde_json::to_vec(&ErrorResponse::new("not found")).unwrap_or_default();
            http::write_response(stream, 404, "Not Found", &body)
        }
    };
    if let Err(e) = result {
        warn!("error writing response: {}", e);
    }
}

/// `POST /message`: store the payload and echo it back. A body that is not
/// valid JSON is rejected with a 400 and leaves the current message alone.
fn receive_message(
    stream: &mut TcpStream,
    body: &[u8],
    message: &SharedMessage,
) -> std::io::Result<()> {
    match serde_json::from_slice::<UpdateRequest>(body) {
        Ok(update) => {
            message.set(update.message.clone());
            info!("received message: {}", update.message);
            let body = serde_json::to_vec(&UpdateAck::success(update.message))
                .unwrap_or_default();
            http::write_response(stream, 200, "OK", &body)
        }
        Err(e) => {
            warn!("error receiving message: {}", e);
            let body =
                serde_json::to_vec(&ErrorResponse::new(e.to_string())).unwrap_or_default();
            http::write_response(stream, 400, "Bad Request", &body)
        }
    }
}

/// `GET /ping`: liveness plus the current message, so a remote caller can
/// confirm what the service believes the state to be.
fn ping(stream: &mut TcpStream, message: &SharedMessage) -> std::io::Result<()> {
    let body = serde_json::to_vec(&PingResponse::alive(message.snapshot()))
        .unwrap_or_default();
    http::write_response(stream, 200, "OK", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MISSING_MESSAGE_FALLBACK;
    use std::io::{Read, Write};

    /// Listener on an ephemeral loopback port, plus the shared cell it feeds.
    fn start_local(initial: &str) -> (MessageListener, SharedMessage) {
        let message = SharedMessage::new(initial);
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let handle = MessageListener::spawn(listener, message.clone()).unwrap();
        (handle, message)
    }

    /// Send one raw HTTP request and return the full response text.
    fn send_raw(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(raw.as_bytes()).unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    fn post_message(addr: SocketAddr, body: &str) -> String {
        send_raw(
            addr,
            &format!(
                "POST /message HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            ),
        )
    }

    fn get(addr: SocketAddr, path: &str) -> String {
        send_raw(
            addr,
            &format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path),
        )
    }

    #[test]
    fn test_update_then_ping_reflects_payload() {
        let (handle, _) = start_local("initial");
        let response = post_message(handle.local_addr(), r#"{"message": "Hello"}"#);
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#"{"status":"success","received":"Hello"}"#));

        let response = get(handle.local_addr(), "/ping");
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#"{"status":"alive","current_message":"Hello"}"#));
    }

    #[test]
    fn test_malformed_body_leaves_state_unchanged() {
        let (handle, message) = start_local("initial");
        let response = post_message(handle.local_addr(), "this is not json");
        assert!(response.starts_with("HTTP/1.1 400"));
        assert!(response.contains(r#""status":"error""#));
        assert_eq!(message.snapshot(), "initial");
    }

    #[test]
    fn test_missing_message_field_falls_back() {
        let (handle, message) = start_local("initial");
        let response = post_message(handle.local_addr(), "{}");
        assert!(response.starts_with("HTTP/1.1 200"));
        assert_eq!(message.snapshot(), MISSING_MESSAGE_FALLBACK);
    }

    #[test]
    fn test_unknown_path_is_not_found_and_untouched() {
        let (handle, message) = start_local("initial");
        let response = get(handle.local_addr(), "/nope");
        assert!(response.starts_with("HTTP/1.1 404"));
        assert_eq!(message.snapshot(), "initial");
    }

    #[test]
    fn test_every_response_allows_cross_origin() {
        let (handle, _) = start_local("initial");
        for response in [
            get(handle.local_addr(), "/ping"),
            get(handle.local_addr(), "/nope"),
            post_message(handle.local_addr(), r#"{"message": "x"}"#),
        ] {
            assert!(
                response.contains("Access-Control-Allow-Origin: *"),
                "missing CORS header in: {}",
                response
            );
        }
    }

    #[test]
    fn test_preflight_is_answered() {
        let (handle, _) = start_local("initial");
        let response = send_raw(
            handle.local_addr(),
            "OPTIONS /message HTTP/1.1\r\nHost: localhost\r\nOrigin: http://x\r\n\r\n",
        );
        assert!(response.starts_with("HTTP/1.1 204"));
        assert!(response.contains("Access-Control-Allow-Methods"));
    }

    #[test]
    fn test_concurrent_updates_yield_exactly_one_value() {
        let (handle, message) = start_local("initial");
        let addr = handle.local_addr();
        let values: Vec<String> = (0..8).map(|i| format!("value-{}", i)).collect();

        let handles: Vec<_> = values
            .iter()
            .cloned()
            .map(|v| {
                thread::spawn(move || {
                    post_message(addr, &format!(r#"{{"message": "{}"}}"#, v));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let seen = message.snapshot();
        assert!(values.contains(&seen), "torn or unknown value: {}", seen);

        let response = get(addr, "/ping");
        assert!(response.contains(&seen));
    }

    #[test]
    fn test_bad_request_does_not_stop_the_listener() {
        let (handle, _) = start_local("initial");
        let addr = handle.local_addr();
        let response = send_raw(addr, "\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 400"));
        // The loop keeps serving afterwards.
        let response = get(addr, "/ping");
        assert!(response.starts_with("HTTP/1.1 200"));
    }
}
