use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// One canned response, served once, in order.
pub(crate) struct Route {
    path: &'static str,
    status: u16,
    body: String,
}

impl Route {
    pub(crate) fn ok(path: &'static str, body: impl Into<String>) -> Self {
        Self::status(path, 200, body)
    }

    pub(crate) fn status(path: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self {
            path,
            status,
            body: body.into(),
        }
    }
}

/// Reads one request: the head, then as many body bytes as Content-Length says.
fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

/// Serves `routes` on a random local port, one connection per route, and
/// returns the base URL plus a handle yielding the raw requests.
///
/// A request whose path does not match the expected route gets a 404.
pub(crate) fn serve(routes: Vec<Route>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}/", port);

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for route in routes {
            let (mut stream, _) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let head = read_request(&mut stream);
            let path = head.split_whitespace().nth(1).unwrap_or("").to_string();

            let (status, body) = if path == route.path {
                (route.status, route.body)
            } else {
                (404, format!("unexpected path {}", path))
            };
            let reason = if status == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            seen.push(head);
        }
        seen
    });

    (base, handle)
}
