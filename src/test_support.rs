//! One-shot HTTP server for exercising the blocking adapters

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Answers exactly one request with a canned response
pub struct CannedServer {
    base_url: String,
    handle: JoinHandle<String>,
}

impl CannedServer {
    pub fn respond(status: &str, content_type: &str, body: &[u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");

        let mut response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept request");
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0usize;
            let mut chunked = false;

            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).expect("read header") == 0 {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
                if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                    chunked = true;
                }
                request.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }

            let mut body = Vec::new();
            if chunked {
                loop {
                    let mut size_line = String::new();
                    reader.read_line(&mut size_line).expect("read chunk size");
                    let size = usize::from_str_radix(size_line.trim(), 16).unwrap_or(0);
                    let mut chunk = vec![0; size + 2];
                    reader.read_exact(&mut chunk).expect("read chunk");
                    if size == 0 {
                        break;
                    }
                    body.extend_from_slice(&chunk[..size]);
                }
            } else {
                body.resize(content_length, 0);
                reader.read_exact(&mut body).expect("read body");
            }

            reader.get_mut().write_all(&response).expect("write response");
            request.push_str(&String::from_utf8_lossy(&body));
            request
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    pub fn json(status: &str, body: &str) -> Self {
        Self::respond(status, "application/json", body.as_bytes())
    }

    /// `http://127.0.0.1:<port>` with no trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Raw request line, headers and body as received
    pub fn request(self) -> String {
        self.handle.join().expect("server thread")
    }
}
