//! Minimal HTTP/1.1 server with scriptable failures for integration tests.
//!
//! Serves a fixed JSON body, but answers the first `fail_count` requests
//! with a configurable error status, or stalls without ever responding.
//! The server runs in a background thread until the process exits.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct FlakyServerOptions {
    /// Answer this many requests with `fail_status` before succeeding.
    pub fail_count: usize,
    /// Status for the failing responses (e.g. 500).
    pub fail_status: u16,
    /// If true, accept connections and read the request but never respond.
    pub stall: bool,
}

impl Default for FlakyServerOptions {
    fn default() -> Self {
        Self {
            fail_count: 0,
            fail_status: 500,
            stall: false,
        }
    }
}

/// Starts the server; returns its address ("127.0.0.1:port") and a counter
/// of requests received, so tests can assert attempt counts server-side.
pub fn start(opts: FlakyServerOptions) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().unwrap().to_string();
    let requests = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || handle(stream, n, opts));
        }
    });
    (addr, requests)
}

fn handle(mut stream: std::net::TcpStream, request_index: usize, opts: FlakyServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 4096];
    if matches!(stream.read(&mut buf), Ok(0) | Err(_)) {
        return;
    }

    if opts.stall {
        // Hold the connection open well past any per-attempt deadline the
        // tests use, then drop it.
        thread::sleep(Duration::from_secs(10));
        return;
    }

    let response = if request_index < opts.fail_count {
        format!(
            "HTTP/1.1 {} Error\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{{\"status\":\"failure\",\"message\":\"Ooops\"}}",
            opts.fail_status
        )
    } else {
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{\"status\":\"ok\"}"
            .to_string()
    };
    let _ = stream.write_all(response.as_bytes());
}
