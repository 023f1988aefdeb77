//! Blocking curl transport mapped onto the engine's failure model.
//!
//! Runs in the current thread; call from `spawn_blocking` when used from
//! async code. curl's own timeout is set to the attempt deadline too, so a
//! cancelled attempt does not leave a transfer running in the background.

use std::time::Duration;

use rex_core::retry::{TransportCode, TransportError};

/// POST a JSON body and parse the JSON response.
pub fn post_json(
    url: &str,
    body: &serde_json::Value,
    timeout: Duration,
) -> Result<serde_json::Value, TransportError> {
    let payload = body.to_string().into_bytes();
    let raw = post(url, &payload, timeout).map_err(|e| e.wrap(format!("POST {url}")))?;
    serde_json::from_slice(&raw)
        .map_err(|e| TransportError::Other(format!("malformed response body: {e}")))
}

/// Body-less HEAD request; returns the response status on success (2xx/3xx).
pub fn head_status(url: &str, timeout: Duration) -> Result<u16, TransportError> {
    let mut easy = configure(url, timeout).map_err(map_curl)?;
    easy.nobody(true).map_err(map_curl)?;
    easy.perform()
        .map_err(|e| map_curl(e).wrap(format!("HEAD {url}")))?;
    finish_status(&mut easy)
}

fn configure(url: &str, timeout: Duration) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;
    Ok(easy)
}

fn post(url: &str, body: &[u8], timeout: Duration) -> Result<Vec<u8>, TransportError> {
    let mut easy = configure(url, timeout).map_err(map_curl)?;
    easy.post(true).map_err(map_curl)?;
    easy.post_fields_copy(body).map_err(map_curl)?;
    let mut headers = curl::easy::List::new();
    headers
        .append("Content-Type: application/json")
        .map_err(map_curl)?;
    easy.http_headers(headers).map_err(map_curl)?;

    let mut response = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(map_curl)?;
        transfer.perform().map_err(map_curl)?;
    }

    let status = easy
        .response_code()
        .map_err(map_curl)
        .map(|code| code as u16)?;
    if status >= 400 {
        // Keep the body: servers often put the real story there.
        let body = Some(String::from_utf8_lossy(&response).into_owned());
        return Err(TransportError::Status { status, body });
    }
    Ok(response)
}

fn finish_status(easy: &mut curl::easy::Easy) -> Result<u16, TransportError> {
    let status = easy
        .response_code()
        .map_err(map_curl)
        .map(|code| code as u16)?;
    if status >= 400 {
        return Err(TransportError::status(status));
    }
    Ok(status)
}

/// Maps a curl error onto the engine's tagged failure shape. Unrecognized
/// curl errors stay `Other` so they are never retried.
fn map_curl(e: curl::Error) -> TransportError {
    let code = if e.is_operation_timedout() {
        Some(TransportCode::TimedOut)
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
    {
        Some(TransportCode::ConnectionRefused)
    } else if e.is_recv_error() || e.is_read_error() {
        Some(TransportCode::ConnectionReset)
    } else if e.is_send_error() {
        Some(TransportCode::ConnectionAborted)
    } else if e.is_got_nothing() || e.is_partial_file() {
        Some(TransportCode::SocketClosed)
    } else {
        None
    };
    match code {
        Some(code) => TransportError::network(code, e.description().to_string()),
        None => TransportError::Other(e.description().to_string()),
    }
}
