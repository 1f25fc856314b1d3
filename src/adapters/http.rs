//! HTTP fetch adapter over the ESP-IDF HTTP client.
//!
//! Implements [`FetchPort`] with a bounded request timeout so a stalled
//! download surfaces as `FetchError::Timeout` instead of hanging the
//! dispatch loop. The whole body is buffered — modules and configs are
//! small relative to device RAM, and the update flow needs the complete
//! payload for its byte-for-byte comparison anyway.

use std::time::Duration;

use log::warn;

use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use esp_idf_svc::http::Method;
use esp_idf_svc::io::Read;

use crate::app::ports::{FetchError, FetchPort, FetchResponse};

const READ_CHUNK: usize = 1024;

pub struct EspHttpFetch {
    timeout: Duration,
}

impl EspHttpFetch {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl FetchPort for EspHttpFetch {
    fn fetch(&mut self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut conn = EspHttpConnection::new(&Configuration {
            timeout: Some(self.timeout),
            use_global_ca_store: true,
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        })
        .map_err(|e| {
            warn!("HTTP | client init failed: {e}");
            FetchError::Connection
        })?;

        conn.initiate_request(Method::Get, url, &[])
            .map_err(|e| {
                warn!("HTTP | request to {url} failed: {e}");
                FetchError::BadUrl
            })?;
        conn.initiate_response().map_err(|e| {
            warn!("HTTP | no response from {url}: {e}");
            FetchError::Timeout
        })?;

        let status = conn.status();
        let mut body = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = conn.read(&mut chunk).map_err(|e| {
                warn!("HTTP | read from {url} failed: {e}");
                FetchError::Connection
            })?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }

        Ok(FetchResponse { status, body })
    }
}
