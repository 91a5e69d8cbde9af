//! HTTP helpers for exercising the static server.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;

/// Status, content type and body of one response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// `GET http://{addr}{path}` and read the whole body.
///
/// Bypasses any proxy configured in the environment; the server under test
/// is always local.
pub async fn http_get(addr: SocketAddr, path: &str) -> Result<HttpResponse> {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .context("building HTTP client")?;

    let url = format!("http://{addr}{path}");
    let res = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;

    let status = res.status().as_u16();
    let content_type = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = res
        .bytes()
        .await
        .with_context(|| format!("reading body of {url}"))?
        .to_vec();

    Ok(HttpResponse {
        status,
        content_type,
        body,
    })
}
