//! `gloo-net` implementation of [`HttpBackend`].
//!
//! ERROR HANDLING
//! ==============
//! Transport failures map to [`ApiError::Network`]; an unreadable response
//! body maps to [`ApiError::Decode`]. Status codes are passed through
//! untouched for the core client to interpret.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use chatroom::api::{ApiRequest, ApiResponse, HttpBackend};
use chatroom::error::ApiError;

#[cfg(not(feature = "csr"))]
const UNAVAILABLE: &str = "http is only available in the browser";

#[derive(Clone, Copy, Debug, Default)]
pub struct GlooHttp;

impl HttpBackend for GlooHttp {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            let mut builder = gloo_net::http::Request::post(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let prepared = match &request.body {
                Some(body) => builder.json(body),
                None => builder.build(),
            }
            .map_err(|e| ApiError::Network(e.to_string()))?;

            let response = prepared.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(ApiResponse { status, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(ApiError::Network(UNAVAILABLE.to_owned()))
        }
    }
}
