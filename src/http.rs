//! reqwest による `Transport` 実装

use std::time::Duration;

use ammo_inventory_common::{
    ClientConfig, Error, HttpRequest, HttpResponse, Method, RequestBody, Transport,
};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::{AppError, Result};

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms as u64))
            .build()
            .map_err(|e| AppError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn map_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Transport(err.to_string())
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ammo_inventory_common::Result<HttpResponse> {
        let url = self.url(&request.path);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::File { field, file_name, bytes } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("text/csv")
                    .map_err(map_error)?;
                builder.multipart(Form::new().part(field, part))
            }
        };

        let response = builder.send().await.map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_error)?;
        debug!(%url, status, bytes = body.len(), "response");

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let transport = ReqwestTransport::new("http://localhost:5000/", &ClientConfig::default()).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000");
        assert_eq!(transport.url("/api/upcs"), "http://localhost:5000/api/upcs");
    }
}
