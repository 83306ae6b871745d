// src/remote/api_client.rs

use std::sync::Arc;

use axum::http::{header, StatusCode};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{common::error::RemoteError, middleware::auth::AuthContext};

/// Cliente da API oficial. Uma tentativa por requisição, sem retry e sem
/// timeout além do padrão do transporte.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        reqwest::Url::parse(base_url).map_err(|_| RemoteError::InvalidUrl(base_url.to_string()))?;

        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: &AuthContext,
    ) -> Result<Value, RemoteError> {
        let builder = self.request(Method::GET, path).query(query);
        self.send(builder, auth).await
    }

    pub async fn post<B>(&self, path: &str, body: &B, auth: &AuthContext) -> Result<Value, RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.send(builder, auth).await
    }

    pub async fn put<B>(&self, path: &str, body: &B, auth: &AuthContext) -> Result<Value, RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path).json(body);
        self.send(builder, auth).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, builder: RequestBuilder, auth: &AuthContext) -> Result<Value, RemoteError> {
        let mut builder = builder.header(header::ACCEPT, "application/json");
        if let Some(authorization) = auth.authorization() {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }

        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "enviando requisição à API oficial");

        let response = self.http.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%method, %url, %status, "resposta da API oficial");

        if !status.is_success() {
            return Err(RemoteError::Status {
                status,
                message: error_message(status, &bytes),
            });
        }

        // (d) corpo vazio ou JSON malformado num 2xx vira objeto vazio
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new())))
    }
}

// Mensagem estruturada (`error`/`message`) quando houver; senão o texto cru.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        let structured = match &json {
            Value::Object(map) => ["error", "message", "mensaje"]
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str)),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        };
        if let Some(message) = structured.filter(|m| !m.trim().is_empty()) {
            return message.to_string();
        }
    }

    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    if !raw.is_empty() {
        return raw.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
