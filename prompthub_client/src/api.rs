use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{LikeResponse, Meta, Prompt, PromptId, PromptInput, PromptPage};
use crate::query::{endpoint_url, ListRequest};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Failures at the HTTP boundary. Transport errors, non-2xx statuses and
/// undecodable bodies all become `RequestFailed`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
    #[error("request to {path} failed: {reason}")]
    RequestFailed { path: String, reason: String },
}

impl ApiError {
    pub fn request_failed(path: impl Into<String>, reason: impl ToString) -> Self {
        ApiError::RequestFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the client needs from the prompt API.
pub trait PromptBackend: Clone + Send + 'static {
    fn list_prompts(&self, request: &ListRequest) -> Result<PromptPage, ApiError>;
    fn get_prompt(&self, id: PromptId) -> Result<Prompt, ApiError>;
    fn create_prompt(&self, input: &PromptInput) -> Result<Prompt, ApiError>;
    fn update_prompt(&self, id: PromptId, input: &PromptInput) -> Result<Prompt, ApiError>;
    fn delete_prompt(&self, id: PromptId) -> Result<(), ApiError>;
    fn like_prompt(&self, id: PromptId) -> Result<LikeResponse, ApiError>;
    fn get_meta(&self) -> Result<Meta, ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::request_failed("<client>", err))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn url(&self, path: &str) -> Url {
        endpoint_url(&self.base_url, path)
    }

    fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .map_err(|err| ApiError::request_failed(path, err))?;
        response
            .error_for_status()
            .map_err(|err| ApiError::request_failed(path, err))
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        self.send(path, request)?
            .json()
            .map_err(|err| ApiError::request_failed(path, err))
    }
}

impl PromptBackend for ApiClient {
    fn list_prompts(&self, request: &ListRequest) -> Result<PromptPage, ApiError> {
        let url = request.to_url(&self.base_url);
        self.send_json(request.path, self.client.get(url))
    }

    fn get_prompt(&self, id: PromptId) -> Result<Prompt, ApiError> {
        let path = format!("/api/prompts/{id}");
        self.send_json(&path, self.client.get(self.url(&path)))
    }

    fn create_prompt(&self, input: &PromptInput) -> Result<Prompt, ApiError> {
        let path = "/api/prompts";
        self.send_json(path, self.client.post(self.url(path)).json(input))
    }

    fn update_prompt(&self, id: PromptId, input: &PromptInput) -> Result<Prompt, ApiError> {
        let path = format!("/api/prompts/{id}");
        self.send_json(&path, self.client.put(self.url(&path)).json(input))
    }

    fn delete_prompt(&self, id: PromptId) -> Result<(), ApiError> {
        let path = format!("/api/prompts/{id}");
        self.send(&path, self.client.delete(self.url(&path)))?;
        Ok(())
    }

    fn like_prompt(&self, id: PromptId) -> Result<LikeResponse, ApiError> {
        let path = format!("/api/prompts/{id}/like");
        self.send_json(&path, self.client.post(self.url(&path)))
    }

    fn get_meta(&self) -> Result<Meta, ApiError> {
        let path = "/api/meta";
        self.send_json(path, self.client.get(self.url(path)))
    }
}

fn sanitize_base_url(mut base: String) -> Result<Url, ApiError> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    Url::parse(&base).map_err(|_| ApiError::InvalidBaseUrl(base))
}
