use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    multipart::{Form, Part},
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::{ApiEnvelope, AppError};

/// Thin JSON-over-HTTP client for the clinic backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>, json: bool) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        if json {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::Auth("access token is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn send<B>(&self, method: Method, path: &str, query: &[(&str, String)],
                     auth_token: Option<&str>, body: Option<&B>)
                     -> Result<reqwest::Response, AppError>
    where B: Serialize + ?Sized {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(auth_token, true)?;

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        Self::dispatch(req).await
    }

    async fn dispatch(req: reqwest::RequestBuilder) -> Result<reqwest::Response, AppError> {
        let response = req.send().await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);
            return Err(AppError::from_status(status.as_u16(), &error_text));
        }

        Ok(response)
    }

    /// Posts a single file as the `file` part of a multipart form.
    pub async fn upload(&self, path: &str, auth_token: Option<&str>,
                        file_name: &str, content: Vec<u8>)
                        -> Result<(), AppError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Uploading {} ({} bytes) to {}", file_name, content.len(), url);

        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("application/json")
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let form = Form::new().part("file", part);

        let req = self.client.post(&url)
            .headers(self.get_headers(auth_token, false)?)
            .multipart(form);

        Self::dispatch(req).await?;
        Ok(())
    }

    /// Sends a request and decodes the JSON body as `T`.
    pub async fn request<T, B>(&self, method: Method, path: &str, query: &[(&str, String)],
                               auth_token: Option<&str>, body: Option<&B>)
                               -> Result<T, AppError>
    where T: DeserializeOwned, B: Serialize + ?Sized {
        let response = self.send(method, path, query, auth_token, body).await?;
        let bytes = response.bytes().await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            error!("Response from {} did not match the expected shape: {}", path, e);
            AppError::Decode(e.to_string())
        })
    }

    /// Like [`ApiClient::request`] but unwraps the backend's `{status, data}` envelope.
    pub async fn request_enveloped<T, B>(&self, method: Method, path: &str, query: &[(&str, String)],
                                         auth_token: Option<&str>, body: Option<&B>)
                                         -> Result<T, AppError>
    where T: DeserializeOwned, B: Serialize + ?Sized {
        let envelope: ApiEnvelope<T> = self.request(method, path, query, auth_token, body).await?;
        envelope.into_data()
    }

    /// Sends a request where only the status matters.
    pub async fn execute<B>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<&B>)
                            -> Result<(), AppError>
    where B: Serialize + ?Sized {
        self.send(method, path, &[], auth_token, body).await?;
        Ok(())
    }

    pub async fn get<T>(&self, path: &str, auth_token: Option<&str>) -> Result<T, AppError>
    where T: DeserializeOwned {
        self.request::<T, ()>(Method::GET, path, &[], auth_token, None).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
