use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::auth_token::AuthToken;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::interceptor::{ResponseInfo, ResponseInterceptor};

/// HTTP client bound to the backend base URL.
///
/// Every request carries the current bearer token, if any, and every response
/// goes through the configured interceptors before reaching the caller.
/// Nothing is retried.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Arc<AuthToken>,
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

pub struct ApiClientBuilder {
    base_url: Url,
    with_credentials: bool,
    auth_token: Arc<AuthToken>,
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ApiClientBuilder {
    pub fn interceptor(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, */*"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(self.with_credentials)
            .build()?;
        debug!(
            base_url = %self.base_url,
            with_credentials = self.with_credentials,
            interceptors = self.interceptors.len(),
            "Api client ready"
        );
        Ok(ApiClient {
            http,
            base_url: self.base_url,
            auth_token: self.auth_token,
            interceptors: self.interceptors,
        })
    }
}

impl ApiClient {
    pub fn builder(config: &ClientConfig, auth_token: Arc<AuthToken>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: config.api_url.clone(),
            with_credentials: config.with_credentials(),
            auth_token,
            interceptors: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth_token(&self) -> &Arc<AuthToken> {
        &self.auth_token
    }

    /// Sets or removes the bearer token used by all subsequent requests.
    pub fn set_auth_token(&self, token: Option<&str>) {
        self.auth_token.set(token);
    }

    /// Resolves `path` below the base URL, keeping the base path (`/api`).
    /// Any query or fragment on the base URL is dropped.
    pub fn url(&self, path: &str) -> Result<Url> {
        let mut target = self.base_url.clone();
        target.set_query(None);
        target.set_fragment(None);
        target
            .path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(target)
    }

    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.url(path)?))
    }

    /// Sends the request and runs the interceptors on whatever status comes
    /// back. 4xx and 5xx statuses are returned as [`Error::Status`] with the
    /// response body; network failures never reach the interceptors.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let mut request = request.build()?;
        if let Some(value) = self.auth_token.header_value() {
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "Sending request");

        let response = self.http.execute(request).await.map_err(|error| {
            warn!(%method, %url, %error, "Request failed");
            Error::from(error)
        })?;

        let status = response.status();
        let info = ResponseInfo {
            method: &method,
            url: &url,
            status,
        };
        for interceptor in &self.interceptors {
            interceptor.on_response(&info);
        }

        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            debug!(%method, %url, %status, "Request rejected");
            return Err(Error::Status { status, body });
        }
        debug!(%method, %url, %status, "Request completed");
        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        read_json(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    /// Deletes the resource; the response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    /// Raw body of a binary endpoint, e.g. a PDF export.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;
        let request = self.request(method, path)?.body(payload);
        let response = self.send(request).await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
