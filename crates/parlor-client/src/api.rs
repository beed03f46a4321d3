//! REST client for rooms and message history.
//!
//! All paths are built from segments so that room names and user ids are
//! percent-encoded. A non-success status becomes [`ClientError::Status`]
//! carrying the response body, which the UI may show verbatim.

use parlor_proto::{ChatMessage, Group};
use reqwest::{Client, Response, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{ClientError, Result};

#[derive(Debug, Serialize)]
struct CreateGroupRequest<'a> {
    name: &'a str,
}

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the API at `base`, e.g. `http://localhost:8080`.
    pub fn new(base: &str) -> Result<Self> {
        let url = Url::parse(base).map_err(|e| ClientError::InvalidUrl(format!("{base}: {e}")))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!("{base}: expected an http(s) URL")));
        }
        Ok(Self { http: Client::new(), base: url })
    }

    /// API base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Build an endpoint URL by appending encoded path segments to the base.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /groups`.
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.get_json(self.endpoint(&["groups"])?).await
    }

    /// `POST /groups`.
    pub async fn create_group(&self, name: &str) -> Result<Group> {
        let url = self.endpoint(&["groups"])?;
        let response = self.http.post(url).json(&CreateGroupRequest { name }).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// `GET /rooms/{room}/messages`.
    pub async fn room_history(&self, room: &str) -> Result<Vec<ChatMessage>> {
        self.get_json(self.endpoint(&["rooms", room, "messages"])?).await
    }

    /// `GET /dm/{peer}/messages?me={me}`.
    pub async fn private_history(&self, peer: &str, me: &str) -> Result<Vec<ChatMessage>> {
        let mut url = self.endpoint(&["dm", peer, "messages"])?;
        url.query_pairs_mut().append_pair("me", me);
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }
}

/// Turn a non-success response into [`ClientError::Status`] with its body.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, %body, "request failed");
    Err(ClientError::Status { status, body })
}
