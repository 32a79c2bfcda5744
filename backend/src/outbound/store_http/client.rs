//! Reqwest-backed data-store adapter.
//!
//! This adapter owns transport details only: URL building, bearer
//! credentials, timeouts, HTTP status mapping and JSON decoding into domain
//! types. It implements every store-backed port.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    AssignBody, AuthResponseDto, CategoryBody, CategoryDto, ComplaintDto, CreateComplaintBody,
    LoginBody, MessageDto, RegisterBody, StatsDto, StatusBody, UserDto,
};
use crate::domain::ports::{AuthGateway, CategoryStore, ComplaintStore, StoreError, UserDirectory};
use crate::domain::{
    Account, Category, CategoryDraft, CategoryId, Complaint, ComplaintId, ComplaintStats,
    LoginCredentials, NewComplaint, Principal, PrincipalId, Registration, SessionGrant,
    StatusChange,
};

/// HTTP client for the remote data store rooted at one base URL.
#[derive(Debug, Clone)]
pub struct StoreHttpClient {
    client: Client,
    base: Url,
}

impl StoreHttpClient {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// A trailing slash is added to `base` so relative paths nest beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(mut base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// Base URL every request is resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::transport(format!("store URL {} cannot hold a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorised(&self, request: RequestBuilder, principal: &Principal) -> RequestBuilder {
        request.bearer_auth(principal.token().expose())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let body = self.execute(request).await?;
        serde_json::from_slice(&body)
            .map_err(|error| StoreError::decode(format!("invalid data store JSON payload: {error}")))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, StoreError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "data store responded");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn decode_all<D, T>(items: Vec<D>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<D, Error = String>,
{
    items
        .into_iter()
        .map(|item| T::try_from(item).map_err(StoreError::decode))
        .collect()
}

fn decode_one<D, T>(item: D) -> Result<T, StoreError>
where
    T: TryFrom<D, Error = String>,
{
    T::try_from(item).map_err(StoreError::decode)
}

#[async_trait]
impl ComplaintStore for StoreHttpClient {
    async fn list_complaints(&self, principal: &Principal) -> Result<Vec<Complaint>, StoreError> {
        let url = self.endpoint(&["complaints"])?;
        let listed: Vec<ComplaintDto> = self
            .fetch(self.authorised(self.client.get(url), principal))
            .await?;
        decode_all(listed)
    }

    async fn create_complaint(
        &self,
        principal: &Principal,
        complaint: &NewComplaint,
    ) -> Result<Complaint, StoreError> {
        let url = self.endpoint(&["complaints"])?;
        let request = self
            .authorised(self.client.post(url), principal)
            .json(&CreateComplaintBody::from(complaint));
        decode_one(self.fetch::<ComplaintDto>(request).await?)
    }

    async fn update_complaint_status(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        change: &StatusChange,
    ) -> Result<Complaint, StoreError> {
        let url = self.endpoint(&["complaints", id.as_str()])?;
        let request = self
            .authorised(self.client.put(url), principal)
            .json(&StatusBody::from(change));
        decode_one(self.fetch::<ComplaintDto>(request).await?)
    }

    async fn assign_complaint(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        assignee: &PrincipalId,
    ) -> Result<Complaint, StoreError> {
        let url = self.endpoint(&["complaints", id.as_str(), "assign"])?;
        let request = self
            .authorised(self.client.patch(url), principal)
            .json(&AssignBody {
                assigned_to: assignee.as_str(),
            });
        decode_one(self.fetch::<ComplaintDto>(request).await?)
    }

    async fn delete_complaint(
        &self,
        principal: &Principal,
        id: &ComplaintId,
    ) -> Result<(), StoreError> {
        let url = self.endpoint(&["complaints", id.as_str()])?;
        self.execute(self.authorised(self.client.delete(url), principal))
            .await
            .map(drop)
    }

    async fn complaint_stats(&self, principal: &Principal) -> Result<ComplaintStats, StoreError> {
        let url = self.endpoint(&["admin", "complaint-stats"])?;
        let stats: StatsDto = self
            .fetch(self.authorised(self.client.get(url), principal))
            .await?;
        Ok(stats.into())
    }
}

#[async_trait]
impl CategoryStore for StoreHttpClient {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let url = self.endpoint(&["categories"])?;
        let listed: Vec<CategoryDto> = self.fetch(self.client.get(url)).await?;
        decode_all(listed)
    }

    async fn create_category(
        &self,
        principal: &Principal,
        draft: &CategoryDraft,
    ) -> Result<Category, StoreError> {
        let url = self.endpoint(&["categories"])?;
        let request = self
            .authorised(self.client.post(url), principal)
            .json(&CategoryBody::from(draft));
        decode_one(self.fetch::<CategoryDto>(request).await?)
    }

    async fn update_category(
        &self,
        principal: &Principal,
        id: &CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, StoreError> {
        let url = self.endpoint(&["categories", id.as_str()])?;
        let request = self
            .authorised(self.client.put(url), principal)
            .json(&CategoryBody::from(draft));
        decode_one(self.fetch::<CategoryDto>(request).await?)
    }

    async fn delete_category(
        &self,
        principal: &Principal,
        id: &CategoryId,
    ) -> Result<(), StoreError> {
        let url = self.endpoint(&["categories", id.as_str()])?;
        self.execute(self.authorised(self.client.delete(url), principal))
            .await
            .map(drop)
    }
}

#[async_trait]
impl UserDirectory for StoreHttpClient {
    async fn list_users(&self, principal: &Principal) -> Result<Vec<Account>, StoreError> {
        let url = self.endpoint(&["admin", "users"])?;
        let listed: Vec<UserDto> = self
            .fetch(self.authorised(self.client.get(url), principal))
            .await?;
        decode_all(listed)
    }

    async fn delete_user(
        &self,
        principal: &Principal,
        id: &PrincipalId,
    ) -> Result<(), StoreError> {
        let url = self.endpoint(&["admin", "users", id.as_str()])?;
        self.execute(self.authorised(self.client.delete(url), principal))
            .await
            .map(drop)
    }
}

#[async_trait]
impl AuthGateway for StoreHttpClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionGrant, StoreError> {
        let url = self.endpoint(&["auth", "login"])?;
        let request = self.client.post(url).json(&LoginBody::from(credentials));
        decode_one(self.fetch::<AuthResponseDto>(request).await?)
    }

    async fn register(&self, registration: &Registration) -> Result<SessionGrant, StoreError> {
        let url = self.endpoint(&["auth", "register"])?;
        let request = self
            .client
            .post(url)
            .json(&RegisterBody::from(registration));
        decode_one(self.fetch::<AuthResponseDto>(request).await?)
    }
}

fn map_transport_error(error: reqwest::Error) -> StoreError {
    if error.is_decode() {
        StoreError::decode(error.to_string())
    } else {
        StoreError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> StoreError {
    let message = serde_json::from_slice::<MessageDto>(body)
        .map(|dto| dto.message)
        .ok()
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            let preview = body_preview(body);
            if preview.is_empty() {
                format!("status {}", status.as_u16())
            } else {
                format!("status {}: {}", status.as_u16(), preview)
            }
        });

    match status {
        StatusCode::UNAUTHORIZED => StoreError::unauthorized(message),
        StatusCode::FORBIDDEN => StoreError::forbidden(message),
        StatusCode::NOT_FOUND => StoreError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            StoreError::transport(message)
        }
        _ if status.is_client_error() => StoreError::rejected(message),
        _ => StoreError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
