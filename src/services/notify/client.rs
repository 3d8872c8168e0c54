//! Delivery of notices to the notification service.
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::notice::ModerationNotice;
use crate::services::upstream::{UpstreamError, http_client};

/// Remote sink for moderation notices.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn deliver(&self, notice: &ModerationNotice) -> Result<(), UpstreamError>;
}

#[derive(Clone, Debug)]
pub struct HttpNotificationClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpNotificationClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url,
        })
    }
}

#[async_trait]
impl NotificationSink for HttpNotificationClient {
    async fn deliver(&self, notice: &ModerationNotice) -> Result<(), UpstreamError> {
        let url = self
            .base_url
            .join("api/notifications/create")
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let res = self.http.post(url).json(&notice.to_wire()).send().await?;

        match res.status().as_u16() {
            200 | 201 => Ok(()),
            404 => Err(UpstreamError::NotFound),
            other => Err(UpstreamError::Status(other)),
        }
    }
}
