//! Profile lookup against the profile-owning service.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::services::upstream::{UpstreamError, http_client};

/// Author identity shown next to forum content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Remote source of profile summaries.
///
/// Implementations must be cheap to share (`Arc<dyn ProfileLookup>`).
#[async_trait]
pub trait ProfileLookup: Send + Sync + 'static {
    async fn fetch_profile(&self, user_id: i64) -> Result<ProfileSummary, UpstreamError>;
}

/// Fields we read from `GET /api/profile/{userId}`; the rest of the payload is ignored.
#[derive(Debug, Deserialize)]
struct ProfilePayload {
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default, rename = "avatarUrl")]
    avatar_url: Option<String>,
}

impl ProfilePayload {
    fn into_summary(self) -> Result<ProfileSummary, UpstreamError> {
        let display_name = self
            .nombre
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| UpstreamError::Decode("profile without 'nombre'".to_string()))?;

        let avatar_url = self
            .avatar_url
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        Ok(ProfileSummary {
            display_name,
            avatar_url,
        })
    }
}

#[derive(Clone, Debug)]
pub struct HttpProfileClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpProfileClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url,
        })
    }

    fn profile_url(&self, user_id: i64) -> Result<Url, UpstreamError> {
        self.base_url
            .join(&format!("api/profile/{user_id}"))
            .map_err(|e| UpstreamError::Transport(e.to_string()))
    }
}

#[async_trait]
impl ProfileLookup for HttpProfileClient {
    async fn fetch_profile(&self, user_id: i64) -> Result<ProfileSummary, UpstreamError> {
        let url = self.profile_url(user_id)?;
        tracing::debug!(user_id, %url, "fetching profile");

        let res = self.http.get(url).send().await?;

        match res.status() {
            reqwest::StatusCode::OK => {}
            reqwest::StatusCode::NOT_FOUND => return Err(UpstreamError::NotFound),
            other => return Err(UpstreamError::Status(other.as_u16())),
        }

        let payload: ProfilePayload = res.json().await?;
        payload.into_summary()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::{Json, Router, extract::Path, http::StatusCode, routing::get};
    use serde_json::json;

    use super::*;
    use crate::config::parse_base_url;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub(crate) async fn spawn_server(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        parse_base_url(&format!("http://{addr}")).unwrap()
    }

    /// Base URL nobody listens on (connection refused).
    pub(crate) async fn dead_url() -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        parse_base_url(&format!("http://{addr}")).unwrap()
    }

    async fn profile(Path(user_id): Path<i64>) -> Result<Json<serde_json::Value>, StatusCode> {
        match user_id {
            5 => Ok(Json(json!({
                "id": 5,
                "nombre": "Ricardo Gamer",
                "email": "ricardo@mail.com",
                "avatarUrl": "https://cdn.test/ricardo.png",
                "biografia": null
            }))),
            6 => Ok(Json(json!({ "id": 6, "nombre": "Ana", "avatarUrl": null }))),
            7 => Ok(Json(json!({ "id": 7, "nombre": "   " }))),
            13 => Err(StatusCode::INTERNAL_SERVER_ERROR),
            99 => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok(Json(json!({ "id": 99, "nombre": "Too Late" })))
            }
            _ => Err(StatusCode::NOT_FOUND),
        }
    }

    async fn client() -> HttpProfileClient {
        let base = spawn_server(Router::new().route("/api/profile/{user_id}", get(profile))).await;
        HttpProfileClient::new(base, Duration::from_millis(300)).unwrap()
    }

    #[tokio::test]
    async fn reads_name_and_avatar() {
        let summary = client().await.fetch_profile(5).await.unwrap();
        assert_eq!(
            summary,
            ProfileSummary {
                display_name: "Ricardo Gamer".to_string(),
                avatar_url: Some("https://cdn.test/ricardo.png".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn null_avatar_is_none() {
        let summary = client().await.fetch_profile(6).await.unwrap();
        assert_eq!(summary.display_name, "Ana");
        assert_eq!(summary.avatar_url, None);
    }

    #[tokio::test]
    async fn blank_name_is_a_decode_error() {
        let err = client().await.fetch_profile(7).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn maps_statuses() {
        let c = client().await;
        assert!(matches!(c.fetch_profile(404).await, Err(UpstreamError::NotFound)));
        assert!(matches!(c.fetch_profile(13).await, Err(UpstreamError::Status(500))));
    }

    #[tokio::test]
    async fn slow_profile_service_times_out() {
        let err = client().await.fetch_profile(99).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout));
    }

    #[tokio::test]
    async fn unreachable_profile_service_is_transport_error() {
        let c = HttpProfileClient::new(dead_url().await, Duration::from_millis(300)).unwrap();
        let err = c.fetch_profile(5).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)));
    }
}
