//! Profile creation in the profile service right after registration.
use std::time::Duration;

use async_trait::async_trait;
use geekplay_trust::services::upstream::{UpstreamError, http_client};
use geekplay_trust::token::Role;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProfile {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub nombre: String,
    pub email: String,
    pub role: Role,
}

#[async_trait]
pub trait ProfileProvisioner: Send + Sync + 'static {
    async fn create_profile(&self, profile: &NewProfile) -> Result<(), UpstreamError>;
}

#[derive(Clone, Debug)]
pub struct HttpProfileProvisioner {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpProfileProvisioner {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url,
        })
    }
}

#[async_trait]
impl ProfileProvisioner for HttpProfileProvisioner {
    async fn create_profile(&self, profile: &NewProfile) -> Result<(), UpstreamError> {
        let url = self
            .base_url
            .join("api/profile/create")
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let res = self.http.post(url).json(profile).send().await?;
        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(UpstreamError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_shape() {
        let value = serde_json::to_value(NewProfile {
            user_id: 3,
            nombre: "Ana".to_string(),
            email: "ana@mail.com".to_string(),
            role: Role::User,
        })
        .unwrap();

        assert_eq!(
            value,
            json!({ "userId": 3, "nombre": "Ana", "email": "ana@mail.com", "role": "USER" })
        );
    }

    #[tokio::test]
    async fn unreachable_profile_service_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{addr}/")).unwrap();
        let provisioner = HttpProfileProvisioner::new(base, Duration::from_millis(300)).unwrap();
        let err = provisioner
            .create_profile(&NewProfile {
                user_id: 3,
                nombre: "Ana".to_string(),
                email: "ana@mail.com".to_string(),
                role: Role::User,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Transport(_)));
    }
}
