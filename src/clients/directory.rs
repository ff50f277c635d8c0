use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::{PampError, Result};
use crate::models::identity::entities::Identity;

/// 用户目录服务
///
/// 所有请求都转发调用方自己的 `Authorization` 头。
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 解析凭证对应的用户（`GET /me`）；凭证无效返回 Authentication
    async fn current_identity(&self, authorization: &str) -> Result<Identity>;

    /// 按 id 查询用户（`GET /users/{id}`）；不存在返回 `Ok(None)`
    async fn find_user(&self, authorization: &str, user_id: Uuid) -> Result<Option<Identity>>;

    /// 只保留目录中存在的用户，保持原有顺序
    async fn retain_known_users(&self, authorization: &str, ids: Vec<Uuid>) -> Result<Vec<Uuid>> {
        let mut known = Vec::with_capacity(ids.len());
        for id in ids {
            match self.find_user(authorization, id).await? {
                Some(_) => known.push(id),
                None => debug!("Dropping unknown user {}", id),
            }
        }
        Ok(known)
    }
}

/// 基于 HTTP 的用户目录客户端
pub struct HttpDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDirectory {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config() -> Result<Self> {
        let config = AppConfig::get();
        Self::new(&config.directory.url, config.directory.timeout)
    }

    async fn get_identity(&self, url: String, authorization: &str) -> Result<reqwest::Response> {
        self.http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| PampError::directory_service(format!("User directory unreachable: {e}")))
    }
}

#[async_trait]
impl UserDirectory for HttpDirectory {
    async fn current_identity(&self, authorization: &str) -> Result<Identity> {
        let response = self
            .get_identity(format!("{}/me", self.base_url), authorization)
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<Identity>().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(PampError::authentication("Invalid or expired token"))
            }
            status => {
                warn!("User directory /me returned {}", status);
                Err(PampError::directory_service(format!(
                    "User directory returned {status}"
                )))
            }
        }
    }

    async fn find_user(&self, authorization: &str, user_id: Uuid) -> Result<Option<Identity>> {
        let response = self
            .get_identity(format!("{}/users/{user_id}", self.base_url), authorization)
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json::<Identity>().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(PampError::directory_service(format!(
                "User directory returned {status} for user {user_id}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::identity::entities::UserRole;
    use std::collections::HashMap;

    struct StaticDirectory {
        users: HashMap<Uuid, Identity>,
    }

    #[async_trait]
    impl UserDirectory for StaticDirectory {
        async fn current_identity(&self, _authorization: &str) -> Result<Identity> {
            Err(PampError::authentication("no caller"))
        }

        async fn find_user(&self, _authorization: &str, user_id: Uuid) -> Result<Option<Identity>> {
            Ok(self.users.get(&user_id).cloned())
        }
    }

    fn student(id: Uuid) -> Identity {
        Identity {
            user_id: id,
            email: format!("{id}@school.test"),
            first_name: "Sam".into(),
            last_name: "Doe".into(),
            role: UserRole::Student,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_retain_known_users_keeps_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let directory = StaticDirectory {
            users: [(a, student(a)), (c, student(c))].into_iter().collect(),
        };

        let kept = directory
            .retain_known_users("Bearer t", vec![c, b, a])
            .await
            .expect("lookup succeeds");
        assert_eq!(kept, vec![c, a]);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let directory = HttpDirectory::new("http://users.local/", 5).expect("client builds");
        assert_eq!(directory.base_url, "http://users.local");
    }
}
