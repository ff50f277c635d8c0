//! 邮件通知
//!
//! 通知在数据库提交之后由后台任务发送，发送失败只记录 `warn!`，
//! 不会影响已经返回给调用方的结果。

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, NotificationConfig};
use crate::errors::{PampError, Result};
use crate::models::identity::entities::Identity;

/// 邮件 API 的请求体
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailNotification {
    pub to: String,
    pub subject: String,
    pub message: String,
    pub from: String,
    pub button_text: String,
}

/// 项目发布或分组完成时需要的上下文
#[derive(Debug, Clone, Copy)]
pub struct ProjectRef<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

fn body(first_name: &str, lines: &[&str], link: &str) -> String {
    format!(
        "Hello {first_name},\n\n{}\n\nGood luck with your project!\n\nThe PAMP Team\n{link}",
        lines.join("\n\n")
    )
}

pub struct Mailer {
    http: reqwest::Client,
    config: NotificationConfig,
}

impl Mailer {
    pub fn new(config: NotificationConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn from_config() -> Result<Self> {
        Self::new(AppConfig::get().notification.clone())
    }

    /// 配置了邮件 API 且未关闭通知
    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    fn frontend(&self) -> &str {
        self.config.frontend_url.trim_end_matches('/')
    }

    /// 学生需要自行创建或加入分组
    pub fn group_join(&self, student: &Identity, project: ProjectRef<'_>) -> EmailNotification {
        let link = format!("{}/projects/{}/groups", self.frontend(), project.id);
        EmailNotification {
            to: student.email.clone(),
            subject: format!("Project Published: {} - Join a Group", project.name),
            message: body(
                &student.first_name,
                &[
                    &format!(
                        "Great news! The project \"{}\" has been published and is now available.",
                        project.name
                    ),
                    "You can now create or join a group for this project. Click the button below to access the groups page and get started.",
                ],
                &link,
            ),
            from: self.config.from.clone(),
            button_text: "Join a Group".to_string(),
        }
    }

    /// 学生已被分配到某个分组
    pub fn group_assigned(
        &self,
        student: &Identity,
        project: ProjectRef<'_>,
        group_id: Uuid,
        group_name: &str,
    ) -> EmailNotification {
        let link = format!(
            "{}/projects/{}/groups/{group_id}",
            self.frontend(),
            project.id
        );
        EmailNotification {
            to: student.email.clone(),
            subject: format!("Project Published: {} - Your Group is Ready", project.name),
            message: body(
                &student.first_name,
                &[
                    &format!(
                        "Great news! The project \"{}\" has been published and you have been assigned to \"{group_name}\".",
                        project.name
                    ),
                    "You can now access your group workspace and start collaborating with your teammates. Click the button below to access your group.",
                ],
                &link,
            ),
            from: self.config.from.clone(),
            button_text: "Access Your Group".to_string(),
        }
    }

    /// 分组将由教师指定
    pub fn group_pending(&self, student: &Identity, project: ProjectRef<'_>) -> EmailNotification {
        let link = format!("{}/projects/{}/groups", self.frontend(), project.id);
        EmailNotification {
            to: student.email.clone(),
            subject: format!(
                "Project Published: {} - Group Assignment Pending",
                project.name
            ),
            message: body(
                &student.first_name,
                &[
                    &format!(
                        "Great news! The project \"{}\" has been published and is now available.",
                        project.name
                    ),
                    "Your professor will assign you to a group shortly. You will receive another notification once your group assignment is ready.",
                    "In the meantime, you can view the project details and check for group updates using the link below.",
                ],
                &link,
            ),
            from: self.config.from.clone(),
            button_text: "View Project Groups".to_string(),
        }
    }

    /// 发送单封邮件
    pub async fn send(&self, notification: &EmailNotification) -> Result<()> {
        if self.config.api_key.is_empty() {
            return Err(PampError::notification("NOTIFICATION_API_KEY is not set"));
        }

        let response = self
            .http
            .post(&self.config.api_url)
            .header("X-Api-Key", &self.config.api_key)
            .json(notification)
            .send()
            .await
            .map_err(|e| PampError::notification(format!("Email API unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PampError::notification(format!(
                "Email API returned {status} - {text}"
            )));
        }

        info!("Email notification sent to {}", notification.to);
        Ok(())
    }

    /// 后台发送一批邮件，调用方不等待结果
    pub fn dispatch(self: &Arc<Self>, notifications: Vec<EmailNotification>) {
        if notifications.is_empty() {
            return;
        }
        if !self.is_enabled() {
            debug!(
                "Notifications disabled, skipping {} emails",
                notifications.len()
            );
            return;
        }

        let mailer = Arc::clone(self);
        tokio::spawn(async move {
            for notification in notifications {
                if let Err(e) = mailer.send(&notification).await {
                    warn!("Failed to send email to {}: {}", notification.to, e);
                }
            }
        });
    }
}
