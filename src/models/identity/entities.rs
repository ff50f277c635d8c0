use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// 用户角色（由用户目录服务给出）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "../frontend/src/types/generated/identity.ts")]
pub enum UserRole {
    Student, // 学生
    Teacher, // 教师
    Admin,   // 管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "STUDENT";
    pub const TEACHER: &'static str = "TEACHER";
    pub const ADMIN: &'static str = "ADMIN";

    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    // 目录服务的大小写并不统一
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!(
                "Invalid user role: '{s}'. Supported roles: STUDENT, TEACHER, ADMIN"
            )),
        }
    }
}

/// 已认证的调用方
///
/// 字段与用户目录服务 `/me`、`/users/{id}` 的返回结构保持一致。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/identity.ts")]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Identity {
    pub fn is_teacher(&self) -> bool {
        matches!(self.role, UserRole::Teacher | UserRole::Admin)
    }
}

fn default_active() -> bool {
    true
}

/// 调用方的原始凭证（`Authorization` 头），转发给目录服务
#[derive(Debug, Clone)]
pub struct Credential(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("teacher".parse::<UserRole>(), Ok(UserRole::Teacher));
        assert_eq!("STUDENT".parse::<UserRole>(), Ok(UserRole::Student));
        assert!("guest".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_identity_from_directory_payload() {
        let json = r#"{
            "user_id": "8d0c6f7e-4f53-4a55-9b3e-2f0f3b0c8a11",
            "email": "ada@school.test",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "role": "STUDENT"
        }"#;
        let identity: Identity = serde_json::from_str(json).expect("valid payload");
        assert_eq!(identity.role, UserRole::Student);
        assert!(identity.is_active);
        assert!(!identity.is_teacher());
    }
}
