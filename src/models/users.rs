use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色（存放在认证服务的 user_metadata.role 中）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum Role {
    Student,    // 学生
    Instructor, // 教师
    Admin,      // 管理员
}

impl Role {
    pub const STUDENT: &'static str = "student";
    pub const INSTRUCTOR: &'static str = "instructor";
    pub const ADMIN: &'static str = "admin";

    pub fn staff_roles() -> &'static [Role] {
        &[Role::Instructor, Role::Admin]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => Role::STUDENT,
            Role::Instructor => Role::INSTRUCTOR,
            Role::Admin => Role::ADMIN,
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Role::STUDENT => Ok(Role::Student),
            Role::INSTRUCTOR => Ok(Role::Instructor),
            Role::ADMIN => Ok(Role::Admin),
            _ => Err(format!(
                "Invalid role: '{s}'. Supported roles: student, instructor, admin"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

// 认证服务中的用户
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    #[serde(
        default,
        deserialize_with = "crate::utils::time::deserialize_timestamp_opt"
    )]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AuthUser {
    /// 解析 user_metadata.role，未设置或无法识别时为 None
    pub fn role(&self) -> Option<Role> {
        self.user_metadata
            .role
            .as_deref()
            .and_then(|r| r.parse().ok())
    }
}

/// 认证服务签发的会话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: AuthUser,
}

/// 当前请求解析出的会话，存放在请求扩展中
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        self.user.role()
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

pub mod requests {
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct LoginForm {
        pub email: Option<String>,
        pub password: Option<String>,
    }
}

pub mod responses {
    use serde::Serialize;
    use ts_rs::TS;

    use super::{AuthUser, Role};

    /// 布局数据
    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub struct SessionResponse {
        pub user: Option<AuthUser>,
        pub role: Option<Role>,
    }

    /// 登录失败时回显的表单值
    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub struct LoginFailure {
        pub email: String,
    }
}
