use serde::Serialize;
use ts_rs::TS;

use super::courses::CourseOption;
use super::profiles::Profile;
use super::users::Role;

/// 管理员仪表盘统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardStats {
    pub students: u64,
    pub instructors: u64,
    pub admins: u64,
    pub courses: u64,
}

/// 仪表盘中的档案，管理员缺少档案行时由邮箱推导
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardProfile {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl From<Profile> for DashboardProfile {
    fn from(profile: Profile) -> Self {
        Self {
            id: Some(profile.id),
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: Some(profile.email),
        }
    }
}

impl DashboardProfile {
    /// 由邮箱推导：名字取邮箱 @ 之前的部分，缺失时为 "Admin"
    pub fn derived_from_email(email: Option<&str>) -> Self {
        let first_name = email
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or("Admin")
            .to_string();
        Self {
            id: None,
            first_name: Some(first_name),
            last_name: None,
            email: email.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardResponse {
    pub role: Option<Role>,
    pub profile: Option<DashboardProfile>,
    pub courses: Vec<CourseOption>,
    pub stats: Option<DashboardStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_admin_profile() {
        let p = DashboardProfile::derived_from_email(Some("grace@example.com"));
        assert_eq!(p.first_name.as_deref(), Some("grace"));
        assert_eq!(p.email.as_deref(), Some("grace@example.com"));

        let p = DashboardProfile::derived_from_email(None);
        assert_eq!(p.first_name.as_deref(), Some("Admin"));
        assert_eq!(p.email, None);
    }
}
