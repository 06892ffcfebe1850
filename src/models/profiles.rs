//! 学生、教师、管理员三张表共用的档案结构

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::users::Role;

/// 档案种类，决定表名和主键列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub enum ProfileKind {
    Student,
    Instructor,
    Admin,
}

impl ProfileKind {
    pub fn table(&self) -> &'static str {
        match self {
            ProfileKind::Student => "students",
            ProfileKind::Instructor => "instructors",
            ProfileKind::Admin => "admins",
        }
    }

    pub fn id_column(&self) -> &'static str {
        match self {
            ProfileKind::Student => "student_id",
            ProfileKind::Instructor => "instructor_id",
            ProfileKind::Admin => "admin_id",
        }
    }

    pub fn role(&self) -> Role {
        match self {
            ProfileKind::Student => Role::Student,
            ProfileKind::Instructor => Role::Instructor,
            ProfileKind::Admin => Role::Admin,
        }
    }

    /// 用于提示信息的名称
    pub fn label(&self) -> &'static str {
        self.role().as_str()
    }

    /// 首字母大写的名称，例如 "Instructor"
    pub fn title(&self) -> &'static str {
        match self {
            ProfileKind::Student => "Student",
            ProfileKind::Instructor => "Instructor",
            ProfileKind::Admin => "Admin",
        }
    }
}

impl From<Role> for ProfileKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => ProfileKind::Student,
            Role::Instructor => ProfileKind::Instructor,
            Role::Admin => ProfileKind::Admin,
        }
    }
}

// 档案行，主键列按种类不同而不同
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct Profile {
    #[serde(alias = "student_id", alias = "instructor_id", alias = "admin_id")]
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::utils::time::deserialize_timestamp_opt"
    )]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 插入档案
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// 更新档案，None 字段不提交
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// 列表排序
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOrder {
    pub column: &'static str,
    pub ascending: bool,
}

pub mod requests {
    use serde::Deserialize;

    /// 新建账号表单（学生、教师、管理员通用）
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct CreateAccountForm {
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct UpdateInstructorForm {
        pub instructor_id: Option<String>,
        pub user_id: Option<String>,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct DeleteInstructorForm {
        pub instructor_id: Option<String>,
        pub user_id: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct DeleteAdminForm {
        pub admin_id: Option<String>,
        pub user_id: Option<String>,
    }

    /// `/students` 查询参数
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StudentListQuery {
        pub sort_by: Option<String>,
        pub sort_order: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct EnrollStudentForm {
        pub course_id: Option<String>,
    }
}

pub mod responses {
    use serde::Serialize;
    use ts_rs::TS;

    use super::{Profile, ProfileKind};
    use crate::models::assignments::{GradeSummary, GradedAssignment};
    use crate::models::courses::CourseOption;

    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
    pub struct StudentListResponse {
        pub students: Vec<Profile>,
        pub sort_by: String,
        pub sort_order: String,
    }

    /// 学生已选课程及其成绩
    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
    pub struct EnrolledCourseView {
        pub enrollment_id: i64,
        pub enrollment_date: Option<chrono::NaiveDate>,
        pub course_id: i64,
        pub course_name: String,
        pub ects: i32,
        pub hours: Option<i32>,
        pub format: Option<String>,
        pub assignments: Vec<GradedAssignment>,
        pub summary: GradeSummary,
    }

    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
    pub struct StudentDetailResponse {
        pub student: Profile,
        pub enrolled_courses: Vec<EnrolledCourseView>,
        pub available_courses: Vec<CourseOption>,
        pub total_ects: i32,
        pub overall_average: Option<f64>,
        pub can_enroll: bool,
    }

    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
    pub struct StaffListResponse {
        pub instructors: Vec<Profile>,
        pub admins: Vec<Profile>,
    }

    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
    pub struct StaffMemberResponse {
        pub role: ProfileKind,
        pub member: Profile,
    }

    /// 新建账号成功后返回
    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
    pub struct AccountCreatedResponse {
        pub user_id: String,
        pub profile: Profile,
    }

    /// 新建账号失败时回显表单（不含密码）
    #[derive(Debug, Clone, Default, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
    pub struct AccountFormEcho {
        pub first_name: String,
        pub last_name: String,
        pub email: String,
    }
}
