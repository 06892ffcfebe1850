use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程嵌入的授课教师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseInstructor {
    pub instructor_id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub course_id: i64,
    pub course_name: String,
    pub ects: i32,
    pub hours: i32,
    pub format: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub instructor_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<CourseInstructor>,
}

/// 下拉选项与仪表盘使用的精简课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseOption {
    pub course_id: i64,
    pub course_name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub ects: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCourse {
    pub course_name: String,
    pub ects: i32,
    pub hours: i32,
    pub format: String,
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ects: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<Option<i64>>,
}

pub mod requests {
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct CreateCourseForm {
        pub course_name: Option<String>,
        pub ects: Option<String>,
        pub hours: Option<String>,
        pub format: Option<String>,
        pub instructor_id: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct UpdateCourseForm {
        pub course_name: Option<String>,
        pub ects: Option<String>,
        pub hours: Option<String>,
        pub format: Option<String>,
        pub instructor_id: Option<String>,
        pub active: Option<String>,
    }

    /// 选课 / 退课
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct CourseEnrollmentForm {
        pub course_id: Option<String>,
        pub student_id: Option<String>,
    }
}

pub mod responses {
    use serde::Serialize;
    use ts_rs::TS;

    use super::Course;
    use crate::models::assignments::{Assignment, GradeSummary, StudentGrade};
    use crate::models::profiles::Profile;
    use crate::models::users::Role;

    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
    pub struct CourseListResponse {
        pub courses: Vec<Course>,
        pub instructors: Vec<Profile>,
        pub role: Option<Role>,
        /// 仅学生可见
        pub student_id: Option<i64>,
        pub enrolled_course_ids: Vec<i64>,
    }

    /// 课程详情中的一条选课记录
    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
    pub struct CourseEnrollmentView {
        pub enrollment_id: i64,
        pub enrollment_date: Option<chrono::NaiveDate>,
        pub student: Option<Profile>,
        pub grades: Vec<StudentGrade>,
        pub summary: GradeSummary,
    }

    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
    pub struct CourseDetailResponse {
        pub course: Course,
        pub assignments: Vec<Assignment>,
        pub enrollments: Vec<CourseEnrollmentView>,
        pub available_students: Vec<Profile>,
        pub can_manage: bool,
        pub is_admin: bool,
    }
}
