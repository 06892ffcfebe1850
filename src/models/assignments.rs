//! 作业与成绩

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程作业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub assignment_id: String,
    pub assignment_name: String,
    #[serde(default)]
    pub course_id: Option<i64>,
    // 权重 0..=1
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "crate::utils::time::deserialize_date_opt")]
    pub due_date: Option<chrono::NaiveDate>,
    #[serde(
        default,
        deserialize_with = "crate::utils::time::deserialize_timestamp_opt"
    )]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(
        default,
        deserialize_with = "crate::utils::time::deserialize_timestamp_opt"
    )]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 学生成绩，(enrollment_id, assignment_id) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentGrade {
    #[serde(default)]
    pub student_grade_id: Option<i64>,
    pub enrollment_id: i64,
    pub assignment_id: String,
    // 1..=6
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::utils::time::deserialize_timestamp_opt"
    )]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAssignment {
    pub assignment_name: String,
    pub course_id: i64,
    pub weight: Option<f64>,
    pub due_date: Option<chrono::NaiveDate>,
}

/// 更新作业：外层 None 表示不修改，`Some(None)` 表示置空
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<chrono::NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeUpsert {
    pub enrollment_id: i64,
    pub assignment_id: String,
    pub grade: f64,
    pub feedback: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 作业与某次选课的成绩合并后的视图
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct GradedAssignment {
    pub assignment_id: String,
    pub assignment_name: String,
    pub weight: Option<f64>,
    pub due_date: Option<chrono::NaiveDate>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
}

/// 成绩汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct GradeSummary {
    pub average: Option<f64>,
    pub graded_count: usize,
    pub assignment_count: usize,
    pub covered_weight: f64,
}

pub mod requests {
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct AddAssignmentForm {
        pub assignment_name: Option<String>,
        pub weight: Option<String>,
        pub due_date: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct UpdateAssignmentForm {
        pub assignment_id: Option<String>,
        pub assignment_name: Option<String>,
        pub weight: Option<String>,
        pub due_date: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct DeleteAssignmentForm {
        pub assignment_id: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct SetGradeForm {
        pub enrollment_id: Option<String>,
        pub assignment_id: Option<String>,
        pub grade: Option<String>,
        pub feedback: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct ClearGradeForm {
        pub enrollment_id: Option<String>,
        pub assignment_id: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct AddStudentForm {
        pub student_id: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct RemoveStudentForm {
        pub enrollment_id: Option<String>,
    }
}
