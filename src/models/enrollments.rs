use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::assignments::{Assignment, StudentGrade};
use super::profiles::Profile;

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub course_id: i64,
    #[serde(default, deserialize_with = "crate::utils::time::deserialize_date_opt")]
    pub enrollment_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub course_id: i64,
    pub enrollment_date: chrono::NaiveDate,
}

/// 嵌入作业的课程
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseWithAssignments {
    pub course_id: i64,
    pub course_name: String,
    #[serde(default)]
    pub ects: Option<i32>,
    #[serde(default)]
    pub hours: Option<i32>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// 学生视角：选课 + 课程 + 该次选课的成绩
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentEnrollmentDetail {
    pub enrollment_id: i64,
    #[serde(default, deserialize_with = "crate::utils::time::deserialize_date_opt")]
    pub enrollment_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub course: Option<CourseWithAssignments>,
    #[serde(default)]
    pub grades: Vec<StudentGrade>,
}

/// 课程视角：选课 + 学生 + 成绩
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEnrollmentDetail {
    pub enrollment_id: i64,
    pub student_id: i64,
    #[serde(default, deserialize_with = "crate::utils::time::deserialize_date_opt")]
    pub enrollment_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub student: Option<Profile>,
    #[serde(default)]
    pub grades: Vec<StudentGrade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_enrollment_detail_from_embedded_row() {
        let detail: StudentEnrollmentDetail = serde_json::from_value(serde_json::json!({
            "enrollment_id": 9,
            "enrollment_date": "2024-10-01",
            "course": {
                "course_id": 2,
                "course_name": "Algebra",
                "ects": 5,
                "hours": 60,
                "format": "lecture",
                "assignments": [
                    { "assignment_id": "a1", "assignment_name": "Quiz", "weight": 0.5 }
                ]
            },
            "grades": [
                { "enrollment_id": 9, "assignment_id": "a1", "grade": 2.0 }
            ]
        }))
        .unwrap();
        let course = detail.course.unwrap();
        assert_eq!(course.assignments.len(), 1);
        assert_eq!(detail.grades[0].grade, Some(2.0));
    }

    #[test]
    fn test_course_enrollment_detail_with_null_student() {
        let detail: CourseEnrollmentDetail = serde_json::from_value(serde_json::json!({
            "enrollment_id": 1,
            "student_id": 5,
            "enrollment_date": null,
            "student": null
        }))
        .unwrap();
        assert!(detail.student.is_none());
        assert!(detail.grades.is_empty());
    }
}
