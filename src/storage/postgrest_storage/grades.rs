//! 成绩存储操作

use super::{PostgrestStorage, TableQuery};
use crate::errors::Result;
use crate::models::assignments::{GradeUpsert, StudentGrade};

impl PostgrestStorage {
    /// 以 (enrollment_id, assignment_id) 为键写入成绩
    pub async fn upsert_grade_impl(&self, grade: GradeUpsert) -> Result<StudentGrade> {
        let query = TableQuery::new("student_grades").on_conflict("enrollment_id, assignment_id");
        self.upsert_one(query, &grade).await
    }

    pub async fn delete_grade_impl(&self, enrollment_id: i64, assignment_id: &str) -> Result<bool> {
        let query = TableQuery::new("student_grades")
            .eq("enrollment_id", enrollment_id)
            .eq("assignment_id", assignment_id);
        Ok(self.delete_rows(query).await? > 0)
    }

    pub async fn delete_grades_for_assignment_impl(&self, assignment_id: &str) -> Result<u64> {
        let query = TableQuery::new("student_grades").eq("assignment_id", assignment_id);
        self.delete_rows(query).await
    }

    pub async fn delete_grades_for_enrollment_impl(&self, enrollment_id: i64) -> Result<u64> {
        let query = TableQuery::new("student_grades").eq("enrollment_id", enrollment_id);
        self.delete_rows(query).await
    }
}
