//! 作业存储操作

use super::{PostgrestStorage, TableQuery};
use crate::errors::Result;
use crate::models::assignments::{Assignment, AssignmentUpdate, NewAssignment};

impl PostgrestStorage {
    /// 按截止日期升序
    pub async fn list_course_assignments_impl(&self, course_id: i64) -> Result<Vec<Assignment>> {
        let query = TableQuery::new("assignments")
            .select("*")
            .eq("course_id", course_id)
            .order("due_date", true)
            .order("assignment_name", true);
        self.fetch_all(query).await
    }

    pub async fn get_assignment_impl(&self, assignment_id: &str) -> Result<Option<Assignment>> {
        let query = TableQuery::new("assignments")
            .select("*")
            .eq("assignment_id", assignment_id);
        self.fetch_optional(query).await
    }

    pub async fn create_assignment_impl(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.insert_one(TableQuery::new("assignments"), &assignment)
            .await
    }

    pub async fn update_assignment_impl(
        &self,
        assignment_id: &str,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>> {
        let query = TableQuery::new("assignments").eq("assignment_id", assignment_id);
        self.update_one(query, &update).await
    }

    pub async fn delete_assignment_impl(&self, assignment_id: &str) -> Result<bool> {
        let query = TableQuery::new("assignments").eq("assignment_id", assignment_id);
        Ok(self.delete_rows(query).await? > 0)
    }
}
