//! 课程存储操作

use super::{PostgrestStorage, TableQuery};
use crate::errors::Result;
use crate::models::courses::{Course, CourseOption, CourseUpdate, NewCourse};

const COURSE_WITH_INSTRUCTOR: &str = "*, instructor:instructors(instructor_id, first_name, last_name, email)";
const COURSE_OPTION: &str = "course_id, course_name, format, ects";

impl PostgrestStorage {
    pub async fn list_courses_impl(&self) -> Result<Vec<Course>> {
        let query = TableQuery::new("courses")
            .select(COURSE_WITH_INSTRUCTOR)
            .order("course_name", true);
        self.fetch_all(query).await
    }

    /// 教师所授课程
    pub async fn list_courses_by_instructor_impl(
        &self,
        instructor_id: i64,
    ) -> Result<Vec<CourseOption>> {
        let query = TableQuery::new("courses")
            .select(COURSE_OPTION)
            .eq("instructor_id", instructor_id)
            .order("course_name", true);
        self.fetch_all(query).await
    }

    pub async fn list_course_options_excluding_impl(
        &self,
        course_ids: &[i64],
    ) -> Result<Vec<CourseOption>> {
        let query = TableQuery::new("courses")
            .select(COURSE_OPTION)
            .not_in("course_id", course_ids)
            .order("course_name", true);
        self.fetch_all(query).await
    }

    pub async fn get_course_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let query = TableQuery::new("courses")
            .select(COURSE_WITH_INSTRUCTOR)
            .eq("course_id", course_id);
        self.fetch_optional(query).await
    }

    pub async fn create_course_impl(&self, course: NewCourse) -> Result<Course> {
        self.insert_one(TableQuery::new("courses"), &course).await
    }

    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: CourseUpdate,
    ) -> Result<Option<Course>> {
        let query = TableQuery::new("courses").eq("course_id", course_id);
        self.update_one(query, &update).await
    }

    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let query = TableQuery::new("courses").eq("course_id", course_id);
        Ok(self.delete_rows(query).await? > 0)
    }

    pub async fn count_courses_impl(&self) -> Result<u64> {
        self.count_rows(TableQuery::new("courses").select("course_id"))
            .await
    }
}
