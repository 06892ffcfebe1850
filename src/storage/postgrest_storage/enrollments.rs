//! 选课存储操作

use serde::Deserialize;

use super::{PostgrestStorage, TableQuery};
use crate::errors::Result;
use crate::models::courses::CourseOption;
use crate::models::enrollments::{
    CourseEnrollmentDetail, Enrollment, NewEnrollment, StudentEnrollmentDetail,
};

// 学生视角：课程及其作业、本次选课的成绩
const STUDENT_DETAIL: &str = "enrollment_id, enrollment_date,
    course:courses(course_id, course_name, ects, hours, format, assignments(*)),
    grades:student_grades(*)";

// 课程视角：学生档案与成绩
const COURSE_DETAIL: &str = "enrollment_id, student_id, enrollment_date,
    student:students(student_id, user_id, email, first_name, last_name),
    grades:student_grades(*)";

#[derive(Deserialize)]
struct EnrolledCourseRow {
    course: Option<CourseOption>,
}

impl PostgrestStorage {
    pub async fn list_enrollments_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<Enrollment>> {
        let query = TableQuery::new("enrollments")
            .select("*")
            .eq("student_id", student_id);
        self.fetch_all(query).await
    }

    /// 学生已选课程的精简信息
    pub async fn list_enrolled_courses_impl(&self, student_id: i64) -> Result<Vec<CourseOption>> {
        let query = TableQuery::new("enrollments")
            .select("course:courses(course_id, course_name, format, ects)")
            .eq("student_id", student_id);
        let rows: Vec<EnrolledCourseRow> = self.fetch_all(query).await?;
        Ok(rows.into_iter().filter_map(|r| r.course).collect())
    }

    pub async fn list_student_enrollment_details_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentEnrollmentDetail>> {
        let query = TableQuery::new("enrollments")
            .select(STUDENT_DETAIL)
            .eq("student_id", student_id)
            .order_embedded("course.assignments", "due_date", true)
            .order("enrollment_date", true);
        self.fetch_all(query).await
    }

    pub async fn list_course_enrollment_details_impl(
        &self,
        course_id: i64,
    ) -> Result<Vec<CourseEnrollmentDetail>> {
        let query = TableQuery::new("enrollments")
            .select(COURSE_DETAIL)
            .eq("course_id", course_id)
            .order("enrollment_date", true)
            .order("enrollment_id", true);
        self.fetch_all(query).await
    }

    pub async fn get_enrollment_impl(&self, enrollment_id: i64) -> Result<Option<Enrollment>> {
        let query = TableQuery::new("enrollments")
            .select("*")
            .eq("enrollment_id", enrollment_id);
        self.fetch_optional(query).await
    }

    pub async fn find_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let query = TableQuery::new("enrollments")
            .select("*")
            .eq("student_id", student_id)
            .eq("course_id", course_id);
        self.fetch_optional(query).await
    }

    pub async fn create_enrollment_impl(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        self.insert_one(TableQuery::new("enrollments"), &enrollment)
            .await
    }

    pub async fn delete_enrollment_impl(&self, enrollment_id: i64) -> Result<bool> {
        let query = TableQuery::new("enrollments").eq("enrollment_id", enrollment_id);
        Ok(self.delete_rows(query).await? > 0)
    }

    pub async fn delete_enrollment_for_impl(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let query = TableQuery::new("enrollments")
            .eq("student_id", student_id)
            .eq("course_id", course_id);
        Ok(self.delete_rows(query).await? > 0)
    }
}
