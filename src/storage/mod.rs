//! 数据存储层
//!
//! 数据保存在托管 Postgres 中，通过其 REST 查询接口访问。行级安全由后端执行，
//! 所以普通请求使用当前会话的访问令牌，只有账号开通等管理操作使用 service role。

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    assignments::{Assignment, AssignmentUpdate, GradeUpsert, NewAssignment, StudentGrade},
    courses::{Course, CourseOption, CourseUpdate, NewCourse},
    enrollments::{
        CourseEnrollmentDetail, Enrollment, NewEnrollment, StudentEnrollmentDetail,
    },
    flashdecks::{Card, CardUpdate, Deck, DeckScope, NewCard, NewDeck},
    profiles::{NewProfile, Profile, ProfileKind, ProfileOrder, ProfileUpdate},
};

pub mod postgrest_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 档案（学生 / 教师 / 管理员）
    async fn list_profiles(
        &self,
        kind: ProfileKind,
        order: Option<ProfileOrder>,
    ) -> Result<Vec<Profile>>;
    async fn get_profile(&self, kind: ProfileKind, id: i64) -> Result<Option<Profile>>;
    async fn get_profile_by_user_id(
        &self,
        kind: ProfileKind,
        user_id: &str,
    ) -> Result<Option<Profile>>;
    async fn create_profile(&self, kind: ProfileKind, profile: NewProfile) -> Result<Profile>;
    async fn update_profile(
        &self,
        kind: ProfileKind,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>>;
    async fn delete_profile(&self, kind: ProfileKind, id: i64) -> Result<bool>;
    async fn count_profiles(&self, kind: ProfileKind) -> Result<u64>;

    /// 课程
    // 所有课程，带授课教师
    async fn list_courses(&self) -> Result<Vec<Course>>;
    async fn list_courses_by_instructor(&self, instructor_id: i64) -> Result<Vec<CourseOption>>;
    // 排除指定课程后的选项
    async fn list_course_options_excluding(&self, course_ids: &[i64])
    -> Result<Vec<CourseOption>>;
    async fn get_course(&self, course_id: i64) -> Result<Option<Course>>;
    async fn create_course(&self, course: NewCourse) -> Result<Course>;
    async fn update_course(&self, course_id: i64, update: CourseUpdate)
    -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;
    async fn count_courses(&self) -> Result<u64>;

    /// 选课
    async fn list_enrollments_by_student(&self, student_id: i64) -> Result<Vec<Enrollment>>;
    async fn list_enrolled_courses(&self, student_id: i64) -> Result<Vec<CourseOption>>;
    async fn list_student_enrollment_details(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentEnrollmentDetail>>;
    async fn list_course_enrollment_details(
        &self,
        course_id: i64,
    ) -> Result<Vec<CourseEnrollmentDetail>>;
    async fn get_enrollment(&self, enrollment_id: i64) -> Result<Option<Enrollment>>;
    async fn find_enrollment(&self, student_id: i64, course_id: i64)
    -> Result<Option<Enrollment>>;
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment>;
    async fn delete_enrollment(&self, enrollment_id: i64) -> Result<bool>;
    async fn delete_enrollment_for(&self, student_id: i64, course_id: i64) -> Result<bool>;

    /// 作业
    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>>;
    async fn get_assignment(&self, assignment_id: &str) -> Result<Option<Assignment>>;
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: &str) -> Result<bool>;

    /// 成绩
    async fn upsert_grade(&self, grade: GradeUpsert) -> Result<StudentGrade>;
    async fn delete_grade(&self, enrollment_id: i64, assignment_id: &str) -> Result<bool>;
    async fn delete_grades_for_assignment(&self, assignment_id: &str) -> Result<u64>;
    async fn delete_grades_for_enrollment(&self, enrollment_id: i64) -> Result<u64>;

    /// 闪卡组
    // 按创建时间倒序
    async fn list_decks(&self, owner_id: &str, scope: DeckScope) -> Result<Vec<Deck>>;
    async fn get_deck(&self, deck_id: &str) -> Result<Option<Deck>>;
    async fn create_deck(&self, deck: NewDeck) -> Result<Deck>;
    async fn delete_deck(&self, deck_id: &str) -> Result<bool>;

    /// 闪卡
    async fn list_cards(&self, deck_id: &str, ascending: bool) -> Result<Vec<Card>>;
    async fn get_card(&self, card_id: &str) -> Result<Option<Card>>;
    async fn create_card(&self, card: NewCard) -> Result<Card>;
    async fn update_card(&self, card_id: &str, update: CardUpdate) -> Result<Option<Card>>;
    async fn delete_card(&self, card_id: &str) -> Result<bool>;
    async fn delete_cards_in_deck(&self, deck_id: &str) -> Result<u64>;
}

/// 按调用者分发存储实例
pub trait StorageProvider: Send + Sync {
    /// 以当前会话身份访问（行级安全生效）
    fn for_session(&self, access_token: &str) -> Arc<dyn Storage>;
    /// 以 service role 身份访问，未配置密钥时为 None
    fn privileged(&self) -> Option<Arc<dyn Storage>>;
}

pub fn create_storage_provider(http: reqwest::Client) -> Arc<dyn StorageProvider> {
    Arc::new(postgrest_storage::PostgrestStorageProvider::from_config(http))
}
