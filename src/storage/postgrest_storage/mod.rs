//! REST 查询接口存储实现
//!
//! 每个实例绑定一个令牌：会话令牌或 service role 密钥。

mod assignments;
mod courses;
mod decks;
mod enrollments;
mod grades;
mod profiles;
pub mod query;

use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{Result, StudyDeskError};
use crate::storage::{Storage, StorageProvider};

pub use query::TableQuery;

/// 单个令牌身份下的存储实例
#[derive(Clone)]
pub struct PostgrestStorage {
    http: HttpClient,
    rest_url: String,
    api_key: String,
    token: String,
}

impl PostgrestStorage {
    pub fn new(
        http: HttpClient,
        rest_url: impl Into<String>,
        api_key: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            rest_url: rest_url.into(),
            api_key: api_key.into(),
            token: token.into(),
        }
    }

    fn request(&self, method: Method, query: &TableQuery) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.rest_url, query.table()))
            .query(&query.params())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.token)
    }

    async fn send(builder: RequestBuilder, table: &str) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = map_postgrest_error(status, &body);
        debug!("REST request on '{}' failed: {}", table, err);
        Err(err)
    }

    pub(crate) async fn fetch_all<T: DeserializeOwned>(&self, query: TableQuery) -> Result<Vec<T>> {
        let response = Self::send(self.request(Method::GET, &query), query.table()).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    pub(crate) async fn fetch_optional<T: DeserializeOwned>(
        &self,
        query: TableQuery,
    ) -> Result<Option<T>> {
        let rows: Vec<T> = self.fetch_all(query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    pub(crate) async fn insert_one<T, B>(&self, query: TableQuery, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self
            .request(Method::POST, &query)
            .header("Prefer", "return=representation")
            .json(body);
        let rows: Vec<T> = Self::send(builder, query.table()).await?.json().await?;
        rows.into_iter().next().ok_or_else(|| {
            StudyDeskError::authorization(format!(
                "Insert into '{}' returned no row",
                query.table()
            ))
        })
    }

    pub(crate) async fn upsert_one<T, B>(&self, query: TableQuery, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self
            .request(Method::POST, &query)
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .json(body);
        let rows: Vec<T> = Self::send(builder, query.table()).await?.json().await?;
        rows.into_iter().next().ok_or_else(|| {
            StudyDeskError::authorization(format!(
                "Upsert into '{}' returned no row",
                query.table()
            ))
        })
    }

    /// 没有匹配行（或被行级安全过滤）时返回 None
    pub(crate) async fn update_one<T, B>(&self, query: TableQuery, body: &B) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self
            .request(Method::PATCH, &query)
            .header("Prefer", "return=representation")
            .json(body);
        let rows: Vec<T> = Self::send(builder, query.table()).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    /// 返回删除的行数
    pub(crate) async fn delete_rows(&self, query: TableQuery) -> Result<u64> {
        let builder = self
            .request(Method::DELETE, &query)
            .header("Prefer", "return=representation");
        let rows: Vec<Value> = Self::send(builder, query.table()).await?.json().await?;
        Ok(rows.len() as u64)
    }

    pub(crate) async fn count_rows(&self, query: TableQuery) -> Result<u64> {
        let builder = self
            .request(Method::HEAD, &query)
            .header("Prefer", "count=exact");
        let response = Self::send(builder, query.table()).await?;
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(query::parse_content_range_total)
            .ok_or_else(|| {
                StudyDeskError::remote_service(format!(
                    "Missing row count for '{}'",
                    query.table()
                ))
            })
    }
}

/// 将 REST 接口的错误响应映射为 [`StudyDeskError`]
///
/// 错误体形如 `{code, message, details, hint}`。
pub fn map_postgrest_error(status: StatusCode, body: &str) -> StudyDeskError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = |key: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let code = field("code").unwrap_or_default();
    let message = field("message")
        .or_else(|| field("details"))
        .unwrap_or_else(|| format!("REST request failed with HTTP {status}"));

    match code.as_str() {
        "23505" => StudyDeskError::conflict(message),
        "23503" | "22P02" | "23502" | "23514" => StudyDeskError::validation(message),
        "PGRST116" => StudyDeskError::not_found(message),
        "42501" => StudyDeskError::authorization(message),
        _ => match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StudyDeskError::authorization(message)
            }
            StatusCode::NOT_FOUND => StudyDeskError::not_found(message),
            _ => StudyDeskError::database_operation(message),
        },
    }
}

/// 按会话分发 [`PostgrestStorage`]
pub struct PostgrestStorageProvider {
    http: HttpClient,
    rest_url: String,
    anon_key: String,
    service_role_key: String,
}

impl PostgrestStorageProvider {
    pub fn new(
        http: HttpClient,
        rest_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_role_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            rest_url: rest_url.into(),
            anon_key: anon_key.into(),
            service_role_key: service_role_key.into(),
        }
    }

    pub fn from_config(http: HttpClient) -> Self {
        let config = AppConfig::get();
        Self::new(
            http,
            config.rest_url(),
            config.backend.anon_key.clone(),
            config.backend.service_role_key.clone(),
        )
    }
}

impl StorageProvider for PostgrestStorageProvider {
    fn for_session(&self, access_token: &str) -> Arc<dyn Storage> {
        Arc::new(PostgrestStorage::new(
            self.http.clone(),
            self.rest_url.clone(),
            self.anon_key.clone(),
            access_token,
        ))
    }

    fn privileged(&self) -> Option<Arc<dyn Storage>> {
        if self.service_role_key.is_empty() {
            return None;
        }
        Some(Arc::new(PostgrestStorage::new(
            self.http.clone(),
            self.rest_url.clone(),
            self.service_role_key.clone(),
            self.service_role_key.clone(),
        )))
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{Assignment, AssignmentUpdate, GradeUpsert, NewAssignment, StudentGrade},
    courses::{Course, CourseOption, CourseUpdate, NewCourse},
    enrollments::{
        CourseEnrollmentDetail, Enrollment, NewEnrollment, StudentEnrollmentDetail,
    },
    flashdecks::{Card, CardUpdate, Deck, DeckScope, NewCard, NewDeck},
    profiles::{NewProfile, Profile, ProfileKind, ProfileOrder, ProfileUpdate},
};
use async_trait::async_trait;

#[async_trait]
impl Storage for PostgrestStorage {
    // 档案
    async fn list_profiles(
        &self,
        kind: ProfileKind,
        order: Option<ProfileOrder>,
    ) -> Result<Vec<Profile>> {
        self.list_profiles_impl(kind, order).await
    }

    async fn get_profile(&self, kind: ProfileKind, id: i64) -> Result<Option<Profile>> {
        self.get_profile_impl(kind, id).await
    }

    async fn get_profile_by_user_id(
        &self,
        kind: ProfileKind,
        user_id: &str,
    ) -> Result<Option<Profile>> {
        self.get_profile_by_user_id_impl(kind, user_id).await
    }

    async fn create_profile(&self, kind: ProfileKind, profile: NewProfile) -> Result<Profile> {
        self.create_profile_impl(kind, profile).await
    }

    async fn update_profile(
        &self,
        kind: ProfileKind,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>> {
        self.update_profile_impl(kind, id, update).await
    }

    async fn delete_profile(&self, kind: ProfileKind, id: i64) -> Result<bool> {
        self.delete_profile_impl(kind, id).await
    }

    async fn count_profiles(&self, kind: ProfileKind) -> Result<u64> {
        self.count_profiles_impl(kind).await
    }

    // 课程
    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.list_courses_impl().await
    }

    async fn list_courses_by_instructor(&self, instructor_id: i64) -> Result<Vec<CourseOption>> {
        self.list_courses_by_instructor_impl(instructor_id).await
    }

    async fn list_course_options_excluding(
        &self,
        course_ids: &[i64],
    ) -> Result<Vec<CourseOption>> {
        self.list_course_options_excluding_impl(course_ids).await
    }

    async fn get_course(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_impl(course_id).await
    }

    async fn create_course(&self, course: NewCourse) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: CourseUpdate,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    async fn count_courses(&self) -> Result<u64> {
        self.count_courses_impl().await
    }

    // 选课
    async fn list_enrollments_by_student(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        self.list_enrollments_by_student_impl(student_id).await
    }

    async fn list_enrolled_courses(&self, student_id: i64) -> Result<Vec<CourseOption>> {
        self.list_enrolled_courses_impl(student_id).await
    }

    async fn list_student_enrollment_details(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentEnrollmentDetail>> {
        self.list_student_enrollment_details_impl(student_id).await
    }

    async fn list_course_enrollment_details(
        &self,
        course_id: i64,
    ) -> Result<Vec<CourseEnrollmentDetail>> {
        self.list_course_enrollment_details_impl(course_id).await
    }

    async fn get_enrollment(&self, enrollment_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(enrollment_id).await
    }

    async fn find_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.find_enrollment_impl(student_id, course_id).await
    }

    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment).await
    }

    async fn delete_enrollment(&self, enrollment_id: i64) -> Result<bool> {
        self.delete_enrollment_impl(enrollment_id).await
    }

    async fn delete_enrollment_for(&self, student_id: i64, course_id: i64) -> Result<bool> {
        self.delete_enrollment_for_impl(student_id, course_id).await
    }

    // 作业
    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>> {
        self.list_course_assignments_impl(course_id).await
    }

    async fn get_assignment(&self, assignment_id: &str) -> Result<Option<Assignment>> {
        self.get_assignment_impl(assignment_id).await
    }

    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: &str) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 成绩
    async fn upsert_grade(&self, grade: GradeUpsert) -> Result<StudentGrade> {
        self.upsert_grade_impl(grade).await
    }

    async fn delete_grade(&self, enrollment_id: i64, assignment_id: &str) -> Result<bool> {
        self.delete_grade_impl(enrollment_id, assignment_id).await
    }

    async fn delete_grades_for_assignment(&self, assignment_id: &str) -> Result<u64> {
        self.delete_grades_for_assignment_impl(assignment_id).await
    }

    async fn delete_grades_for_enrollment(&self, enrollment_id: i64) -> Result<u64> {
        self.delete_grades_for_enrollment_impl(enrollment_id).await
    }

    // 闪卡组
    async fn list_decks(&self, owner_id: &str, scope: DeckScope) -> Result<Vec<Deck>> {
        self.list_decks_impl(owner_id, scope).await
    }

    async fn get_deck(&self, deck_id: &str) -> Result<Option<Deck>> {
        self.get_deck_impl(deck_id).await
    }

    async fn create_deck(&self, deck: NewDeck) -> Result<Deck> {
        self.create_deck_impl(deck).await
    }

    async fn delete_deck(&self, deck_id: &str) -> Result<bool> {
        self.delete_deck_impl(deck_id).await
    }

    // 闪卡
    async fn list_cards(&self, deck_id: &str, ascending: bool) -> Result<Vec<Card>> {
        self.list_cards_impl(deck_id, ascending).await
    }

    async fn get_card(&self, card_id: &str) -> Result<Option<Card>> {
        self.get_card_impl(card_id).await
    }

    async fn create_card(&self, card: NewCard) -> Result<Card> {
        self.create_card_impl(card).await
    }

    async fn update_card(&self, card_id: &str, update: CardUpdate) -> Result<Option<Card>> {
        self.update_card_impl(card_id, update).await
    }

    async fn delete_card(&self, card_id: &str) -> Result<bool> {
        self.delete_card_impl(card_id).await
    }

    async fn delete_cards_in_deck(&self, deck_id: &str) -> Result<u64> {
        self.delete_cards_in_deck_impl(deck_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping_by_code() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint","details":null,"hint":null}"#;
        let err = map_postgrest_error(StatusCode::CONFLICT, body);
        assert_eq!(err.code(), "E010");
        assert!(err.message().contains("duplicate key"));

        let body = r#"{"code":"23503","message":"violates foreign key constraint"}"#;
        assert_eq!(map_postgrest_error(StatusCode::CONFLICT, body).code(), "E007");

        let body = r#"{"code":"22P02","message":"invalid input syntax for type bigint"}"#;
        assert_eq!(map_postgrest_error(StatusCode::BAD_REQUEST, body).code(), "E007");

        let body = r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned"}"#;
        assert!(map_postgrest_error(StatusCode::NOT_ACCEPTABLE, body).is_not_found());

        let body = r#"{"code":"42501","message":"permission denied for table courses"}"#;
        assert_eq!(map_postgrest_error(StatusCode::FORBIDDEN, body).code(), "E013");
    }

    #[test]
    fn test_error_mapping_by_status() {
        assert_eq!(
            map_postgrest_error(StatusCode::UNAUTHORIZED, "").code(),
            "E013"
        );
        let err = map_postgrest_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("500"));
    }

    #[test]
    fn test_privileged_requires_service_role() {
        let http = HttpClient::new();
        let provider = PostgrestStorageProvider::new(http.clone(), "http://db/rest/v1", "anon", "");
        assert!(provider.privileged().is_none());

        let provider = PostgrestStorageProvider::new(http, "http://db/rest/v1", "anon", "service");
        assert!(provider.privileged().is_some());
    }
}
