//! 集成测试共用的内存后端
//!
//! `MemoryStorage` 与 `FakeIdentity` 按托管后端的约定返回数据，不做行级安全。

#![allow(dead_code, unused_macros)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use studydesk::errors::{Result, StudyDeskError};
use studydesk::identity::IdentityProvider;
use studydesk::middlewares::session::SessionSettings;
use studydesk::models::{
    assignments::{Assignment, AssignmentUpdate, GradeUpsert, NewAssignment, StudentGrade},
    courses::{Course, CourseInstructor, CourseOption, CourseUpdate, NewCourse},
    enrollments::{
        CourseEnrollmentDetail, CourseWithAssignments, Enrollment, NewEnrollment,
        StudentEnrollmentDetail,
    },
    flashdecks::{Card, CardUpdate, Deck, DeckScope, NewCard, NewDeck},
    profiles::{NewProfile, Profile, ProfileKind, ProfileOrder, ProfileUpdate},
    users::{AuthSession, AuthUser, Role, UserMetadata},
};
use studydesk::storage::{Storage, StorageProvider};
use studydesk::utils::SessionCookies;

pub const COOKIE_PREFIX: &str = "sb";

/// 会话中间件测试配置：不校验签名
pub fn session_settings() -> SessionSettings {
    SessionSettings {
        cookies: SessionCookies::new(COOKIE_PREFIX, 7, false),
        refresh_leeway_secs: 30,
        user_cache_ttl: 60,
        jwt_secret: String::new(),
    }
}

/// 为用户签发一小时后过期的访问令牌
pub fn access_token_for(user_id: &str) -> String {
    signed_token(user_id, Utc::now() + Duration::hours(1))
}

/// 已过期的访问令牌，会话钩子会尝试刷新
pub fn expired_access_token_for(user_id: &str) -> String {
    signed_token(user_id, Utc::now() - Duration::minutes(5))
}

fn signed_token(user_id: &str, exp: chrono::DateTime<Utc>) -> String {
    let claims = serde_json::json!({
        "sub": user_id,
        "exp": exp.timestamp(),
        "aud": "authenticated",
        "jti": uuid::Uuid::new_v4().to_string(),
    });
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

pub fn access_cookie(token: &str) -> actix_web::cookie::Cookie<'static> {
    actix_web::cookie::Cookie::new(format!("{COOKIE_PREFIX}-access-token"), token.to_string())
}

pub fn refresh_cookie(token: &str) -> actix_web::cookie::Cookie<'static> {
    actix_web::cookie::Cookie::new(format!("{COOKIE_PREFIX}-refresh-token"), token.to_string())
}

pub fn auth_user(id: &str, email: &str, role: Option<Role>) -> AuthUser {
    AuthUser {
        id: id.to_string(),
        email: Some(email.to_string()),
        user_metadata: UserMetadata {
            role: role.map(|r| r.as_str().to_string()),
        },
        created_at: None,
    }
}

// ---------------------------------------------------------------------------
// 认证服务
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct IdentityState {
    /// 访问令牌 -> 用户
    pub tokens: HashMap<String, AuthUser>,
    /// 邮箱 -> (密码, 用户)
    pub accounts: HashMap<String, (String, AuthUser)>,
    /// 刷新令牌 -> 用户，刷新成功后旧令牌作废
    pub refresh_tokens: HashMap<String, AuthUser>,
    pub refreshed: Vec<String>,
    pub created: Vec<AuthUser>,
    pub deleted: Vec<String>,
    pub password_updates: Vec<(String, String)>,
    pub signed_out: Vec<String>,
    pub fail_delete: bool,
    pub fail_password_update: bool,
}

#[derive(Default)]
pub struct FakeIdentity {
    pub state: Mutex<IdentityState>,
}

impl FakeIdentity {
    /// 注册一个已登录用户，返回其访问令牌
    pub fn login_as(&self, user: AuthUser) -> String {
        let token = access_token_for(&user.id);
        self.state
            .lock()
            .unwrap()
            .tokens
            .insert(token.clone(), user);
        token
    }

    pub fn add_refresh_token(&self, refresh_token: &str, user: AuthUser) {
        self.state
            .lock()
            .unwrap()
            .refresh_tokens
            .insert(refresh_token.to_string(), user);
    }

    pub fn add_account(&self, email: &str, password: &str, user: AuthUser) {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(email.to_string(), (password.to_string(), user));
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let user = {
            let state = self.state.lock().unwrap();
            match state.accounts.get(email) {
                Some((expected, user)) if expected == password => user.clone(),
                _ => return Err(StudyDeskError::validation("Invalid login credentials")),
            }
        };
        let access_token = self.login_as(user.clone());
        Ok(AuthSession {
            access_token,
            refresh_token: format!("refresh-{}", user.id),
            expires_in: Some(3600),
            expires_at: Some((Utc::now() + Duration::hours(1)).timestamp()),
            token_type: Some("bearer".to_string()),
            user,
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        self.state
            .lock()
            .unwrap()
            .tokens
            .get(access_token)
            .cloned()
            .ok_or_else(|| StudyDeskError::authentication("invalid JWT"))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession> {
        let user = {
            let mut state = self.state.lock().unwrap();
            let Some(user) = state.refresh_tokens.remove(refresh_token) else {
                return Err(StudyDeskError::authentication("Invalid Refresh Token"));
            };
            state.refreshed.push(refresh_token.to_string());
            user
        };
        let access_token = self.login_as(user.clone());
        let next_refresh = format!("refresh-{}", uuid::Uuid::new_v4());
        self.add_refresh_token(&next_refresh, user.clone());
        Ok(AuthSession {
            access_token,
            refresh_token: next_refresh,
            expires_in: Some(3600),
            expires_at: Some((Utc::now() + Duration::hours(1)).timestamp()),
            token_type: Some("bearer".to_string()),
            user,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.tokens.remove(access_token);
        state.signed_out.push(access_token.to_string());
        Ok(())
    }

    async fn admin_create_user(&self, email: &str, password: &str, role: Role) -> Result<AuthUser> {
        let mut state = self.state.lock().unwrap();
        if state.created.iter().any(|u| u.email.as_deref() == Some(email)) {
            return Err(StudyDeskError::validation(
                "A user with this email address has already been registered",
            ));
        }
        let user = auth_user(&uuid::Uuid::new_v4().to_string(), email, Some(role));
        state.created.push(user.clone());
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        Ok(user)
    }

    async fn admin_delete_user(&self, user_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_delete {
            return Err(StudyDeskError::remote_service("User not found"));
        }
        state.deleted.push(user_id.to_string());
        Ok(())
    }

    async fn admin_update_password(&self, user_id: &str, password: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_password_update {
            return Err(StudyDeskError::validation("Password is too weak"));
        }
        state
            .password_updates
            .push((user_id.to_string(), password.to_string()));
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 数据表
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct Tables {
    pub students: Vec<Profile>,
    pub instructors: Vec<Profile>,
    pub admins: Vec<Profile>,
    pub courses: Vec<Course>,
    pub enrollments: Vec<Enrollment>,
    pub assignments: Vec<Assignment>,
    pub grades: Vec<StudentGrade>,
    pub decks: Vec<Deck>,
    pub cards: Vec<Card>,
    next_id: i64,
    /// 为 true 时插入档案失败
    pub fail_profile_insert: bool,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// 单调递增的创建时间，保证排序稳定
    fn next_timestamp(&mut self) -> chrono::DateTime<Utc> {
        let seq = self.next_id();
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seq)
    }

    fn profiles(&self, kind: ProfileKind) -> &Vec<Profile> {
        match kind {
            ProfileKind::Student => &self.students,
            ProfileKind::Instructor => &self.instructors,
            ProfileKind::Admin => &self.admins,
        }
    }

    fn profiles_mut(&mut self, kind: ProfileKind) -> &mut Vec<Profile> {
        match kind {
            ProfileKind::Student => &mut self.students,
            ProfileKind::Instructor => &mut self.instructors,
            ProfileKind::Admin => &mut self.admins,
        }
    }

    fn with_instructor(&self, course: &Course) -> Course {
        let mut course = course.clone();
        course.instructor = course.instructor_id.and_then(|id| {
            self.instructors
                .iter()
                .find(|p| p.id == id)
                .map(|p| CourseInstructor {
                    instructor_id: p.id,
                    first_name: p.first_name.clone(),
                    last_name: p.last_name.clone(),
                    email: Some(p.email.clone()),
                })
        });
        course
    }

    pub fn add_profile(&mut self, kind: ProfileKind, user_id: &str, first: &str, last: &str) -> i64 {
        let id = self.next_id();
        let created_at = self.next_timestamp();
        self.profiles_mut(kind).push(Profile {
            id,
            user_id: Some(user_id.to_string()),
            email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            created_at: Some(created_at),
        });
        id
    }

    pub fn add_course(&mut self, name: &str, ects: i32, instructor_id: Option<i64>) -> i64 {
        let course_id = self.next_id();
        self.courses.push(Course {
            course_id,
            course_name: name.to_string(),
            ects,
            hours: ects * 30,
            format: "lecture".to_string(),
            active: Some(true),
            instructor_id,
            instructor: None,
        });
        course_id
    }

    pub fn add_enrollment(&mut self, student_id: i64, course_id: i64) -> i64 {
        let enrollment_id = self.next_id();
        self.enrollments.push(Enrollment {
            enrollment_id,
            student_id,
            course_id,
            enrollment_date: chrono::NaiveDate::from_ymd_opt(2024, 10, 1),
        });
        enrollment_id
    }

    pub fn add_assignment(&mut self, course_id: i64, name: &str, weight: Option<f64>) -> String {
        let assignment_id = uuid::Uuid::new_v4().to_string();
        let created_at = self.next_timestamp();
        self.assignments.push(Assignment {
            assignment_id: assignment_id.clone(),
            assignment_name: name.to_string(),
            course_id: Some(course_id),
            weight,
            due_date: None,
            created_at: Some(created_at),
            updated_at: None,
        });
        assignment_id
    }

    pub fn add_grade(&mut self, enrollment_id: i64, assignment_id: &str, grade: f64) {
        let id = self.next_id();
        self.grades.push(StudentGrade {
            student_grade_id: Some(id),
            enrollment_id,
            assignment_id: assignment_id.to_string(),
            grade: Some(grade),
            feedback: None,
            updated_at: None,
        });
    }

    pub fn add_deck(&mut self, user_id: &str, name: &str) -> String {
        let flashdeck_id = uuid::Uuid::new_v4().to_string();
        let created_at = self.next_timestamp();
        self.decks.push(Deck {
            flashdeck_id: flashdeck_id.clone(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            description: None,
            created_at: Some(created_at),
        });
        flashdeck_id
    }

    pub fn add_card(&mut self, deck_id: &str, front: &str, back: &str) -> String {
        let card_id = uuid::Uuid::new_v4().to_string();
        let created_at = self.next_timestamp();
        self.cards.push(Card {
            card_id: card_id.clone(),
            flashdeck_id: deck_id.to_string(),
            front_content: front.to_string(),
            back_content: back.to_string(),
            created_at: Some(created_at),
        });
        card_id
    }
}

fn course_option(course: &Course) -> CourseOption {
    CourseOption {
        course_id: course.course_id,
        course_name: course.course_name.clone(),
        format: Some(course.format.clone()),
        ects: Some(course.ects),
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    pub tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        f(&mut self.tables.lock().unwrap())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list_profiles(
        &self,
        kind: ProfileKind,
        order: Option<ProfileOrder>,
    ) -> Result<Vec<Profile>> {
        let mut rows = self.with(|t| t.profiles(kind).clone());
        if let Some(order) = order {
            let key = |p: &Profile| match order.column {
                "first_name" => p.first_name.clone().unwrap_or_default(),
                "email" => p.email.clone(),
                _ => p.last_name.clone().unwrap_or_default(),
            };
            rows.sort_by_key(key);
            if !order.ascending {
                rows.reverse();
            }
        }
        Ok(rows)
    }

    async fn get_profile(&self, kind: ProfileKind, id: i64) -> Result<Option<Profile>> {
        Ok(self.with(|t| t.profiles(kind).iter().find(|p| p.id == id).cloned()))
    }

    async fn get_profile_by_user_id(
        &self,
        kind: ProfileKind,
        user_id: &str,
    ) -> Result<Option<Profile>> {
        Ok(self.with(|t| {
            t.profiles(kind)
                .iter()
                .find(|p| p.user_id.as_deref() == Some(user_id))
                .cloned()
        }))
    }

    async fn create_profile(&self, kind: ProfileKind, profile: NewProfile) -> Result<Profile> {
        self.with(|t| {
            if t.fail_profile_insert {
                return Err(StudyDeskError::validation(
                    "null value in column \"email\" violates not-null constraint",
                ));
            }
            let id = t.next_id();
            let row = Profile {
                id,
                user_id: Some(profile.user_id),
                email: profile.email,
                first_name: Some(profile.first_name),
                last_name: Some(profile.last_name),
                created_at: Some(t.next_timestamp()),
            };
            t.profiles_mut(kind).push(row.clone());
            Ok(row)
        })
    }

    async fn update_profile(
        &self,
        kind: ProfileKind,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>> {
        Ok(self.with(|t| {
            let row = t.profiles_mut(kind).iter_mut().find(|p| p.id == id)?;
            if let Some(first) = update.first_name {
                row.first_name = Some(first);
            }
            if let Some(last) = update.last_name {
                row.last_name = Some(last);
            }
            if let Some(email) = update.email {
                row.email = email;
            }
            Some(row.clone())
        }))
    }

    async fn delete_profile(&self, kind: ProfileKind, id: i64) -> Result<bool> {
        Ok(self.with(|t| {
            let rows = t.profiles_mut(kind);
            let before = rows.len();
            rows.retain(|p| p.id != id);
            rows.len() != before
        }))
    }

    async fn count_profiles(&self, kind: ProfileKind) -> Result<u64> {
        Ok(self.with(|t| t.profiles(kind).len() as u64))
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        Ok(self.with(|t| {
            let mut courses: Vec<Course> = t.courses.iter().map(|c| t.with_instructor(c)).collect();
            courses.sort_by(|a, b| a.course_name.cmp(&b.course_name));
            courses
        }))
    }

    async fn list_courses_by_instructor(&self, instructor_id: i64) -> Result<Vec<CourseOption>> {
        Ok(self.with(|t| {
            t.courses
                .iter()
                .filter(|c| c.instructor_id == Some(instructor_id))
                .map(course_option)
                .collect()
        }))
    }

    async fn list_course_options_excluding(
        &self,
        course_ids: &[i64],
    ) -> Result<Vec<CourseOption>> {
        Ok(self.with(|t| {
            t.courses
                .iter()
                .filter(|c| !course_ids.contains(&c.course_id))
                .map(course_option)
                .collect()
        }))
    }

    async fn get_course(&self, course_id: i64) -> Result<Option<Course>> {
        Ok(self.with(|t| {
            t.courses
                .iter()
                .find(|c| c.course_id == course_id)
                .map(|c| t.with_instructor(c))
        }))
    }

    async fn create_course(&self, course: NewCourse) -> Result<Course> {
        Ok(self.with(|t| {
            let course_id = t.next_id();
            let row = Course {
                course_id,
                course_name: course.course_name,
                ects: course.ects,
                hours: course.hours,
                format: course.format,
                active: Some(true),
                instructor_id: course.instructor_id,
                instructor: None,
            };
            t.courses.push(row.clone());
            row
        }))
    }

    async fn update_course(&self, course_id: i64, update: CourseUpdate) -> Result<Option<Course>> {
        Ok(self.with(|t| {
            let row = t.courses.iter_mut().find(|c| c.course_id == course_id)?;
            if let Some(name) = update.course_name {
                row.course_name = name;
            }
            if let Some(ects) = update.ects {
                row.ects = ects;
            }
            if let Some(hours) = update.hours {
                row.hours = hours;
            }
            if let Some(format) = update.format {
                row.format = format;
            }
            if let Some(active) = update.active {
                row.active = Some(active);
            }
            if let Some(instructor_id) = update.instructor_id {
                row.instructor_id = instructor_id;
            }
            Some(row.clone())
        }))
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.with(|t| {
            let referenced = t.enrollments.iter().any(|e| e.course_id == course_id)
                || t.assignments.iter().any(|a| a.course_id == Some(course_id));
            if referenced {
                return Err(StudyDeskError::validation(
                    "update or delete on table \"courses\" violates foreign key constraint",
                ));
            }
            let before = t.courses.len();
            t.courses.retain(|c| c.course_id != course_id);
            Ok(t.courses.len() != before)
        })
    }

    async fn count_courses(&self) -> Result<u64> {
        Ok(self.with(|t| t.courses.len() as u64))
    }

    async fn list_enrollments_by_student(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        Ok(self.with(|t| {
            t.enrollments
                .iter()
                .filter(|e| e.student_id == student_id)
                .cloned()
                .collect()
        }))
    }

    async fn list_enrolled_courses(&self, student_id: i64) -> Result<Vec<CourseOption>> {
        Ok(self.with(|t| {
            t.enrollments
                .iter()
                .filter(|e| e.student_id == student_id)
                .filter_map(|e| t.courses.iter().find(|c| c.course_id == e.course_id))
                .map(course_option)
                .collect()
        }))
    }

    async fn list_student_enrollment_details(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentEnrollmentDetail>> {
        Ok(self.with(|t| {
            t.enrollments
                .iter()
                .filter(|e| e.student_id == student_id)
                .map(|e| StudentEnrollmentDetail {
                    enrollment_id: e.enrollment_id,
                    enrollment_date: e.enrollment_date,
                    course: t
                        .courses
                        .iter()
                        .find(|c| c.course_id == e.course_id)
                        .map(|c| CourseWithAssignments {
                            course_id: c.course_id,
                            course_name: c.course_name.clone(),
                            ects: Some(c.ects),
                            hours: Some(c.hours),
                            format: Some(c.format.clone()),
                            assignments: t
                                .assignments
                                .iter()
                                .filter(|a| a.course_id == Some(c.course_id))
                                .cloned()
                                .collect(),
                        }),
                    grades: t
                        .grades
                        .iter()
                        .filter(|g| g.enrollment_id == e.enrollment_id)
                        .cloned()
                        .collect(),
                })
                .collect()
        }))
    }

    async fn list_course_enrollment_details(
        &self,
        course_id: i64,
    ) -> Result<Vec<CourseEnrollmentDetail>> {
        Ok(self.with(|t| {
            t.enrollments
                .iter()
                .filter(|e| e.course_id == course_id)
                .map(|e| CourseEnrollmentDetail {
                    enrollment_id: e.enrollment_id,
                    student_id: e.student_id,
                    enrollment_date: e.enrollment_date,
                    student: t.students.iter().find(|s| s.id == e.student_id).cloned(),
                    grades: t
                        .grades
                        .iter()
                        .filter(|g| g.enrollment_id == e.enrollment_id)
                        .cloned()
                        .collect(),
                })
                .collect()
        }))
    }

    async fn get_enrollment(&self, enrollment_id: i64) -> Result<Option<Enrollment>> {
        Ok(self.with(|t| {
            t.enrollments
                .iter()
                .find(|e| e.enrollment_id == enrollment_id)
                .cloned()
        }))
    }

    async fn find_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        Ok(self.with(|t| {
            t.enrollments
                .iter()
                .find(|e| e.student_id == student_id && e.course_id == course_id)
                .cloned()
        }))
    }

    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        self.with(|t| {
            if t.enrollments
                .iter()
                .any(|e| e.student_id == enrollment.student_id && e.course_id == enrollment.course_id)
            {
                return Err(StudyDeskError::conflict(
                    "duplicate key value violates unique constraint",
                ));
            }
            let row = Enrollment {
                enrollment_id: t.next_id(),
                student_id: enrollment.student_id,
                course_id: enrollment.course_id,
                enrollment_date: Some(enrollment.enrollment_date),
            };
            t.enrollments.push(row.clone());
            Ok(row)
        })
    }

    async fn delete_enrollment(&self, enrollment_id: i64) -> Result<bool> {
        Ok(self.with(|t| {
            let before = t.enrollments.len();
            t.enrollments.retain(|e| e.enrollment_id != enrollment_id);
            t.enrollments.len() != before
        }))
    }

    async fn delete_enrollment_for(&self, student_id: i64, course_id: i64) -> Result<bool> {
        Ok(self.with(|t| {
            let before = t.enrollments.len();
            t.enrollments
                .retain(|e| !(e.student_id == student_id && e.course_id == course_id));
            t.enrollments.len() != before
        }))
    }

    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>> {
        Ok(self.with(|t| {
            t.assignments
                .iter()
                .filter(|a| a.course_id == Some(course_id))
                .cloned()
                .collect()
        }))
    }

    async fn get_assignment(&self, assignment_id: &str) -> Result<Option<Assignment>> {
        Ok(self.with(|t| {
            t.assignments
                .iter()
                .find(|a| a.assignment_id == assignment_id)
                .cloned()
        }))
    }

    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        Ok(self.with(|t| {
            let row = Assignment {
                assignment_id: uuid::Uuid::new_v4().to_string(),
                assignment_name: assignment.assignment_name,
                course_id: Some(assignment.course_id),
                weight: assignment.weight,
                due_date: assignment.due_date,
                created_at: Some(t.next_timestamp()),
                updated_at: None,
            };
            t.assignments.push(row.clone());
            row
        }))
    }

    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>> {
        Ok(self.with(|t| {
            let row = t
                .assignments
                .iter_mut()
                .find(|a| a.assignment_id == assignment_id)?;
            if let Some(name) = update.assignment_name {
                row.assignment_name = name;
            }
            if let Some(weight) = update.weight {
                row.weight = weight;
            }
            if let Some(due_date) = update.due_date {
                row.due_date = due_date;
            }
            if let Some(updated_at) = update.updated_at {
                row.updated_at = Some(updated_at);
            }
            Some(row.clone())
        }))
    }

    async fn delete_assignment(&self, assignment_id: &str) -> Result<bool> {
        self.with(|t| {
            if t.grades.iter().any(|g| g.assignment_id == assignment_id) {
                return Err(StudyDeskError::validation(
                    "violates foreign key constraint on table \"student_grades\"",
                ));
            }
            let before = t.assignments.len();
            t.assignments.retain(|a| a.assignment_id != assignment_id);
            Ok(t.assignments.len() != before)
        })
    }

    async fn upsert_grade(&self, grade: GradeUpsert) -> Result<StudentGrade> {
        Ok(self.with(|t| {
            if let Some(row) = t.grades.iter_mut().find(|g| {
                g.enrollment_id == grade.enrollment_id && g.assignment_id == grade.assignment_id
            }) {
                row.grade = Some(grade.grade);
                row.feedback = grade.feedback;
                row.updated_at = Some(grade.updated_at);
                return row.clone();
            }
            let row = StudentGrade {
                student_grade_id: Some(t.next_id()),
                enrollment_id: grade.enrollment_id,
                assignment_id: grade.assignment_id,
                grade: Some(grade.grade),
                feedback: grade.feedback,
                updated_at: Some(grade.updated_at),
            };
            t.grades.push(row.clone());
            row
        }))
    }

    async fn delete_grade(&self, enrollment_id: i64, assignment_id: &str) -> Result<bool> {
        Ok(self.with(|t| {
            let before = t.grades.len();
            t.grades
                .retain(|g| !(g.enrollment_id == enrollment_id && g.assignment_id == assignment_id));
            t.grades.len() != before
        }))
    }

    async fn delete_grades_for_assignment(&self, assignment_id: &str) -> Result<u64> {
        Ok(self.with(|t| {
            let before = t.grades.len();
            t.grades.retain(|g| g.assignment_id != assignment_id);
            (before - t.grades.len()) as u64
        }))
    }

    async fn delete_grades_for_enrollment(&self, enrollment_id: i64) -> Result<u64> {
        Ok(self.with(|t| {
            let before = t.grades.len();
            t.grades.retain(|g| g.enrollment_id != enrollment_id);
            (before - t.grades.len()) as u64
        }))
    }

    async fn list_decks(&self, owner_id: &str, scope: DeckScope) -> Result<Vec<Deck>> {
        Ok(self.with(|t| {
            let mut decks: Vec<Deck> = t
                .decks
                .iter()
                .filter(|d| (d.user_id == owner_id) == (scope == DeckScope::Owned))
                .cloned()
                .collect();
            decks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            decks
        }))
    }

    async fn get_deck(&self, deck_id: &str) -> Result<Option<Deck>> {
        Ok(self.with(|t| t.decks.iter().find(|d| d.flashdeck_id == deck_id).cloned()))
    }

    async fn create_deck(&self, deck: NewDeck) -> Result<Deck> {
        Ok(self.with(|t| {
            let row = Deck {
                flashdeck_id: uuid::Uuid::new_v4().to_string(),
                user_id: deck.user_id,
                name: deck.name,
                description: deck.description,
                created_at: Some(t.next_timestamp()),
            };
            t.decks.push(row.clone());
            row
        }))
    }

    async fn delete_deck(&self, deck_id: &str) -> Result<bool> {
        self.with(|t| {
            if t.cards.iter().any(|c| c.flashdeck_id == deck_id) {
                return Err(StudyDeskError::validation(
                    "violates foreign key constraint on table \"cards\"",
                ));
            }
            let before = t.decks.len();
            t.decks.retain(|d| d.flashdeck_id != deck_id);
            Ok(t.decks.len() != before)
        })
    }

    async fn list_cards(&self, deck_id: &str, ascending: bool) -> Result<Vec<Card>> {
        Ok(self.with(|t| {
            let mut cards: Vec<Card> = t
                .cards
                .iter()
                .filter(|c| c.flashdeck_id == deck_id)
                .cloned()
                .collect();
            cards.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            if !ascending {
                cards.reverse();
            }
            cards
        }))
    }

    async fn get_card(&self, card_id: &str) -> Result<Option<Card>> {
        Ok(self.with(|t| t.cards.iter().find(|c| c.card_id == card_id).cloned()))
    }

    async fn create_card(&self, card: NewCard) -> Result<Card> {
        Ok(self.with(|t| {
            let row = Card {
                card_id: uuid::Uuid::new_v4().to_string(),
                flashdeck_id: card.flashdeck_id,
                front_content: card.front_content,
                back_content: card.back_content,
                created_at: Some(t.next_timestamp()),
            };
            t.cards.push(row.clone());
            row
        }))
    }

    async fn update_card(&self, card_id: &str, update: CardUpdate) -> Result<Option<Card>> {
        Ok(self.with(|t| {
            let row = t.cards.iter_mut().find(|c| c.card_id == card_id)?;
            row.front_content = update.front_content;
            row.back_content = update.back_content;
            Some(row.clone())
        }))
    }

    async fn delete_card(&self, card_id: &str) -> Result<bool> {
        Ok(self.with(|t| {
            let before = t.cards.len();
            t.cards.retain(|c| c.card_id != card_id);
            t.cards.len() != before
        }))
    }

    async fn delete_cards_in_deck(&self, deck_id: &str) -> Result<u64> {
        Ok(self.with(|t| {
            let before = t.cards.len();
            t.cards.retain(|c| c.flashdeck_id != deck_id);
            (before - t.cards.len()) as u64
        }))
    }
}

/// 会话存储与特权存储共用同一份数据
pub struct MemoryProvider {
    pub storage: Arc<MemoryStorage>,
    pub privileged_enabled: bool,
}

impl StorageProvider for MemoryProvider {
    fn for_session(&self, _access_token: &str) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    fn privileged(&self) -> Option<Arc<dyn Storage>> {
        self.privileged_enabled
            .then(|| self.storage.clone() as Arc<dyn Storage>)
    }
}

/// 一次测试用到的后端
pub struct Backend {
    pub identity: Arc<FakeIdentity>,
    pub storage: Arc<MemoryStorage>,
    pub provider: Arc<MemoryProvider>,
}

impl Backend {
    pub fn new() -> Self {
        let storage = Arc::new(MemoryStorage::default());
        Self {
            identity: Arc::new(FakeIdentity::default()),
            provider: Arc::new(MemoryProvider {
                storage: storage.clone(),
                privileged_enabled: true,
            }),
            storage,
        }
    }

    pub fn without_service_role() -> Self {
        let mut backend = Self::new();
        backend.provider = Arc::new(MemoryProvider {
            storage: backend.storage.clone(),
            privileged_enabled: false,
        });
        backend
    }

    /// 建档并登录，返回 (档案 ID, 访问令牌)
    pub fn sign_in(&self, kind: ProfileKind, first: &str, last: &str) -> (i64, String) {
        let user_id = uuid::Uuid::new_v4().to_string();
        let id = self
            .storage
            .with(|t| t.add_profile(kind, &user_id, first, last));
        let email = format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase());
        let token = self
            .identity
            .login_as(auth_user(&user_id, &email, Some(kind.role())));
        (id, token)
    }

    pub fn user_id_of(&self, kind: ProfileKind, id: i64) -> String {
        self.storage.with(|t| {
            t.profiles(kind)
                .iter()
                .find(|p| p.id == id)
                .and_then(|p| p.user_id.clone())
                .unwrap()
        })
    }
}

/// 按生产环境的装配方式构造测试应用
macro_rules! test_app {
    ($backend:expr) => {{
        let identity: std::sync::Arc<dyn studydesk::identity::IdentityProvider> =
            $backend.identity.clone();
        let provider: std::sync::Arc<dyn studydesk::storage::StorageProvider> =
            $backend.provider.clone();
        let cache: std::sync::Arc<dyn studydesk::cache::ObjectCache> = std::sync::Arc::new(
            studydesk::cache::object_cache::MokaCacheWrapper::with_settings(1000, 60),
        );
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(studydesk::middlewares::LoadSession::new(
                    crate::common::session_settings(),
                ))
                .app_data(
                    actix_web::web::FormConfig::default()
                        .error_handler(studydesk::utils::form_error_handler),
                )
                .app_data(actix_web::web::Data::new(identity))
                .app_data(actix_web::web::Data::new(provider))
                .app_data(actix_web::web::Data::new(cache))
                .configure(studydesk::routes::configure_auth_routes)
                .configure(studydesk::routes::configure_home_routes)
                .configure(studydesk::routes::configure_course_routes)
                .configure(studydesk::routes::configure_student_routes)
                .configure(studydesk::routes::configure_staff_routes)
                .configure(studydesk::routes::configure_flashdeck_routes)
                .configure(studydesk::routes::configure_frontend_routes),
        )
        .await
    }};
}

/// 带会话 Cookie 提交表单，得到 `(状态码, JSON 响应体)`
macro_rules! post_form {
    ($app:expr, $token:expr, $uri:expr $(,)?) => {
        post_form!($app, $token, $uri, &[] as &[(&str, &str)])
    };
    ($app:expr, $token:expr, $uri:expr, $form:expr $(,)?) => {
        async {
            let uri: String = ($uri).to_string();
            let req = actix_web::test::TestRequest::post()
                .uri(&uri)
                .cookie(crate::common::access_cookie($token))
                .set_form($form)
                .to_request();
            let resp = actix_web::test::call_service($app, req).await;
            let status = resp.status();
            let body = actix_web::test::read_body(resp).await;
            (
                status,
                serde_json::from_slice::<serde_json::Value>(&body).unwrap_or_default(),
            )
        }
    };
}
