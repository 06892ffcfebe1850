pub mod create;
pub mod detail;
pub mod enroll;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    profiles::requests::{CreateAccountForm, EnrollStudentForm, StudentListQuery},
    users::Session,
};
use crate::storage::{Storage, StorageProvider};

pub struct StudentService {
    storage: Option<Arc<dyn StorageProvider>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest, session: &Session) -> Arc<dyn Storage> {
        let provider = match &self.storage {
            Some(provider) => provider.clone(),
            None => super::app_storage_provider(request),
        };
        provider.for_session(&session.access_token)
    }

    // 学生列表
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    // 新建学生账号
    pub async fn create_student(
        &self,
        request: &HttpRequest,
        form: CreateAccountForm,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, form).await
    }

    // 学生详情
    pub async fn get_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_student(self, request, student_id).await
    }

    // 为学生选课
    pub async fn enroll_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        form: EnrollStudentForm,
    ) -> ActixResult<HttpResponse> {
        enroll::enroll_student(self, request, student_id, form).await
    }
}
