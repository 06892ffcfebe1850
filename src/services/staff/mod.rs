pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::identity::IdentityProvider;
use tracing::{error, warn};

use crate::models::{
    ErrorCode,
    profiles::{
        Profile, ProfileKind,
        requests::{
            CreateAccountForm, DeleteAdminForm, DeleteInstructorForm, UpdateInstructorForm,
        },
    },
    users::{Role, Session},
};
use crate::storage::{Storage, StorageProvider};

pub struct StaffService {
    storage: Option<Arc<dyn StorageProvider>>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl StaffService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            identity: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest, session: &Session) -> Arc<dyn Storage> {
        let provider = match &self.storage {
            Some(provider) => provider.clone(),
            None => super::app_storage_provider(request),
        };
        provider.for_session(&session.access_token)
    }

    pub(crate) fn get_identity(&self, request: &HttpRequest) -> Arc<dyn IdentityProvider> {
        match &self.identity {
            Some(identity) => identity.clone(),
            None => super::app_identity(request),
        }
    }

    // 教职工列表
    pub async fn list_staff(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_staff(self, request).await
    }

    // 教职工详情
    pub async fn get_staff_member(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_staff_member(self, request, id).await
    }

    pub async fn create_instructor(
        &self,
        request: &HttpRequest,
        form: CreateAccountForm,
    ) -> ActixResult<HttpResponse> {
        create::create_instructor(self, request, form).await
    }

    pub async fn create_admin(
        &self,
        request: &HttpRequest,
        form: CreateAccountForm,
    ) -> ActixResult<HttpResponse> {
        create::create_admin(self, request, form).await
    }

    pub async fn update_instructor(
        &self,
        request: &HttpRequest,
        form: UpdateInstructorForm,
    ) -> ActixResult<HttpResponse> {
        update::update_instructor(self, request, form).await
    }

    pub async fn delete_instructor(
        &self,
        request: &HttpRequest,
        form: DeleteInstructorForm,
    ) -> ActixResult<HttpResponse> {
        delete::delete_instructor(self, request, form).await
    }

    pub async fn delete_admin(
        &self,
        request: &HttpRequest,
        form: DeleteAdminForm,
    ) -> ActixResult<HttpResponse> {
        delete::delete_admin(self, request, form).await
    }
}

/// 教职工管理操作仅限管理员
pub(crate) fn admin_session(request: &HttpRequest) -> Result<Session, HttpResponse> {
    let session = super::current_session(request)?;
    if session.role() != Some(Role::Admin) {
        return Err(super::forbidden(
            ErrorCode::Forbidden,
            "Forbidden: Only admins can manage staff",
        ));
    }
    Ok(session)
}

/// 读取教职工档案并核对表单提交的认证用户 ID
///
/// 认证服务的管理操作只能作用于档案行实际关联的账号。
pub(crate) async fn verified_member(
    storage: &Arc<dyn Storage>,
    kind: ProfileKind,
    id: i64,
    user_id: &str,
) -> Result<Profile, HttpResponse> {
    let profile = match storage.get_profile(kind, id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return Err(super::not_found(
                ErrorCode::StaffNotFound,
                &format!("{} not found.", kind.title()),
            ));
        }
        Err(e) => {
            error!("Error loading {} {}: {}", kind.label(), id, e);
            return Err(super::failure(
                &e,
                ErrorCode::StaffNotFound,
                &format!("Failed to load {} record", kind.label()),
            ));
        }
    };

    if profile.user_id.as_deref() != Some(user_id) {
        warn!(
            "User ID {} does not belong to {} {}",
            user_id,
            kind.label(),
            id
        );
        return Err(super::bad_request(
            ErrorCode::BadRequest,
            &format!("User ID does not match the {} record.", kind.label()),
        ));
    }
    Ok(profile)
}
