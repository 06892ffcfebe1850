//! 账号开通
//!
//! 学生、教师、管理员的新建都走这里：先在认证服务中创建用户（角色写入 user_metadata），
//! 再用 service role 插入档案行。档案插入失败时删除刚创建的认证用户。

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::{error, info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    profiles::{
        NewProfile, ProfileKind,
        requests::CreateAccountForm,
        responses::{AccountCreatedResponse, AccountFormEcho},
    },
    users::{Role, Session},
};
use crate::services::{app_identity, app_storage_provider, error_status};
use crate::utils::{
    form::{required, required_password},
    validate::{validate_email, validate_password},
};

fn rejected(status: StatusCode, code: ErrorCode, echo: AccountFormEcho, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error(code, echo, message))
}

/// 开通账号并返回完整响应
///
/// `missing_message` 是必填字段缺失时的提示，各页面措辞不同。
pub async fn provision_account(
    request: &HttpRequest,
    session: &Session,
    kind: ProfileKind,
    form: &CreateAccountForm,
    missing_message: &str,
) -> HttpResponse {
    let echo = AccountFormEcho {
        first_name: form.first_name.clone().unwrap_or_default(),
        last_name: form.last_name.clone().unwrap_or_default(),
        email: form.email.clone().unwrap_or_default(),
    };

    if session.role() != Some(Role::Admin) {
        return rejected(
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            echo,
            "Forbidden: Only admins can create users",
        );
    }

    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        required(&form.first_name),
        required(&form.last_name),
        required(&form.email),
        required_password(&form.password),
    ) else {
        return rejected(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            echo,
            missing_message,
        );
    };

    if let Err(msg) = validate_email(email) {
        return rejected(StatusCode::BAD_REQUEST, ErrorCode::UserEmailInvalid, echo, msg);
    }
    let policy = validate_password(password);
    if !policy.is_valid {
        return rejected(
            StatusCode::BAD_REQUEST,
            ErrorCode::UserPasswordInvalid,
            echo,
            &policy.error_message(),
        );
    }

    let Some(privileged) = app_storage_provider(request).privileged() else {
        error!("Account provisioning requested but no service role key is configured");
        return rejected(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::AccountCreationFailed,
            echo,
            "Server configuration error: service role key missing.",
        );
    };

    let role = kind.role();
    let identity = app_identity(request);
    let auth_user = match identity.admin_create_user(email, password, role).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Auth user creation failed for {}: {}", email, e);
            let status = match error_status(&e) {
                StatusCode::INTERNAL_SERVER_ERROR => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            };
            return rejected(status, ErrorCode::AccountCreationFailed, echo, e.message());
        }
    };
    info!("Auth user created: {}", auth_user.id);

    let profile = NewProfile {
        user_id: auth_user.id.clone(),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    };
    match privileged.create_profile(kind, profile).await {
        Ok(profile) => {
            info!(
                "Profile {} ({}) created in {} for user {}",
                profile.id,
                profile.full_name(),
                kind.table(),
                auth_user.id
            );
            HttpResponse::Created().json(ApiResponse::success(
                AccountCreatedResponse {
                    user_id: auth_user.id,
                    profile,
                },
                format!("{} created successfully.", kind.title()),
            ))
        }
        Err(e) => {
            error!("Failed to insert into {}: {}", kind.table(), e);
            if let Err(cleanup) = identity.admin_delete_user(&auth_user.id).await {
                error!(
                    "CRITICAL: Failed to delete orphaned auth user {}: {}",
                    auth_user.id, cleanup
                );
            }
            rejected(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::AccountCreationFailed,
                echo,
                &format!("Failed to create {} profile: {}", role, e.message()),
            )
        }
    }
}
