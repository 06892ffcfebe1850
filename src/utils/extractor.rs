//! 路径参数提取器
//!
//! 非法的路径参数在进入处理函数之前就以统一的 400 响应拒绝。

use actix_web::{HttpRequest, HttpResponse, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

fn invalid_path_param(param: &str) -> actix_web::Error {
    let message = format!("Invalid path parameter: {param}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 读取正整数路径参数
pub fn parse_positive_i64(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    req.match_info()
        .get(param)
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| invalid_path_param(param))
}

/// 读取 UUID 路径参数，返回小写形式
pub fn parse_uuid(req: &HttpRequest, param: &str) -> Result<String, actix_web::Error> {
    req.match_info()
        .get(param)
        .and_then(|raw| uuid::Uuid::parse_str(raw).ok())
        .map(|id| id.to_string())
        .ok_or_else(|| invalid_path_param(param))
}

#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready(
                    $crate::utils::extractor::parse_positive_i64(req, $param).map($name),
                )
            }
        }
    };
}

#[macro_export]
macro_rules! define_safe_uuid_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub String);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready(
                    $crate::utils::extractor::parse_uuid(req, $param).map($name),
                )
            }
        }
    };
}

define_safe_i64_extractor!(SafeCourseId, "course_id");
define_safe_i64_extractor!(SafeStudentId, "student_id");
define_safe_i64_extractor!(SafeStaffId, "staff_id");
define_safe_uuid_extractor!(SafeDeckId, "deck_id");
