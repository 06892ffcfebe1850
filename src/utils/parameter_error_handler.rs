//! 请求参数解析失败时的统一响应

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError, UrlencodedError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(kind: &str, detail: String, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected {} for {}: {}", kind, req.path(), detail);
    let message = format!("Invalid {kind}: {detail}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    bad_request("JSON body", err.to_string(), req)
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    bad_request("query parameters", err.to_string(), req)
}

pub fn form_error_handler(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    bad_request("form data", err.to_string(), req)
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    bad_request("path parameters", err.to_string(), req)
}
