use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::StudentService;
use crate::models::{
    ApiResponse,
    profiles::{
        ProfileKind, ProfileOrder, requests::StudentListQuery, responses::StudentListResponse,
    },
};
use crate::services::current_session;

const SORT_COLUMNS: [&str; 3] = ["first_name", "last_name", "email"];
const DEFAULT_SORT: &str = "last_name";

/// 非法排序列回退到 `last_name`；只有 `asc` 为升序
pub fn resolve_order(query: &StudentListQuery) -> ProfileOrder {
    let column = query
        .sort_by
        .as_deref()
        .and_then(|c| SORT_COLUMNS.iter().find(|valid| **valid == c))
        .copied()
        .unwrap_or(DEFAULT_SORT);
    let ascending = query.sort_order.as_deref().unwrap_or("asc") == "asc";
    ProfileOrder { column, ascending }
}

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentListQuery,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    let order = resolve_order(&query);

    let students = storage
        .list_profiles(ProfileKind::Student, Some(order))
        .await
        .unwrap_or_else(|e| {
            error!("Error loading students: {}", e);
            Vec::new()
        });

    // 回显原始参数
    let response = StudentListResponse {
        students,
        sort_by: query.sort_by.unwrap_or_else(|| DEFAULT_SORT.to_string()),
        sort_order: query.sort_order.unwrap_or_else(|| "asc".to_string()),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Students loaded")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(sort_by: Option<&str>, sort_order: Option<&str>) -> StudentListQuery {
        StudentListQuery {
            sort_by: sort_by.map(str::to_string),
            sort_order: sort_order.map(str::to_string),
        }
    }

    #[test]
    fn test_default_order() {
        let order = resolve_order(&query(None, None));
        assert_eq!(order.column, "last_name");
        assert!(order.ascending);
    }

    #[test]
    fn test_valid_and_invalid_columns() {
        let order = resolve_order(&query(Some("email"), Some("desc")));
        assert_eq!(order.column, "email");
        assert!(!order.ascending);

        let order = resolve_order(&query(Some("password; drop"), Some("asc")));
        assert_eq!(order.column, "last_name");

        // 未知方向按降序处理
        assert!(!resolve_order(&query(None, Some("sideways"))).ascending);
    }
}
