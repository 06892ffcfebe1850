use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

use super::DashboardService;
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    courses::CourseOption,
    dashboard::{DashboardProfile, DashboardResponse, DashboardStats},
    profiles::{Profile, ProfileKind},
    users::{Role, Session},
};
use crate::services::current_session;
use crate::storage::Storage;

pub async fn handle_home(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    let role = session.role();

    let response = match role {
        Some(Role::Student) => {
            let profile = lookup_profile(&storage, ProfileKind::Student, &session).await;
            let courses = match &profile {
                Some(p) => logged(
                    storage.list_enrolled_courses(p.id).await,
                    "enrolled courses",
                ),
                None => Vec::new(),
            };
            DashboardResponse {
                role,
                profile: profile.map(DashboardProfile::from),
                courses,
                stats: None,
            }
        }
        Some(Role::Instructor) => {
            let profile = lookup_profile(&storage, ProfileKind::Instructor, &session).await;
            let courses = match &profile {
                Some(p) => logged(
                    storage.list_courses_by_instructor(p.id).await,
                    "taught courses",
                ),
                None => Vec::new(),
            };
            DashboardResponse {
                role,
                profile: profile.map(DashboardProfile::from),
                courses,
                stats: None,
            }
        }
        Some(Role::Admin) => {
            let profile = match storage
                .get_profile_by_user_id(ProfileKind::Admin, session.user_id())
                .await
            {
                Ok(Some(p)) => DashboardProfile::from(p),
                Ok(None) => {
                    info!("No admin row for user {}, deriving profile", session.user_id());
                    DashboardProfile::derived_from_email(session.user.email.as_deref())
                }
                Err(e) => {
                    error!("Failed to load admin profile: {}", e);
                    DashboardProfile::derived_from_email(session.user.email.as_deref())
                }
            };
            DashboardResponse {
                role,
                profile: Some(profile),
                courses: Vec::new(),
                stats: Some(load_stats(&storage).await),
            }
        }
        None => DashboardResponse {
            role: None,
            profile: None,
            courses: Vec::<CourseOption>::new(),
            stats: None,
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Dashboard loaded")))
}

async fn lookup_profile(
    storage: &Arc<dyn Storage>,
    kind: ProfileKind,
    session: &Session,
) -> Option<Profile> {
    match storage.get_profile_by_user_id(kind, session.user_id()).await {
        Ok(profile) => profile,
        Err(e) => {
            error!("Failed to load {} profile: {}", kind.label(), e);
            None
        }
    }
}

fn logged<T>(result: Result<Vec<T>>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        error!("Failed to load {}: {}", what, e);
        Vec::new()
    })
}

/// 四项计数并发查询，单项失败记为 0
async fn load_stats(storage: &Arc<dyn Storage>) -> DashboardStats {
    let (students, instructors, admins, courses) = futures_util::join!(
        storage.count_profiles(ProfileKind::Student),
        storage.count_profiles(ProfileKind::Instructor),
        storage.count_profiles(ProfileKind::Admin),
        storage.count_courses(),
    );

    let count = |result: Result<u64>, what: &str| {
        result.unwrap_or_else(|e| {
            error!("Failed to count {}: {}", what, e);
            0
        })
    };

    DashboardStats {
        students: count(students, "students"),
        instructors: count(instructors, "instructors"),
        admins: count(admins, "admins"),
        courses: count(courses, "courses"),
    }
}
