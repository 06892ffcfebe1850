pub mod home;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::Session;
use crate::storage::{Storage, StorageProvider};

pub struct DashboardService {
    storage: Option<Arc<dyn StorageProvider>>,
}

impl DashboardService {
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

    // 首页数据
    pub async fn home(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        home::handle_home(self, request).await
    }
}
