//! 档案存储操作

use super::{PostgrestStorage, TableQuery};
use crate::errors::Result;
use crate::models::profiles::{NewProfile, Profile, ProfileKind, ProfileOrder, ProfileUpdate};

impl PostgrestStorage {
    /// 列出档案，默认按姓氏排序
    pub async fn list_profiles_impl(
        &self,
        kind: ProfileKind,
        order: Option<ProfileOrder>,
    ) -> Result<Vec<Profile>> {
        let order = order.unwrap_or(ProfileOrder {
            column: "last_name",
            ascending: true,
        });
        let query = TableQuery::new(kind.table())
            .select("*")
            .order(order.column, order.ascending)
            .order(kind.id_column(), true);
        self.fetch_all(query).await
    }

    pub async fn get_profile_impl(&self, kind: ProfileKind, id: i64) -> Result<Option<Profile>> {
        let query = TableQuery::new(kind.table())
            .select("*")
            .eq(kind.id_column(), id);
        self.fetch_optional(query).await
    }

    pub async fn get_profile_by_user_id_impl(
        &self,
        kind: ProfileKind,
        user_id: &str,
    ) -> Result<Option<Profile>> {
        let query = TableQuery::new(kind.table())
            .select("*")
            .eq("user_id", user_id);
        self.fetch_optional(query).await
    }

    pub async fn create_profile_impl(
        &self,
        kind: ProfileKind,
        profile: NewProfile,
    ) -> Result<Profile> {
        self.insert_one(TableQuery::new(kind.table()), &profile)
            .await
    }

    pub async fn update_profile_impl(
        &self,
        kind: ProfileKind,
        id: i64,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>> {
        let query = TableQuery::new(kind.table()).eq(kind.id_column(), id);
        self.update_one(query, &update).await
    }

    pub async fn delete_profile_impl(&self, kind: ProfileKind, id: i64) -> Result<bool> {
        let query = TableQuery::new(kind.table()).eq(kind.id_column(), id);
        Ok(self.delete_rows(query).await? > 0)
    }

    pub async fn count_profiles_impl(&self, kind: ProfileKind) -> Result<u64> {
        let query = TableQuery::new(kind.table()).select(kind.id_column());
        self.count_rows(query).await
    }
}
