//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreError, UserRepository};
use crate::domain::{LoginCredentials, User, UserAccount, UserId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserCredentialsUpdate, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert_if_absent(&self, user: &User) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: user.id.as_str(),
            display_name: user.display_name.as_str(),
            created_at: user.created_at,
        };
        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserAccount::try_from).transpose()
    }

    async fn set_credentials(
        &self,
        id: &UserId,
        credentials: &LoginCredentials,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = UserCredentialsUpdate {
            emoji_combination: credentials.emoji_combination(),
            first_selection_id: credentials.first_selection_id(),
            second_selection_id: credentials.second_selection_id(),
        };
        let updated = diesel::update(users::table.filter(users::id.eq(id.as_str())))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(StoreError::query(format!("user {id} not found")));
        }
        Ok(())
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.filter(users::id.eq(id.as_str())))
            .set(users::last_login_at.eq(Some(at)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
