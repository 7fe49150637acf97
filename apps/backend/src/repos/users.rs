//! User persistence over SeaORM (generic over `ConnectionTrait`).

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, Set,
};

use crate::auth::claims::Role;
use crate::auth::user_lookup::{UserLookup, UserRecord};
use crate::entities::users;
use crate::error::AppError;

/// Fields needed to create an account. `email` must already be normalized.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

impl From<users::Model> for UserRecord {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            role: model.role.into(),
            is_active: model.is_active,
        }
    }
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<users::Model>, AppError> {
    Ok(users::Entity::find_by_id(id).one(conn).await?)
}

pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await?)
}

pub async fn email_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<bool, AppError> {
    let count = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_user: NewUser<'_>,
) -> Result<users::Model, AppError> {
    let active = users::ActiveModel {
        id: NotSet,
        full_name: Set(new_user.full_name.to_string()),
        email: Set(new_user.email.to_string()),
        password_hash: Set(new_user.password_hash.to_string()),
        role: Set(new_user.role.into()),
        is_active: Set(true),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };
    Ok(active.insert(conn).await?)
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    is_active: bool,
) -> Result<(), AppError> {
    let active = users::ActiveModel {
        id: Set(id),
        is_active: Set(is_active),
        ..Default::default()
    };
    active.update(conn).await?;
    Ok(())
}

/// Account store backed by the `users` table.
#[derive(Debug, Clone)]
pub struct SeaUserStore {
    db: DatabaseConnection,
}

impl SeaUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserLookup for SeaUserStore {
    async fn find(&self, id: i64) -> Result<Option<UserRecord>, AppError> {
        Ok(find_user_by_id(&self.db, id).await?.map(UserRecord::from))
    }
}
