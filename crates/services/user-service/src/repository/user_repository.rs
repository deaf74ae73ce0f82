//! User directory backed by PostgreSQL with soft delete support.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr,
    TransactionTrait,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{Credential, Page, ResponseUser, UserPage};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistent store of user records.
///
/// Listings take a `show_deleted` switch; lookups by email and the
/// existence check only see undeleted rows unless stated otherwise.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Projection by id, deleted or not
    async fn find_by_id(&self, id: i32) -> AppResult<Option<ResponseUser>>;

    /// Full credential by email, including soft-deleted rows
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Credential>>;

    async fn list_all(&self, page: Page, show_deleted: bool) -> AppResult<UserPage>;

    async fn list_by_role(&self, page: Page, role: &str, show_deleted: bool)
        -> AppResult<UserPage>;

    /// Users created within `[start, end]`, bounds inclusive
    async fn list_by_date_range(
        &self,
        page: Page,
        start: NaiveDate,
        end: NaiveDate,
        show_deleted: bool,
    ) -> AppResult<UserPage>;

    /// Insert a new credential and return its id. A taken email yields `DuplicateEmail`.
    async fn insert(&self, email: &str, password_hash: &str, role: &str) -> AppResult<i32>;

    async fn update_password(&self, email: &str, password_hash: &str) -> AppResult<()>;

    /// Flip the deleted flag of an active user and return its id
    async fn soft_delete(&self, id: i32) -> AppResult<i32>;

    /// True when an undeleted user owns this email
    async fn email_exists(&self, email: &str) -> AppResult<bool>;
}

/// Concrete implementation of UserDirectory on SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn visible(query: Select<UserEntity>, show_deleted: bool) -> Select<UserEntity> {
        if show_deleted {
            query
        } else {
            query.filter(user::Column::Deleted.eq(false))
        }
    }

    /// Count and fetch one page inside a single transaction.
    async fn paginate(&self, query: Select<UserEntity>, page: Page) -> AppResult<UserPage> {
        let page = page.checked()?;
        let txn = self.db.begin().await?;

        let (models, pages) = if page.is_unbounded() {
            let models = query.order_by_asc(user::Column::Id).all(&txn).await?;
            (models, page.page_count(0))
        } else {
            let total = query.clone().count(&txn).await?;
            let models = query
                .order_by_asc(user::Column::Id)
                .offset(page.offset()?)
                .limit(page.limit)
                .all(&txn)
                .await?;
            (models, page.page_count(total))
        };

        txn.commit().await?;

        let users = models
            .into_iter()
            .map(|model| ResponseUser::from(&Credential::from(model)))
            .collect();
        Ok(UserPage { users, pages })
    }
}

#[async_trait]
impl UserDirectory for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<ResponseUser>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;

        Ok(result.map(|model| ResponseUser::from(&Credential::from(model))))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Credential>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(Credential::from))
    }

    async fn list_all(&self, page: Page, show_deleted: bool) -> AppResult<UserPage> {
        self.paginate(Self::visible(UserEntity::find(), show_deleted), page)
            .await
    }

    async fn list_by_role(
        &self,
        page: Page,
        role: &str,
        show_deleted: bool,
    ) -> AppResult<UserPage> {
        let query = UserEntity::find().filter(user::Column::Role.eq(role));
        self.paginate(Self::visible(query, show_deleted), page).await
    }

    async fn list_by_date_range(
        &self,
        page: Page,
        start: NaiveDate,
        end: NaiveDate,
        show_deleted: bool,
    ) -> AppResult<UserPage> {
        let query = UserEntity::find().filter(user::Column::CreatedAt.between(start, end));
        self.paginate(Self::visible(query, show_deleted), page).await
    }

    async fn insert(&self, email: &str, password_hash: &str, role: &str) -> AppResult<i32> {
        let active_model = ActiveModel {
            id: NotSet,
            email: Set(email.to_string()),
            password: Set(password_hash.to_string()),
            role: Set(role.to_string()),
            created_at: Set(chrono::Utc::now().date_naive()),
            deleted: Set(false),
        };

        let model = active_model.insert(&self.db).await.map_err(|err| {
            match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateEmail,
                _ => AppError::from(err),
            }
        })?;

        Ok(model.id)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> AppResult<()> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::Password, Expr::value(password_hash))
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Deleted.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn soft_delete(&self, id: i32) -> AppResult<i32> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::Deleted, Expr::value(true))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Deleted.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(id)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Deleted.eq(false))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
