//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Credential;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    /// Password hash in PHC string format
    pub password: String,
    pub role: String,
    pub created_at: Date,
    /// Soft delete flag
    pub deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Credential {
    fn from(model: Model) -> Self {
        Credential {
            id: model.id,
            email: model.email,
            password_hash: model.password,
            role: model.role,
            created_at: model.created_at,
            deleted: model.deleted,
        }
    }
}
