//! Session entity for SeaORM. The opaque token is the primary key.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub expires_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for murmur_core::ports::Session {
    fn from(model: Model) -> Self {
        Self {
            token: model.token,
            user_id: model.user_id,
            created_at: model.created_at.into(),
            expires_at: model.expires_at.into(),
        }
    }
}

impl From<murmur_core::ports::Session> for ActiveModel {
    fn from(session: murmur_core::ports::Session) -> Self {
        Self {
            token: Set(session.token),
            user_id: Set(session.user_id),
            created_at: Set(session.created_at.into()),
            expires_at: Set(session.expires_at.into()),
        }
    }
}
