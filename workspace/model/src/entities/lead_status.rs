use sea_orm::entity::prelude::*;

use super::lead;

/// A pipeline stage: an ordered named bucket leads move through
/// (e.g. "Lead", "Qualified", "Won").
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lead_statuses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Position of the stage on the board, ascending.
    pub sort_order: i32,
    /// Display color as a hex string (e.g. "#3B82F6").
    pub color: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "lead::Entity")]
    Lead,
}

impl Related<lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lead.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
