use sea_orm::entity::prelude::*;

use super::lead;

/// A phone number attached to a lead.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lead_phones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lead_id: i32,
    pub phone: String,
    /// The first phone captured for a lead is marked primary.
    #[sea_orm(default_value = "false")]
    pub is_primary: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "lead::Entity",
        from = "Column::LeadId",
        to = "lead::Column::Id",
        on_delete = "Cascade"
    )]
    Lead,
}

impl Related<lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lead.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
