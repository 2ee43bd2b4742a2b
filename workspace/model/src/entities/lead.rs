use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::{lead_email, lead_phone, lead_status, sales_person};

/// A sales lead moving through the status pipeline.
///
/// Contact details live in the `lead_emails` / `lead_phones` child tables,
/// which are the single source of truth; the lead row itself carries no
/// denormalized contact columns.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub company: Option<String>,
    /// The pipeline stage the lead currently sits in.
    pub status_id: i32,
    /// The sales person the lead is assigned to, if any.
    pub assigned_to: Option<i32>,
    /// Optional follow-up reminder date.
    pub reminder_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "lead_status::Entity",
        from = "Column::StatusId",
        to = "lead_status::Column::Id"
    )]
    Status,
    #[sea_orm(
        belongs_to = "sales_person::Entity",
        from = "Column::AssignedTo",
        to = "sales_person::Column::Id",
        on_delete = "SetNull"
    )]
    AssignedSalesPerson,
    #[sea_orm(has_many = "lead_email::Entity")]
    LeadEmail,
    #[sea_orm(has_many = "lead_phone::Entity")]
    LeadPhone,
}

impl Related<lead_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<sales_person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedSalesPerson.def()
    }
}

impl Related<lead_email::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeadEmail.def()
    }
}

impl Related<lead_phone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeadPhone.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
