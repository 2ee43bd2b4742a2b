use sea_orm::entity::prelude::*;
use std::str::FromStr;

use super::{lead, user};

/// Whether a sales person currently takes part in lead distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SalesPersonStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl SalesPersonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesPersonStatus::Active => "active",
            SalesPersonStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for SalesPersonStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SalesPersonStatus::Active),
            "inactive" => Ok(SalesPersonStatus::Inactive),
            other => Err(format!("unknown sales person status: {other}")),
        }
    }
}

/// A member of the sales team. Linked 1:1 to a sales-role user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sales_persons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The login user backing this profile.
    #[sea_orm(unique)]
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: SalesPersonStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Leads currently assigned to this sales person.
    #[sea_orm(has_many = "lead::Entity")]
    Lead,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lead.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
