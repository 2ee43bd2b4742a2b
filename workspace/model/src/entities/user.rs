use sea_orm::entity::prelude::*;
use std::str::FromStr;

/// The role a user holds in the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "sales")]
    Sales,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Sales => "sales",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "sales" => Ok(UserRole::Sales),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

/// Represents a login-capable user of the system.
///
/// The password is stored and compared as a plain string. That mirrors the
/// system this one replaces and is a known defect; see DESIGN.md.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub role: UserRole,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A sales-role user has at most one sales person profile.
    #[sea_orm(has_many = "super::sales_person::Entity")]
    SalesPerson,
    /// Invoices record which user created them.
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoice,
}

impl Related<super::sales_person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesPerson.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
