use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{invoice, package_feature};

/// A service package from the catalog that invoices are raised against.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "packages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Base price before GST.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub description: Option<String>,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "package_feature::Entity")]
    PackageFeature,
    #[sea_orm(has_many = "invoice::Entity")]
    Invoice,
}

impl Related<package_feature::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackageFeature.def()
    }
}

impl Related<invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
