use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{package, user};

/// An invoice raised for a customer against a service package.
///
/// `gst_amount` and `total_amount` are derived from `base_price` and
/// `gst_percentage` at creation time and stored rounded to 2 decimal places.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub package_id: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub base_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub gst_percentage: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub gst_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    /// The user who raised the invoice.
    pub created_by: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "package::Entity",
        from = "Column::PackageId",
        to = "package::Column::Id"
    )]
    Package,
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::CreatedBy",
        to = "user::Column::Id"
    )]
    CreatedByUser,
}

impl Related<package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedByUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
