//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the lead/sales CRM here: login users,
//! the sales team, the lead pipeline, the package catalog, and invoices.

pub mod invoice;
pub mod lead;
pub mod lead_email;
pub mod lead_phone;
pub mod lead_status;
pub mod package;
pub mod package_feature;
pub mod sales_person;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::invoice::Entity as Invoice;
    pub use super::lead::Entity as Lead;
    pub use super::lead_email::Entity as LeadEmail;
    pub use super::lead_phone::Entity as LeadPhone;
    pub use super::lead_status::Entity as LeadStatus;
    pub use super::package::Entity as Package;
    pub use super::package_feature::Entity as PackageFeature;
    pub use super::sales_person::Entity as SalesPerson;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, Utc};
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        // Create users
        let admin = user::ActiveModel {
            email: Set("admin@example.com".to_string()),
            password: Set("admin123".to_string()),
            role: Set(user::UserRole::Admin),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let seller_login = user::ActiveModel {
            email: Set("jane@example.com".to_string()),
            password: Set("secret".to_string()),
            role: Set(user::UserRole::Sales),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a sales person linked to the sales-role user
        let jane = sales_person::ActiveModel {
            user_id: Set(seller_login.id),
            name: Set("Jane Doe".to_string()),
            email: Set("jane@example.com".to_string()),
            phone: Set("+1 555 010 1234".to_string()),
            status: Set(sales_person::SalesPersonStatus::Active),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create pipeline stages
        let stage_new = lead_status::ActiveModel {
            name: Set("Lead".to_string()),
            sort_order: Set(1),
            color: Set("#3B82F6".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let stage_qualified = lead_status::ActiveModel {
            name: Set("Qualified".to_string()),
            sort_order: Set(2),
            color: Set("#8B5CF6".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a lead with contact child rows
        let lead_row = lead::ActiveModel {
            name: Set("Acme Corp deal".to_string()),
            company: Set(Some("Acme Corp".to_string())),
            status_id: Set(stage_new.id),
            assigned_to: Set(Some(jane.id)),
            reminder_date: Set(NaiveDate::from_ymd_opt(2025, 3, 1)),
            notes: Set(Some("Met at trade fair".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        lead_email::ActiveModel {
            lead_id: Set(lead_row.id),
            email: Set("buyer@acme.example".to_string()),
            is_primary: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        lead_phone::ActiveModel {
            lead_id: Set(lead_row.id),
            phone: Set("5550102345".to_string()),
            is_primary: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a package with features
        let starter = package::ActiveModel {
            name: Set("Starter".to_string()),
            price: Set(Decimal::new(499900, 2)), // 4999.00
            description: Set(Some("Entry package".to_string())),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        for (order, feature) in ["Landing page", "Email support"].iter().enumerate() {
            package_feature::ActiveModel {
                package_id: Set(starter.id),
                feature: Set(feature.to_string()),
                sort_order: Set(order as i32 + 1),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        // Create an invoice against the package
        let invoice_row = invoice::ActiveModel {
            invoice_number: Set("INV-20250115-0001".to_string()),
            customer_name: Set("Acme Corp".to_string()),
            customer_email: Set("accounts@acme.example".to_string()),
            customer_phone: Set("5550102345".to_string()),
            customer_address: Set(None),
            package_id: Set(starter.id),
            base_price: Set(Decimal::new(499900, 2)),
            gst_percentage: Set(Decimal::new(1800, 2)), // 18.00
            gst_amount: Set(Decimal::new(89982, 2)),    // 899.82
            total_amount: Set(Decimal::new(589882, 2)), // 5898.82
            notes: Set(None),
            created_by: Set(admin.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.email == "admin@example.com"));

        let stages = LeadStatus::find().all(&db).await?;
        assert_eq!(stages.len(), 2);
        assert!(stages.iter().any(|s| s.id == stage_qualified.id));

        let leads = Lead::find()
            .filter(lead::Column::AssignedTo.eq(jane.id))
            .all(&db)
            .await?;
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].company.as_deref(), Some("Acme Corp"));

        let emails = LeadEmail::find()
            .filter(lead_email::Column::LeadId.eq(lead_row.id))
            .all(&db)
            .await?;
        assert_eq!(emails.len(), 1);
        assert!(emails[0].is_primary);

        let phones = LeadPhone::find()
            .filter(lead_phone::Column::LeadId.eq(lead_row.id))
            .all(&db)
            .await?;
        assert_eq!(phones.len(), 1);

        let features = PackageFeature::find()
            .filter(package_feature::Column::PackageId.eq(starter.id))
            .all(&db)
            .await?;
        assert_eq!(features.len(), 2);

        let invoices = Invoice::find().all(&db).await?;
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].total_amount, Decimal::new(589882, 2));
        assert_eq!(invoices[0].created_by, admin.id);
        assert_eq!(invoices[0].id, invoice_row.id);

        // Deleting a lead cascades to its contact rows
        Lead::delete_by_id(lead_row.id).exec(&db).await?;
        let orphan_emails = LeadEmail::find().all(&db).await?;
        assert!(orphan_emails.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_role_and_status_round_trip() {
        use std::str::FromStr;

        assert_eq!(user::UserRole::from_str("admin"), Ok(user::UserRole::Admin));
        assert_eq!(user::UserRole::from_str("sales"), Ok(user::UserRole::Sales));
        assert!(user::UserRole::from_str("root").is_err());
        assert_eq!(user::UserRole::Sales.as_str(), "sales");

        assert_eq!(
            sales_person::SalesPersonStatus::from_str("inactive"),
            Ok(sales_person::SalesPersonStatus::Inactive)
        );
        assert!(sales_person::SalesPersonStatus::from_str("fired").is_err());
    }
}
