use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::Password))
                    .col(string_len(Users::Role, 20))
                    .col(boolean(Users::IsActive).default(true))
                    .to_owned(),
            )
            .await?;

        // Create sales_persons table (1:1 with a sales-role user)
        manager
            .create_table(
                Table::create()
                    .table(SalesPersons::Table)
                    .if_not_exists()
                    .col(pk_auto(SalesPersons::Id))
                    .col(integer(SalesPersons::UserId).unique_key())
                    .col(string(SalesPersons::Name))
                    .col(string(SalesPersons::Email))
                    .col(string(SalesPersons::Phone))
                    .col(string_len(SalesPersons::Status, 20))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_persons_user")
                            .from(SalesPersons::Table, SalesPersons::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lead_statuses table (the ordered pipeline)
        manager
            .create_table(
                Table::create()
                    .table(LeadStatuses::Table)
                    .if_not_exists()
                    .col(pk_auto(LeadStatuses::Id))
                    .col(string(LeadStatuses::Name).unique_key())
                    .col(integer(LeadStatuses::SortOrder))
                    .col(string(LeadStatuses::Color))
                    .to_owned(),
            )
            .await?;

        // Create leads table
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(pk_auto(Leads::Id))
                    .col(string(Leads::Name))
                    .col(string_null(Leads::Company))
                    .col(integer(Leads::StatusId))
                    .col(integer_null(Leads::AssignedTo))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_status")
                            .from(Leads::Table, Leads::StatusId)
                            .to(LeadStatuses::Table, LeadStatuses::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_assigned_to")
                            .from(Leads::Table, Leads::AssignedTo)
                            .to(SalesPersons::Table, SalesPersons::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lead_emails table (contact child rows; source of truth)
        manager
            .create_table(
                Table::create()
                    .table(LeadEmails::Table)
                    .if_not_exists()
                    .col(pk_auto(LeadEmails::Id))
                    .col(integer(LeadEmails::LeadId))
                    .col(string(LeadEmails::Email))
                    .col(boolean(LeadEmails::IsPrimary).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_emails_lead")
                            .from(LeadEmails::Table, LeadEmails::LeadId)
                            .to(Leads::Table, Leads::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lead_phones table
        manager
            .create_table(
                Table::create()
                    .table(LeadPhones::Table)
                    .if_not_exists()
                    .col(pk_auto(LeadPhones::Id))
                    .col(integer(LeadPhones::LeadId))
                    .col(string(LeadPhones::Phone))
                    .col(boolean(LeadPhones::IsPrimary).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_phones_lead")
                            .from(LeadPhones::Table, LeadPhones::LeadId)
                            .to(Leads::Table, Leads::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create packages table
        manager
            .create_table(
                Table::create()
                    .table(Packages::Table)
                    .if_not_exists()
                    .col(pk_auto(Packages::Id))
                    .col(string(Packages::Name).unique_key())
                    .col(decimal(Packages::Price).decimal_len(12, 2))
                    .col(string_null(Packages::Description))
                    .col(boolean(Packages::IsActive).default(true))
                    .to_owned(),
            )
            .await?;

        // Create package_features table
        manager
            .create_table(
                Table::create()
                    .table(PackageFeatures::Table)
                    .if_not_exists()
                    .col(pk_auto(PackageFeatures::Id))
                    .col(integer(PackageFeatures::PackageId))
                    .col(string(PackageFeatures::Feature))
                    .col(integer(PackageFeatures::SortOrder))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_features_package")
                            .from(PackageFeatures::Table, PackageFeatures::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create invoices table
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(pk_auto(Invoices::Id))
                    .col(string(Invoices::InvoiceNumber).unique_key())
                    .col(string(Invoices::CustomerName))
                    .col(string(Invoices::CustomerEmail))
                    .col(string(Invoices::CustomerPhone))
                    .col(string_null(Invoices::CustomerAddress))
                    .col(integer(Invoices::PackageId))
                    .col(decimal(Invoices::BasePrice).decimal_len(12, 2))
                    .col(decimal(Invoices::GstPercentage).decimal_len(5, 2))
                    .col(decimal(Invoices::GstAmount).decimal_len(12, 2))
                    .col(decimal(Invoices::TotalAmount).decimal_len(12, 2))
                    .col(string_null(Invoices::Notes))
                    .col(integer(Invoices::CreatedBy))
                    .col(timestamp_with_time_zone(Invoices::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_package")
                            .from(Invoices::Table, Invoices::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_created_by")
                            .from(Invoices::Table, Invoices::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PackageFeatures::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Packages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeadPhones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeadEmails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeadStatuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalesPersons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Password,
    Role,
    IsActive,
}

#[derive(DeriveIden)]
enum SalesPersons {
    Table,
    Id,
    UserId,
    Name,
    Email,
    Phone,
    Status,
}

#[derive(DeriveIden)]
enum LeadStatuses {
    Table,
    Id,
    Name,
    SortOrder,
    Color,
}

#[derive(DeriveIden)]
enum Leads {
    Table,
    Id,
    Name,
    Company,
    StatusId,
    AssignedTo,
}

#[derive(DeriveIden)]
enum LeadEmails {
    Table,
    Id,
    LeadId,
    Email,
    IsPrimary,
}

#[derive(DeriveIden)]
enum LeadPhones {
    Table,
    Id,
    LeadId,
    Phone,
    IsPrimary,
}

#[derive(DeriveIden)]
enum Packages {
    Table,
    Id,
    Name,
    Price,
    Description,
    IsActive,
}

#[derive(DeriveIden)]
enum PackageFeatures {
    Table,
    Id,
    PackageId,
    Feature,
    SortOrder,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    InvoiceNumber,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    CustomerAddress,
    PackageId,
    BasePrice,
    GstPercentage,
    GstAmount,
    TotalAmount,
    Notes,
    CreatedBy,
    CreatedAt,
}
