//! Idempotent database seeding: a default admin login, the pipeline
//! stages, and the default package catalog. Safe to run on every startup;
//! rows are only inserted when absent.

use common::SeedReport;
use model::entities::{lead_status, package, package_feature, user};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::{info, instrument};

use crate::error::Result;

/// Email of the seeded admin login.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@crm.local";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const DEFAULT_STAGES: &[(&str, i32, &str)] = &[
    ("Lead", 1, "#3B82F6"),
    ("Qualified", 2, "#8B5CF6"),
    ("Proposal", 3, "#F59E0B"),
    ("Negotiation", 4, "#F97316"),
    ("Won", 5, "#10B981"),
    ("Lost", 6, "#EF4444"),
];

struct DefaultPackage {
    name: &'static str,
    /// Price in minor units (2 dp).
    price_cents: i64,
    description: &'static str,
    features: &'static [&'static str],
}

const DEFAULT_PACKAGES: &[DefaultPackage] = &[
    DefaultPackage {
        name: "Starter",
        price_cents: 499_900,
        description: "Single-page presence for small teams",
        features: &["Landing page", "Contact form", "Email support"],
    },
    DefaultPackage {
        name: "Growth",
        price_cents: 999_900,
        description: "Multi-page site with lead capture",
        features: &[
            "Up to 10 pages",
            "Lead capture forms",
            "Basic SEO",
            "Priority email support",
        ],
    },
    DefaultPackage {
        name: "Enterprise",
        price_cents: 2_499_900,
        description: "Custom build with integrations",
        features: &[
            "Unlimited pages",
            "CRM integration",
            "Dedicated account manager",
            "Phone support",
        ],
    },
];

/// Insert the admin login if no user carries [`DEFAULT_ADMIN_EMAIL`].
#[instrument(skip(db))]
pub async fn ensure_admin_user(db: &DatabaseConnection) -> Result<bool> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(DEFAULT_ADMIN_EMAIL))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    user::ActiveModel {
        email: Set(DEFAULT_ADMIN_EMAIL.to_string()),
        password: Set(DEFAULT_ADMIN_PASSWORD.to_string()),
        role: Set(user::UserRole::Admin),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Seeded admin user {}", DEFAULT_ADMIN_EMAIL);
    Ok(true)
}

/// Insert every default pipeline stage whose name is absent.
#[instrument(skip(db))]
pub async fn ensure_pipeline_stages(db: &DatabaseConnection) -> Result<usize> {
    let mut created = 0;
    for (name, sort_order, color) in DEFAULT_STAGES {
        let existing = lead_status::Entity::find()
            .filter(lead_status::Column::Name.eq(*name))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        lead_status::ActiveModel {
            name: Set(name.to_string()),
            sort_order: Set(*sort_order),
            color: Set(color.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created += 1;
    }

    if created > 0 {
        info!("Seeded {} pipeline stages", created);
    }
    Ok(created)
}

/// Insert every default package (with its feature list) whose name is
/// absent. Also backs the `POST /api/v1/packages/ensure-defaults` endpoint.
#[instrument(skip(db))]
pub async fn ensure_default_packages(db: &DatabaseConnection) -> Result<usize> {
    let mut created = 0;
    for default in DEFAULT_PACKAGES {
        let existing = package::Entity::find()
            .filter(package::Column::Name.eq(default.name))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        let inserted = package::ActiveModel {
            name: Set(default.name.to_string()),
            price: Set(Decimal::new(default.price_cents, 2)),
            description: Set(Some(default.description.to_string())),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;

        for (order, feature) in default.features.iter().enumerate() {
            package_feature::ActiveModel {
                package_id: Set(inserted.id),
                feature: Set(feature.to_string()),
                sort_order: Set(order as i32 + 1),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        created += 1;
    }

    if created > 0 {
        info!("Seeded {} default packages", created);
    }
    Ok(created)
}

/// Run the full seeding pass: admin user, pipeline stages, packages.
#[instrument(skip(db))]
pub async fn seed_database(db: &DatabaseConnection) -> Result<SeedReport> {
    let admin_created = ensure_admin_user(db).await?;
    let stages_created = ensure_pipeline_stages(db).await?;
    let packages_created = ensure_default_packages(db).await?;

    let report = SeedReport {
        admin_created,
        stages_created,
        packages_created,
    };
    if report.is_noop() {
        info!("Database already seeded; nothing to do");
    }
    Ok(report)
}
