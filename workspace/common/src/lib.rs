//! Transport-layer types shared between the compute crate and the HTTP
//! handlers. Compute produces these payloads; the backend serializes them
//! straight into API responses.

mod assignment;
mod board;

pub use assignment::{AssignmentEntry, AssignmentOutcome};
pub use board::{BoardLead, PipelineBoard, StageColumn};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What a seeding pass created. Every field is zero/false when the
/// database was already seeded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub stages_created: usize,
    pub packages_created: usize,
}

impl SeedReport {
    /// True when the pass inserted nothing.
    pub fn is_noop(&self) -> bool {
        !self.admin_created && self.stages_created == 0 && self.packages_created == 0
    }
}

/// Derived money fields of an invoice, all rounded to 2 decimal places.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct InvoiceTotals {
    /// Package price before GST.
    pub base_price: Decimal,
    /// Applied GST percentage (e.g. 18.00).
    pub gst_percentage: Decimal,
    /// `base_price * gst_percentage / 100`, rounded.
    pub gst_amount: Decimal,
    /// `base_price + gst_amount`.
    pub total_amount: Decimal,
}
