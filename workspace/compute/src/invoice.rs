//! Invoice money math and numbering. Totals are derived server-side at
//! creation time and never trusted from the client.

use chrono::NaiveDate;
use common::InvoiceTotals;
use model::entities::invoice;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;

use crate::error::{ComputeError, Result};

/// Derive the GST amount and grand total for an invoice.
///
/// `gst_amount = base_price * gst_percentage / 100` and
/// `total_amount = base_price + gst_amount`, each rounded to 2 decimal
/// places (banker's rounding, `round_dp`).
pub fn derive_totals(base_price: Decimal, gst_percentage: Decimal) -> Result<InvoiceTotals> {
    if base_price.is_sign_negative() {
        return Err(ComputeError::Invoice(format!(
            "base price must not be negative: {base_price}"
        )));
    }
    if gst_percentage.is_sign_negative() {
        return Err(ComputeError::Invoice(format!(
            "GST percentage must not be negative: {gst_percentage}"
        )));
    }

    let base_price = base_price.round_dp(2);
    let gst_amount = (base_price * gst_percentage / Decimal::ONE_HUNDRED).round_dp(2);
    let total_amount = (base_price + gst_amount).round_dp(2);

    Ok(InvoiceTotals {
        base_price,
        gst_percentage,
        gst_amount,
        total_amount,
    })
}

/// Produce the next invoice number for the given day, e.g.
/// `INV-20250115-0003` when `INV-20250115-0002` is the highest number
/// carrying that day's prefix.
///
/// Deriving from the highest suffix rather than a row count keeps the
/// sequence moving past gaps, and lets a caller that loses a same-number
/// race simply re-derive and try again.
#[instrument(skip(db))]
pub async fn next_invoice_number(db: &DatabaseConnection, on: NaiveDate) -> Result<String> {
    let prefix = format!("INV-{}", on.format("%Y%m%d"));
    // The suffix is fixed-width, so the lexicographic maximum is also the
    // numeric maximum.
    let latest = invoice::Entity::find()
        .filter(invoice::Column::InvoiceNumber.starts_with(&prefix))
        .order_by_desc(invoice::Column::InvoiceNumber)
        .one(db)
        .await?;

    let next = match &latest {
        Some(row) => {
            let suffix = row.invoice_number.rsplit('-').next().unwrap_or_default();
            let current: u32 = suffix.parse().map_err(|_| {
                ComputeError::Invoice(format!(
                    "malformed invoice number in database: {}",
                    row.invoice_number
                ))
            })?;
            current + 1
        }
        None => 1,
    };

    Ok(format!("{}-{:04}", prefix, next))
}
