//! Greedy least-loaded distribution of unassigned leads across the active
//! sales team. Each unassigned lead goes to the sales person with the
//! fewest assigned leads at that moment; ties go to the lowest id. After a
//! pass, no two participating sales persons differ by more than one lead.

use std::collections::HashMap;

use common::{AssignmentEntry, AssignmentOutcome};
use model::entities::{lead, sales_person};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument};

use crate::error::{ComputeError, Result};

/// Plan assignments without touching the database.
///
/// `candidates` are the sales persons taking part, `counts` their current
/// assigned-lead tallies (missing entries count as zero), `unassigned` the
/// leads to distribute, processed in the given order. Returns an empty plan
/// when there are no candidates.
pub fn plan_assignments(
    candidates: &[i32],
    counts: &HashMap<i32, usize>,
    unassigned: &[i32],
) -> Vec<AssignmentEntry> {
    let mut order: Vec<i32> = candidates.to_vec();
    order.sort_unstable();
    order.dedup();

    let mut load: HashMap<i32, usize> = order
        .iter()
        .map(|id| (*id, counts.get(id).copied().unwrap_or(0)))
        .collect();

    let mut plan = Vec::with_capacity(unassigned.len());
    for &lead_id in unassigned {
        // min_by_key keeps the first minimum, so ties resolve to the
        // lowest sales person id.
        let Some(pick) = order
            .iter()
            .copied()
            .min_by_key(|id| load.get(id).copied().unwrap_or(0))
        else {
            break;
        };

        if let Some(count) = load.get_mut(&pick) {
            *count += 1;
        }
        plan.push(AssignmentEntry {
            lead_id,
            sales_person_id: pick,
        });
    }

    plan
}

/// Run a full auto-assignment pass against the database.
///
/// Loads the active sales team and the current lead table, plans the
/// distribution, and persists it inside a single transaction so two
/// concurrent passes serialize instead of interleaving writes.
#[instrument(skip(db))]
pub async fn assign_unassigned_leads(db: &DatabaseConnection) -> Result<AssignmentOutcome> {
    let candidates: Vec<i32> = sales_person::Entity::find()
        .filter(sales_person::Column::Status.eq(sales_person::SalesPersonStatus::Active))
        .order_by_asc(sales_person::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|sp| sp.id)
        .collect();

    let leads = lead::Entity::find()
        .order_by_asc(lead::Column::Id)
        .all(db)
        .await?;

    let mut counts: HashMap<i32, usize> = HashMap::new();
    let mut unassigned: Vec<i32> = Vec::new();
    for l in &leads {
        match l.assigned_to {
            Some(sp_id) => *counts.entry(sp_id).or_insert(0) += 1,
            None => unassigned.push(l.id),
        }
    }

    debug!(
        "Assignment pass: {} active sales persons, {} unassigned of {} leads",
        candidates.len(),
        unassigned.len(),
        leads.len()
    );

    if unassigned.is_empty() {
        return Ok(AssignmentOutcome::empty(candidates.len()));
    }
    if candidates.is_empty() {
        return Err(ComputeError::Assignment(
            "no active sales persons to assign leads to".to_string(),
        ));
    }

    let plan = plan_assignments(&candidates, &counts, &unassigned);

    let txn = db.begin().await?;
    for entry in &plan {
        let update = lead::ActiveModel {
            id: Set(entry.lead_id),
            assigned_to: Set(Some(entry.sales_person_id)),
            ..Default::default()
        };
        update.update(&txn).await?;
    }
    txn.commit().await?;

    info!(
        "Assigned {} leads across {} sales persons",
        plan.len(),
        candidates.len()
    );

    Ok(AssignmentOutcome {
        unassigned_before: unassigned.len(),
        sales_person_count: candidates.len(),
        assigned: plan,
    })
}
