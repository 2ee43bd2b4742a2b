//! Builds the kanban board summary: every pipeline stage in order with the
//! leads currently sitting in it.

use std::collections::HashMap;

use common::{BoardLead, PipelineBoard, StageColumn};
use model::entities::{lead, lead_status};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tracing::instrument;

use crate::error::Result;

/// Load all stages and leads and group them into a [`PipelineBoard`].
/// Stages come back in `sort_order`; leads within a stage in id order.
#[instrument(skip(db))]
pub async fn build_board(db: &DatabaseConnection) -> Result<PipelineBoard> {
    let stages = lead_status::Entity::find()
        .order_by_asc(lead_status::Column::SortOrder)
        .all(db)
        .await?;

    let leads = lead::Entity::find()
        .order_by_asc(lead::Column::Id)
        .all(db)
        .await?;

    let mut by_stage: HashMap<i32, Vec<BoardLead>> = HashMap::new();
    for l in leads {
        by_stage.entry(l.status_id).or_default().push(BoardLead {
            id: l.id,
            name: l.name,
            company: l.company,
            assigned_to: l.assigned_to,
            reminder_date: l.reminder_date,
        });
    }

    let columns = stages
        .into_iter()
        .map(|stage| {
            let leads = by_stage.remove(&stage.id).unwrap_or_default();
            StageColumn {
                status_id: stage.id,
                name: stage.name,
                color: stage.color,
                sort_order: stage.sort_order,
                lead_count: leads.len(),
                leads,
            }
        })
        .collect();

    Ok(PipelineBoard::new(columns))
}
