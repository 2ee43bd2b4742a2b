use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A lead card as shown on the kanban board.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BoardLead {
    pub id: i32,
    pub name: String,
    pub company: Option<String>,
    pub assigned_to: Option<i32>,
    pub reminder_date: Option<NaiveDate>,
}

/// One pipeline stage with the leads currently sitting in it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StageColumn {
    pub status_id: i32,
    pub name: String,
    pub color: String,
    pub sort_order: i32,
    pub lead_count: usize,
    pub leads: Vec<BoardLead>,
}

/// The whole pipeline board, stages in `sort_order`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PipelineBoard {
    pub stages: Vec<StageColumn>,
    pub total_leads: usize,
}

impl PipelineBoard {
    pub fn new(stages: Vec<StageColumn>) -> Self {
        let total_leads = stages.iter().map(|s| s.lead_count).sum();
        Self {
            stages,
            total_leads,
        }
    }
}
