use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One lead-to-sales-person pairing produced by the auto-assignment pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AssignmentEntry {
    pub lead_id: i32,
    pub sales_person_id: i32,
}

/// The result of a full auto-assignment pass.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// Pairings written in this pass, in assignment order.
    pub assigned: Vec<AssignmentEntry>,
    /// Number of active sales persons that took part.
    pub sales_person_count: usize,
    /// Number of leads that were unassigned before the pass.
    pub unassigned_before: usize,
}

impl AssignmentOutcome {
    /// An empty outcome for a pass that found nothing to distribute.
    pub fn empty(sales_person_count: usize) -> Self {
        Self {
            assigned: Vec::new(),
            sales_person_count,
            unassigned_before: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_stable_field_names() {
        let outcome = AssignmentOutcome {
            assigned: vec![AssignmentEntry {
                lead_id: 7,
                sales_person_id: 2,
            }],
            sales_person_count: 3,
            unassigned_before: 1,
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["assigned"][0]["lead_id"], 7);
        assert_eq!(json["assigned"][0]["sales_person_id"], 2);
        assert_eq!(json["sales_person_count"], 3);
        assert_eq!(json["unassigned_before"], 1);
    }
}
