//! Business logic for the CRM backend: lead auto-assignment, invoice
//! totals and numbering, the pipeline board summary, and database seeding.
//! Everything here operates on the `model` entities and produces the
//! transport payloads defined in `common`.

pub mod assignment;
pub mod error;
pub mod invoice;
pub mod pipeline;
pub mod seed;

pub use assignment::{assign_unassigned_leads, plan_assignments};
pub use error::{ComputeError, Result};
pub use invoice::{derive_totals, next_invoice_number};
pub use pipeline::build_board;
pub use seed::{ensure_default_packages, seed_database};
