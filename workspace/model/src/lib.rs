//! Database entities for the CRM schema. Everything lives under
//! [`entities`]; the migrations that create these tables are in the
//! `migration` crate.

pub mod entities;
