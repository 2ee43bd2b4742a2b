pub mod auth;
pub mod health;
pub mod invoices;
pub mod leads;
pub mod packages;
pub mod pipeline;
pub mod sales_persons;
pub mod seed;
pub mod users;
