//! Business layer on top of the `models` entities.
//! - Normalizes and validates caller input into typed commands.
//! - Maps store errors into a small taxonomy the API layer can render.
//! - Keeps aggregation folds pure so they are testable without a database.

pub mod analytics_service;
pub mod auth;
pub mod customer_service;
pub mod dates;
pub mod errors;
pub mod pagination;
pub mod service_record_service;
