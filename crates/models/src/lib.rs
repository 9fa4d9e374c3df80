pub mod customer;
pub mod db;
pub mod errors;
pub mod service_record;
pub mod user;
