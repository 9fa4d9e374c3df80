use serde::Serialize;

/// Health check payload.
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}
