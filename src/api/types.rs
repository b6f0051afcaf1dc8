use serde::Serialize;

/// Success body for mutation endpoints: `{"message": "..."}`.
/// Failures render as `{"error": "..."}` via [`super::ApiError`].
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Page-shell body for `/` and `GET /login`.
#[derive(Debug, Serialize)]
pub struct ShellResponse {
    pub authenticated: bool,
}

/// One row of `GET /list_desks`, with absent fields already rendered
/// for display and the derived status attached.
#[derive(Debug, Serialize)]
pub struct DeskDto {
    pub desk_id: i32,
    pub occupant: String,
    pub arrival: String,
    pub leaving: String,
    pub location: String,
    pub supervisor: String,
    pub status: String,
    pub desk_status: String,
}

#[derive(Debug, Serialize)]
pub struct VacantDeskDto {
    pub desk_id: i32,
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct VacantDesksResponse {
    pub vacant: Vec<VacantDeskDto>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}
