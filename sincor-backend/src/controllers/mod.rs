//! HTTP controllers - thin translation between JSON and the facade

pub mod health;
pub mod status;
pub mod tasks;

use crate::error::SincorError;
use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a core error to a status code. Infrastructure failures are logged
/// here and reported generically.
pub(crate) fn error_response(err: &SincorError) -> HttpResponse {
    match err {
        SincorError::TaskNotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: err.to_string(),
        }),
        SincorError::InvalidState { .. } => HttpResponse::Conflict().json(ErrorResponse {
            error: err.to_string(),
        }),
        SincorError::ArtifactWrite { .. } => {
            log::error!("Artifact delivery error: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: err.to_string(),
            })
        }
        other => {
            log::error!("Internal error: {}", other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Internal server error".to_string(),
            })
        }
    }
}
