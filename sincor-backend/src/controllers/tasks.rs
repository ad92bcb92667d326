//! Task endpoints - submit, batch, fetch, list

use crate::AppState;
use crate::controllers::{ErrorResponse, error_response};
use crate::orchestrator::BatchItem;
use crate::tasks::types::{TaskFilter, TaskStatus};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};

fn empty_payload() -> Value {
    json!({})
}

#[derive(Deserialize)]
pub struct SubmitTaskRequest {
    pub task_type: String,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub tasks: Vec<BatchItem>,
}

#[derive(Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<String>,
    pub task_type: Option<String>,
    pub agent: Option<String>,
    pub limit: Option<usize>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/tasks")
            .route(web::post().to(submit_task))
            .route(web::get().to(list_tasks)),
    );
    cfg.service(web::resource("/api/tasks/batch").route(web::post().to(submit_batch)));
    cfg.service(web::resource("/api/tasks/{id}").route(web::get().to(get_task)));
    cfg.service(web::resource("/api/tasks/{id}/artifact").route(web::get().to(get_artifact)));
}

/// Assign and deliver one task in a single round trip, matching the
/// facade's synchronous contract.
async fn submit_task(
    state: web::Data<AppState>,
    body: web::Json<SubmitTaskRequest>,
) -> impl Responder {
    match state
        .orchestrator
        .run_task(&body.task_type, body.payload.clone())
    {
        Ok((record, artifact)) => HttpResponse::Ok().json(json!({
            "task": record,
            "artifact": artifact,
        })),
        Err(e) => error_response(&e),
    }
}

async fn submit_batch(
    state: web::Data<AppState>,
    body: web::Json<BatchRequest>,
) -> impl Responder {
    if body.tasks.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "batch must contain at least one task".to_string(),
        });
    }

    let outcome = state.orchestrator.run_batch(&body.tasks);
    HttpResponse::Ok().json(outcome)
}

async fn get_task(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.orchestrator.store().get(path.into_inner()) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => error_response(&e),
    }
}

/// Fetch the persisted output document for a completed task
async fn get_artifact(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let task_id = path.into_inner();
    match state.artifacts.load(task_id) {
        Ok(Some(artifact)) => HttpResponse::Ok().json(artifact),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("no artifact for task {}", task_id),
        }),
        Err(e) => error_response(&e),
    }
}

async fn list_tasks(
    state: web::Data<AppState>,
    query: web::Query<ListTasksQuery>,
) -> impl Responder {
    let status = match query.status.as_deref() {
        Some(raw) => match TaskStatus::from_str(raw) {
            Some(status) => Some(status),
            None => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: format!("unknown status '{}'", raw),
                });
            }
        },
        None => None,
    };

    let filter = TaskFilter {
        status,
        task_type: query.task_type.clone(),
        agent_id: query.agent.clone(),
        limit: query.limit,
    };

    match state.orchestrator.store().list(&filter) {
        Ok(tasks) => HttpResponse::Ok().json(json!({
            "total": tasks.len(),
            "tasks": tasks,
        })),
        Err(e) => error_response(&e),
    }
}
