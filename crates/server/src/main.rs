// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use roster_api::{
    Actor, ApiError, CreateInvoiceListRequest, CreateRoleRequest, InvoiceItemInput,
    InvoiceListResponse, JobRunOutcome, RoleChangeResponse, UpdateRoleRequest,
    create_invoice_list, create_role, destroy_role, run_batch_job, update_role,
};
use roster_persistence::{PersistenceError, SqlitePersistence};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Roster Server - HTTP server for the roster membership system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Largest recipient count an invoice batch still runs synchronously
    #[arg(long, default_value_t = roster::DEFAULT_SYNC_LIMIT)]
    sync_limit: usize,

    /// Seconds between background worker passes over the job queue
    #[arg(long, default_value_t = 5)]
    worker_poll_secs: u64,
}

/// Application state shared across handlers and the background worker.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for roster data and background jobs.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Largest recipient count an invoice batch still runs synchronously.
    sync_limit: usize,
}

/// API request for creating a role.
///
/// This includes actor information in addition to the role data.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateRoleApiRequest {
    /// The person performing this action.
    actor_person_id: i64,
    /// The actor's scope: `"admin"` or `"group"`.
    actor_scope: String,
    /// The group an actor with `"group"` scope is confined to.
    #[serde(default)]
    actor_group_id: Option<i64>,
    /// The person receiving the role.
    person_id: i64,
    /// The role kind, e.g. `"Member"`.
    kind: Option<String>,
    /// Optional free-text label.
    #[serde(default)]
    label: Option<String>,
    /// First day the role is in effect; defaults to today.
    #[serde(default)]
    start_on: Option<Date>,
    /// Last day the role is in effect.
    #[serde(default)]
    end_on: Option<Date>,
    /// Whether the actor can already see the target person.
    #[serde(default = "default_true")]
    actor_sees_person: bool,
}

const fn default_true() -> bool {
    true
}

/// API request for mutating an existing role.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateRoleApiRequest {
    /// The person performing this action.
    actor_person_id: i64,
    /// The actor's scope: `"admin"` or `"group"`.
    actor_scope: String,
    /// The group an actor with `"group"` scope is confined to.
    #[serde(default)]
    actor_group_id: Option<i64>,
    /// The role kind.
    #[serde(default)]
    kind: Option<String>,
    /// The target group; defaults to the role's current group.
    #[serde(default)]
    group_id: Option<i64>,
    /// Optional free-text label.
    #[serde(default)]
    label: Option<String>,
    /// First day the role is in effect.
    #[serde(default)]
    start_on: Option<Date>,
    /// Last day the role is in effect.
    #[serde(default)]
    end_on: Option<Date>,
}

/// API request for destroying a role.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct DestroyRoleApiRequest {
    /// The person performing this action.
    actor_person_id: i64,
    /// The actor's scope: `"admin"` or `"group"`.
    actor_scope: String,
    /// The group an actor with `"group"` scope is confined to.
    #[serde(default)]
    actor_group_id: Option<i64>,
}

/// API request for creating an invoice list and running the batch.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateInvoiceListApiRequest {
    /// The person performing this action.
    actor_person_id: i64,
    /// The actor's scope: `"admin"` or `"group"`.
    actor_scope: String,
    /// The group an actor with `"group"` scope is confined to.
    #[serde(default)]
    actor_group_id: Option<i64>,
    /// Display title of the batch.
    title: String,
    /// The billing group.
    group_id: i64,
    /// Receiver type: `"mailing_list"` or `"group"`.
    #[serde(default)]
    receiver_type: Option<String>,
    /// Id of the receiving mailing list or group.
    #[serde(default)]
    receiver_id: Option<i64>,
    /// Explicit recipient person ids as comma-separated text.
    #[serde(default)]
    recipient_ids: Option<String>,
    /// Static template line items.
    #[serde(default)]
    items: Vec<InvoiceItemInput>,
    /// Name of a fee schedule to attach, e.g. `"membership"`.
    #[serde(default)]
    fixed_fee: Option<String>,
}

/// API response for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Health indicator, always `"ok"`.
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AccessDenied { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::NotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::ValidationFailed { .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            ApiError::DestroyVetoed { .. } => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            ApiError::StorageFailed { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Parses actor fields into an authenticated actor.
fn parse_actor(person_id: i64, scope: &str, group_id: Option<i64>) -> Result<Actor, HttpError> {
    match scope.to_lowercase().as_str() {
        "admin" => Ok(Actor::admin(person_id)),
        "group" => group_id.map_or_else(
            || {
                Err(HttpError {
                    status: StatusCode::BAD_REQUEST,
                    message: String::from("actor_group_id is required for 'group' scope"),
                })
            },
            |id| Ok(Actor::group_full(person_id, id)),
        ),
        _ => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid actor scope: '{scope}'. Must be 'admin' or 'group'"),
        }),
    }
}

/// The current calendar day in UTC.
fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Handler for POST `/groups/{group_id}/roles` endpoint.
///
/// Creates a role or, in guarded layers, files an add request.
async fn handle_create_role(
    AxumState(app_state): AxumState<AppState>,
    Path(group_id): Path<i64>,
    Json(req): Json<CreateRoleApiRequest>,
) -> Result<Json<RoleChangeResponse>, HttpError> {
    info!(
        actor_person_id = req.actor_person_id,
        group_id,
        person_id = req.person_id,
        "Handling create_role request"
    );

    let actor: Actor = parse_actor(req.actor_person_id, &req.actor_scope, req.actor_group_id)?;
    let request: CreateRoleRequest = CreateRoleRequest {
        person_id: req.person_id,
        kind: req.kind,
        label: req.label,
        start_on: req.start_on,
        end_on: req.end_on,
        actor_sees_person: req.actor_sees_person,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: RoleChangeResponse =
        create_role(&mut persistence, group_id, request, &actor, today())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/roles/{role_id}` endpoint.
///
/// Mutates an existing role.
async fn handle_update_role(
    AxumState(app_state): AxumState<AppState>,
    Path(role_id): Path<i64>,
    Json(req): Json<UpdateRoleApiRequest>,
) -> Result<Json<RoleChangeResponse>, HttpError> {
    info!(
        actor_person_id = req.actor_person_id,
        role_id, "Handling update_role request"
    );

    let actor: Actor = parse_actor(req.actor_person_id, &req.actor_scope, req.actor_group_id)?;
    let request: UpdateRoleRequest = UpdateRoleRequest {
        kind: req.kind,
        group_id: req.group_id,
        label: req.label,
        start_on: req.start_on,
        end_on: req.end_on,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: RoleChangeResponse =
        update_role(&mut persistence, role_id, request, &actor, today())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/roles/{role_id}` endpoint.
///
/// Destroys a role; old roles terminate with a recorded end date,
/// recent ones are removed without trace.
async fn handle_destroy_role(
    AxumState(app_state): AxumState<AppState>,
    Path(role_id): Path<i64>,
    Json(req): Json<DestroyRoleApiRequest>,
) -> Result<Json<RoleChangeResponse>, HttpError> {
    info!(
        actor_person_id = req.actor_person_id,
        role_id, "Handling destroy_role request"
    );

    let actor: Actor = parse_actor(req.actor_person_id, &req.actor_scope, req.actor_group_id)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: RoleChangeResponse = destroy_role(&mut persistence, role_id, &actor, today())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/invoice-lists` endpoint.
///
/// Creates an invoice list and runs the batch, deferring large
/// batches to the background worker.
async fn handle_create_invoice_list(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateInvoiceListApiRequest>,
) -> Result<Json<InvoiceListResponse>, HttpError> {
    info!(
        actor_person_id = req.actor_person_id,
        group_id = req.group_id,
        title = %req.title,
        "Handling create_invoice_list request"
    );

    let actor: Actor = parse_actor(req.actor_person_id, &req.actor_scope, req.actor_group_id)?;
    let request: CreateInvoiceListRequest = CreateInvoiceListRequest {
        title: req.title,
        group_id: req.group_id,
        receiver_type: req.receiver_type,
        receiver_id: req.receiver_id,
        recipient_ids: req.recipient_ids,
        items: req.items,
        fixed_fee: req.fixed_fee,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: InvoiceListResponse = create_invoice_list(
        &mut persistence,
        request,
        &actor,
        today(),
        app_state.sync_limit,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /healthz endpoint.
async fn handle_healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Runs the background worker loop.
///
/// Each pass runs at most one pending job; job-level failures are
/// recorded on the job row and logged, never retried.
async fn worker_loop(app_state: AppState, poll_secs: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(poll_secs));
    loop {
        interval.tick().await;

        let mut persistence = app_state.persistence.lock().await;
        let outcome: Result<JobRunOutcome, ApiError> = run_batch_job(&mut persistence, today());
        drop(persistence);

        match outcome {
            Ok(JobRunOutcome::Idle) => {}
            Ok(JobRunOutcome::Completed {
                job_id,
                recipients_total,
            }) => {
                info!(job_id, recipients_total, "Background job completed");
            }
            Ok(JobRunOutcome::Failed { job_id, error: err }) => {
                error!(job_id, error = %err, "Background job failed");
            }
            Err(err) => {
                error!(error = %err, "Job queue pass failed");
            }
        }
    }
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/groups/{group_id}/roles", post(handle_create_role))
        .route("/roles/{role_id}", put(handle_update_role))
        .route("/roles/{role_id}", delete(handle_destroy_role))
        .route("/invoice-lists", post(handle_create_invoice_list))
        .route("/healthz", get(handle_healthz))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Roster Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        sync_limit: args.sync_limit,
    };

    // Start the background worker
    tokio::spawn(worker_loop(app_state.clone(), args.worker_poll_secs));

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
