/**
 * API REST FACTORY - Surface HTTP du kernel pour le dashboard
 *
 * RÔLE :
 * Expose les snapshots du simulateur (machines, alertes, stats) et ses
 * deux points de mutation (commande machine, acquittement d'alerte).
 *
 * FONCTIONNEMENT :
 * - Serveur Axum, JSON camelCase aligné sur le modèle du dashboard
 * - Routes : /health, /system, /machines, /alerts, /stats, /activity
 * - Les commandes machine passent par le gate de rôle (auth.rs) avant
 *   d'atteindre le simulateur, puis sont tracées dans le journal
 *
 * IDENTITÉ :
 * Headers x-operator-name / x-operator-role, posés par le dashboard après
 * login. Role absent ou inconnu => 403 sur les routes de commande.
 */

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::activity::{ActivityLog, ActivityPage, ActivityQuery};
use crate::alerts::{AlertFilter, AlertSummary};
use crate::auth::{authorize, GateError, Operator, Role};
use crate::health::{HealthTracker, KernelHealth};
use crate::models::{Alert, Machine};
use crate::simulator::ControlOutcome;
use crate::state::{Shared, SharedSimulator};
use crate::stats::{FleetStats, MachineFilter};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Machine not found: {0}")]
    MachineNotFound(String),
    #[error("Missing operator identity")]
    MissingOperator,
    #[error(transparent)]
    Gate(#[from] GateError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MachineNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingOperator | ApiError::Gate(_) => StatusCode::FORBIDDEN,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub simulator: SharedSimulator,
    pub activity: Shared<ActivityLog>,
    pub health_tracker: HealthTracker,
}

#[derive(Debug, Deserialize)]
pub struct ControlRequest {
    pub action: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AcknowledgeResponse {
    pub acknowledged: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AcknowledgeAllResponse {
    pub acknowledged: usize,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/system/health", get(get_system_health))
        .route("/machines", get(get_machines))
        .route("/machines/{id}", get(get_machine))
        .route("/machines/{id}/control", post(control_machine))
        .route("/alerts", get(get_alerts))
        .route("/alerts/summary", get(get_alert_summary))
        .route("/alerts/ack-all", post(acknowledge_all))
        .route("/alerts/{id}/ack", post(acknowledge_alert))
        .route("/stats", get(get_stats))
        .route("/activity", get(get_activity))
        .with_state(app_state)
}

fn operator_from_headers(headers: &HeaderMap) -> Result<Operator, ApiError> {
    let role = headers
        .get("x-operator-role")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingOperator)?
        .parse::<Role>()?;
    let name = headers
        .get("x-operator-name")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("unknown operator")
        .to_string();
    Ok(Operator { name, role })
}

// GET /system/health
async fn get_system_health(State(app): State<AppState>) -> Json<KernelHealth> {
    Json(app.health_tracker.get_health(&app.simulator))
}

// GET /machines?q=&type=&status=
async fn get_machines(
    State(app): State<AppState>,
    Query(filter): Query<MachineFilter>,
) -> Json<Vec<Machine>> {
    let sim = app.simulator.lock();
    if filter.is_unfiltered() {
        Json(sim.machines())
    } else {
        Json(sim.filtered_machines(&filter))
    }
}

// GET /machines/{id}
async fn get_machine(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Machine>, ApiError> {
    app.simulator.lock().machine(&id).map(Json).ok_or(ApiError::MachineNotFound(id))
}

// POST /machines/{id}/control  {"action": "start"}
async fn control_machine(
    State(app): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<ControlRequest>,
) -> Result<Json<Machine>, ApiError> {
    let operator = operator_from_headers(&headers)?;
    if let Err(e) = authorize(&operator, &req.action) {
        info!("[http] refused '{}' on {} for {}: {}", req.action, id, operator.name, e);
        return Err(e.into());
    }

    let (outcome, machine) = {
        let mut sim = app.simulator.lock();
        let outcome = sim.control_machine(&id, &req.action);
        (outcome, sim.machine(&id))
    };
    let machine = machine.ok_or_else(|| ApiError::MachineNotFound(id.clone()))?;

    match outcome {
        ControlOutcome::Applied(action) => {
            app.activity.lock().record(
                &operator.name,
                action.label(),
                Some((&machine.id, &machine.name)),
                format!("{} command sent to {}", action.as_str(), machine.name),
            );
        }
        ControlOutcome::UnknownAction => {}
        ControlOutcome::UnknownMachine => return Err(ApiError::MachineNotFound(id)),
    }
    Ok(Json(machine))
}

// GET /alerts?q=&severity=&includeAcknowledged=
async fn get_alerts(
    State(app): State<AppState>,
    Query(filter): Query<AlertFilter>,
) -> Json<Vec<Alert>> {
    let sim = app.simulator.lock();
    if filter.is_unfiltered() {
        Json(sim.alerts())
    } else {
        Json(sim.filtered_alerts(&filter))
    }
}

// GET /alerts/summary
async fn get_alert_summary(State(app): State<AppState>) -> Json<AlertSummary> {
    Json(app.simulator.lock().alert_summary())
}

// POST /alerts/{id}/ack (no-op si inconnue)
async fn acknowledge_alert(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Json<AcknowledgeResponse> {
    let acknowledged = app.simulator.lock().acknowledge_alert(&id);
    Json(AcknowledgeResponse { acknowledged })
}

// POST /alerts/ack-all
async fn acknowledge_all(State(app): State<AppState>) -> Json<AcknowledgeAllResponse> {
    let acknowledged = app.simulator.lock().acknowledge_all();
    Json(AcknowledgeAllResponse { acknowledged })
}

// GET /stats
async fn get_stats(State(app): State<AppState>) -> Json<FleetStats> {
    Json(app.simulator.lock().fleet_stats())
}

// GET /activity?q=&page=
async fn get_activity(
    State(app): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Json<ActivityPage> {
    Json(app.activity.lock().query(&query))
}
