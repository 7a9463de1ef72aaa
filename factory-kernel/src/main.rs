/**
 * FACTORY KERNEL - Point d'entrée du simulateur d'atelier
 *
 * RÔLE : Orchestration des modules : config, simulateur, ticker, HTTP, health.
 * Bootstrap de la session avec logging, puis arrêt propre sur Ctrl-C
 * (le ticker est stoppé avant la fin du process, plus aucune mutation).
 *
 * ARCHITECTURE : Simulateur unique partagé (Arc<Mutex>) + tâche périodique + API REST.
 */

mod activity;
mod alerts;
mod auth;
mod config;
mod health;
mod http;
mod models;
mod random;
mod seed;
mod simulator;
mod state;
mod stats;
mod ticker;

use crate::activity::ActivityLog;
use crate::alerts::AlertStore;
use crate::config::load_config;
use crate::health::HealthTracker;
use crate::http::AppState;
use crate::random::StdRandom;
use crate::simulator::Simulator;
use crate::state::new_state;
use crate::ticker::spawn_simulation_ticker;

use anyhow::Context;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("factory_kernel=info")),
        )
        .init();

    let cfg = load_config().await;

    // flotte initiale + alertes d'ouverture
    let alerts = AlertStore::with_alerts(
        cfg.simulation.alert_capacity,
        seed::default_alerts(OffsetDateTime::now_utc()),
    );
    let simulator = Simulator::new(
        seed::default_machines(),
        alerts,
        Box::new(StdRandom::from_seed(cfg.simulation.seed)),
    );
    info!(
        "[kernel] seeded {} machines (alert capacity: {})",
        simulator.machine_count(),
        cfg.simulation.alert_capacity
    );
    let simulator = new_state(simulator);

    let ticker = spawn_simulation_ticker(simulator.clone(), cfg.simulation.tick_interval());

    let app_state = AppState {
        simulator,
        activity: new_state(ActivityLog::new(cfg.activity.capacity, cfg.activity.page_size)),
        health_tracker: HealthTracker::new(),
    };
    let app = http::build_router(app_state);

    let listener = TcpListener::bind(&cfg.http.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.http.bind))?;
    info!("[kernel] listening on http://{}", cfg.http.bind);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // fin de session : plus aucun tick après ce point
    ticker.stop().await;
    served.context("HTTP server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("[kernel] failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("[kernel] shutdown requested");
}
