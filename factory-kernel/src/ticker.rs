/**
 * TICKER DE SIMULATION - Tâche périodique propriétaire du cycle de vie
 *
 * RÔLE : Appelle Simulator::tick() toutes les `period` (2s par défaut).
 * Une seule tâche tokio, verrou tenu le temps du tick => pas de ticks
 * concurrents ni de commande entrelacée au milieu d'un tick.
 *
 * ARRÊT : TickerHandle::stop() signale via watch puis attend la fin de la
 * tâche ; un handle droppé sans stop() abort la tâche.
 */

use crate::state::SharedSimulator;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

pub struct TickerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Arrête le ticker et attend la fin du tick en cours
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!("[ticker] task ended abnormally: {e}");
            }
        }
        info!("[ticker] simulation ticker stopped");
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

pub fn spawn_simulation_ticker(simulator: SharedSimulator, period: Duration) -> TickerHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);
    info!("[ticker] starting simulation ticker (period: {}ms)", period.as_millis());

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // premier tick immédiat, on attend une période complète

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let emitted = simulator.lock().tick();
                    if !emitted.is_empty() {
                        debug!("[ticker] {} new alert(s) this tick", emitted.len());
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    TickerHandle {
        shutdown,
        task: Some(task),
    }
}
