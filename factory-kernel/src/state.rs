use crate::simulator::Simulator;
use parking_lot::Mutex;
use std::sync::Arc;

pub type Shared<T> = Arc<Mutex<T>>;

/// Simulateur unique de la session : un seul verrou couvre le tick complet
/// et chaque commande (read-modify-write de toute la liste).
pub type SharedSimulator = Shared<Simulator>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}
