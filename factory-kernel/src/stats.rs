//! Projections dashboard : statistiques de flotte et filtre machines.
//! Pures lectures sur un snapshot, aucun état stocké.

use crate::models::{Machine, MachineStatus, MachineType};
use crate::random::round_to;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    pub total: usize,
    pub active: usize,
    pub idle: usize,
    pub error: usize,
    pub offline: usize,
    pub avg_efficiency: f64,
    pub avg_temperature: f64,
    pub avg_vibration: f64,
    pub avg_load: f64,
    pub by_type: Vec<TypeStats>,
}

/// Moyennes par type de machine (page Analytics), 0 pour un type absent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStats {
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub count: usize,
    pub efficiency: f64,
    pub temperature: f64,
}

const MACHINE_TYPES: [MachineType; 4] = [
    MachineType::Robot,
    MachineType::Conveyor,
    MachineType::Motor,
    MachineType::Sensor,
];

fn rounded_mean<'a>(machines: impl Iterator<Item = &'a Machine>, metric: fn(&Machine) -> f64) -> f64 {
    let (sum, n) = machines.fold((0.0, 0usize), |(sum, n), m| (sum + metric(m), n + 1));
    if n == 0 { 0.0 } else { (sum / n as f64).round() }
}

impl FleetStats {
    pub fn compute(machines: &[Machine]) -> Self {
        let count = |status: MachineStatus| machines.iter().filter(|m| m.status == status).count();
        let mean = |metric: fn(&Machine) -> f64| {
            if machines.is_empty() {
                0.0
            } else {
                machines.iter().map(metric).sum::<f64>() / machines.len() as f64
            }
        };

        Self {
            total: machines.len(),
            active: count(MachineStatus::Active),
            idle: count(MachineStatus::Idle),
            error: count(MachineStatus::Error),
            offline: count(MachineStatus::Offline),
            avg_efficiency: round_to(mean(|m| m.efficiency), 0),
            avg_temperature: round_to(mean(|m| m.temperature), 0),
            avg_vibration: round_to(mean(|m| m.vibration), 1),
            avg_load: round_to(mean(|m| m.load), 0),
            by_type: Self::by_type(machines),
        }
    }

    pub fn by_type(machines: &[Machine]) -> Vec<TypeStats> {
        MACHINE_TYPES
            .iter()
            .map(|&machine_type| {
                let of_type = || machines.iter().filter(move |m| m.machine_type == machine_type);
                TypeStats {
                    machine_type,
                    count: of_type().count(),
                    efficiency: rounded_mean(of_type(), |m| m.efficiency),
                    temperature: rounded_mean(of_type(), |m| m.temperature),
                }
            })
            .collect()
    }
}

/// Filtre de la page Machines (recherche nom/emplacement, type, statut)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MachineFilter {
    #[serde(default, rename = "q")]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub machine_type: Option<MachineType>,
    #[serde(default)]
    pub status: Option<MachineStatus>,
}

impl MachineFilter {
    pub fn is_unfiltered(&self) -> bool {
        self.search.as_deref().map_or(true, |q| q.trim().is_empty())
            && self.machine_type.is_none()
            && self.status.is_none()
    }

    pub fn matches(&self, machine: &Machine) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => {
                let q = q.to_lowercase();
                machine.name.to_lowercase().contains(&q) || machine.location.to_lowercase().contains(&q)
            }
        };
        matches_search
            && self.machine_type.map_or(true, |t| machine.machine_type == t)
            && self.status.map_or(true, |s| machine.status == s)
    }
}
