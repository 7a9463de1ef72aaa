//! Flotte initiale de l'atelier simulé, créée au démarrage de la session.

use crate::models::{Alert, AlertSeverity, Machine, MachineMode, MachineStatus, MachineType};
use time::{Duration, OffsetDateTime};

/// Fiche d'une machine de la flotte initiale
struct MachineSeed {
    id: &'static str,
    name: &'static str,
    machine_type: MachineType,
    location: &'static str,
    status: MachineStatus,
    mode: MachineMode,
    efficiency: f64,
    temperature: f64,
    vibration: f64,
    load: f64,
    cycle_time: f64,
    assigned_task: &'static str,
    last_maintenance: &'static str,
}

impl From<MachineSeed> for Machine {
    fn from(seed: MachineSeed) -> Self {
        Machine {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            machine_type: seed.machine_type,
            location: seed.location.to_string(),
            status: seed.status,
            mode: seed.mode,
            efficiency: seed.efficiency,
            temperature: seed.temperature,
            vibration: seed.vibration,
            load: seed.load,
            // cycle > 0 seulement en marche
            cycle_time: if seed.status == MachineStatus::Active { seed.cycle_time } else { 0.0 },
            assigned_task: seed.assigned_task.to_string(),
            last_maintenance: seed.last_maintenance.to_string(),
        }
    }
}

pub fn default_machines() -> Vec<Machine> {
    use MachineMode::*;
    use MachineStatus::*;
    use MachineType::*;

    [
        MachineSeed {
            id: "m1",
            name: "Robot Arm A1",
            machine_type: Robot,
            location: "Assembly Line 1",
            status: Active,
            mode: Auto,
            efficiency: 94.0,
            temperature: 45.2,
            vibration: 1.2,
            load: 72.0,
            cycle_time: 12.5,
            assigned_task: "Chassis welding",
            last_maintenance: "2024-01-10",
        },
        MachineSeed {
            id: "m2",
            name: "Robot Arm A2",
            machine_type: Robot,
            location: "Assembly Line 1",
            status: Active,
            mode: Auto,
            efficiency: 89.0,
            temperature: 52.8,
            vibration: 1.8,
            load: 81.0,
            cycle_time: 13.1,
            assigned_task: "Panel fitting",
            last_maintenance: "2024-01-05",
        },
        MachineSeed {
            id: "m3",
            name: "Conveyor Belt C1",
            machine_type: Conveyor,
            location: "Assembly Line 1",
            status: Active,
            mode: Auto,
            efficiency: 97.0,
            temperature: 38.4,
            vibration: 0.6,
            load: 64.0,
            cycle_time: 4.2,
            assigned_task: "Part transport",
            last_maintenance: "2023-12-28",
        },
        MachineSeed {
            id: "m4",
            name: "Conveyor Belt C2",
            machine_type: Conveyor,
            location: "Packaging Zone",
            status: Idle,
            mode: Manual,
            efficiency: 0.0,
            temperature: 24.0,
            vibration: 0.0,
            load: 0.0,
            cycle_time: 0.0,
            assigned_task: "Awaiting batch",
            last_maintenance: "2024-01-12",
        },
        MachineSeed {
            id: "m5",
            name: "Drive Motor M1",
            machine_type: Motor,
            location: "Press Shop",
            status: Error,
            mode: Manual,
            efficiency: 61.0,
            temperature: 58.3,
            vibration: 3.4,
            load: 88.0,
            cycle_time: 0.0,
            assigned_task: "Hydraulic press drive",
            last_maintenance: "2023-11-30",
        },
        MachineSeed {
            id: "m6",
            name: "Drive Motor M2",
            machine_type: Motor,
            location: "Press Shop",
            status: Active,
            mode: Auto,
            efficiency: 91.0,
            temperature: 49.7,
            vibration: 2.1,
            load: 76.0,
            cycle_time: 8.8,
            assigned_task: "Stamping",
            last_maintenance: "2024-01-08",
        },
        MachineSeed {
            id: "m7",
            name: "Quality Sensor Q1",
            machine_type: Sensor,
            location: "Inspection Bay",
            status: Active,
            mode: Auto,
            efficiency: 99.0,
            temperature: 31.5,
            vibration: 0.2,
            load: 35.0,
            cycle_time: 2.0,
            assigned_task: "Surface inspection",
            last_maintenance: "2024-01-15",
        },
        MachineSeed {
            id: "m8",
            name: "Quality Sensor Q2",
            machine_type: Sensor,
            location: "Inspection Bay",
            status: Offline,
            mode: Manual,
            efficiency: 0.0,
            temperature: 22.0,
            vibration: 0.0,
            load: 0.0,
            cycle_time: 0.0,
            assigned_task: "Calibration pending",
            last_maintenance: "2023-10-02",
        },
    ]
    .into_iter()
    .map(Machine::from)
    .collect()
}

/// Alertes présentes à l'ouverture du dashboard, plus récente en tête
pub fn default_alerts(now: OffsetDateTime) -> Vec<Alert> {
    vec![
        Alert {
            id: "alert-seed-3".into(),
            machine_id: "m5".into(),
            machine_name: "Drive Motor M1".into(),
            alert_type: "Motor Fault".into(),
            message: "Drive current imbalance detected on phase B".into(),
            severity: AlertSeverity::Critical,
            timestamp: now - Duration::minutes(5),
            acknowledged: false,
        },
        Alert {
            id: "alert-seed-2".into(),
            machine_id: "m2".into(),
            machine_name: "Robot Arm A2".into(),
            alert_type: "High Vibration".into(),
            message: "Vibration at 1.8 mm/s approaching limit".into(),
            severity: AlertSeverity::Medium,
            timestamp: now - Duration::minutes(22),
            acknowledged: false,
        },
        Alert {
            id: "alert-seed-1".into(),
            machine_id: "m8".into(),
            machine_name: "Quality Sensor Q2".into(),
            alert_type: "Connection Lost".into(),
            message: "Sensor stopped reporting".into(),
            severity: AlertSeverity::Low,
            timestamp: now - Duration::hours(2),
            acknowledged: true,
        },
    ]
}
