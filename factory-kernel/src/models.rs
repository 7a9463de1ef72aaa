use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineType {
    Robot,
    Conveyor,
    Motor,
    Sensor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Active,
    Idle,
    Error,
    Offline,
}

impl MachineStatus {
    /// Les machines idle/offline ne sont pas perturbées par le tick
    pub fn is_frozen(self) -> bool {
        matches!(self, MachineStatus::Idle | MachineStatus::Offline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineMode {
    Auto,
    Manual,
}

impl MachineMode {
    pub fn toggled(self) -> Self {
        match self {
            MachineMode::Auto => MachineMode::Manual,
            MachineMode::Manual => MachineMode::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub location: String,
    pub status: MachineStatus,
    pub mode: MachineMode,
    pub efficiency: f64,   // %, [0,100]
    pub temperature: f64,  // °C
    pub vibration: f64,    // mm/s
    pub load: f64,         // %, [0,100]
    pub cycle_time: f64,   // secondes, 0 si status != active
    pub assigned_task: String,
    pub last_maintenance: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub machine_id: String,
    pub machine_name: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub message: String,
    pub severity: AlertSeverity,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub acknowledged: bool,
}

/// Commande opérateur reconnue par le simulateur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
    Reset,
    Emergency,
    ToggleMode,
}

impl ControlAction {
    /// Parse le nom wire de l'action ; `None` pour une action inconnue
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "start" => Some(ControlAction::Start),
            "stop" => Some(ControlAction::Stop),
            "reset" => Some(ControlAction::Reset),
            "emergency" => Some(ControlAction::Emergency),
            "toggle-mode" => Some(ControlAction::ToggleMode),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControlAction::Start => "start",
            ControlAction::Stop => "stop",
            ControlAction::Reset => "reset",
            ControlAction::Emergency => "emergency",
            ControlAction::ToggleMode => "toggle-mode",
        }
    }

    /// Libellé humain utilisé dans le journal d'activité
    pub fn label(self) -> &'static str {
        match self {
            ControlAction::Start => "Machine Start",
            ControlAction::Stop => "Machine Stop",
            ControlAction::Reset => "Machine Reset",
            ControlAction::Emergency => "Emergency Shutdown",
            ControlAction::ToggleMode => "Mode Change",
        }
    }
}
