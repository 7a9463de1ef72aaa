/**
 * GATE D'AUTORISATION - Contrôle par rôle avant toute commande machine
 *
 * Le simulateur n'applique aucune vérification : ce module est appelé par
 * la couche HTTP avant control_machine.
 * - emergency : admin uniquement
 * - start / stop / reset / toggle-mode : admin ou engineer
 * - viewer : lecture seule
 * Une action inconnue passe le gate, le simulateur la traite en no-op.
 */

use crate::models::ControlAction;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Engineer,
    Viewer,
}

impl FromStr for Role {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "engineer" => Ok(Role::Engineer),
            "viewer" => Ok(Role::Viewer),
            other => Err(GateError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub name: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Role {role:?} may not perform '{action}'")]
    PermissionDenied { role: Role, action: String },
}

impl Role {
    pub fn has_permission(self, required: &[Role]) -> bool {
        required.contains(&self)
    }
}

fn required_roles(action: ControlAction) -> &'static [Role] {
    match action {
        ControlAction::Emergency => &[Role::Admin],
        ControlAction::Start | ControlAction::Stop | ControlAction::Reset | ControlAction::ToggleMode => {
            &[Role::Admin, Role::Engineer]
        }
    }
}

/// Vérifie qu'un opérateur peut émettre `action` (nom wire)
pub fn authorize(operator: &Operator, action: &str) -> Result<(), GateError> {
    let Some(parsed) = ControlAction::parse(action) else {
        return Ok(());
    };
    if operator.role.has_permission(required_roles(parsed)) {
        Ok(())
    } else {
        Err(GateError::PermissionDenied {
            role: operator.role,
            action: action.to_string(),
        })
    }
}
