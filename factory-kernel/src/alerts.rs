/**
 * ALERT STORE - Liste bornée des alertes, plus récente en tête
 *
 * RÔLE : Insertion (prepend + troncature à `capacity`), acquittement,
 * projections lecture (filtre, compteurs) pour le dashboard.
 *
 * INVARIANTS :
 * - len() <= capacity, les plus anciennes sont évincées
 * - une alerte acquittée ne repasse jamais à non acquittée
 */

use crate::models::{Alert, AlertSeverity};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_ALERT_CAPACITY: usize = 20;

#[derive(Debug, Clone)]
pub struct AlertStore {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

/// Filtre de la page Alerts : recherche texte + sévérité + acquittées
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFilter {
    #[serde(default, rename = "q")]
    pub search: Option<String>,
    #[serde(default)]
    pub severity: Option<AlertSeverity>,
    #[serde(default = "default_true")]
    pub include_acknowledged: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AlertFilter {
    fn default() -> Self {
        Self { search: None, severity: None, include_acknowledged: true }
    }
}

impl AlertFilter {
    /// Aucun critère : la page Alerts affiche la liste complète
    pub fn is_unfiltered(&self) -> bool {
        self.search.as_deref().map_or(true, |q| q.trim().is_empty())
            && self.severity.is_none()
            && self.include_acknowledged
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => {
                let q = q.to_lowercase();
                alert.alert_type.to_lowercase().contains(&q)
                    || alert.machine_name.to_lowercase().contains(&q)
                    || alert.message.to_lowercase().contains(&q)
            }
        };
        let matches_severity = self.severity.map_or(true, |s| alert.severity == s);
        let matches_ack = self.include_acknowledged || !alert.acknowledged;
        matches_search && matches_severity && matches_ack
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    pub unacknowledged: usize,
    pub unacknowledged_by_severity: SeverityCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl AlertStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Construit depuis une liste déjà ordonnée (plus récente en tête)
    pub fn with_alerts(capacity: usize, initial: Vec<Alert>) -> Self {
        let mut store = Self::new(capacity);
        store.alerts.extend(initial);
        store.alerts.truncate(store.capacity);
        store
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Ajoute en tête et évince les plus anciennes au-delà de la capacité
    pub fn push(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
        self.alerts.truncate(self.capacity);
    }

    /// No-op (false) si l'id est absent
    pub fn acknowledge(&mut self, alert_id: &str) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == alert_id) {
            Some(alert) => {
                alert.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Acquitte toutes les alertes en attente, retourne le nombre modifié
    pub fn acknowledge_all(&mut self) -> usize {
        let mut changed = 0;
        for alert in self.alerts.iter_mut().filter(|a| !a.acknowledged) {
            alert.acknowledged = true;
            changed += 1;
        }
        changed
    }

    pub fn list(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn filtered(&self, filter: &AlertFilter) -> Vec<Alert> {
        self.alerts.iter().filter(|a| filter.matches(a)).cloned().collect()
    }

    pub fn unacknowledged_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.acknowledged).count()
    }

    pub fn summary(&self) -> AlertSummary {
        let mut by_severity = SeverityCounts::default();
        for alert in self.alerts.iter().filter(|a| !a.acknowledged) {
            match alert.severity {
                AlertSeverity::Low => by_severity.low += 1,
                AlertSeverity::Medium => by_severity.medium += 1,
                AlertSeverity::High => by_severity.high += 1,
                AlertSeverity::Critical => by_severity.critical += 1,
            }
        }
        AlertSummary {
            total: self.alerts.len(),
            unacknowledged: self.unacknowledged_count(),
            unacknowledged_by_severity: by_severity,
        }
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_CAPACITY)
    }
}
