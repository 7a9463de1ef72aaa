/**
 * SIMULATEUR DE TÉLÉMÉTRIE - Cœur de l'atelier simulé
 *
 * RÔLE :
 * Possède la liste des machines et le store d'alertes. Les vues (HTTP,
 * dashboard) lisent des snapshots et ne mutent que via control_machine
 * et acknowledge_alert.
 *
 * FONCTIONNEMENT :
 * - tick() : marche aléatoire bornée sur chaque machine active/error,
 *   les machines idle/offline restent figées
 * - surchauffe : temp > 55 et tirage > 0.8 => alerte (critical si > 60)
 * - control_machine() : machine à états start/stop/reset/emergency/toggle-mode
 *
 * Aucune opération n'échoue : id ou action inconnus = no-op, l'outcome
 * retourné permet seulement aux couches externes de signaler un 404.
 */

use crate::alerts::{AlertFilter, AlertStore, AlertSummary};
use crate::models::{Alert, AlertSeverity, ControlAction, Machine, MachineStatus};
use crate::random::{random_variation, round_to, RandomSource};
use crate::stats::{FleetStats, MachineFilter};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

const TEMPERATURE_RANGE: f64 = 4.0;
const VIBRATION_RANGE: f64 = 2.0; // appliqué sur vibration x10
const LOAD_RANGE: f64 = 8.0;
const EFFICIENCY_RANGE: f64 = 3.0;
const EFFICIENCY_RANGE_ERROR: f64 = 10.0;
const CYCLE_TIME_RANGE: f64 = 2.0;
const MIN_ACTIVE_CYCLE_TIME: f64 = 0.1; // une machine active a toujours un cycle > 0
const NOMINAL_CYCLE_TIME: f64 = 10.0; // cycle de reprise après start/reset depuis l'arrêt

const OVERHEAT_THRESHOLD: f64 = 55.0;
const OVERHEAT_CRITICAL: f64 = 60.0;
const OVERHEAT_DRAW: f64 = 0.8; // ~20% de chance par tick éligible

const RESET_EFFICIENCY: f64 = 95.0;
const RESET_TEMPERATURE: f64 = 35.0;
const RESET_VIBRATION: f64 = 0.5;

/// Résultat d'une commande opérateur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    Applied(ControlAction),
    UnknownAction,
    UnknownMachine,
}

pub struct Simulator {
    machines: Vec<Machine>,
    alerts: AlertStore,
    rng: Box<dyn RandomSource>,
    alert_seq: u64,
    ticks: u64,
}

impl Simulator {
    pub fn new(machines: Vec<Machine>, alerts: AlertStore, rng: Box<dyn RandomSource>) -> Self {
        Self {
            machines,
            alerts,
            rng,
            alert_seq: 0,
            ticks: 0,
        }
    }

    /// Avance la simulation d'un tick, retourne les alertes émises
    pub fn tick(&mut self) -> Vec<Alert> {
        let mut emitted = Vec::new();

        for machine in self.machines.iter_mut() {
            if machine.status.is_frozen() {
                continue;
            }

            let raw_temperature = perturb(machine, self.rng.as_mut());

            if raw_temperature > OVERHEAT_THRESHOLD && self.rng.next_unit() > OVERHEAT_DRAW {
                self.alert_seq += 1;
                let alert = overheating_alert(machine, raw_temperature, self.alert_seq);
                warn!(
                    "[simulator] {} alert on {}: {}",
                    severity_label(alert.severity),
                    machine.id,
                    alert.message
                );
                self.alerts.push(alert.clone());
                emitted.push(alert);
            }

            machine.cycle_time = if machine.status == MachineStatus::Active {
                let walked = random_variation(machine.cycle_time, CYCLE_TIME_RANGE, self.rng.as_mut());
                round_to(walked, 1).max(MIN_ACTIVE_CYCLE_TIME)
            } else {
                0.0
            };
        }

        self.ticks += 1;
        debug!("[simulator] tick #{} done ({} alerts emitted)", self.ticks, emitted.len());
        emitted
    }

    /// Applique une commande opérateur ; aucune vérification de rôle ici
    pub fn control_machine(&mut self, machine_id: &str, action: &str) -> ControlOutcome {
        let Some(machine) = self.machines.iter_mut().find(|m| m.id == machine_id) else {
            debug!("[simulator] control '{}' ignored: unknown machine {}", action, machine_id);
            return ControlOutcome::UnknownMachine;
        };
        let Some(action) = ControlAction::parse(action) else {
            debug!("[simulator] unknown action '{}' for {}, machine unchanged", action, machine_id);
            return ControlOutcome::UnknownAction;
        };

        apply_action(machine, action);
        info!(
            "[simulator] {} applied to {} (status: {:?}, mode: {:?})",
            action.as_str(),
            machine.id,
            machine.status,
            machine.mode
        );
        ControlOutcome::Applied(action)
    }

    /// No-op (false) si l'alerte n'existe pas
    pub fn acknowledge_alert(&mut self, alert_id: &str) -> bool {
        let found = self.alerts.acknowledge(alert_id);
        if !found {
            debug!("[simulator] acknowledge ignored: unknown alert {}", alert_id);
        }
        found
    }

    pub fn acknowledge_all(&mut self) -> usize {
        self.alerts.acknowledge_all()
    }

    pub fn machines(&self) -> Vec<Machine> {
        self.machines.clone()
    }

    pub fn machine(&self, machine_id: &str) -> Option<Machine> {
        self.machines.iter().find(|m| m.id == machine_id).cloned()
    }

    pub fn filtered_machines(&self, filter: &MachineFilter) -> Vec<Machine> {
        self.machines.iter().filter(|m| filter.matches(m)).cloned().collect()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.list()
    }

    pub fn filtered_alerts(&self, filter: &AlertFilter) -> Vec<Alert> {
        self.alerts.filtered(filter)
    }

    pub fn alert_summary(&self) -> AlertSummary {
        self.alerts.summary()
    }

    pub fn unacknowledged_count(&self) -> usize {
        self.alerts.unacknowledged_count()
    }

    pub fn fleet_stats(&self) -> FleetStats {
        FleetStats::compute(&self.machines)
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    pub fn ticks_executed(&self) -> u64 {
        self.ticks
    }
}

/// Perturbe les métriques d'une machine éligible et retourne la température
/// brute (avant arrondi), utilisée pour le seuil de surchauffe.
fn perturb(machine: &mut Machine, rng: &mut dyn RandomSource) -> f64 {
    let temperature = random_variation(machine.temperature, TEMPERATURE_RANGE, rng);
    let vibration = random_variation(machine.vibration * 10.0, VIBRATION_RANGE, rng) / 10.0;
    let load = random_variation(machine.load, LOAD_RANGE, rng);
    let efficiency_range = if machine.status == MachineStatus::Error {
        EFFICIENCY_RANGE_ERROR
    } else {
        EFFICIENCY_RANGE
    };
    let efficiency = random_variation(machine.efficiency, efficiency_range, rng);

    machine.temperature = round_to(temperature, 1);
    machine.vibration = round_to(vibration, 2);
    machine.load = round_to(load, 0);
    machine.efficiency = round_to(efficiency, 0);
    temperature
}

fn apply_action(machine: &mut Machine, action: ControlAction) {
    match action {
        ControlAction::Start => {
            machine.status = MachineStatus::Active;
            resume_cycle(machine);
        }
        ControlAction::Stop => {
            machine.status = MachineStatus::Idle;
            machine.cycle_time = 0.0;
        }
        ControlAction::Reset => {
            machine.status = MachineStatus::Active;
            resume_cycle(machine);
            machine.efficiency = RESET_EFFICIENCY;
            machine.temperature = RESET_TEMPERATURE;
            machine.vibration = RESET_VIBRATION;
        }
        ControlAction::Emergency => {
            machine.status = MachineStatus::Offline;
            machine.cycle_time = 0.0;
        }
        ControlAction::ToggleMode => machine.mode = machine.mode.toggled(),
    }
}

/// Une machine qui repart sans cycle en cours reprend au cycle nominal
fn resume_cycle(machine: &mut Machine) {
    if machine.cycle_time <= 0.0 {
        machine.cycle_time = NOMINAL_CYCLE_TIME;
    }
}

fn overheating_alert(machine: &Machine, temperature: f64, seq: u64) -> Alert {
    let now = OffsetDateTime::now_utc();
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    Alert {
        id: format!("alert-{millis}-{seq}"),
        machine_id: machine.id.clone(),
        machine_name: machine.name.clone(),
        alert_type: "Overheating".to_string(),
        message: format!("Temperature at {temperature:.1}°C exceeds threshold"),
        severity: if temperature > OVERHEAT_CRITICAL {
            AlertSeverity::Critical
        } else {
            AlertSeverity::High
        },
        timestamp: now,
        acknowledged: false,
    }
}

fn severity_label(severity: AlertSeverity) -> &'static str {
    match severity {
        AlertSeverity::Low => "low",
        AlertSeverity::Medium => "medium",
        AlertSeverity::High => "high",
        AlertSeverity::Critical => "critical",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MachineMode, MachineType};
    use crate::random::SequenceRandom;
    use crate::seed::default_machines;

    fn machine(id: &str, status: MachineStatus, temperature: f64) -> Machine {
        Machine {
            id: id.to_string(),
            name: format!("Machine {id}"),
            machine_type: MachineType::Motor,
            location: "Line 1".into(),
            status,
            mode: MachineMode::Auto,
            efficiency: 90.0,
            temperature,
            vibration: 1.5,
            load: 60.0,
            cycle_time: if status == MachineStatus::Active { 10.0 } else { 0.0 },
            assigned_task: "Stamping".into(),
            last_maintenance: "2024-01-01".into(),
        }
    }

    fn simulator(machines: Vec<Machine>, draws: Vec<f64>) -> Simulator {
        Simulator::new(machines, AlertStore::default(), Box::new(SequenceRandom::new(draws)))
    }

    #[test]
    fn test_frozen_machines_are_untouched() {
        let idle = machine("m1", MachineStatus::Idle, 40.0);
        let offline = machine("m2", MachineStatus::Offline, 70.0);
        let mut sim = simulator(vec![idle.clone(), offline.clone()], vec![0.99]);

        for _ in 0..10 {
            sim.tick();
        }
        assert_eq!(sim.machines(), vec![idle, offline]);
        assert!(sim.alerts().is_empty());
        assert_eq!(sim.ticks_executed(), 10);
    }

    #[test]
    fn test_tick_keeps_metrics_in_range() {
        let machines = default_machines();
        let mut sim = Simulator::new(
            machines,
            AlertStore::default(),
            Box::new(crate::random::StdRandom::seeded(42)),
        );
        for _ in 0..500 {
            sim.tick();
            for m in sim.machines() {
                assert!((0.0..=100.0).contains(&m.efficiency), "{m:?}");
                assert!((0.0..=100.0).contains(&m.temperature), "{m:?}");
                assert!((0.0..=100.0).contains(&m.load), "{m:?}");
                assert!(m.vibration >= 0.0, "{m:?}");
                assert_eq!(m.cycle_time == 0.0, m.status != MachineStatus::Active, "{m:?}");
            }
            assert!(sim.alerts().len() <= 20);
        }
    }

    #[test]
    fn test_temperature_walk_below_threshold_never_alerts() {
        // tirage 1.0 => offset +range/2 sur chaque métrique
        let mut sim = simulator(vec![machine("m1", MachineStatus::Active, 52.0)], vec![1.0]);
        let emitted = sim.tick();

        let m = sim.machine("m1").unwrap();
        assert_eq!(m.temperature, 54.0);
        assert_eq!(m.vibration, 1.6);
        assert_eq!(m.load, 64.0);
        assert_eq!(m.efficiency, 92.0);
        assert_eq!(m.cycle_time, 11.0);
        assert!(emitted.is_empty());
    }

    #[test]
    fn test_error_status_uses_wider_efficiency_walk() {
        let mut sim = simulator(vec![machine("m1", MachineStatus::Error, 40.0)], vec![1.0]);
        sim.tick();
        let m = sim.machine("m1").unwrap();
        assert_eq!(m.efficiency, 95.0);
        assert_eq!(m.cycle_time, 0.0);
    }

    #[test]
    fn test_overheating_emits_high_alert() {
        // 4 tirages métriques à 0.75 (+1 °C), puis tirage d'alerte 0.9
        let mut sim = simulator(
            vec![machine("m1", MachineStatus::Active, 56.0)],
            vec![0.75, 0.75, 0.75, 0.75, 0.9, 0.5],
        );
        let emitted = sim.tick();

        assert_eq!(emitted.len(), 1);
        let alert = &emitted[0];
        assert_eq!(alert.severity, AlertSeverity::High);
        assert_eq!(alert.machine_id, "m1");
        assert_eq!(alert.machine_name, "Machine m1");
        assert_eq!(alert.alert_type, "Overheating");
        assert_eq!(alert.message, "Temperature at 57.0°C exceeds threshold");
        assert!(!alert.acknowledged);
        assert_eq!(sim.alerts(), emitted);
    }

    #[test]
    fn test_overheating_above_sixty_is_critical() {
        let mut sim = simulator(vec![machine("m1", MachineStatus::Error, 62.0)], vec![0.5, 0.5, 0.5, 0.5, 0.95]);
        let emitted = sim.tick();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_overheating_draw_below_cutoff_is_silent() {
        let mut sim = simulator(vec![machine("m1", MachineStatus::Active, 70.0)], vec![0.5, 0.5, 0.5, 0.5, 0.8]);
        assert!(sim.tick().is_empty());
        assert_eq!(sim.unacknowledged_count(), 0);
    }

    #[test]
    fn test_alert_list_is_capped_and_ids_unique() {
        let mut sim = simulator(vec![machine("m1", MachineStatus::Active, 80.0)], vec![0.5, 0.5, 0.5, 0.5, 0.99, 0.5]);
        let mut first_id = None;
        for _ in 0..25 {
            let emitted = sim.tick();
            assert_eq!(emitted.len(), 1);
            first_id.get_or_insert_with(|| emitted[0].id.clone());
        }
        let alerts = sim.alerts();
        assert_eq!(alerts.len(), 20);
        let first_id = first_id.unwrap();
        assert!(alerts.iter().all(|a| a.id != first_id));

        let mut ids: Vec<_> = alerts.iter().map(|a| a.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_stop_then_tick_zeroes_cycle_time() {
        let mut sim = simulator(vec![machine("m1", MachineStatus::Active, 40.0)], vec![0.5]);
        assert_eq!(sim.control_machine("m1", "stop"), ControlOutcome::Applied(ControlAction::Stop));
        let stopped = sim.machine("m1").unwrap();
        assert_eq!(stopped.status, MachineStatus::Idle);

        sim.tick();
        let after = sim.machine("m1").unwrap();
        assert_eq!(after.cycle_time, 0.0);
        assert_eq!(after, stopped);

        // redémarrage : reprise au cycle nominal
        sim.control_machine("m1", "start");
        assert_eq!(sim.machine("m1").unwrap().cycle_time, 10.0);
        sim.tick();
        assert_eq!(sim.machine("m1").unwrap().cycle_time, 10.0);
        assert_eq!(sim.machine("m1").unwrap().status, MachineStatus::Active);
    }

    #[test]
    fn test_active_cycle_time_never_walks_to_zero() {
        let mut m = machine("m1", MachineStatus::Active, 40.0);
        m.cycle_time = 0.5;
        // tirage 0.0 => offset -1 sur le cycle à chaque tick
        let mut sim = simulator(vec![m], vec![0.0]);

        for _ in 0..5 {
            sim.tick();
            let m = sim.machine("m1").unwrap();
            assert_eq!(m.status, MachineStatus::Active);
            assert_eq!(m.cycle_time, 0.1);
        }
    }

    #[test]
    fn test_reset_from_error_resumes_cycle() {
        let mut sim = simulator(vec![machine("m1", MachineStatus::Error, 40.0)], vec![0.5]);
        assert_eq!(sim.machine("m1").unwrap().cycle_time, 0.0);
        sim.control_machine("m1", "reset");
        sim.tick();
        let m = sim.machine("m1").unwrap();
        assert_eq!(m.status, MachineStatus::Active);
        assert!(m.cycle_time > 0.0);
    }

    #[test]
    fn test_error_machine_cycle_time_forced_to_zero() {
        let mut m = machine("m1", MachineStatus::Active, 40.0);
        m.status = MachineStatus::Error; // cycle_time encore à 10
        let mut sim = simulator(vec![m], vec![0.5]);
        sim.tick();
        assert_eq!(sim.machine("m1").unwrap().cycle_time, 0.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut sim = simulator(vec![machine("m1", MachineStatus::Error, 58.0)], vec![0.5]);
        sim.control_machine("m1", "reset");
        let once = sim.machine("m1").unwrap();
        sim.control_machine("m1", "reset");
        let twice = sim.machine("m1").unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.status, MachineStatus::Active);
        assert_eq!(twice.efficiency, 95.0);
        assert_eq!(twice.temperature, 35.0);
        assert_eq!(twice.vibration, 0.5);
    }

    #[test]
    fn test_emergency_from_any_status() {
        for status in [MachineStatus::Active, MachineStatus::Idle, MachineStatus::Error, MachineStatus::Offline] {
            let mut sim = simulator(vec![machine("m1", status, 40.0)], vec![0.5]);
            sim.control_machine("m1", "emergency");
            assert_eq!(sim.machine("m1").unwrap().status, MachineStatus::Offline);
        }
    }

    #[test]
    fn test_start_on_active_is_noop() {
        let original = machine("m1", MachineStatus::Active, 40.0);
        let mut sim = simulator(vec![original.clone()], vec![0.5]);
        assert_eq!(sim.control_machine("m1", "start"), ControlOutcome::Applied(ControlAction::Start));
        assert_eq!(sim.machine("m1").unwrap(), original);
    }

    #[test]
    fn test_toggle_mode_flips() {
        let mut sim = simulator(vec![machine("m1", MachineStatus::Idle, 40.0)], vec![0.5]);
        sim.control_machine("m1", "toggle-mode");
        assert_eq!(sim.machine("m1").unwrap().mode, MachineMode::Manual);
        sim.control_machine("m1", "toggle-mode");
        assert_eq!(sim.machine("m1").unwrap().mode, MachineMode::Auto);
    }

    #[test]
    fn test_unknown_machine_or_action_is_noop() {
        let original = vec![machine("m1", MachineStatus::Active, 40.0), machine("m2", MachineStatus::Idle, 30.0)];
        let mut sim = simulator(original.clone(), vec![0.5]);

        assert_eq!(sim.control_machine("m9", "stop"), ControlOutcome::UnknownMachine);
        assert_eq!(sim.control_machine("m1", "self-destruct"), ControlOutcome::UnknownAction);
        assert_eq!(sim.machines(), original);
    }

    #[test]
    fn test_acknowledge_through_simulator() {
        let mut sim = simulator(vec![machine("m1", MachineStatus::Active, 90.0)], vec![0.5, 0.5, 0.5, 0.5, 0.9, 0.5]);
        let alert = sim.tick().remove(0);

        assert!(sim.acknowledge_alert(&alert.id));
        assert!(sim.acknowledge_alert(&alert.id));
        assert!(!sim.acknowledge_alert("alert-missing"));
        assert!(sim.alerts()[0].acknowledged);
        assert_eq!(sim.unacknowledged_count(), 0);
    }
}
