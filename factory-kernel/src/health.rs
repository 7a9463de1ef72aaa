use serde::{Deserialize, Serialize};
use std::time::Instant;
use crate::state::SharedSimulator;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelHealth {
    pub uptime_seconds: u64,
    pub ticks_executed: u64,
    pub machines_tracked: u32,
    pub unacknowledged_alerts: u32,
    pub memory_usage_mb: f32,
}

#[derive(Clone)]
pub struct HealthTracker {
    start_time: Instant,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self { start_time: Instant::now() }
    }

    pub fn get_health(&self, simulator: &SharedSimulator) -> KernelHealth {
        let uptime = self.start_time.elapsed().as_secs();
        let (ticks, machines, pending) = {
            let sim = simulator.lock();
            (sim.ticks_executed(), sim.machine_count() as u32, sim.unacknowledged_count() as u32)
        };

        KernelHealth {
            uptime_seconds: uptime,
            ticks_executed: ticks,
            machines_tracked: machines,
            unacknowledged_alerts: pending,
            memory_usage_mb: get_memory_usage_mb(),
        }
    }
}

fn get_memory_usage_mb() -> f32 {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            let rss_kb = status
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<u64>().ok());
            if let Some(kb) = rss_kb {
                return (kb as f32) / 1024.0; // KB -> MB
            }
        }
    }

    // Fallback approximatif
    12.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertStore;
    use crate::random::SequenceRandom;
    use crate::seed::{default_alerts, default_machines};
    use crate::simulator::Simulator;
    use crate::state::new_state;
    use time::OffsetDateTime;

    #[test]
    fn test_health_reflects_simulator() {
        let sim = new_state(Simulator::new(
            default_machines(),
            AlertStore::with_alerts(20, default_alerts(OffsetDateTime::now_utc())),
            Box::new(SequenceRandom::constant(0.5)),
        ));
        sim.lock().tick();

        let health = HealthTracker::new().get_health(&sim);
        assert_eq!(health.ticks_executed, 1);
        assert_eq!(health.machines_tracked, 8);
        assert_eq!(health.unacknowledged_alerts, 2);
        assert!(health.memory_usage_mb > 0.0);
    }
}
