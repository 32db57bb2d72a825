use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use mem_core::config::MaintenanceConfig;

use crate::orchestrator::MaintenanceOrchestrator;
use crate::schedule::AdaptiveSchedule;

/// Owns the three background task loops (decay, consolidate, quality
/// sweep). Each loop sleeps for its own adaptively-backed-off, jittered
/// delay, then runs exactly one cycle and checks for shutdown again —
/// cancellation only ever takes effect between cycles, never mid-batch,
/// so a cycle that is already writing never leaves a record half
/// migrated because the process asked it to stop.
pub struct MaintenanceHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl MaintenanceHandle {
    /// Signals every loop to stop after its current cycle and waits for
    /// them to exit, bounded by `shutdown_grace_secs`.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        let grace = std::time::Duration::from_secs(5);
        for task in self.tasks.drain(..) {
            let _ = tokio::time::timeout(grace, task).await;
        }
    }
}

/// Runs `orchestrator`'s three cycle classes on their own independent
/// schedules. Decay and consolidation run concurrently (they touch
/// disjoint tier pairs by construction: decay never writes to STM, and
/// consolidation's claim registry keeps the two from double-handling
/// the same record); within a single class, the loop is sequential, so
/// two decay passes for the same tier never overlap.
pub fn spawn(orchestrator: Arc<MaintenanceOrchestrator>, config: MaintenanceConfig) -> MaintenanceHandle {
    let (tx, rx) = watch::channel(false);

    let decay_task = {
        let orchestrator = orchestrator.clone();
        let mut rx = rx.clone();
        let mut schedule = AdaptiveSchedule::new(&config.decay);
        let budget = std::time::Duration::from_secs(config.decay.budget_secs.max(1));
        tokio::spawn(async move {
            loop {
                if wait_or_stop(&mut rx, schedule.next_delay()).await {
                    return;
                }
                let start = Instant::now();
                let healthy = orchestrator.run_decay_cycle(Utc::now()).await.is_ok() && start.elapsed() <= budget;
                schedule.record_outcome(healthy);
            }
        })
    };

    let consolidate_task = {
        let orchestrator = orchestrator.clone();
        let mut rx = rx.clone();
        let mut schedule = AdaptiveSchedule::new(&config.consolidate);
        let budget = std::time::Duration::from_secs(config.consolidate.budget_secs.max(1));
        tokio::spawn(async move {
            loop {
                if wait_or_stop(&mut rx, schedule.next_delay()).await {
                    return;
                }
                let start = Instant::now();
                let report = orchestrator.run_consolidation_cycle().await;
                let healthy = report.errors == 0 && start.elapsed() <= budget;
                schedule.record_outcome(healthy);
            }
        })
    };

    let quality_task = {
        let orchestrator = orchestrator.clone();
        let mut rx = rx.clone();
        let mut schedule = AdaptiveSchedule::new(&config.quality_sweep);
        let budget = std::time::Duration::from_secs(config.quality_sweep.budget_secs.max(1));
        tokio::spawn(async move {
            loop {
                if wait_or_stop(&mut rx, schedule.next_delay()).await {
                    return;
                }
                let start = Instant::now();
                let healthy = orchestrator.run_quality_sweep_cycle(Utc::now()).await.is_ok() && start.elapsed() <= budget;
                schedule.record_outcome(healthy);
            }
        })
    };

    MaintenanceHandle {
        shutdown: tx,
        tasks: vec![decay_task, consolidate_task, quality_task],
    }
}

/// Sleeps for `delay`, or returns early (with `true`, meaning "stop
/// now") if a shutdown is signalled while sleeping.
async fn wait_or_stop(rx: &mut watch::Receiver<bool>, delay: std::time::Duration) -> bool {
    if *rx.borrow() {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        changed = rx.changed() => changed.is_err() || *rx.borrow(),
    }
}
