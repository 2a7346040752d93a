//! Worker thread running the simulation control loop.

// -----------------------------------------------------------------------------------------------
// INCLUDES
// -----------------------------------------------------------------------------------------------

use std::{
    sync::{
        mpsc::{Receiver, RecvTimeoutError, TryRecvError},
        Arc,
    },
    thread,
    time::Duration,
};

use log::{debug, warn};

use comms_if::tc::SimCmd;

use super::{IterationReport, LoopState, Shared, SimError, SimObserver};

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug)]
pub enum WorkerSignal {
    /// Control command from the host
    Cmd(SimCmd),

    /// The worker should exit
    Shutdown,
}

/// Why the worker woke up.
enum Wake {
    Signal(WorkerSignal),
    Timeout,
    Disconnected,
}

/// Events to pass to the observer once the locks are released.
enum Event {
    Report(IterationReport, bool),
    Status(String),
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

pub(super) fn worker_thread(
    shared: Arc<Shared>,
    receiver: Receiver<WorkerSignal>,
    mut observer: Box<dyn SimObserver>,
) -> Result<(), SimError> {
    loop {
        let (state, wake_period) = {
            let truck = shared.truck.read()?;
            let state = *shared.loop_state.read()?;
            (
                state,
                Duration::from_millis(truck.params().paused_wake_period_ms),
            )
        };

        // Block while not iterating, otherwise only check for new commands
        let wake = match state {
            LoopState::Running | LoopState::SteppingOnce => match receiver.try_recv() {
                Ok(s) => Wake::Signal(s),
                Err(TryRecvError::Empty) => Wake::Timeout,
                Err(TryRecvError::Disconnected) => Wake::Disconnected,
            },
            LoopState::Paused | LoopState::Finished(_) => match receiver.recv_timeout(wake_period) {
                Ok(s) => Wake::Signal(s),
                Err(RecvTimeoutError::Timeout) => Wake::Timeout,
                Err(RecvTimeoutError::Disconnected) => Wake::Disconnected,
            },
        };

        let mut events = vec![];

        match wake {
            Wake::Signal(first) => match latest_signal(first, &receiver) {
                WorkerSignal::Shutdown => break,
                WorkerSignal::Cmd(cmd) => {
                    if let Some(e) = apply_cmd(&shared, cmd)? {
                        events.push(e);
                    }
                }
            },
            Wake::Timeout => (),
            Wake::Disconnected => {
                debug!("Host dropped the command channel, stopping");
                break;
            }
        }

        // Perform an iteration if required
        let mut pacing = None;
        {
            let mut truck = shared.truck.write()?;
            let mut loop_state = shared.loop_state.write()?;

            if matches!(*loop_state, LoopState::Running | LoopState::SteppingOnce) {
                match truck.iterate() {
                    Ok(report) => {
                        let show_firings = truck.params().show_rule_firings;

                        if report.tm.outcome.is_finished() {
                            *loop_state = LoopState::Finished(report.tm.outcome);
                            events.push(Event::Report(report, show_firings));
                            events.push(Event::Status(truck.status_text()));
                        } else {
                            // Only check for a step once the iteration is complete
                            if *loop_state == LoopState::SteppingOnce {
                                *loop_state = LoopState::Paused;
                            } else {
                                pacing = Some(truck.params().pacing());
                            }
                            events.push(Event::Report(report, show_firings));
                        }
                    }
                    Err(SimError::AlreadyFinished(outcome)) => {
                        *loop_state = LoopState::Finished(outcome);
                        events.push(Event::Status(truck.status_text()));
                    }
                    Err(e) => {
                        warn!("Iteration failed, pausing: {}", e);
                        *loop_state = LoopState::Paused;
                        events.push(Event::Status(format!("Iteration failed: {}", e)));
                    }
                }
            }
        }

        for event in events {
            notify(observer.as_mut(), event);
        }

        match pacing {
            Some(Some(delay)) => thread::sleep(delay),
            Some(None) => thread::yield_now(),
            None => (),
        }
    }

    Ok(())
}

/// Drain any further pending signals, keeping only the newest. A shutdown is never discarded.
fn latest_signal(first: WorkerSignal, receiver: &Receiver<WorkerSignal>) -> WorkerSignal {
    let mut latest = first;

    while let Ok(next) = receiver.try_recv() {
        if matches!(latest, WorkerSignal::Shutdown) {
            continue;
        }
        latest = next;
    }

    latest
}

/// Update the loop state for a command.
///
/// Returns the outcome text if the run has already finished and the command would otherwise
/// start it.
fn apply_cmd(shared: &Shared, cmd: SimCmd) -> Result<Option<Event>, SimError> {
    let truck = shared.truck.read()?;
    let mut loop_state = shared.loop_state.write()?;
    let outcome = truck.tm().outcome;

    debug!("Applying {:?} in {:?}", cmd, *loop_state);

    if outcome.is_finished() {
        *loop_state = LoopState::Finished(outcome);

        return Ok(match cmd {
            SimCmd::Run | SimCmd::Step => Some(Event::Status(truck.status_text())),
            SimCmd::Pause => None,
        });
    }

    *loop_state = match cmd {
        SimCmd::Run => LoopState::Running,
        SimCmd::Pause => LoopState::Paused,
        SimCmd::Step => LoopState::SteppingOnce,
    };

    Ok(None)
}

fn notify(observer: &mut dyn SimObserver, event: Event) {
    match event {
        Event::Report(report, show_firings) => {
            if show_firings {
                for (matrix, firings) in report.firings.iter() {
                    for f in firings {
                        observer.on_rule_fired(*matrix, f.row, f.col, f.degree);
                    }
                }
            }

            observer.on_state_changed(&report.tm);
            observer.on_status_text(&report.status);
        }
        Event::Status(text) => observer.on_status_text(&text),
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::MatrixId;
    use std::sync::mpsc::channel;

    fn is_cmd(s: &WorkerSignal, cmd: SimCmd) -> bool {
        matches!(s, WorkerSignal::Cmd(c) if *c == cmd)
    }

    #[test]
    fn test_last_writer_wins() {
        let (tx, rx) = channel();
        tx.send(WorkerSignal::Cmd(SimCmd::Pause)).unwrap();
        tx.send(WorkerSignal::Cmd(SimCmd::Step)).unwrap();

        let first = rx.recv().unwrap();
        assert!(is_cmd(&latest_signal(first, &rx), SimCmd::Step));

        tx.send(WorkerSignal::Cmd(SimCmd::Run)).unwrap();
        let first = rx.recv().unwrap();
        assert!(is_cmd(&latest_signal(first, &rx), SimCmd::Run));
    }

    #[test]
    fn test_shutdown_is_kept() {
        let (tx, rx) = channel();
        tx.send(WorkerSignal::Cmd(SimCmd::Run)).unwrap();
        tx.send(WorkerSignal::Shutdown).unwrap();
        tx.send(WorkerSignal::Cmd(SimCmd::Step)).unwrap();

        let first = rx.recv().unwrap();
        assert!(matches!(latest_signal(first, &rx), WorkerSignal::Shutdown));
    }

    #[test]
    fn test_matrix_ids_reported() {
        // Observer methods receive both matrices when avoidance runs
        struct Count(usize, usize);
        impl SimObserver for Count {
            fn on_rule_fired(&mut self, m: MatrixId, _: usize, _: usize, _: f64) {
                match m {
                    MatrixId::Primary => self.0 += 1,
                    MatrixId::Avoidance => self.1 += 1,
                }
            }
        }

        let mut sim = super::super::TruckSim::new(Default::default()).unwrap();
        sim.set_obstacles(vec![comms_if::world::ObstacleRect::new(180.0, 170.0, 40.0, 8.0)])
            .unwrap();
        let report = sim.iterate().unwrap();

        let mut count = Count(0, 0);
        notify(&mut count, Event::Report(report.clone(), false));
        assert_eq!((count.0, count.1), (0, 0));
        notify(&mut count, Event::Report(report, true));
        assert_eq!((count.0, count.1), (35, 25));
    }
}
