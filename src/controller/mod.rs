use std::sync::Arc;

use tokio::sync::mpsc;

use crate::device::{DeviceDriver, DriverError, RelayStatus};

pub mod power;

use self::power::PowerReading;

const COMPLETION_BUFFER: usize = 8;

/// Connectivity/relay status as shown to the user. Exactly one state is
/// active; a watch session always starts from `Unknown`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RelayState {
    #[default]
    Unknown,
    Loading,
    Failed,
    On,
    Off,
    Changing,
}

/// Owns the relay state machine. Network requests run on spawned tasks and
/// report back through the completion channel; all state mutation happens on
/// the task that calls [`Controller::apply`], so no locking is involved.
///
/// Every state-affecting request is stamped with a fresh sequence number and
/// only the completion matching the newest issued number is applied. A slow
/// response to a superseded poll can therefore never overwrite the result of
/// a newer action.
pub struct Controller {
    driver: Arc<dyn DeviceDriver>,
    state: RelayState,
    power: PowerReading,
    seq: u64,
    power_seq: u64,
    completions: mpsc::Sender<Completion>,
}

#[derive(Debug)]
pub struct Completion {
    seq: u64,
    outcome: Outcome,
}

#[derive(Debug)]
enum Outcome {
    Status(Result<RelayStatus, DriverError>),
    Switch {
        target: RelayStatus,
        result: Result<(), DriverError>,
    },
    Power(Result<f64, DriverError>),
}

impl Controller {
    pub fn new(driver: Arc<dyn DeviceDriver>) -> (Self, mpsc::Receiver<Completion>) {
        let (tx, rx) = mpsc::channel(COMPLETION_BUFFER);

        let controller = Controller {
            driver,
            state: RelayState::Unknown,
            power: PowerReading::default(),
            seq: 0,
            power_seq: 0,
            completions: tx,
        };

        (controller, rx)
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn power(&self) -> PowerReading {
        self.power
    }

    /// Maps a user tap onto the state machine: retry from `Unknown`/`Failed`,
    /// visually cancel while `Loading`, command the opposite relay position
    /// from a settled state, ignore while a command is in flight.
    pub fn tap(&mut self) {
        match self.state {
            RelayState::Loading => {
                // The in-flight poll keeps running; bumping the sequence
                // ensures its completion is discarded as stale.
                self.next_seq();
                self.state = RelayState::Unknown;
            }

            RelayState::Unknown | RelayState::Failed => self.poll(),
            RelayState::On => self.switch(false),
            RelayState::Off => self.switch(true),
            RelayState::Changing => {}
        }
    }

    /// Periodic re-poll. Skipped while a relay command is in flight so the
    /// timer cannot clobber the command's outcome.
    pub fn tick(&mut self) {
        if self.state == RelayState::Changing {
            tracing::debug!("Skipping periodic poll during relay command");
            return;
        }

        self.poll();
    }

    /// Starts a status poll and transitions to `Loading`.
    pub fn poll(&mut self) {
        self.state = RelayState::Loading;

        let seq = self.next_seq();
        let driver = self.driver.clone();
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let outcome = Outcome::Status(driver.poll_status().await);
            let _ = completions.send(Completion { seq, outcome }).await;
        });
    }

    /// Starts a relay command and transitions to `Changing`.
    pub fn switch(&mut self, on: bool) {
        self.state = RelayState::Changing;

        let seq = self.next_seq();
        let target = RelayStatus::from_bool(on);
        let driver = self.driver.clone();
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let result = driver.set_relay(on).await;
            let outcome = Outcome::Switch { target, result };
            let _ = completions.send(Completion { seq, outcome }).await;
        });
    }

    /// Best-effort power fetch. Gated by its own sequence and never touches
    /// the relay state.
    pub fn poll_power(&mut self) {
        self.power_seq += 1;

        let seq = self.power_seq;
        let driver = self.driver.clone();
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let outcome = Outcome::Power(driver.poll_power().await);
            let _ = completions.send(Completion { seq, outcome }).await;
        });
    }

    /// Applies a request completion, discarding it when a newer request has
    /// been issued since.
    pub fn apply(&mut self, completion: Completion) {
        let Completion { seq, outcome } = completion;

        match outcome {
            Outcome::Status(result) => self.apply_status(seq, result),
            Outcome::Switch { target, result } => self.apply_switch(seq, target, result),
            Outcome::Power(result) => self.apply_power(seq, result),
        }
    }

    fn apply_status(&mut self, seq: u64, result: Result<RelayStatus, DriverError>) {
        if self.is_stale(seq) {
            return;
        }

        self.state = match result {
            Ok(status) => {
                if self.driver.supports_power() {
                    self.poll_power();
                }

                status.into()
            }

            Err(e) => {
                tracing::warn!("Status poll failed: {e}");
                RelayState::Failed
            }
        };

        tracing::debug!(state = %self.state, "State updated");
    }

    fn apply_switch(&mut self, seq: u64, target: RelayStatus, result: Result<(), DriverError>) {
        if self.is_stale(seq) {
            return;
        }

        self.state = match result {
            Ok(()) => target.into(),

            Err(e) => {
                tracing::warn!("Relay command failed: {e}");
                RelayState::Failed
            }
        };

        tracing::debug!(state = %self.state, "State updated");
    }

    fn apply_power(&mut self, seq: u64, result: Result<f64, DriverError>) {
        if seq != self.power_seq {
            tracing::debug!(seq, newest = self.power_seq, "Discarding stale power reading");
            return;
        }

        match result {
            Ok(watts) => self.power = PowerReading::from_watts(watts),

            // Best effort: keep whatever the display currently shows.
            Err(e) => tracing::debug!("Power reading failed: {e}"),
        }
    }

    fn is_stale(&self, seq: u64) -> bool {
        if seq != self.seq {
            tracing::debug!(seq, newest = self.seq, "Discarding stale completion");
            return true;
        }

        false
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

impl From<RelayStatus> for RelayState {
    fn from(status: RelayStatus) -> Self {
        match status {
            RelayStatus::On => RelayState::On,
            RelayStatus::Off => RelayState::Off,
        }
    }
}
