//! The simulated bank-connection flow.
//!
//! A scripted sequence with named states instead of nested timers:
//!
//! ```text
//! Idle --select_bank--> Connecting --timeout--> Connected --timeout--> Unlocked
//! ```
//!
//! `Unlocked` is terminal for the session. The flow itself only describes
//! transitions and their effects; the controller applies the effects to the
//! state store and the render surface. The async driver owns the delays and
//! honors a cancel channel, so an aborted flow resets cleanly instead of
//! leaving half-applied visual state.

use serde_json::json;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use models::Timings;

pub type Result<T> = std::result::Result<T, ConnectionError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("A connection flow is already running")]
    AlreadyRunning,
    #[error("All banks are already connected")]
    AlreadyUnlocked,
    /// Forward-looking failure path; the simulator never produces it.
    #[error("Could not reach {0}")]
    BankUnavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Connecting,
    Connected,
    Unlocked,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Connecting => "connecting",
            Phase::Connected => "connected",
            Phase::Unlocked => "unlocked",
        }
    }
}

/// What the controller has to do when a transition lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowLoading(String),
    HideLoading,
    Toast(String),
    CloseActiveModal,
    UnlockTier,
}

/// One timed transition: wait `delay_ms`, then the flow is in `phase` and
/// the effects apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    pub delay_ms: u64,
    pub effects: Vec<Effect>,
}

pub struct ConnectionFlow {
    phase: Phase,
    bank: Option<String>,
    timings: Timings,
}

impl ConnectionFlow {
    pub fn new(timings: &Timings) -> Self {
        ConnectionFlow {
            phase: Phase::Idle,
            bank: None,
            timings: timings.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bank(&self) -> Option<&str> {
        self.bank.as_deref()
    }

    /// Starts the flow for a bank. Rejected while a flow is in progress and
    /// after the session has unlocked.
    pub fn select_bank(&mut self, name: &str) -> Result<Step> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Connecting;
                self.bank = Some(name.to_string());
                Ok(Step {
                    phase: Phase::Connecting,
                    delay_ms: 0,
                    effects: vec![Effect::ShowLoading(format!("Connecting to {}...", name))],
                })
            }
            Phase::Connecting | Phase::Connected => Err(ConnectionError::AlreadyRunning),
            Phase::Unlocked => Err(ConnectionError::AlreadyUnlocked),
        }
    }

    /// The single advance function: the next timed transition, or None when
    /// the flow is idle or already terminal.
    pub fn advance(&mut self) -> Option<Step> {
        match self.phase {
            Phase::Connecting => {
                self.phase = Phase::Connected;
                let bank = self.bank.as_deref().unwrap_or("your bank");
                Some(Step {
                    phase: Phase::Connected,
                    delay_ms: self.timings.connect_ms,
                    effects: vec![
                        Effect::HideLoading,
                        Effect::Toast(format!("Successfully connected to {}!", bank)),
                        Effect::CloseActiveModal,
                    ],
                })
            }
            Phase::Connected => {
                self.phase = Phase::Unlocked;
                Some(Step {
                    phase: Phase::Unlocked,
                    delay_ms: self.timings.reveal_ms + self.timings.fade_ms,
                    effects: vec![Effect::UnlockTier],
                })
            }
            Phase::Idle | Phase::Unlocked => None,
        }
    }

    /// Returns an aborted flow to Idle. Terminal state is kept.
    pub fn reset(&mut self) {
        if self.phase != Phase::Unlocked {
            self.phase = Phase::Idle;
            self.bank = None;
        }
    }
}

/// Drives the whole sequence for one bank, applying each effect as its
/// transition lands. Returns `Ok(true)` when the flow reached `Unlocked`,
/// `Ok(false)` when it was cancelled (the flow is reset to Idle).
pub async fn run<F>(
    flow: &mut ConnectionFlow,
    bank: &str,
    cancel: &mut watch::Receiver<bool>,
    mut apply: F,
) -> Result<bool>
where
    F: FnMut(&Effect),
{
    let first = flow.select_bank(bank)?;
    logger::event(
        "bank_connect",
        "phase",
        json!({ "phase": first.phase.as_str(), "bank": bank }),
    );
    for effect in &first.effects {
        apply(effect);
    }

    while let Some(step) = flow.advance() {
        tokio::select! {
            _ = sleep(Duration::from_millis(step.delay_ms)) => {}
            _ = cancel.changed() => {
                flow.reset();
                logger::event(
                    "bank_connect",
                    "cancelled",
                    json!({ "bank": bank }),
                );
                return Ok(false);
            }
        }
        logger::event(
            "bank_connect",
            "phase",
            json!({ "phase": step.phase.as_str(), "bank": bank }),
        );
        for effect in &step.effects {
            apply(effect);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_order_and_delays() {
        let mut flow = ConnectionFlow::new(&Timings::default());
        assert_eq!(flow.phase(), Phase::Idle);
        assert!(flow.advance().is_none());

        let start = flow.select_bank("Chase").unwrap();
        assert_eq!(start.phase, Phase::Connecting);
        assert_eq!(start.delay_ms, 0);
        assert_eq!(
            start.effects,
            vec![Effect::ShowLoading("Connecting to Chase...".to_string())]
        );

        let connected = flow.advance().unwrap();
        assert_eq!(connected.phase, Phase::Connected);
        assert_eq!(connected.delay_ms, 2000);
        assert!(connected
            .effects
            .contains(&Effect::Toast("Successfully connected to Chase!".to_string())));

        let unlocked = flow.advance().unwrap();
        assert_eq!(unlocked.phase, Phase::Unlocked);
        assert_eq!(unlocked.delay_ms, 4000);
        assert_eq!(unlocked.effects, vec![Effect::UnlockTier]);

        // Terminal: nothing further.
        assert!(flow.advance().is_none());
    }

    #[test]
    fn test_reentrant_select_rejected() {
        let mut flow = ConnectionFlow::new(&Timings::default());
        flow.select_bank("Chase").unwrap();
        assert_eq!(
            flow.select_bank("Wells Fargo").unwrap_err(),
            ConnectionError::AlreadyRunning
        );
    }

    #[test]
    fn test_select_after_unlock_rejected() {
        let mut flow = ConnectionFlow::new(&Timings::default());
        flow.select_bank("Chase").unwrap();
        while flow.advance().is_some() {}
        assert_eq!(flow.phase(), Phase::Unlocked);
        assert_eq!(
            flow.select_bank("Chase").unwrap_err(),
            ConnectionError::AlreadyUnlocked
        );
    }

    #[test]
    fn test_reset_keeps_terminal_state() {
        let mut flow = ConnectionFlow::new(&Timings::default());
        flow.select_bank("Chase").unwrap();
        flow.reset();
        assert_eq!(flow.phase(), Phase::Idle);
        assert!(flow.bank().is_none());

        flow.select_bank("Chase").unwrap();
        while flow.advance().is_some() {}
        flow.reset();
        assert_eq!(flow.phase(), Phase::Unlocked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_applies_effects_in_order() {
        let mut flow = ConnectionFlow::new(&Timings::default());
        let (_tx, mut rx) = watch::channel(false);
        let mut effects = Vec::new();

        let finished = run(&mut flow, "Chase", &mut rx, |e| effects.push(e.clone()))
            .await
            .unwrap();

        assert!(finished);
        assert_eq!(flow.phase(), Phase::Unlocked);
        assert_eq!(
            effects,
            vec![
                Effect::ShowLoading("Connecting to Chase...".to_string()),
                Effect::HideLoading,
                Effect::Toast("Successfully connected to Chase!".to_string()),
                Effect::CloseActiveModal,
                Effect::UnlockTier,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cancelled_resets_flow() {
        let mut flow = ConnectionFlow::new(&Timings::default());
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();

        let mut effects = Vec::new();
        let finished = run(&mut flow, "Chase", &mut rx, |e| effects.push(e.clone()))
            .await
            .unwrap();

        assert!(!finished);
        assert_eq!(flow.phase(), Phase::Idle);
        // Only the loading indicator ever showed.
        assert_eq!(
            effects,
            vec![Effect::ShowLoading("Connecting to Chase...".to_string())]
        );
    }
}
