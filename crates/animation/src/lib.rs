//! Numeric display animation: linear interpolation from the currently
//! shown value to a target over a fixed number of steps.
//!
//! The interpolation itself is pure; the async driver sleeps between steps
//! and aborts when its cancel channel fires, so a re-triggered animation
//! can stop the one in flight before starting over.

use tokio::sync::watch;
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub start: f64,
    pub target: f64,
    pub steps: u32,
}

impl Tween {
    pub fn new(start: f64, target: f64, steps: u32) -> Self {
        Tween {
            start,
            target,
            // A zero-step tween still has to land on the target.
            steps: steps.max(1),
        }
    }

    /// Value after `step` ticks (1-based). The final step is exactly the
    /// target, so repeated interpolation never leaves rounding drift.
    pub fn value_at(&self, step: u32) -> f64 {
        if step >= self.steps {
            return self.target;
        }
        let fraction = step as f64 / self.steps as f64;
        self.start + (self.target - self.start) * fraction
    }

    /// Every step value in order, ending on the target.
    pub fn step_values(&self) -> Vec<f64> {
        (1..=self.steps).map(|s| self.value_at(s)).collect()
    }
}

/// Drives the tween, calling `apply` after each tick. Returns `true` when
/// the animation ran to completion, `false` when it was cancelled.
pub async fn run<F>(
    tween: &Tween,
    step_delay: Duration,
    cancel: &mut watch::Receiver<bool>,
    mut apply: F,
) -> bool
where
    F: FnMut(f64),
{
    for step in 1..=tween.steps {
        tokio::select! {
            _ = sleep(step_delay) => {}
            _ = cancel.changed() => return false,
        }
        apply(tween.value_at(step));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_step_snaps_to_target() {
        let tween = Tween::new(100.0, 200.0, 60);
        assert_eq!(tween.value_at(60), 200.0);
        assert_eq!(tween.step_values().last().copied(), Some(200.0));
    }

    #[test]
    fn test_no_drift_on_uneven_division() {
        // 1/3 is not representable; the final step must still be exact.
        let tween = Tween::new(0.0, 1.0, 3);
        let values = tween.step_values();
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], 1.0);
    }

    #[test]
    fn test_values_are_monotonic_upward() {
        let tween = Tween::new(84849.0, 87650.0, 60);
        let values = tween.step_values();
        for pair in values.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert_eq!(values.last().copied(), Some(87650.0));
    }

    #[test]
    fn test_downward_tween() {
        let tween = Tween::new(200.0, 100.0, 4);
        assert_eq!(tween.step_values(), vec![175.0, 150.0, 125.0, 100.0]);
    }

    #[test]
    fn test_zero_steps_clamped() {
        let tween = Tween::new(5.0, 10.0, 0);
        assert_eq!(tween.steps, 1);
        assert_eq!(tween.value_at(1), 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_to_completion() {
        let tween = Tween::new(100.0, 200.0, 10);
        let (_tx, mut rx) = watch::channel(false);
        let mut seen = Vec::new();

        let finished = run(&tween, Duration::from_millis(16), &mut rx, |v| seen.push(v)).await;
        assert!(finished);
        assert_eq!(seen.len(), 10);
        assert_eq!(seen.last().copied(), Some(200.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cancelled_before_first_step() {
        let tween = Tween::new(100.0, 200.0, 10);
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();

        let mut seen = Vec::new();
        let finished = run(&tween, Duration::from_millis(16), &mut rx, |v| seen.push(v)).await;
        assert!(!finished);
        assert!(seen.is_empty());
    }
}
