use std::time::Duration;

/// Fixed-timestep accumulator. The host adds wall-clock time every frame and
/// then consumes whole steps, carrying the remainder into the next frame.
#[derive(Clone, Debug, Default)]
pub struct FixedStep {
    accumulated: Duration,
}

impl FixedStep {
    pub fn new() -> Self {
        FixedStep::default()
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.accumulated = self.accumulated.saturating_add(elapsed);
    }

    /// Takes one `step` out of the accumulator if enough time has built up.
    /// The step may differ between calls, the game speeds up mid-frame.
    pub fn consume(&mut self, step: Duration) -> bool {
        if step.is_zero() || self.accumulated < step {
            return false;
        }
        self.accumulated -= step;
        true
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}
