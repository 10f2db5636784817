// ============================================================
// Layer 5 — Iteration Listeners
// ============================================================
// Observers attached to a fit pass. The fit loop calls every
// listener after each optimizer step with a running iteration
// number (counted across batches) and the loss of that step.
//
//   ScoreIterationListener(1) → logs every iteration
//   ScoreIterationListener(n) → logs iterations n, 2n, 3n, ...

use crate::domain::traits::IterationListener;

/// Logs the score every `print_every` iterations.
#[derive(Debug, Clone)]
pub struct ScoreIterationListener {
    print_every: usize,
}

impl ScoreIterationListener {
    /// A cadence of 0 is treated as 1.
    pub fn new(print_every: usize) -> Self {
        Self { print_every: print_every.max(1) }
    }

    fn should_report(&self, iteration: usize) -> bool {
        iteration % self.print_every == 0
    }
}

impl IterationListener for ScoreIterationListener {
    fn iteration_done(&mut self, iteration: usize, score: f64) {
        if self.should_report(iteration) {
            tracing::info!("Score at iteration {} is {:.6}", iteration, score);
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence() {
        let every_one = ScoreIterationListener::new(1);
        assert!(every_one.should_report(1));
        assert!(every_one.should_report(7));

        let every_five = ScoreIterationListener::new(5);
        assert!(!every_five.should_report(4));
        assert!(every_five.should_report(10));
    }

    #[test]
    fn test_zero_cadence_clamped() {
        let listener = ScoreIterationListener::new(0);
        assert!(listener.should_report(3));
    }
}
