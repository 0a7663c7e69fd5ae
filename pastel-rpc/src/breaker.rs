//! Circuit breaker state for the RPC client.
//!
//! Tracked as an explicit state machine decided by timestamp: `Closed`, or
//! `Open` until a deadline. Consecutive transport failures open the breaker;
//! one success closes it and adapts the cooldown to the observed call time.

use std::time::Duration;

use tokio::time::Instant;

/// Consecutive failures before the breaker opens.
pub(crate) const FAILURE_THRESHOLD: u32 = 5;

/// The smallest allowed cooldown, also the initial value.
const MIN_TIMEOUT: Duration = Duration::from_secs(60);

/// The largest allowed cooldown.
const MAX_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open { until: Instant },
}

#[derive(Debug)]
pub(crate) struct CircuitBreaker {
    state: State,
    failures: u32,
    timeout: Duration,
}

impl CircuitBreaker {
    pub(crate) fn new() -> CircuitBreaker {
        CircuitBreaker {
            state: State::Closed,
            failures: 0,
            timeout: MIN_TIMEOUT,
        }
    }

    /// The deadline callers must sleep until before attempting a request,
    /// if the breaker is open.
    pub(crate) fn open_until(&self) -> Option<Instant> {
        match self.state {
            State::Open { until } => Some(until),
            State::Closed => None,
        }
    }

    /// Record a transport failure. Returns true when this failure is the one
    /// that opened the breaker.
    pub(crate) fn record_failure(&mut self, now: Instant) -> bool {
        self.failures += 1;
        if self.failures < FAILURE_THRESHOLD {
            return false;
        }
        let was_closed = matches!(self.state, State::Closed);
        self.state = State::Open {
            until: now + self.timeout,
        };
        was_closed
    }

    /// Record a successful call that took `elapsed`, closing the breaker and
    /// adapting the cooldown.
    pub(crate) fn record_success(&mut self, elapsed: Duration) {
        self.failures = 0;
        self.state = State::Closed;
        if elapsed > self.timeout {
            self.timeout = self.timeout.mul_f64(1.5).min(MAX_TIMEOUT);
        } else if elapsed < self.timeout / 2 {
            self.timeout = self.timeout.mul_f64(0.8).max(MIN_TIMEOUT);
        }
    }

    #[cfg(test)]
    fn timeout(&self) -> Duration {
        self.timeout
    }
}
