//! Ordered fallback chains. Command interpretation and parameter resolution
//! both try a list of stages in turn until one of them produces a value.

use crate::error::PKError;
use log::{debug, warn};

/// Result of a single stage.
#[derive(Debug)]
pub enum Attempt<T> {
    Resolved(T),
    /// The stage could not produce a value; try the next one.
    Unavailable(PKError),
    /// The stage produced a definite answer that is invalid. Stops the chain.
    Rejected(PKError),
}

pub trait Stage<I: ?Sized, T> {
    fn name(&self) -> &str;
    fn attempt(&self, input: &I) -> Attempt<T>;
}

#[derive(Debug)]
pub enum ChainOutcome<T> {
    Resolved { value: T, stage: String },
    Rejected { error: PKError, stage: String },
    /// Every stage fell through; failures are listed in stage order.
    Exhausted { failures: Vec<(String, PKError)> },
}

/// Run stages in order, calling each at most once.
pub fn run_chain<I: ?Sized, T>(stages: &[&dyn Stage<I, T>], input: &I) -> ChainOutcome<T> {
    let mut failures = Vec::new();

    for stage in stages {
        match stage.attempt(input) {
            Attempt::Resolved(value) => {
                debug!("Stage '{}' resolved", stage.name());
                return ChainOutcome::Resolved {
                    value,
                    stage: stage.name().to_string(),
                };
            }
            Attempt::Rejected(error) => {
                warn!("Stage '{}' rejected input: {}", stage.name(), error);
                return ChainOutcome::Rejected {
                    error,
                    stage: stage.name().to_string(),
                };
            }
            Attempt::Unavailable(error) => {
                warn!("Stage '{}' unavailable, falling back: {}", stage.name(), error);
                failures.push((stage.name().to_string(), error));
            }
        }
    }

    ChainOutcome::Exhausted { failures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Fixed {
        name: &'static str,
        outcome: fn() -> Attempt<u32>,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn new(name: &'static str, outcome: fn() -> Attempt<u32>) -> Self {
            Self {
                name,
                outcome,
                calls: Cell::new(0),
            }
        }
    }

    impl Stage<str, u32> for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn attempt(&self, _input: &str) -> Attempt<u32> {
            self.calls.set(self.calls.get() + 1);
            (self.outcome)()
        }
    }

    fn unavailable() -> Attempt<u32> {
        Attempt::Unavailable(PKError::LookupUnavailable("down".into()))
    }

    #[test]
    fn test_first_resolved_wins() {
        let first = Fixed::new("first", unavailable);
        let second = Fixed::new("second", || Attempt::Resolved(2));
        let third = Fixed::new("third", || Attempt::Resolved(3));

        let stages: [&dyn Stage<str, u32>; 3] = [&first, &second, &third];
        match run_chain(&stages, "x") {
            ChainOutcome::Resolved { value, stage } => {
                assert_eq!(value, 2);
                assert_eq!(stage, "second");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(first.calls.get(), 1);
        assert_eq!(third.calls.get(), 0);
    }

    #[test]
    fn test_rejection_short_circuits() {
        let first = Fixed::new("first", || {
            Attempt::Rejected(PKError::UnsupportedUnit("kg".into()))
        });
        let second = Fixed::new("second", || Attempt::Resolved(2));

        let stages: [&dyn Stage<str, u32>; 2] = [&first, &second];
        assert!(matches!(
            run_chain(&stages, "x"),
            ChainOutcome::Rejected { error: PKError::UnsupportedUnit(_), .. }
        ));
        assert_eq!(second.calls.get(), 0);
    }

    #[test]
    fn test_exhaustion_lists_failures_in_order() {
        let first = Fixed::new("first", unavailable);
        let second = Fixed::new("second", unavailable);

        let stages: [&dyn Stage<str, u32>; 2] = [&first, &second];
        match run_chain(&stages, "x") {
            ChainOutcome::Exhausted { failures } => {
                let names: Vec<_> = failures.iter().map(|(n, _)| n.as_str()).collect();
                assert_eq!(names, ["first", "second"]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_empty_chain_is_exhausted() {
        let stages: [&dyn Stage<str, u32>; 0] = [];
        assert!(matches!(
            run_chain(&stages, "x"),
            ChainOutcome::Exhausted { ref failures } if failures.is_empty()
        ));
    }
}
