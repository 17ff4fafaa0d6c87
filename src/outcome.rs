//! Outcome runtime: a typed result paired with the diagnostics log.
//!
//! Every generation step has the shape `step(input, log) -> Outcome<T>`. The log
//! is threaded explicitly, so a call site always shows which state flows where.

use crate::error::{BoundaryError, GenError};
use crate::log::Log;

#[must_use]
#[derive(Debug, Clone, PartialEq)]
/// Success value or failure, together with everything logged so far.
pub struct Outcome<T> {
    result: Result<T, GenError>,
    log: Log,
}

/// Unwraps a successful [`Outcome`] into `(value, log)`, or returns the failure
/// from the enclosing function untouched.
///
/// The enclosing function must itself return an `Outcome`.
#[macro_export]
macro_rules! bind {
    ($outcome:expr) => {
        match $crate::outcome::Outcome::into_parts($outcome) {
            (Ok(value), log) => (value, log),
            (Err(error), log) => return $crate::outcome::Outcome::failed(error, log),
        }
    };
}

impl<T> Outcome<T> {
    pub fn new(result: Result<T, GenError>, log: Log) -> Self {
        Self { result, log }
    }

    /// Succeeds with `value`; the log is returned unchanged.
    pub fn pure(value: T, log: Log) -> Self {
        Self::new(Ok(value), log)
    }

    pub fn failed(error: GenError, log: Log) -> Self {
        Self::new(Err(error), log)
    }

    /// Fails with a [`GenError::User`] carrying the log accumulated so far.
    pub fn raise_user(message: impl Into<String>, log: Log) -> Self {
        Self::failed(GenError::user(message), log)
    }

    /// Fails with a [`GenError::Internal`] carrying the log accumulated so far.
    pub fn raise_internal(message: impl Into<String>, log: Log) -> Self {
        Self::failed(GenError::internal(message), log)
    }

    pub fn result(&self) -> &Result<T, GenError> {
        &self.result
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&GenError> {
        self.result.as_ref().err()
    }

    pub fn into_parts(self) -> (Result<T, GenError>, Log) {
        (self.result, self.log)
    }

    /// Runs `next` with the value and the log continued from this step.
    ///
    /// A failure is returned untouched and `next` never runs.
    pub fn and_then<U, F>(self, next: F) -> Outcome<U>
    where
        F: FnOnce(T, Log) -> Outcome<U>,
    {
        match self.result {
            Ok(value) => next(value, self.log),
            Err(error) => Outcome::failed(error, self.log),
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        Outcome::new(self.result.map(f), self.log)
    }

    /// Maps the value through a fallible conversion.
    pub fn try_map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Result<U, GenError>,
    {
        Outcome::new(self.result.and_then(f), self.log)
    }

    /// Yields the value or a [`BoundaryError`].
    ///
    /// Only for the process boundary; capability handlers propagate outcomes instead.
    pub fn unsafe_run(self) -> Result<T, BoundaryError> {
        match self.result {
            Ok(value) => Ok(value),
            Err(error) => Err(BoundaryError {
                error,
                log: self.log,
            }),
        }
    }
}

/// Runs `first`, then `second` with its value and continued log.
pub fn sequence<A, B, F>(first: Outcome<A>, second: F) -> Outcome<B>
where
    F: FnOnce(A, Log) -> Outcome<B>,
{
    first.and_then(second)
}

/// Runs `body` inside a scope named `name`.
///
/// The closing marker is recorded whether the body succeeds or fails.
pub fn scoped<T, F>(name: &str, log: Log, body: F) -> Outcome<T>
where
    F: FnOnce(Log) -> Outcome<T>,
{
    let (result, log) = body(log.push(name)).into_parts();
    Outcome::new(result, log.pop())
}

/// Applies `step` to each item in order, collecting the values.
///
/// Stops at the first failure.
pub fn traverse<I, U, F>(items: I, log: Log, mut step: F) -> Outcome<Vec<U>>
where
    I: IntoIterator,
    F: FnMut(I::Item, Log) -> Outcome<U>,
{
    let mut values = Vec::new();
    let mut log = log;
    for item in items {
        let (value, next) = bind!(step(item, log));
        values.push(value);
        log = next;
    }
    Outcome::pure(values, log)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use proptest::prelude::*;

    use super::{scoped, sequence, traverse, Outcome};
    use crate::error::ErrorKind;
    use crate::log::{Log, LogEvent};

    #[test]
    fn sequence_concatenates_logs_in_order() {
        let out = sequence(Outcome::pure(1, Log::new().info("first")), |n, log| {
            Outcome::pure(n + 1, log.info("second"))
        });
        let (result, log) = out.into_parts();
        assert_eq!(result, Ok(2));
        let messages: Vec<_> = log.entries().iter().map(|e| e.message()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn failure_short_circuits_the_chain() {
        let ran = Cell::new(false);
        let out: Outcome<()> = sequence(
            Outcome::<()>::raise_user("bad input", Log::new().info("before")),
            |_, log| {
                ran.set(true);
                Outcome::pure((), log.info("after"))
            },
        );
        assert!(!ran.get());
        assert_eq!(out.error().map(|e| e.kind()), Some(ErrorKind::User));
        assert_eq!(out.log().len(), 1);
    }

    #[test]
    fn scope_closes_on_failure() {
        let out: Outcome<()> = scoped("render", Log::new(), |log| {
            Outcome::raise_internal("boom", log.debug("inside"))
        });
        let events: Vec<_> = out.log().entries().iter().map(|e| e.event.clone()).collect();
        assert_eq!(
            events,
            vec![
                LogEvent::Push,
                LogEvent::Message("inside".to_string()),
                LogEvent::Pop
            ]
        );
        assert!(out.log().current_path().is_empty());
    }

    #[test]
    fn traverse_stops_at_first_failure() {
        let out = traverse(vec![1, 2, 3], Log::new(), |n, log| {
            if n == 2 {
                Outcome::raise_user("two", log)
            } else {
                Outcome::pure(n, log.debug(format!("saw {n}")))
            }
        });
        assert!(!out.is_success());
        assert_eq!(out.log().len(), 1);
    }

    #[test]
    fn unsafe_run_carries_log_into_boundary_error() {
        let err = Outcome::<()>::raise_user("nope", Log::new().info("context"))
            .unsafe_run()
            .unwrap_err();
        assert_eq!(err.error.message(), "nope");
        assert!(err.report(crate::LogLevel::Debug).contains("context"));
    }

    fn nested(depth: usize, fail_at: Option<usize>, log: Log) -> Outcome<()> {
        if depth == 0 {
            return Outcome::pure((), log);
        }
        scoped(&format!("level{depth}"), log, |log| {
            if fail_at == Some(depth) {
                return Outcome::raise_user("stop", log);
            }
            nested(depth - 1, fail_at, log)
        })
    }

    proptest! {
        #[test]
        fn scopes_stay_balanced(depth in 0usize..12, fail in proptest::option::of(0usize..12)) {
            let out = nested(depth, fail, Log::new());
            let mut open: Vec<&str> = Vec::new();
            for entry in out.log().entries() {
                match entry.event {
                    LogEvent::Push => open.push(entry.message()),
                    LogEvent::Pop => {
                        prop_assert_eq!(open.pop(), Some(entry.message()));
                    }
                    LogEvent::Message(_) => {}
                }
            }
            prop_assert!(open.is_empty());
        }
    }
}
