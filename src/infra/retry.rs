//! Bounded immediate-retry combinator.

/// Run `op` up to `attempts` times, retrying only when `is_retryable` says
/// the failure is transient. Non-retryable errors propagate immediately;
/// the final attempt's error propagates once the budget is exhausted.
/// No backoff: retries are immediate.
pub fn retry<T, E>(
    attempts: usize,
    is_retryable: impl Fn(&E) -> bool,
    mut op: impl FnMut() -> Result<T, E>,
) -> Result<T, E> {
    // A zero budget still makes one attempt.
    for _ in 1..attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if is_retryable(&e) => continue,
            Err(e) => return Err(e),
        }
    }
    op()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Flaky {
        Transient,
        Permanent,
    }

    fn is_transient(e: &Flaky) -> bool {
        matches!(e, Flaky::Transient)
    }

    #[test]
    fn first_success_needs_one_call() {
        let mut calls = 0;
        let out: Result<i32, Flaky> = retry(5, is_transient, || {
            calls += 1;
            Ok(7)
        });

        assert_eq!(out, Ok(7));
        assert_eq!(calls, 1);
    }

    #[test]
    fn transient_failures_are_retried_until_success() {
        let mut calls = 0;
        let out: Result<i32, Flaky> = retry(5, is_transient, || {
            calls += 1;
            if calls < 4 { Err(Flaky::Transient) } else { Ok(9) }
        });

        assert_eq!(out, Ok(9));
        assert_eq!(calls, 4);
    }

    #[test]
    fn budget_exhaustion_returns_the_last_error() {
        let mut calls = 0;
        let out: Result<i32, Flaky> = retry(5, is_transient, || {
            calls += 1;
            Err(Flaky::Transient)
        });

        assert_eq!(out, Err(Flaky::Transient));
        assert_eq!(calls, 5);
    }

    #[test]
    fn permanent_failures_propagate_immediately() {
        let mut calls = 0;
        let out: Result<i32, Flaky> = retry(5, is_transient, || {
            calls += 1;
            Err(Flaky::Permanent)
        });

        assert_eq!(out, Err(Flaky::Permanent));
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let mut calls = 0;
        let _: Result<(), Flaky> = retry(0, is_transient, || {
            calls += 1;
            Err(Flaky::Transient)
        });

        assert_eq!(calls, 1);
    }
}
