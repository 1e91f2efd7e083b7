use crate::Error;
use std::{
    convert::Infallible,
    time::{Duration, Instant},
};

/// Something that is charged once per executed instruction and may stop a
/// search.
pub(crate) trait Limit {
    type Error;

    fn tick(&mut self) -> Result<(), Self::Error>;
}

/// A limit that never stops a search.
pub(crate) struct Unlimited;

impl Limit for Unlimited {
    type Error = Infallible;

    #[inline]
    fn tick(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Steps between two looks at the clock.
const DEADLINE_POLL_INTERVAL: u64 = 1024;

/// An execution budget that makes a runaway search fail with
/// [`Error::Timeout`] instead of running unbounded.
///
/// A budget can cap the number of executed instructions, the wall-clock time,
/// or both:
///
/// ```
/// use regexp_explorer::{Budget, Error, Pattern};
/// use std::time::Duration;
///
/// let pattern = Pattern::new("(a*)*b").unwrap();
/// let budget = Budget::new().steps(10_000).timeout(Duration::from_secs(1));
/// let mut matcher = pattern.matcher("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").with_budget(budget);
/// assert!(matches!(matcher.find(), Err(Error::Timeout { .. })));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Budget {
    max_steps: Option<u64>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    /// The deadline in force since [`Budget::start`].
    expires: Option<Instant>,
    used: u64,
}

impl Budget {
    /// Creates a budget without any limit.
    #[must_use]
    pub const fn new() -> Self {
        Budget {
            max_steps: None,
            timeout: None,
            deadline: None,
            expires: None,
            used: 0,
        }
    }

    /// Limits the number of executed instructions.
    #[must_use]
    pub const fn steps(self, max_steps: u64) -> Self {
        Budget {
            max_steps: Some(max_steps),
            ..self
        }
    }

    /// Limits the time spent searching, measured from when the budget is
    /// attached to a matcher or the matcher is reset.
    #[must_use]
    pub const fn timeout(self, timeout: Duration) -> Self {
        Budget {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Stops searching at a fixed point in time.
    #[must_use]
    pub const fn deadline(self, deadline: Instant) -> Self {
        Budget {
            deadline: Some(deadline),
            ..self
        }
    }

    /// Returns the number of instructions executed since the budget was
    /// started.
    #[must_use]
    pub const fn used(&self) -> u64 {
        self.used
    }

    /// Clears the step count and starts the timeout clock.
    pub(crate) fn start(&mut self) {
        self.used = 0;
        let timeout = self
            .timeout
            .and_then(|timeout| Instant::now().checked_add(timeout));
        self.expires = match (timeout, self.deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
}

impl Limit for Budget {
    type Error = Error;

    #[inline]
    fn tick(&mut self) -> Result<(), Error> {
        self.used += 1;

        if let Some(max_steps) = self.max_steps
            && self.used > max_steps
        {
            return Err(Error::Timeout { steps: max_steps });
        }

        if self.used % DEADLINE_POLL_INTERVAL == 0
            && let Some(expires) = self.expires
            && Instant::now() >= expires
        {
            return Err(Error::Timeout { steps: self.used });
        }

        Ok(())
    }
}
