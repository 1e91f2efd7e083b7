use crate::Error;
use std::{fmt, str::FromStr};

/// Options that change how a pattern is parsed and matched.
///
/// Flags can be built with the chainable setters or parsed from their letters:
///
/// ```
/// use regexp_explorer::Flags;
///
/// let flags: Flags = "im".parse().unwrap();
/// assert_eq!(flags, Flags::new().case_insensitive(true).multiline(true));
/// assert_eq!(flags.to_string(), "im");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    /// `i`: literals, classes and backreferences compare by simple case
    /// folding.
    pub case_insensitive: bool,
    /// `m`: `^` and `$` match at line boundaries instead of only at the ends
    /// of the input.
    pub multiline: bool,
    /// `s`: `.` also matches line terminators.
    pub dot_all: bool,
}

impl Flags {
    #[must_use]
    pub const fn new() -> Self {
        Flags {
            case_insensitive: false,
            multiline: false,
            dot_all: false,
        }
    }

    #[must_use]
    pub const fn case_insensitive(self, yes: bool) -> Self {
        Flags {
            case_insensitive: yes,
            ..self
        }
    }

    #[must_use]
    pub const fn multiline(self, yes: bool) -> Self {
        Flags {
            multiline: yes,
            ..self
        }
    }

    #[must_use]
    pub const fn dot_all(self, yes: bool) -> Self {
        Flags {
            dot_all: yes,
            ..self
        }
    }
}

impl FromStr for Flags {
    type Err = Error;

    fn from_str(letters: &str) -> Result<Self, Self::Err> {
        letters.chars().try_fold(Flags::new(), |flags, lit| match lit {
            'i' => Ok(flags.case_insensitive(true)),
            'm' => Ok(flags.multiline(true)),
            's' => Ok(flags.dot_all(true)),
            _ => Err(Error::UnknownFlag { lit }),
        })
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, lit) in [
            (self.case_insensitive, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
        ] {
            if set {
                write!(f, "{lit}")?;
            }
        }
        Ok(())
    }
}
