use std::fmt;

/// Repetition bounds of a quantified item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    pub min: u32,
    /// `None` for unbounded repetition.
    pub max: Option<u32>,
    /// `true` if the quantifier prefers fewer repetitions (`*?`, `+?`, ...).
    pub lazy: bool,
}

impl Quantifier {
    /// `*`
    pub const STAR: Quantifier = Quantifier::new(0, None);
    /// `+`
    pub const PLUS: Quantifier = Quantifier::new(1, None);
    /// `?`
    pub const QUESTION: Quantifier = Quantifier::new(0, Some(1));

    #[must_use]
    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Quantifier {
            min,
            max,
            lazy: false,
        }
    }

    /// Returns the same bounds with lazy matching.
    #[must_use]
    pub const fn lazy(self) -> Self {
        Quantifier { lazy: true, ..self }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, None) => f.write_str("*")?,
            (1, None) => f.write_str("+")?,
            (0, Some(1)) => f.write_str("?")?,
            (min, None) => write!(f, "{{{min},}}")?,
            (min, Some(max)) if min == max => write!(f, "{{{min}}}")?,
            (min, Some(max)) => write!(f, "{{{min},{max}}}")?,
        }
        if self.lazy {
            f.write_str("?")?;
        }
        Ok(())
    }
}
