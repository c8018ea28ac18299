use std::fmt;

/// The declared shape of a bound handler, captured once at bind time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSignature {
    /// Declared parameter types, in positional order.
    pub param_types: Vec<&'static str>,

    /// Number of data values returned, excluding a trailing error.
    pub return_arity: usize,

    /// Whether the last return slot is an error channel.
    pub trailing_error: bool,
}

impl HandlerSignature {
    #[inline]
    pub fn param_count(&self) -> usize {
        self.param_types.len()
    }
}

impl fmt::Display for HandlerSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.param_types.join(", "))?;
        write!(f, " -> {} value(s)", self.return_arity)?;
        if self.trailing_error {
            write!(f, " + error")?;
        }
        Ok(())
    }
}
