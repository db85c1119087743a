//! Tree construction settings.
//!
//! The only knob today is how spelling-based setters react to a name they
//! do not recognise.

/// Reaction of the spelling setters (`set_binary_op_by_name` and friends)
/// to an unrecognized spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpellingPolicy {
    /// Reject with `AstError::UnrecognizedSpelling`.
    #[default]
    Strict,
    /// Keep the current value, log a warning and report `Ok(false)`.
    Permissive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AstConfig {
    pub spelling: SpellingPolicy,
}

impl AstConfig {
    pub fn strict() -> Self {
        Self {
            spelling: SpellingPolicy::Strict,
        }
    }

    pub fn permissive() -> Self {
        Self {
            spelling: SpellingPolicy::Permissive,
        }
    }
}
