//! Confirmation of destructive project operations
//!
//! Operations that overwrite or delete projects ask a [`ConfirmationPolicy`]
//! instead of reading the terminal, so the library stays usable without a
//! user at the keyboard.

use crate::error::Result;

/// Decides whether a destructive operation may proceed
pub trait ConfirmationPolicy {
    /// Ask whether to proceed; `question` is a human-readable prompt
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be obtained, for example when
    /// terminal interaction fails or the user aborts.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Approves everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmationPolicy for AlwaysConfirm {
    fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Refuses everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl ConfirmationPolicy for NeverConfirm {
    fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(false)
    }
}

impl<F> ConfirmationPolicy for F
where
    F: FnMut(&str) -> Result<bool>,
{
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_policies() {
        assert!(AlwaysConfirm.confirm("anything?").unwrap());
        assert!(!NeverConfirm.confirm("anything?").unwrap());
    }

    #[test]
    fn test_closure_policy_sees_question() {
        let mut asked = Vec::new();
        let mut policy = |question: &str| {
            asked.push(question.to_string());
            Ok::<_, anyhow::Error>(question.contains("yes"))
        };

        assert!(policy.confirm("say yes").unwrap());
        assert!(!policy.confirm("say no").unwrap());
        drop(policy);
        assert_eq!(asked, vec!["say yes", "say no"]);
    }
}
