use std::fmt::{Display, Formatter};

/// The core's error taxonomy (kinds, not type names — see §7). Every
/// variant carries a human-readable reason; none of them carry enough
/// state to resume the failed operation, by design: validation and
/// precondition failures never mutate state, so the caller only needs to
/// know why, not how to patch things up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed intent: bad card count to the evaluator, a negative
    /// amount, an unknown action type. No state change.
    InvalidInput(String),
    /// Legal shape but wrong time: StartNewHand with fewer than two
    /// active players, an action when no hand is active. No state change.
    PreconditionFailed(String),
    /// The action validator rejected the intent: not your turn, cannot
    /// check, below minimum raise, insufficient chips. No state change.
    ValidationRejected(String),
    /// Duplicate sequence number written to the event log. The append is
    /// abandoned.
    Conflict(String),
    /// An internal invariant broke: pot awards don't sum to the pot, the
    /// evaluator returned nothing for a player still in the hand. Fatal
    /// to the hand; the caller aborts it per §7's recovery policy.
    InvalidState(String),
}

impl Error {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
    pub fn precondition_failed(reason: impl Into<String>) -> Self {
        Self::PreconditionFailed(reason.into())
    }
    pub fn validation_rejected(reason: impl Into<String>) -> Self {
        Self::ValidationRejected(reason.into())
    }
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    /// True for the two kinds that, per §7, are fatal to the hand rather
    /// than merely rejected back to the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InvalidState(_))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidInput(r) => write!(f, "invalid input: {r}"),
            Error::PreconditionFailed(r) => write!(f, "precondition failed: {r}"),
            Error::ValidationRejected(r) => write!(f, "rejected: {r}"),
            Error::Conflict(r) => write!(f, "conflict: {r}"),
            Error::InvalidState(r) => write!(f, "invalid state: {r}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_is_fatal() {
        assert!(Error::invalid_state("pot mismatch").is_fatal());
        assert!(!Error::validation_rejected("not your turn").is_fatal());
    }
}
