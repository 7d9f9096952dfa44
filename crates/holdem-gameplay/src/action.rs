use holdem_core::Chips;

/// An inbound betting intent, before validation against the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Fold,
    Check,
    Call,
    /// Raise to this total round-bet amount (not the increment).
    Raise(Chips),
    AllIn,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Check => ActionKind::Check,
            Action::Call => ActionKind::Call,
            Action::Raise(_) => ActionKind::Raise,
            Action::AllIn => ActionKind::AllIn,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Check => write!(f, "check"),
            Action::Call => write!(f, "call"),
            Action::Raise(to) => write!(f, "raise to {to}"),
            Action::AllIn => write!(f, "all-in"),
        }
    }
}

/// The bare action type, without amount — used to describe legal options
/// (`GetAvailableActions`) without committing to a specific raise size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

/// The outcome of a successfully validated intent: what the round records
/// once the caller applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidatedAction {
    pub kind: ActionKind,
    /// Chips newly added to the pot by this action.
    pub amount_added: Chips,
    /// The player's total round-bet after this action.
    pub new_round_bet: Chips,
    pub is_raise: bool,
    pub remaining_stack: Chips,
}
