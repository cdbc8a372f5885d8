use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::PlayerAction as A;

/// Kind of action a player may be offered, without an amount.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ActionChoice {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

impl From<A> for ActionChoice {
    fn from(action: A) -> Self {
        match action {
            A::Fold => ActionChoice::Fold,
            A::Check => ActionChoice::Check,
            A::Call => ActionChoice::Call,
            A::Bet(_) => ActionChoice::Bet,
            A::Raise(_) => ActionChoice::Raise,
        }
    }
}

impl fmt::Display for ActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            ActionChoice::Fold => "fold",
            ActionChoice::Check => "check",
            ActionChoice::Call => "call",
            ActionChoice::Bet => "bet",
            ActionChoice::Raise => "raise",
        };
        write!(f, "{repr}")
    }
}

/// The capability set offered to the acting player.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionChoices(pub BTreeSet<ActionChoice>);

impl ActionChoices {
    pub fn contains(&self, action: &A) -> bool {
        self.0.contains(&ActionChoice::from(*action))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionChoice> {
        self.0.iter()
    }
}

impl fmt::Display for ActionChoices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = self
            .0
            .iter()
            .map(ActionChoice::to_string)
            .collect::<Vec<_>>()
            .join("/");
        write!(f, "{repr}")
    }
}

/// Builds the capability set for a player with chips behind.
///
/// * `opened` - whether any chips were wagered this round (blinds count)
/// * `to_call` - chips needed to match the highest wager
///
/// Fold is always offered. An unopened round offers check and bet. An opened
/// round offers call and raise; when nothing is owed (the big blind's option)
/// check replaces call. Raise is dropped when the stack cannot cover more
/// than the call.
pub fn action_choices(stack: u32, to_call: u32, opened: bool) -> ActionChoices {
    let mut choices = BTreeSet::from([ActionChoice::Fold]);
    if !opened {
        choices.insert(ActionChoice::Check);
        choices.insert(ActionChoice::Bet);
    } else {
        if to_call == 0 {
            choices.insert(ActionChoice::Check);
        } else {
            choices.insert(ActionChoice::Call);
        }
        if stack > to_call {
            choices.insert(ActionChoice::Raise);
        }
    }
    ActionChoices(choices)
}

/// An accepted action with the exact number of chips it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    Call(u32),
    Bet(u32),
    Raise(u32),
}

impl ValidatedAction {
    /// Chips this action takes from the player's stack.
    pub fn chips(&self) -> u32 {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(c) | ValidatedAction::Bet(c) | ValidatedAction::Raise(c) => c,
        }
    }
}

/// Validates a player action against the offered capability set and stack.
///
/// # Errors
///
/// Returns [`GameError::InvalidAction`] when the action is not offered, when
/// a bet or raise is zero, or when it needs more chips than the stack holds.
///
/// # Examples
///
/// ```
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::rules::{action_choices, validate_action, ValidatedAction};
///
/// let choices = action_choices(1000, 50, true);
/// let ok = validate_action(&choices, 1000, 50, PlayerAction::Raise(100));
/// assert_eq!(ok, Ok(ValidatedAction::Raise(150)));
///
/// let too_big = validate_action(&choices, 1000, 50, PlayerAction::Raise(1000));
/// assert!(too_big.is_err());
/// ```
pub fn validate_action(
    choices: &ActionChoices,
    stack: u32,
    to_call: u32,
    action: A,
) -> Result<ValidatedAction, GameError> {
    if !choices.contains(&action) {
        return Err(GameError::InvalidAction {
            action,
            reason: "not offered",
        });
    }
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => Ok(ValidatedAction::Check),
        A::Call => Ok(ValidatedAction::Call(to_call.min(stack))),
        A::Bet(amount) => {
            if amount == 0 {
                Err(GameError::InvalidAction {
                    action,
                    reason: "bet must be positive",
                })
            } else if amount > stack {
                Err(GameError::InvalidAction {
                    action,
                    reason: "bet exceeds stack",
                })
            } else {
                Ok(ValidatedAction::Bet(amount))
            }
        }
        A::Raise(amount) => {
            let total = to_call.checked_add(amount);
            if amount == 0 {
                Err(GameError::InvalidAction {
                    action,
                    reason: "raise must be positive",
                })
            } else {
                match total {
                    Some(total) if total <= stack => Ok(ValidatedAction::Raise(total)),
                    _ => Err(GameError::InvalidAction {
                        action,
                        reason: "raise exceeds stack",
                    }),
                }
            }
        }
    }
}
