use crate::{card::Card, space::SpaceId};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MoveError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("cannot move cards from {from} to {to}: {reason}")]
    IllegalMove {
        from: SpaceId,
        to: SpaceId,
        reason: &'static str,
    },
    #[error("card {card} is not in {space}")]
    NotFound { card: Card, space: SpaceId },
    #[error("space {space} does not exist on the board")]
    IllegalAddress { space: SpaceId },
    #[error("no space will take the cards from {from}")]
    NoDestination { from: SpaceId },
    #[error("{space} holds fewer than {count} cards")]
    TooFewCards { space: SpaceId, count: usize },
    #[error("nothing to undo")]
    EmptyHistory,
    #[error("no cards are being held")]
    NothingHeld,
}

pub(crate) const REASON_SAME_SPACE: &str = "source and destination are the same";
pub(crate) const REASON_EMPTY_RUN: &str = "no cards to move";
pub(crate) const REASON_UNSOUND_RUN: &str = "cards in the run don't stack";
pub(crate) const REASON_FROM_FOUNDATION: &str = "cannot move off a foundation";
pub(crate) const REASON_DOES_NOT_FIT: &str = "those cards do not fit there";
pub(crate) const REASON_RUN_TOO_LONG: &str = "not enough free spaces to move that many cards";
