//! Move legality: the per-space placement rule combined with the supermove capacity bound.
//!
//! Capacity is flat rather than the usual power-of-two rule. A run of `n` cards may move when
//! `n` does not exceed the number of empty free cells and empty tableau columns, plus one when
//! the destination is a foundation or already holds cards. The source space never counts, even
//! if lifting the run would leave it empty. An empty destination is already part of the count.
//!
//! A run that is not on top of its source yields `MoveError::NotFound`. Text commands can ask
//! for anything, so that stays an error here; callers that got the run from the board itself
//! (pointer pick-up, release) assert it instead.

use crate::{
    board::Board,
    card::Card,
    error::{
        MoveError, REASON_DOES_NOT_FIT, REASON_EMPTY_RUN, REASON_FROM_FOUNDATION,
        REASON_RUN_TOO_LONG, REASON_SAME_SPACE, REASON_UNSOUND_RUN, Result,
    },
    space::SpaceId,
    stack::is_valid_run,
};

/// Longest run that may travel from `source` to `dest` on this board.
pub fn capacity(board: &Board, source: SpaceId, dest: SpaceId) -> usize {
    let empty = board
        .free_cells
        .iter()
        .chain(board.tableaus.iter())
        .filter(|space| space.id() != source && space.is_empty())
        .count();
    let dest = board.space(dest);
    if !dest.is_holding_slot() || !dest.is_empty() {
        empty + 1
    } else {
        empty
    }
}

/// Checks that `run`, the top cards of `source`, may be placed on `dest`.
pub fn validate(board: &Board, run: &[Card], source: SpaceId, dest: SpaceId) -> Result<()> {
    let illegal = |reason| MoveError::IllegalMove {
        from: source,
        to: dest,
        reason,
    };
    for id in [source, dest] {
        if !id.is_valid() {
            return Err(MoveError::IllegalAddress { space: id });
        }
    }
    let Some(first) = run.first() else {
        return Err(illegal(REASON_EMPTY_RUN));
    };
    if source == dest {
        return Err(illegal(REASON_SAME_SPACE));
    }
    if !board.space(source).cards().ends_with(run) {
        return Err(MoveError::NotFound {
            card: *first,
            space: source,
        });
    }
    if matches!(source, SpaceId::Foundation(_)) {
        return Err(illegal(REASON_FROM_FOUNDATION));
    }
    if !is_valid_run(run) {
        return Err(illegal(REASON_UNSOUND_RUN));
    }
    let capacity = capacity(board, source, dest);
    if run.len() > capacity {
        return Err(illegal(REASON_RUN_TOO_LONG));
    }
    if !board.space(dest).accepts(run, capacity) {
        return Err(illegal(REASON_DOES_NOT_FIT));
    }
    Ok(())
}

pub fn can_move(board: &Board, run: &[Card], source: SpaceId, dest: SpaceId) -> bool {
    validate(board, run, source, dest).is_ok()
}
