//! Quick-click placement and the "send everything home" pass.

use crate::{
    board::Board,
    card::Card,
    history::MoveHistory,
    space::SpaceId,
    validator::can_move,
};

use log::debug;

/// First legal destination for `run`, tried in order: foundations, occupied columns, empty
/// columns, free cells. Greedy; the first approved space wins.
pub fn auto_destination(board: &Board, source: SpaceId, run: &[Card]) -> Option<SpaceId> {
    let (occupied, empty): (Vec<_>, Vec<_>) = SpaceId::tableaus()
        .filter(|&id| id != source)
        .partition(|&id| !board.space(id).is_empty());
    let free_cells = SpaceId::free_cells().filter(|_| !matches!(source, SpaceId::FreeCell(_)));

    SpaceId::foundations()
        .chain(occupied)
        .chain(empty)
        .chain(free_cells)
        .find(|&dest| can_move(board, run, source, dest))
}

/// Moves every free cell and column top card that fits on a foundation, recording each move.
/// Returns whether anything moved; call again until it returns `false`.
pub fn auto_foundation_pass(board: &mut Board, history: &mut MoveHistory) -> bool {
    let mut moved = false;
    for source in SpaceId::free_cells().chain(SpaceId::tableaus()) {
        let Some(&card) = board.space(source).top_card() else {
            continue;
        };
        let target = SpaceId::foundations().find(|&dest| can_move(board, &[card], source, dest));
        if let Some(dest) = target {
            debug!("auto move {card} from {source} to {dest}");
            history.record(board.commit_move(source, dest, 1));
            moved = true;
        }
    }
    moved
}

/// Repeats [`auto_foundation_pass`] to a fixed point, returning the number of moves made.
pub fn auto_foundation(board: &mut Board, history: &mut MoveHistory) -> usize {
    let before = history.len();
    while auto_foundation_pass(board, history) {}
    history.len() - before
}
