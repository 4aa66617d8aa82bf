use crate::{
    action::{Action, format_action},
    board::Board,
    error::{MoveError, Result},
    space::SpaceId,
    stack::Run,
};

/// A committed move: the cards that travelled and where they went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub cards: Run,
    pub source: SpaceId,
    pub dest: SpaceId,
}

impl MoveRecord {
    pub fn new(cards: Run, source: SpaceId, dest: SpaceId) -> Self {
        Self {
            cards,
            source,
            dest,
        }
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// The move as a command that would replay it.
    pub fn action(&self) -> Action {
        Action::Move {
            from: self.source,
            to: Some(self.dest),
            count: self.count(),
        }
    }

    pub fn notation(&self) -> String {
        format_action(&self.action())
    }
}

/// Last-in first-out log of committed moves. There is no redo.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Pops the last move and reverses it on `board` without recording anything new.
    pub fn try_undo(&mut self, board: &mut Board) -> Result<MoveRecord> {
        let record = self.records.pop().ok_or(MoveError::EmptyHistory)?;
        board.revert_move(&record);
        Ok(record)
    }

    /// Like [`MoveHistory::try_undo`], returning whether anything was undone.
    pub fn undo(&mut self, board: &mut Board) -> bool {
        self.try_undo(board).is_ok()
    }
}
