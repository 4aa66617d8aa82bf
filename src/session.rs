use crate::{
    action::{Action, format_actions},
    auto::{auto_destination, auto_foundation},
    board::Board,
    card::Card,
    error::{MoveError, Result},
    history::{MoveHistory, MoveRecord},
    layout::{Layout, Point, Rect},
    space::SpaceId,
    stack::MoveStack,
    validator::{can_move, validate},
};

use log::{debug, info, warn};

/// A run lifted by the pointer. Its cards stay in the source space until the release commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Held {
    pub stack: MoveStack,
    /// Bottom card origin relative to the pointer, fixed at pick-up.
    pub grab: Point,
    pub pointer: Point,
}

impl Held {
    pub fn origin(&self) -> Point {
        self.pointer + self.grab
    }

    /// Where the bottom card is being drawn.
    pub fn rect(&self, layout: &Layout) -> Rect {
        Rect::from_min_size(self.origin(), layout.card_size)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HeldState {
    #[default]
    Idle,
    Holding(Held),
}

/// Pointer and keyboard events, already classified by whoever reads the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    PickUp(Point),
    Drag(Point),
    Release(Point),
    Tap(Point),
    Undo,
    AutoFoundation,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Committed(SpaceId),
    Returned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceView {
    pub id: SpaceId,
    pub rect: Rect,
    pub cards: Vec<(Card, Point)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldView {
    pub source: SpaceId,
    pub cards: Vec<(Card, Point)>,
}

/// Everything a renderer needs for one frame. No rules are involved in drawing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub spaces: Vec<SpaceView>,
    pub held: Option<HeldView>,
}

/// One game in progress: the board, its undo log and whatever the pointer is holding.
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    initial: Board,
    game: Option<u32>,
    history: MoveHistory,
    layout: Layout,
    held: HeldState,
    won: bool,
    quit: bool,
}

impl Session {
    pub fn new(board: Board) -> Self {
        Self::with_layout(board, Layout::default())
    }

    pub fn with_layout(board: Board, layout: Layout) -> Self {
        Self {
            initial: board.clone(),
            board,
            game: None,
            history: MoveHistory::new(),
            layout,
            held: HeldState::Idle,
            won: false,
            quit: false,
        }
    }

    pub fn from_game(game: u32) -> Self {
        let mut session = Self::new(Board::new_from_seed(game));
        session.game = Some(game);
        session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn game(&self) -> Option<u32> {
        self.game
    }

    pub fn held(&self) -> Option<&Held> {
        match &self.held {
            HeldState::Holding(held) => Some(held),
            HeldState::Idle => None,
        }
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.held, HeldState::Holding(_))
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// Deals numbered game `game` and forgets everything about the current one.
    pub fn new_game(&mut self, game: u32) {
        info!("dealing game #{game}");
        self.reset(Board::new_from_seed(game));
        self.game = Some(game);
    }

    /// Back to the opening position of the current game.
    pub fn restart(&mut self) {
        info!("restarting");
        self.reset(self.initial.clone());
    }

    fn reset(&mut self, board: Board) {
        self.initial = board.clone();
        self.board = board;
        self.history.clear();
        self.held = HeldState::Idle;
        self.won = false;
    }

    /// Lifts the run starting at the card under `point`. Only valid runs off free cells and
    /// tableau columns can be lifted.
    pub fn pick_up(&mut self, point: Point) -> bool {
        if self.is_holding() {
            debug!("pick up ignored, already holding cards");
            return false;
        }
        let Some((id, index)) = self.layout.hit_test(&self.board, point) else {
            return false;
        };
        if matches!(id, SpaceId::Foundation(_)) {
            return false;
        }
        let space = self.board.space(id);
        let Some(card) = space.cards().get(index) else {
            return false;
        };
        // hit_test only reports cards that are in the space
        let run = space.extract_run(card);
        debug_assert!(run.is_ok(), "hit test and board disagree about {id}");
        let Ok(run) = run else {
            warn!("{card} is not in {id}");
            return false;
        };
        let Some(stack) = MoveStack::new(id, run) else {
            debug!("{card} in {id} does not start a run");
            return false;
        };
        debug!("picked up {} cards from {id}", stack.len());
        self.held = HeldState::Holding(Held {
            stack,
            grab: self.layout.card_pos(id, index) - point,
            pointer: point,
        });
        true
    }

    pub fn drag(&mut self, point: Point) {
        if let HeldState::Holding(held) = &mut self.held {
            held.pointer = point;
        }
    }

    /// Drops the held run at `point`. Spaces overlapped by the bottom card are tried in
    /// board order and the first legal one takes the run; otherwise it goes back where it
    /// came from and the board is left untouched.
    pub fn release(&mut self, point: Point) -> Result<Release> {
        let HeldState::Holding(mut held) = std::mem::take(&mut self.held) else {
            return Err(MoveError::NothingHeld);
        };
        held.pointer = point;
        let source = held.stack.source();
        // every board mutation drops the held run first, so it is still on top of its source
        debug_assert!(
            self.board.space(source).cards().ends_with(held.stack.cards()),
            "held run is no longer on {source}"
        );
        let drop_rect = held.rect(&self.layout);

        let target = SpaceId::all()
            .filter(|&id| id != source)
            .filter(|&id| {
                self.layout
                    .stack_rect(id, self.board.space(id).len())
                    .intersects(&drop_rect)
            })
            .find(|&id| match validate(&self.board, held.stack.cards(), source, id) {
                Ok(()) => true,
                Err(err) => {
                    debug!("{err}");
                    false
                }
            });

        match target {
            Some(dest) => {
                self.commit(source, dest, held.stack.len());
                Ok(Release::Committed(dest))
            }
            None => {
                debug!("returned {} cards to {source}", held.stack.len());
                Ok(Release::Returned)
            }
        }
    }

    /// Drops whatever is held back onto its source.
    pub fn cancel(&mut self) {
        if let HeldState::Holding(held) = std::mem::take(&mut self.held) {
            debug!("returned {} cards to {}", held.stack.len(), held.stack.source());
        }
    }

    /// Quick-click: sends the run under `point` to the first space that takes it.
    pub fn tap(&mut self, point: Point) -> bool {
        if self.is_holding() {
            return false;
        }
        let Some((id, index)) = self.layout.hit_test(&self.board, point) else {
            return false;
        };
        let len = self.board.space(id).len();
        if index >= len {
            return false;
        }
        match self.auto_move(id, len - index) {
            Ok(dest) => {
                debug!("tapped {id}, cards went to {dest}");
                true
            }
            Err(err) => {
                debug!("{err}");
                false
            }
        }
    }

    /// Quick-click on a whole space: the longest run ending at its top that can go somewhere.
    pub fn tap_space(&mut self, id: SpaceId) -> Result<SpaceId> {
        if !id.is_valid() {
            return Err(MoveError::IllegalAddress { space: id });
        }
        let longest = self.board.space(id).stack().top_run().len();
        for count in (1..=longest).rev() {
            if let Ok(dest) = self.auto_move(id, count) {
                return Ok(dest);
            }
        }
        Err(MoveError::NoDestination { from: id })
    }

    fn auto_move(&mut self, source: SpaceId, count: usize) -> Result<SpaceId> {
        let run = self.top_cards(source, count)?;
        let dest = auto_destination(&self.board, source, run)
            .ok_or(MoveError::NoDestination { from: source })?;
        self.commit(source, dest, count);
        Ok(dest)
    }

    /// Moves the top `count` cards of `from`. With no destination, the first foundation that
    /// takes them is used.
    pub fn move_cards(&mut self, from: SpaceId, to: Option<SpaceId>, count: usize) -> Result<()> {
        for id in [Some(from), to].into_iter().flatten() {
            if !id.is_valid() {
                return Err(MoveError::IllegalAddress { space: id });
            }
        }
        let run = self.top_cards(from, count)?;
        let dest = match to {
            Some(dest) => {
                validate(&self.board, run, from, dest)?;
                dest
            }
            None => SpaceId::foundations()
                .find(|&dest| can_move(&self.board, run, from, dest))
                .ok_or(MoveError::NoDestination { from })?,
        };
        self.commit(from, dest, count);
        Ok(())
    }

    fn top_cards(&self, id: SpaceId, count: usize) -> Result<&[Card]> {
        let cards = self.board.space(id).cards();
        if count > cards.len() {
            return Err(MoveError::TooFewCards { space: id, count });
        }
        Ok(&cards[cards.len() - count..])
    }

    fn commit(&mut self, source: SpaceId, dest: SpaceId, count: usize) {
        let record = self.board.commit_move(source, dest, count);
        self.history.record(record);
    }

    pub fn undo(&mut self) -> bool {
        self.cancel();
        self.history.undo(&mut self.board)
    }

    /// Every committed move so far in action notation, oldest first.
    pub fn transcript(&self) -> String {
        let actions: Vec<Action> = self.history.records().iter().map(MoveRecord::action).collect();
        format_actions(&actions)
    }

    /// Sends everything that can go home, returning the number of cards moved.
    pub fn auto_foundation(&mut self) -> usize {
        self.cancel();
        let moved = auto_foundation(&mut self.board, &mut self.history);
        if moved > 0 {
            debug!("{moved} cards went to the foundations");
        }
        moved
    }

    /// Applies a textual command. Anything held is dropped back first.
    pub fn apply(&mut self, action: Action) -> Result<()> {
        self.cancel();
        match action {
            Action::Move { from, to, count } => self.move_cards(from, to, count),
            Action::Tap(id) => self.tap_space(id).map(|_| ()),
            Action::Undo => self.history.try_undo(&mut self.board).map(|_| ()),
            Action::AutoFoundation => {
                self.auto_foundation();
                Ok(())
            }
            Action::Quit => {
                self.quit = true;
                Ok(())
            }
        }
    }

    /// Feeds one input event, returning whether it had any effect.
    pub fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::PickUp(point) => self.pick_up(point),
            Input::Drag(point) => {
                self.drag(point);
                self.is_holding()
            }
            Input::Release(point) => match self.release(point) {
                Ok(release) => matches!(release, Release::Committed(_)),
                Err(err) => {
                    debug!("release ignored: {err}");
                    false
                }
            },
            Input::Tap(point) => self.tap(point),
            Input::Undo => self.undo(),
            Input::AutoFoundation => self.auto_foundation() > 0,
            Input::Quit => {
                self.quit = true;
                true
            }
        }
    }

    /// Re-checks the win condition; call once per frame.
    pub fn tick(&mut self) -> bool {
        let won = self.board.is_won();
        if won && !self.won {
            info!("game won in {} moves", self.history.len());
        }
        self.won = won;
        won
    }

    pub fn render_plan(&self) -> RenderPlan {
        let held = self.held();
        let spaces = self
            .board
            .spaces()
            .map(|space| {
                let id = space.id();
                let visible = match held {
                    Some(held) if held.stack.source() == id => {
                        space.len().saturating_sub(held.stack.len())
                    }
                    _ => space.len(),
                };
                SpaceView {
                    id,
                    rect: self.layout.space_rect(id),
                    cards: space.cards()[..visible]
                        .iter()
                        .enumerate()
                        .map(|(i, &card)| (card, self.layout.card_pos(id, i)))
                        .collect(),
                }
            })
            .collect();

        let held = held.map(|held| {
            let origin = held.origin();
            HeldView {
                source: held.stack.source(),
                cards: held
                    .stack
                    .offsets(self.layout.fan_offset)
                    .map(|(card, dy)| (card, origin + Point::new(0, dy)))
                    .collect(),
            }
        });

        RenderPlan { spaces, held }
    }
}
