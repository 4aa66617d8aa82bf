//! Screen geometry in whole pixels. The origin is the top-left corner and `y` grows downward.

use crate::{
    board::Board,
    space::{SpaceId, TOTAL_FREE_CELLS, TOTAL_TABLEAUS},
};

use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, half-open on its right and bottom edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min: Point,
    pub size: Size,
}

impl Rect {
    pub const fn from_min_size(min: Point, size: Size) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Point {
        Point::new(self.min.x + self.size.width, self.min.y + self.size.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        let max = self.max();
        (self.min.x..max.x).contains(&point.x) && (self.min.y..max.y).contains(&point.y)
    }

    /// Overlap of positive area; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a, b) = (self.max(), other.max());
        self.min.x < b.x && other.min.x < a.x && self.min.y < b.y && other.min.y < a.y
    }

    pub fn translate(&self, delta: Point) -> Rect {
        Rect::from_min_size(self.min + delta, self.size)
    }
}

/// Placement of every space: foundations along the top-left, free cells along the top-right,
/// and the tableau row underneath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub card_size: Size,
    pub padding: i32,
    pub fan_offset: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(Size::new(90, 130), 10, 25)
    }
}

impl Layout {
    pub fn new(card_size: Size, padding: i32, fan_offset: i32) -> Self {
        Self {
            card_size,
            padding,
            fan_offset,
        }
    }

    fn column_width(&self) -> i32 {
        self.card_size.width + self.padding
    }

    /// Table size needed to show the eight columns with padding on both sides.
    pub fn table_size(&self) -> Size {
        Size::new(
            self.padding + TOTAL_TABLEAUS as i32 * self.column_width(),
            self.padding * 3 + self.card_size.height * 2,
        )
    }

    /// The slot a space occupies when it holds no cards.
    pub fn space_rect(&self, id: SpaceId) -> Rect {
        let top = self.padding;
        let min = match id {
            SpaceId::Foundation(i) => Point::new(self.padding + i as i32 * self.column_width(), top),
            SpaceId::FreeCell(i) => {
                let right = self.table_size().width;
                let from_right = (TOTAL_FREE_CELLS - i) as i32;
                Point::new(right - from_right * self.column_width(), top)
            }
            SpaceId::Tableau(i) => Point::new(
                self.padding + i as i32 * self.column_width(),
                top + self.card_size.height + self.padding,
            ),
        };
        Rect::from_min_size(min, self.card_size)
    }

    /// Offset of the card at `index` from the space's slot origin.
    pub fn card_offset(&self, id: SpaceId, index: usize) -> Point {
        match id {
            SpaceId::Tableau(_) => Point::new(0, index as i32 * self.fan_offset),
            SpaceId::Foundation(_) | SpaceId::FreeCell(_) => Point::ZERO,
        }
    }

    pub fn card_pos(&self, id: SpaceId, index: usize) -> Point {
        self.space_rect(id).min + self.card_offset(id, index)
    }

    pub fn card_rect(&self, id: SpaceId, index: usize) -> Rect {
        self.space_rect(id).translate(self.card_offset(id, index))
    }

    /// Area covered by a space and the `len` cards fanned on it.
    pub fn stack_rect(&self, id: SpaceId, len: usize) -> Rect {
        let slot = self.space_rect(id);
        let extra = self.card_offset(id, len.saturating_sub(1)).y;
        Rect::from_min_size(
            slot.min,
            Size::new(slot.size.width, slot.size.height + extra),
        )
    }

    /// The space and card index under `point`, preferring the topmost card. An empty slot
    /// resolves to index 0.
    pub fn hit_test(&self, board: &Board, point: Point) -> Option<(SpaceId, usize)> {
        for space in board.spaces() {
            let id = space.id();
            if space.is_empty() {
                if self.space_rect(id).contains(point) {
                    return Some((id, 0));
                }
                continue;
            }
            if let Some(index) = (0..space.len())
                .rev()
                .find(|&i| self.card_rect(id, i).contains(point))
            {
                return Some((id, index));
            }
        }
        None
    }
}
