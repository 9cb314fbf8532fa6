use std::collections::VecDeque;

use crate::grid::{Point, Rect};
use Direction::*;

/// One of the four cardinal directions, or standing still.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Still,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in screen space, y growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Still => (0, 0),
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Still => Still,
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Whether moving in `self` would turn straight back on `current`.
    /// Nothing reverses `Still`.
    pub fn is_reversal_of(self, current: Direction) -> bool {
        current != Still && self == current.opposite()
    }

    pub fn head_char(self) -> char {
        match self {
            Still => '@',
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// Outcome of shifting the body by one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub new_head: Rect,
    pub old_tail: Rect,
}

/// Ordered body segments, index 0 is the head.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Rect>,
}

impl Snake {
    pub fn new(head: Point, cell_size: i32) -> Self {
        let mut body = VecDeque::with_capacity(32);
        body.push_back(Rect::square(head, cell_size));
        Snake { body }
    }

    pub fn head(&self) -> Rect {
        self.body[0]
    }

    pub fn tail(&self) -> Rect {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &VecDeque<Rect> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false, a snake keeps at least its head.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Moves every segment one slot towards the tail and puts the head at
    /// `new_head`. Length is unchanged.
    pub fn step(&mut self, new_head: Rect) -> Step {
        self.body.push_front(new_head);
        // The body is never empty, the pop always yields the old tail
        let old_tail = self.body.pop_back().unwrap_or(new_head);
        Step { new_head, old_tail }
    }

    /// Appends a segment behind the current tail.
    pub fn grow(&mut self, at: Rect) {
        self.body.push_back(at);
    }

    /// True when the head shares area with any other segment.
    pub fn hits_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| head.intersects(segment))
    }

    /// True when `rect` shares area with any segment, head included.
    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.body.iter().any(|segment| segment.intersects(rect))
    }
}
