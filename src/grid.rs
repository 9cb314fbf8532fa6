//! Coordinate space of the play field.
//!
//! Positions are play-field pixels that are always a multiple of the cell
//! size. Any offset the screen needs (a score band, borders) is applied by the
//! presentation layer, never here.

/// A play-field pixel position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Logical cell index, column first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }
}

/// An axis-aligned box in play-field pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// A `size` x `size` box with its top-left corner at `origin`.
    pub const fn square(origin: Point, size: i32) -> Self {
        Rect { x: origin.x, y: origin.y, w: size, h: size }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// True when the two boxes share some area. Boxes that only touch along
    /// an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Grid dimensions, fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    screen_width: i32,
    screen_height: i32,
    cell_size: i32,
    columns: i32,
    rows: i32,
}

impl Grid {
    /// `cell_size` must be positive; `Config::validate` guarantees it for
    /// grids built from a configuration.
    pub fn new(screen_width: i32, screen_height: i32, cell_size: i32) -> Self {
        debug_assert!(cell_size > 0, "cell size must be positive");

        Grid {
            screen_width,
            screen_height,
            cell_size,
            columns: screen_width / cell_size,
            rows: screen_height / cell_size,
        }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn screen_size(&self) -> (i32, i32) {
        (self.screen_width, self.screen_height)
    }

    pub fn cell_count(&self) -> usize {
        (self.columns.max(0) as usize) * (self.rows.max(0) as usize)
    }

    /// The playable area. Only whole cells count, so a screen size that is
    /// not a multiple of the cell size loses the leftover strip.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.columns * self.cell_size, self.rows * self.cell_size)
    }

    /// Floor-divides each coordinate by the cell size and multiplies back.
    /// Near `i32::MIN` the floor may not fit; the lowest representable
    /// multiple of the cell size is used instead.
    pub fn snap_to_grid(&self, x: i32, y: i32) -> Point {
        Point::new(self.snap_axis(x), self.snap_axis(y))
    }

    fn snap_axis(&self, v: i32) -> i32 {
        let cell = i64::from(self.cell_size);
        let floored = i64::from(v).div_euclid(cell) * cell;
        if floored < i64::from(i32::MIN) {
            (floored + cell) as i32
        } else {
            floored as i32
        }
    }

    pub fn cell_at(&self, pos: Point) -> Cell {
        Cell::new(pos.x.div_euclid(self.cell_size), pos.y.div_euclid(self.cell_size))
    }

    pub fn origin_of(&self, cell: Cell) -> Point {
        Point::new(cell.col * self.cell_size, cell.row * self.cell_size)
    }

    pub fn cell_rect(&self, cell: Cell) -> Rect {
        Rect::square(self.origin_of(cell), self.cell_size)
    }

    /// Origin of the cell holding the centre of the screen.
    pub fn center(&self) -> Point {
        self.snap_to_grid(
            (self.screen_width - self.cell_size) / 2,
            (self.screen_height - self.cell_size) / 2,
        )
    }

    /// Every cell of the playable area, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |col| Cell::new(col, row)))
    }
}
