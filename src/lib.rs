//! A region quadtree that assigns disjoint axis-aligned rectangles in
//! integer 2d space to values, answering "which rectangle contains this
//! point?" in time proportional to the depth of the tree rather than the
//! number of rectangles.
//!
//! Insert performance is traded heavily for lookup performance: every
//! insertion routes all four corners of the rectangle through the tree and
//! then sweeps the covered area, while a lookup is a single descent.
//! # Contracts:
//! - accepted rectangles never intersect each other; touching edges count
//!   as intersecting and are rejected before any mutation
//! - rectangles are never removed; see [`Error::DeleteUnsupported`]
pub mod quadtree;
pub mod visualize;

use std::fmt;
use std::hash::{Hash, Hasher};

/// An integer coordinate pair. The y axis grows upwards.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// An axis-aligned rectangle built from two arbitrary opposite corners,
/// normalized at construction so that `tl` really is the top left corner.
#[derive(Debug, Clone, Copy)]
pub struct Rectangle {
    tl: Point,
    tr: Point,
    bl: Point,
    br: Point,
}

impl Rectangle {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        // swap so that we can guarantee the relative position of the corners
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y1 < y2 { (y2, y1) } else { (y1, y2) };

        Self {
            tl: Point::new(x1, y1),
            tr: Point::new(x2, y1),
            bl: Point::new(x1, y2),
            br: Point::new(x2, y2),
        }
    }

    pub fn left(&self) -> i32 {
        self.tl.x
    }

    pub fn right(&self) -> i32 {
        self.tr.x
    }

    pub fn top(&self) -> i32 {
        self.tl.y
    }

    pub fn bottom(&self) -> i32 {
        self.bl.y
    }

    /// Width in coordinate units. The full `i32` range spans more units
    /// than `i32::MAX`, so extents are measured in `i64`.
    pub fn width(&self) -> i64 {
        i64::from(self.tr.x) - i64::from(self.tl.x)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.tl.y) - i64::from(self.bl.y)
    }

    /// Bounds are inclusive on all four edges.
    pub fn contains(&self, p: Point) -> bool {
        self.tl.x <= p.x && p.x <= self.br.x && self.br.y <= p.y && p.y <= self.tl.y
    }

    /// Separating axis test; rectangles that merely touch along an edge or
    /// corner count as intersecting.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(other.left() > self.right()
            || other.right() < self.left()
            || other.top() < self.bottom()
            || other.bottom() > self.top())
    }

    /// The four corners, in `[tl, tr, bl, br]` order.
    pub fn points(&self) -> [Point; 4] {
        [self.tl, self.tr, self.bl, self.br]
    }
}

// Equality and hashing use the extreme corners only; tr and bl are derived
// from them and carry no extra information.
impl PartialEq for Rectangle {
    fn eq(&self, other: &Self) -> bool {
        self.tl == other.tl && self.br == other.br
    }
}

impl Eq for Rectangle {}

impl Hash for Rectangle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tl.hash(state);
        self.br.hash(state);
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}),({}),({}),({})", self.tl, self.tr, self.bl, self.br)
    }
}

/// Failure modes of the tree's mutating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The rectangle intersects one that was already accepted. Nothing was
    /// inserted; the caller may retry with a different rectangle.
    Overlap(Rectangle),
    /// The tree cannot remove rectangles: split nodes are never re-merged.
    DeleteUnsupported,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Overlap(rect) => {
                write!(f, "rectangle {} overlaps one already in the tree", rect)
            }
            Error::DeleteUnsupported => write!(f, "deletion is not supported"),
        }
    }
}

impl std::error::Error for Error {}
