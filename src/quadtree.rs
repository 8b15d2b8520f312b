use crate::{Error, Point, Rectangle};
use smallvec::SmallVec;

// Leaf candidate sets almost always hold a single rectangle; the bulk
// assignment pass can spill a handful more into a leaf that several
// rectangles overlap.
type Candidates<V> = SmallVec<[(Rectangle, V); 2]>;

// Quadrant layout within a split node:
// | tl | tr |
// | -- | -- |
// | bl | br |
// Points exactly on a split line go left / bottom.
fn quadrant(at: Point, p: Point) -> usize {
    let right = (p.x > at.x) as usize;
    if p.y > at.y {
        right
    } else {
        2 + right
    }
}

#[derive(Debug, Clone)]
struct Split<V> {
    // The exact coordinates this node was bisected at. Descents branch on
    // these stored values; a midpoint recomputed from the node bounds
    // drifts from the floor split on odd extents and misroutes lookups.
    at: Point,
    quads: Box<[Node<V>; 4]>,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub(crate) rect: Rectangle,
    split: Option<Split<V>>,
    candidates: Candidates<V>,
    // The single corner point a leaf remembers, with its rectangle. A
    // second corner arriving here forces the split.
    corner: Option<(Point, Rectangle)>,
    // Set when an assigned rectangle overlaps this node's area. Only the
    // visualizer reads it.
    pub(crate) occupied: bool,
}

impl<V> Node<V> {
    fn leaf(rect: Rectangle) -> Self {
        Self {
            rect,
            split: None,
            candidates: Candidates::new(),
            corner: None,
            occupied: false,
        }
    }

    /// Does any rectangle already in this subtree intersect `rect`?
    fn any_intersection(&self, rect: &Rectangle) -> bool {
        match &self.split {
            None => self.candidates.iter().any(|(c, _)| c.intersects(rect)),
            Some(split) => split
                .quads
                .iter()
                .any(|quad| quad.rect.intersects(rect) && quad.any_intersection(rect)),
        }
    }

    pub(crate) fn quads(&self) -> Option<&[Node<V>; 4]> {
        self.split.as_ref().map(|split| &*split.quads)
    }

    pub(crate) fn candidate_rects(&self) -> impl Iterator<Item = &Rectangle> {
        self.candidates.iter().map(|(rect, _)| rect)
    }
}

impl<V: Clone> Node<V> {
    // Mapping semantics: a rectangle already present has its value replaced
    // rather than duplicated.
    fn put(&mut self, rect: Rectangle, value: V) {
        if let Some(entry) = self.candidates.iter_mut().find(|(c, _)| *c == rect) {
            entry.1 = value;
        } else {
            self.candidates.push((rect, value));
        }
    }

    /// Route one corner of `rect` into the subtree, splitting lazily when a
    /// leaf already remembers a different corner.
    fn insert(&mut self, p: Point, rect: Rectangle, value: V) {
        if !self.rect.contains(p) {
            // out of this node's area; corners of rectangles reaching past
            // the tree bounds are dropped here
            return;
        }

        if self.split.is_none() && self.corner.is_none() {
            self.put(rect, value);
            self.corner = Some((p, rect));
            return;
        }

        if let Some((held, _)) = self.corner {
            if held == p {
                // two disjoint rectangles cannot share a corner coordinate,
                // so a collision means the overlap gate was bypassed
                panic!("corner {} is already claimed by another rectangle", p);
            }
        }

        if self.split.is_none() {
            self.subdivide();
        }

        let split = self.split.as_mut().unwrap();
        let child = &mut split.quads[quadrant(split.at, p)];
        assert!(
            child.rect.contains(p),
            "point {} routed outside every quadrant of {}",
            p,
            self.rect
        );
        child.insert(p, rect, value);
    }

    // Bisect this node into four children and re-home its leaf state. Called
    // exactly once per node; a split node never reverts to a leaf.
    fn subdivide(&mut self) {
        let (corner, corner_rect) = self.corner.take().expect("only a leaf holding a corner splits");
        let candidates = std::mem::take(&mut self.candidates);

        let w1 = (self.rect.width() / 2) as i32;
        let h1 = (self.rect.height() / 2) as i32;
        let at = Point::new(
            (i64::from(self.rect.left()) + i64::from(w1)) as i32,
            (i64::from(self.rect.top()) - i64::from(h1)) as i32,
        );
        let (left, right) = (self.rect.left(), self.rect.right());
        let (top, bottom) = (self.rect.top(), self.rect.bottom());

        // The children reuse this node's own edges, so the two halves of
        // each axis sum back to the full extent, odd sizes included.
        let mut quads = Box::new([
            Node::leaf(Rectangle::new(left, top, at.x, at.y)),
            Node::leaf(Rectangle::new(at.x, top, right, at.y)),
            Node::leaf(Rectangle::new(left, at.y, at.x, bottom)),
            Node::leaf(Rectangle::new(at.x, at.y, right, bottom)),
        ]);

        // The corner that forced the split moves into its single quadrant.
        let value = candidates
            .iter()
            .find(|(c, _)| *c == corner_rect)
            .map(|(_, v)| v.clone())
            .expect("a remembered corner always has a matching candidate");
        let child = &mut quads[quadrant(at, corner)];
        assert!(
            child.rect.contains(corner),
            "corner {} routed outside every quadrant of {}",
            corner,
            self.rect
        );
        child.insert(corner, corner_rect, value);

        // Every other candidate goes to every child its area overlaps; a
        // rectangle straddling a split line ends up in several children.
        for (candidate, value) in candidates {
            for quad in quads.iter_mut() {
                if quad.rect.intersects(&candidate) {
                    quad.put(candidate, value.clone());
                    quad.occupied = true;
                }
            }
        }

        self.split = Some(Split { at, quads });
    }

    /// Push `rect` into every leaf whose area it overlaps. Corner routing
    /// only reaches leaves holding an actual corner; a leaf buried strictly
    /// inside a large rectangle picks its value up here.
    fn assign(&mut self, rect: &Rectangle, value: &V) {
        if !self.rect.intersects(rect) {
            return;
        }
        match &mut self.split {
            None => {
                self.put(*rect, value.clone());
                self.occupied = true;
            }
            Some(split) => {
                for quad in split.quads.iter_mut() {
                    quad.assign(rect, value);
                }
            }
        }
    }
}

/// Maps disjoint rectangles to values and resolves points to the rectangle
/// covering them.
///
/// Lookups cost one comparison per axis per level of the tree; insertions
/// pay for that with up to four corner descents plus an area sweep.
#[derive(Debug, Clone)]
pub struct QuadTree<V> {
    root: Node<V>,
}

impl<V> Default for QuadTree<V> {
    /// A tree covering the entire representable coordinate range.
    fn default() -> Self {
        Self {
            root: Node::leaf(Rectangle::new(i32::MIN, i32::MAX, i32::MAX, i32::MIN)),
        }
    }
}

impl<V> QuadTree<V> {
    /// A tree covering `[-half_extent, half_extent]` on both axes.
    pub fn new(half_extent: i32) -> Self {
        assert!(half_extent > 0, "the tree needs a positive extent");
        Self {
            root: Node::leaf(Rectangle::new(
                -half_extent,
                half_extent,
                half_extent,
                -half_extent,
            )),
        }
    }

    /// The value of the rectangle containing `p`, if any.
    ///
    /// Iterative descent: two comparisons against the stored split point
    /// pick the quadrant at every level, then the reached leaf's few
    /// candidates are scanned linearly.
    pub fn find(&self, p: Point) -> Option<&V> {
        let mut node = &self.root;
        while let Some(split) = &node.split {
            if !node.rect.contains(p) {
                return None;
            }
            node = &split.quads[quadrant(split.at, p)];
        }

        node.candidates
            .iter()
            .find(|(rect, _)| rect.contains(p))
            .map(|(_, value)| value)
    }

    /// Removing a rectangle would require re-merging split children, which
    /// the tree does not implement.
    pub fn delete(&mut self, _rect: Rectangle) -> Result<(), Error> {
        Err(Error::DeleteUnsupported)
    }

    pub(crate) fn root(&self) -> &Node<V> {
        &self.root
    }
}

impl<V: Clone> QuadTree<V> {
    /// Claim `rect` for `value`.
    ///
    /// Fails with [`Error::Overlap`], leaving the tree untouched, when any
    /// accepted rectangle intersects `rect`. Corners reaching outside the
    /// tree bounds are tolerated; the covered area is clipped to the tree.
    pub fn insert(&mut self, rect: Rectangle, value: V) -> Result<(), Error> {
        if self.root.any_intersection(&rect) {
            return Err(Error::Overlap(rect));
        }

        // place every distinct corner; degenerate rectangles repeat corners
        let corners = rect.points();
        for (i, p) in corners.iter().enumerate() {
            if corners[..i].contains(p) {
                continue;
            }
            self.root.insert(*p, rect, value.clone());
        }

        self.root.assign(&rect, &value);
        Ok(())
    }
}
