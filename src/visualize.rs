//! Raster debug rendering of a tree: node boundaries, depth shading and the
//! rectangles claimed so far. Intended for small bounded trees.

use crate::quadtree::{Node, QuadTree};
use crate::Rectangle;
use image::{ImageError, Rgba, RgbaImage};
use std::collections::HashSet;
use std::path::Path;

const AXIS: Rgba<u8> = Rgba([0x00, 0x00, 0xff, 0xff]);
const CANDIDATE: Rgba<u8> = Rgba([0xff, 0x00, 0x00, 0xff]);

// widest image producible on either axis, in pixels
const MAX_DIM: i64 = 1 << 14;

/// Rasterize the tree.
///
/// Every node's cell is filled with a grey that darkens with depth, cells
/// overlapped by an assigned rectangle are tinted yellow instead, node
/// borders darken the other way, the distinct candidate rectangles are
/// outlined in red and the center axes drawn in blue.
///
/// Panics when the covered area does not fit a raster image at `scale`
/// pixels per coordinate unit; trees over the full coordinate range cannot
/// be drawn.
pub fn draw_quadtree<V>(tree: &QuadTree<V>, scale: u32) -> RgbaImage {
    assert!(scale > 0, "the scale must be at least one pixel per unit");

    let root = tree.root();
    let width = root.rect.width() * i64::from(scale);
    let height = root.rect.height() * i64::from(scale);
    assert!(
        width > 0 && height > 0 && width <= MAX_DIM && height <= MAX_DIM,
        "{}x{} units cannot be rasterized at {} pixels per unit",
        root.rect.width(),
        root.rect.height(),
        scale
    );

    let mut canvas = Canvas {
        image: RgbaImage::new(width as u32, height as u32),
        left: i64::from(root.rect.left()),
        top: i64::from(root.rect.top()),
        scale: i64::from(scale),
    };

    let mut candidates = HashSet::new();
    draw_sector(root, &mut canvas, 0, &mut candidates);

    for y in 0..height {
        canvas.put(width / 2, y, AXIS);
    }
    for x in 0..width {
        canvas.put(x, height / 2, AXIS);
    }

    for rect in &candidates {
        canvas.outline(rect, CANDIDATE);
    }

    canvas.image
}

/// Render the tree and write it to `path`; the extension picks the format.
pub fn save_quadtree<V, P>(tree: &QuadTree<V>, scale: u32, path: P) -> Result<(), ImageError>
where
    P: AsRef<Path>,
{
    draw_quadtree(tree, scale).save(path)
}

fn draw_sector<V>(
    node: &Node<V>,
    canvas: &mut Canvas,
    depth: u32,
    candidates: &mut HashSet<Rectangle>,
) {
    let fade = (depth * 20).min(0xff) as u8;
    let shade = 0xff - fade;
    let fill = if node.occupied {
        Rgba([shade, shade, 0x00, 0xff])
    } else {
        Rgba([shade, shade, shade, 0xff])
    };
    canvas.fill(&node.rect, fill);
    canvas.outline(&node.rect, Rgba([fade, fade, fade, 0xff]));

    candidates.extend(node.candidate_rects().copied());

    if let Some(quads) = node.quads() {
        for quad in quads.iter() {
            draw_sector(quad, canvas, depth + 1, candidates);
        }
    }
}

struct Canvas {
    image: RgbaImage,
    left: i64,
    top: i64,
    scale: i64,
}

impl Canvas {
    // pixel position of a rectangle's top left corner
    fn origin(&self, rect: &Rectangle) -> (i64, i64) {
        (
            (i64::from(rect.left()) - self.left) * self.scale,
            (self.top - i64::from(rect.top())) * self.scale,
        )
    }

    fn fill(&mut self, rect: &Rectangle, color: Rgba<u8>) {
        let (x0, y0) = self.origin(rect);
        let w = rect.width() * self.scale;
        let h = rect.height() * self.scale;
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                self.put(x, y, color);
            }
        }
    }

    fn outline(&mut self, rect: &Rectangle, color: Rgba<u8>) {
        let (x0, y0) = self.origin(rect);
        let x1 = x0 + rect.width() * self.scale;
        let y1 = y0 + rect.height() * self.scale;
        for x in x0..=x1 {
            self.put(x, y0, color);
            self.put(x, y1, color);
        }
        for y in y0..=y1 {
            self.put(x0, y, color);
            self.put(x1, y, color);
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= i64::from(self.image.width()) || y >= i64::from(self.image.height())
        {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color);
    }
}
