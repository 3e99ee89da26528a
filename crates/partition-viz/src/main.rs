//! Interactive 2D partition viewer.
//!
//! Renders a live BSP partition of the plane: each leaf cell gets a stable
//! hashed color, cut segments are drawn on top.
//!
//! Controls: space inserts a random cut, T rotates the whole partition,
//! R resets.

use std::hash::{Hash, Hasher};

use macroquad::prelude::*;
use nalgebra::{Point2, Vector2};
use partition_tree::{AffineTransform2D, BspTree, Line2D, LineInterval, NodeId};

/// Half-extent of the world region shown on screen.
const VIEW: f32 = 10.0;

/// Edge length in pixels of the sampling blocks used to paint cells.
const BLOCK: f32 = 6.0;

/// Generates a deterministic color from a node id using hashing.
/// This keeps each cell's color stable across frames.
fn cell_color(id: NodeId) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let r = ((hash >> 16) & 0xFF) as u8;
    let g = ((hash >> 8) & 0xFF) as u8;
    let b = (hash & 0xFF) as u8;

    // keep cells readable against the dark background
    Color::from_rgba(r.max(40), g.max(40), b.max(40), 255)
}

fn scale() -> f32 {
    screen_width().min(screen_height()) / (2.0 * VIEW)
}

fn world_to_screen(p: Point2<f32>) -> (f32, f32) {
    (
        screen_width() / 2.0 + p.x * scale(),
        screen_height() / 2.0 - p.y * scale(),
    )
}

fn screen_to_world(x: f32, y: f32) -> Point2<f32> {
    Point2::new(
        (x - screen_width() / 2.0) / scale(),
        (screen_height() / 2.0 - y) / scale(),
    )
}

/// A full-line cut through a random point at a random angle.
fn random_cut() -> LineInterval {
    use macroquad::rand::gen_range;

    let a = Point2::new(gen_range(-VIEW, VIEW), gen_range(-VIEW, VIEW));
    let angle = gen_range(0.0, std::f32::consts::TAU);
    let b = a + Vector2::new(angle.cos(), angle.sin());
    LineInterval::span(Line2D::from_points(a, b))
}

/// Paints every leaf cell by sampling the partition on a coarse grid.
fn draw_cells(tree: &BspTree<LineInterval>) {
    let mut y = 0.0;
    while y < screen_height() {
        let mut x = 0.0;
        while x < screen_width() {
            let probe = screen_to_world(x + BLOCK / 2.0, y + BLOCK / 2.0);
            draw_rectangle(x, y, BLOCK, BLOCK, cell_color(tree.find(&probe).id()));
            x += BLOCK;
        }
        y += BLOCK;
    }
}

/// Draws every cut, clamped to the visible region.
fn draw_cuts(tree: &BspTree<LineInterval>) {
    let reach = 2.0 * VIEW;
    for node in tree.nodes() {
        if let Some(cut) = node.cut() {
            let lo = cut.lo().max(-reach);
            let hi = cut.hi().min(reach);
            let (x0, y0) = world_to_screen(cut.line().point_at(lo));
            let (x1, y1) = world_to_screen(cut.line().point_at(hi));
            draw_line(x0, y0, x1, y1, 2.0, WHITE);
        }
    }
}

#[macroquad::main("Partition Viewer")]
async fn main() {
    let mut tree: BspTree<LineInterval> = BspTree::new();

    loop {
        if is_key_pressed(KeyCode::Space) {
            tree.insert(random_cut());
        }
        if is_key_pressed(KeyCode::T) {
            tree.transform(&AffineTransform2D::rotation(0.2));
        }
        if is_key_pressed(KeyCode::R) {
            tree = BspTree::new();
        }

        clear_background(BLACK);
        draw_cells(&tree);
        draw_cuts(&tree);

        draw_text(
            &format!(
                "nodes: {}  height: {}  version: {}",
                tree.count(),
                tree.height(),
                tree.version()
            ),
            20.0,
            30.0,
            24.0,
            WHITE,
        );
        draw_text(
            "space: random cut   t: rotate   r: reset",
            20.0,
            56.0,
            20.0,
            GRAY,
        );

        next_frame().await
    }
}
