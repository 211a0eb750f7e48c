//! Checkerboard backing for surfaces that show translucent color
//! (opacity slider track, preview swatch).

use floem::context::PaintCx;
use floem::kurbo::Rect;
use floem::peniko::Color;
use floem_renderer::Renderer;

use crate::constants;

const BASE: Color = Color::rgb8(255, 255, 255);
const TILE: Color = Color::rgb8(204, 204, 204);

/// Paint alternating cells into `rect`, clipped to its bounds.
pub(crate) fn paint_checkerboard(cx: &mut PaintCx, rect: Rect) {
    cx.fill(&rect, BASE, 0.0);
    let cell = constants::CHECKER_CELL;
    let mut y = rect.y0;
    let mut row = 0usize;
    while y < rect.y1 {
        // Stagger odd rows by one cell.
        let mut x = rect.x0 + (row % 2) as f64 * cell;
        while x < rect.x1 {
            let tile = Rect::new(x, y, (x + cell).min(rect.x1), (y + cell).min(rect.y1));
            cx.fill(&tile, TILE, 0.0);
            x += 2.0 * cell;
        }
        y += cell;
        row += 1;
    }
}
