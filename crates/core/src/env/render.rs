//! Fixed-width ASCII dump of the live episode grid.

use crate::state::Grid;
use crate::types::Pos;

pub(super) fn render_ascii(grid: &Grid, agent: Pos) -> String {
    let border = "-".repeat(grid.width + 2);
    let mut lines = Vec::with_capacity(grid.height + 2);
    lines.push(border.clone());

    for y in 0..grid.height {
        let mut line = String::with_capacity(grid.width + 2);
        line.push('|');
        for x in 0..grid.width {
            let pos = Pos { y: y as i32, x: x as i32 };
            if pos == agent {
                line.push('A');
            } else {
                line.push(grid.tile_at(pos).glyph());
            }
        }
        line.push('|');
        lines.push(line);
    }

    lines.push(border);
    lines.join("\n")
}
