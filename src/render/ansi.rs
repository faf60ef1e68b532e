use crate::color::colorize::ColorizedImage;
use std::fmt::Write as _;

/// Render the grid as 24-bit ANSI background blocks, two spaces per cell.
pub fn render_ansi(img: &ColorizedImage) -> String {
    let mut out = String::new();
    for row in img.iter_rows() {
        for cell in row {
            let [r, g, b] = cell.rgb.to_array();
            let _ = write!(out, "\x1b[48;2;{r};{g};{b}m  ");
        }
        out.push_str("\x1b[0m\n");
    }
    out
}
