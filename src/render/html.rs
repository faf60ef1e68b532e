use crate::color::colorize::ColorizedImage;
use std::fmt::Write as _;

/// Render the grid as an HTML `<table>` with one colored `<td>` per cell.
///
/// Values are printed with `decimals` fractional digits; missing cells are left blank.
pub fn render_html_table(img: &ColorizedImage, decimals: usize) -> String {
    let mut out = String::with_capacity(img.cells().len() * 96);
    out.push_str("<table class=\"thermal\" style=\"border-collapse: collapse;\">\n");
    for row in img.iter_rows() {
        out.push_str("<tr>");
        for cell in row {
            let text = if cell.t.is_some() {
                format!("{:.*}", decimals, cell.value)
            } else {
                String::new()
            };
            let _ = write!(
                out,
                "<td style=\"background-color: {}; color: {}; text-align: center;\">{}</td>",
                cell.rgb.to_hex(),
                text_color(cell.rgb.to_array()),
                escape(&text)
            );
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

/// Wrap a table in a minimal standalone page.
pub fn render_html_page(title: &str, table: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n<h1>{}</h1>\n{}</body>\n</html>\n",
        escape(title),
        escape(title),
        table
    )
}

fn text_color([r, g, b]: [u8; 3]) -> &'static str {
    let luma = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    if luma < 110.0 { "white" } else { "black" }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
