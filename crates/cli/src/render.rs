//! Text renderings of the library: list lines, the poster grid and the detail card.

use std::path::Path;
use storage::MovieRecord;
use watchyo_core::grid::GridLayout;

pub const DEFAULT_CELL_WIDTH: usize = 24;

/// Entries are numbered from 1 on screen.
pub fn list_line(index: usize, movie: &MovieRecord) -> String {
    format!("{:>3}. {} ({})", index + 1, movie.title, movie.year)
}

pub fn render_list(library: &[MovieRecord]) -> String {
    library
        .iter()
        .enumerate()
        .map(|(i, m)| list_line(i, m) + "\n")
        .collect()
}

/// Two text lines per cell (number and title, then year); rows separated by a blank line.
pub fn render_grid(library: &[MovieRecord], layout: GridLayout, cell_width: usize) -> String {
    let width = cell_width.max(4);
    let mut titles = vec![String::new(); layout.rows(library.len())];
    let mut years = titles.clone();
    for (i, movie) in library.iter().enumerate() {
        let (row, col) = layout.cell(i);
        if col > 0 {
            titles[row].push_str("  ");
            years[row].push_str("  ");
        }
        titles[row].push_str(&fit(&format!("{}. {}", i + 1, movie.title), width));
        years[row].push_str(&fit(&format!("({})", movie.year), width));
    }

    let mut out = String::new();
    for (row_no, (title_line, year_line)) in titles.iter().zip(&years).enumerate() {
        if row_no > 0 {
            out.push('\n');
        }
        out.push_str(title_line.trim_end());
        out.push('\n');
        out.push_str(year_line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_detail(movie: &MovieRecord, poster: Option<&Path>) -> String {
    let heading = format!("{} ({})", movie.title, movie.year);
    let overview = if movie.overview.trim().is_empty() {
        "(no overview)"
    } else {
        movie.overview.trim()
    };
    let poster = poster
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "{heading}\n{}\n{overview}\n\nPoster: {poster}\nFile:   {}\n",
        "=".repeat(heading.chars().count()),
        movie.file_path
    )
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    } else {
        format!("{text:<width$}")
    }
}
