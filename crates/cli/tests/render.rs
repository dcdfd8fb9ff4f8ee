use cli::launch::opener_command;
use cli::render::{list_line, render_detail, render_grid, render_list};
use std::path::Path;
use storage::MovieRecord;
use watchyo_core::grid::GridLayout;

fn movie(title: &str, year: &str) -> MovieRecord {
    MovieRecord {
        title: title.to_string(),
        overview: format!("{title} overview."),
        year: year.to_string(),
        poster_path: None,
        file_path: format!("/videos/{title}.mkv"),
    }
}

#[test]
fn empty_library_renders_no_cells() {
    assert_eq!(render_grid(&[], GridLayout::default(), 20), "");
    assert_eq!(render_list(&[]), "");
}

#[test]
fn grid_wraps_after_configured_columns() {
    let library: Vec<MovieRecord> = (1..=7)
        .map(|i| movie(&format!("Film {i}"), &format!("200{i}")))
        .collect();
    let out = render_grid(&library, GridLayout::new(5), 12);
    let lines: Vec<&str> = out.lines().collect();

    // Two text lines per row, a blank line between rows.
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("1. Film 1"));
    assert!(lines[0].contains("5. Film 5"));
    assert!(!lines[0].contains("6. Film 6"));
    assert!(lines[1].starts_with("(2001)"));
    assert_eq!(lines[2], "");
    assert!(lines[3].starts_with("6. Film 6"));
    assert!(lines[3].contains("7. Film 7"));
    assert!(lines[4].ends_with("(2007)"));
}

#[test]
fn long_titles_are_truncated_to_cell_width() {
    let library = vec![movie("The Lord of the Rings: The Fellowship of the Ring", "2001")];
    let out = render_grid(&library, GridLayout::default(), 16);
    let first = out.lines().next().unwrap();
    assert_eq!(first.chars().count(), 16);
    assert!(first.ends_with('…'));
}

#[test]
fn list_numbers_from_one() {
    assert_eq!(list_line(0, &movie("Heat", "1995")), "  1. Heat (1995)");
    let out = render_list(&[movie("Heat", "1995"), movie("Alien", "1979")]);
    assert_eq!(out, "  1. Heat (1995)\n  2. Alien (1979)\n");
}

#[test]
fn detail_shows_all_fields() {
    let mut m = movie("Heat", "1995");
    m.poster_path = Some("posters/heat.jpg".into());
    let out = render_detail(&m, Some(Path::new("/data/posters/heat.jpg")));
    assert!(out.starts_with("Heat (1995)\n===========\n"));
    assert!(out.contains("Heat overview."));
    assert!(out.contains("Poster: /data/posters/heat.jpg"));
    assert!(out.contains("File:   /videos/Heat.mkv"));
}

#[test]
fn detail_without_poster_or_overview() {
    let mut m = movie("Alien", "unknown");
    m.overview = String::new();
    let out = render_detail(&m, None);
    assert!(out.contains("(no overview)"));
    assert!(out.contains("Poster: none"));
}

#[test]
fn opener_passes_the_path() {
    let cmd = opener_command(Path::new("/videos/Heat.mkv"));
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args.last().map(String::as_str), Some("/videos/Heat.mkv"));
}
