//! Rendering recommendations for display.

use crate::orchestrator::Recommendation;
use anyhow::Result;

const HEADERS: [&str; 3] = ["Movie Title", "Year", "IMDb Rating"];

/// Columned text table, one recommendation per line
pub fn render_table(recommendations: &[Recommendation]) -> String {
    let cells: Vec<[String; 3]> = recommendations
        .iter()
        .map(|r| {
            [
                r.movie_title.clone(),
                r.year.to_string(),
                format!("{:.1}", r.imdb_rating),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, row: &[String; 3], widths: &[usize; 3]) {
    let title = pad(&row[0], widths[0]);
    let year = format!("{:>width$}", row[1], width = widths[1]);
    let rating = format!("{:>width$}", row[2], width = widths[2]);
    let line = format!("{} | {} | {}", title, year, rating);
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Left-align by character count, not byte length
fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

/// JSON array of `{"Movie Title", "Year", "IMDb Rating"}` objects
pub fn render_json(recommendations: &[Recommendation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(recommendations)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Recommendation> {
        vec![
            Recommendation {
                movie_title: "The Shawshank Redemption".to_string(),
                year: 1994,
                imdb_rating: 9.3,
            },
            Recommendation {
                movie_title: "Amélie".to_string(),
                year: 2001,
                imdb_rating: 8.3,
            },
        ]
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&sample());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Movie Title"));
        assert!(lines[0].ends_with("IMDb Rating"));
        assert!(lines[2].starts_with("The Shawshank Redemption | 1994 |"));
        assert!(lines[3].starts_with("Amélie                   | 2001 |"));
        assert!(lines[3].ends_with("8.3"));
    }

    #[test]
    fn test_render_empty_table_keeps_header() {
        let table = render_table(&[]);
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn test_render_json_field_names() {
        let json = render_json(&sample()[..1]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["Movie Title"], "The Shawshank Redemption");
        assert_eq!(value[0]["Year"], 1994);
        assert_eq!(value[0]["IMDb Rating"], 9.3);
    }
}
