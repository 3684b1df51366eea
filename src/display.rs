//! Terminal rendering of token listings
use std::io::{stdout, ErrorKind, Write};

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};

use crate::filtering::Page;
use crate::processing::ProcessedToken;
use crate::search::SearchResult;

/// A row that can be shown in a listing table
pub trait ListingRow {
    fn processed(&self) -> &ProcessedToken;

    /// Search relevancy, for listings produced by a search
    fn relevancy(&self) -> Option<f64> {
        None
    }
}

impl ListingRow for ProcessedToken {
    fn processed(&self) -> &ProcessedToken {
        self
    }
}

impl ListingRow for SearchResult {
    fn processed(&self) -> &ProcessedToken {
        &self.processed
    }

    fn relevancy(&self) -> Option<f64> {
        Some(self.search_relevancy)
    }
}

/// Compact number with K/M/B suffix
pub fn format_compact(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.2}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

/// Shorten long addresses to `head...tail`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn score_cell(processed: &ProcessedToken) -> Cell {
    if processed.legitimacy.is_degraded() {
        return Cell::new("n/a").fg(Color::DarkGrey);
    }
    let score = processed.legitimacy_score;
    let color = if score >= 60 {
        Color::Green
    } else if score >= 30 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{}%", score)).fg(color)
}

fn duplicate_cell(processed: &ProcessedToken) -> Cell {
    if !processed.has_duplicates {
        Cell::new("-")
    } else if processed.is_original {
        Cell::new(format!("original (+{})", processed.duplicate_count)).fg(Color::Green)
    } else {
        Cell::new(format!("copy of {}", processed.duplicate_count)).fg(Color::Red)
    }
}

/// Build a table for one page of a listing
pub fn listing_table<T: ListingRow>(rows: &[T]) -> Table {
    let with_relevancy = rows.iter().any(|row| row.relevancy().is_some());

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Symbol").add_attribute(Attribute::Bold),
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Address").add_attribute(Attribute::Bold),
        Cell::new("Volume 24h").add_attribute(Attribute::Bold),
        Cell::new("Trades").add_attribute(Attribute::Bold),
        Cell::new("Holders").add_attribute(Attribute::Bold),
        Cell::new("Legitimacy").add_attribute(Attribute::Bold),
        Cell::new("Duplicates").add_attribute(Attribute::Bold),
    ];
    if with_relevancy {
        header.push(Cell::new("Match").add_attribute(Attribute::Bold));
    }
    table.set_header(header);

    for row in rows {
        let processed = row.processed();
        let token = &processed.token;
        let mut cells = vec![
            Cell::new(token.display_symbol()),
            Cell::new(token.display_name()),
            Cell::new(short_address(&token.address)),
            Cell::new(format_compact(token.volume_24h)),
            Cell::new(format_compact(token.trades_24h)),
            Cell::new(format_compact(token.holders)),
            score_cell(processed),
            duplicate_cell(processed),
        ];
        if with_relevancy {
            let relevancy = row.relevancy().unwrap_or(0.0);
            cells.push(Cell::new(format!("{}", relevancy)));
        }
        table.add_row(cells);
    }

    table
}

/// One-line footer describing the page position
pub fn page_summary<T>(page: &Page<T>) -> String {
    format!(
        "Page {}/{} ({} tokens, {} per page)",
        page.page,
        page.total_pages.max(1),
        page.total,
        page.page_size
    )
}

/// Write to stdout, exiting quietly when the reader has gone away
pub fn print_stdout_safe(message: &str) {
    let mut handle = stdout();
    if let Err(e) = writeln!(handle, "{}", message) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
    let _ = handle.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::DuplicateInfo;
    use crate::scoring::LegitimacyOutcome;
    use crate::tokens::TokenRecord;

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(12_345.0), "12.3K");
        assert_eq!(format_compact(2_500_000.0), "2.50M");
        assert_eq!(format_compact(3_100_000_000.0), "3.10B");
        assert_eq!(format_compact(f64::NAN), "-");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(short_address("short"), "short");
        assert_eq!(
            short_address("So11111111111111111111111111111111111111112"),
            "So1111...1112"
        );
    }

    #[test]
    fn test_listing_table_rows() {
        let rows = vec![ProcessedToken::new(
            TokenRecord::new("addr").with_identity("Foo", "FOO"),
            LegitimacyOutcome::Scored(72),
            DuplicateInfo::unique(),
        )];
        let rendered = listing_table(&rows).to_string();
        assert!(rendered.contains("FOO"));
        assert!(rendered.contains("72%"));
        assert!(!rendered.contains("Match"));
    }

    #[test]
    fn test_page_summary() {
        let page = Page {
            items: vec![1, 2],
            page: 2,
            page_size: 2,
            total: 4,
            total_pages: 2,
        };
        assert_eq!(page_summary(&page), "Page 2/2 (4 tokens, 2 per page)");
    }
}
