//! Terminal presentation: title lists, ranked results, and the interactive
//! select loop.

use std::io::{self, BufRead, Write};

use crate::context::RecommenderContext;
use crate::error::RecommenderError;
use crate::index::NeighborIndex;
use crate::recommend::{Recommendations, Recommender};

/// Write every title, numbered from 1, in catalog order.
pub fn write_titles<I: NeighborIndex, W: Write>(
    ctx: &RecommenderContext<I>,
    out: &mut W,
) -> io::Result<()> {
    for (i, title) in ctx.catalog().titles().enumerate() {
        writeln!(out, "{:>4}. {}", i + 1, title)?;
    }
    Ok(())
}

/// Write a ranked recommendation list.
pub fn write_recommendations<W: Write>(recs: &Recommendations, out: &mut W) -> io::Result<()> {
    if recs.is_empty() {
        writeln!(out, "No other movies to recommend for {}", recs.query_title)?;
        return Ok(());
    }
    writeln!(out, "Recommended movies for {}:", recs.query_title)?;
    for item in &recs.items {
        writeln!(
            out,
            "{}. {} (distance: {:.4})",
            item.rank, item.title, item.distance
        )?;
    }
    Ok(())
}

/// Write a failed request as a single error line.
pub fn write_error<W: Write>(err: &RecommenderError, out: &mut W) -> io::Result<()> {
    writeln!(out, "Error: {}", err)
}

enum Selection {
    Quit,
    List,
    Empty,
    Row(usize),
    Invalid(String),
}

fn parse_selection(line: &str, len: usize) -> Selection {
    let line = line.trim();
    match line {
        "q" | "quit" | "exit" => Selection::Quit,
        "l" | "list" => Selection::List,
        "" => Selection::Empty,
        _ => match line.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => Selection::Row(n - 1),
            _ => Selection::Invalid(format!(
                "Choice must be a number between 1 and {}",
                len
            )),
        },
    }
}

/// Run the interactive select loop until `q` or end of input.
///
/// The user picks a movie by its number in the list, which keeps the choice
/// bounded to known titles. The chosen title is resolved like any other title
/// lookup, so a repeated title always answers for its first occurrence.
/// Failed requests print one error line and the loop continues.
pub fn run_interactive<I, R, W>(
    ctx: &RecommenderContext<I>,
    k: usize,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    I: NeighborIndex,
    R: BufRead,
    W: Write,
{
    let recommender = Recommender::new(ctx);

    writeln!(out, "Select a movie:")?;
    write_titles(ctx, out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "movie number (l to list, q to quit)> ")?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match parse_selection(&line, ctx.len()) {
            Selection::Quit => break,
            Selection::List => write_titles(ctx, out)?,
            Selection::Empty => writeln!(out, "Please select a movie first.")?,
            Selection::Invalid(msg) => writeln!(out, "{}", msg)?,
            Selection::Row(row) => match ctx
                .catalog()
                .title(row)
                .and_then(|title| recommender.recommend_title(title, k))
            {
                Ok(recs) => write_recommendations(&recs, out)?,
                Err(e) => {
                    tracing::warn!(row, error = %e, "recommendation failed");
                    write_error(&e, out)?
                }
            },
        }
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::distance::DistanceMetric;
    use crate::features::FeatureStore;
    use crate::flat_index::FlatIndex;
    use crate::vector::Vector;
    use std::io::Cursor;

    fn ctx() -> RecommenderContext<FlatIndex> {
        let rows: Vec<Vector> = [0.0, 1.0, 3.0]
            .iter()
            .map(|&x| Vector::new(vec![x]))
            .collect();
        RecommenderContext::new(
            Catalog::from_titles(["Alien", "Aliens", "Heat"]),
            FeatureStore::from_rows(&rows).unwrap(),
            FlatIndex::fit(DistanceMetric::Euclidean, false, &rows).unwrap(),
        )
        .unwrap()
    }

    fn run(input: &str) -> String {
        let mut out = Vec::new();
        run_interactive(&ctx(), 2, Cursor::new(input), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_selection_prints_recommendations() {
        let out = run("1\nq\n");
        assert!(out.contains("   1. Alien"));
        assert!(out.contains("Recommended movies for Alien:"));
        assert!(out.contains("1. Aliens (distance: 1.0000)"));
        assert!(out.contains("2. Heat (distance: 3.0000)"));
    }

    #[test]
    fn test_invalid_selection_keeps_looping() {
        let out = run("9\n\nabc\n3\n");
        assert!(out.contains("Choice must be a number between 1 and 3"));
        assert!(out.contains("Please select a movie first."));
        assert!(out.contains("Recommended movies for Heat:"));
    }

    #[test]
    fn test_eof_ends_loop() {
        let out = run("");
        assert!(out.contains("Select a movie:"));
        assert!(!out.contains("Recommended"));
    }

    #[test]
    fn test_repeated_title_selection_resolves_by_title() {
        let rows: Vec<Vector> = [0.0, 1.0, 10.0, 12.0]
            .iter()
            .map(|&x| Vector::new(vec![x]))
            .collect();
        let ctx = RecommenderContext::new(
            Catalog::from_titles(["Solaris", "Near0", "Solaris", "Near2"]),
            FeatureStore::from_rows(&rows).unwrap(),
            FlatIndex::fit(DistanceMetric::Euclidean, false, &rows).unwrap(),
        )
        .unwrap();

        let mut out = Vec::new();
        run_interactive(&ctx, 1, Cursor::new("3\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Recommended movies for Solaris:"));
        assert!(out.contains("1. Near0 (distance: 1.0000)"));
        assert!(!out.contains("Near2 (distance"));
    }

    #[test]
    fn test_error_line_for_bad_count() {
        let mut out = Vec::new();
        run_interactive(&ctx(), 0, Cursor::new("1\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Error: Invalid recommendation count: 0"));
    }
}
