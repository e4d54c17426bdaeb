use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::common::error::Result;
use crate::common::types::Distribution;
use crate::pipeline::dashboard::DashboardView;

/// Persisted form of a view
#[derive(Debug, Serialize)]
pub struct ViewSnapshot<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub view: &'a DashboardView,
}

/// View name reduced to characters safe in a single path component
fn file_stem(view: &str) -> String {
    let stem: String = view
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "view".to_string()
    } else {
        stem
    }
}

/// Write the view to `<output_dir>/<view>_<timestamp>.json`, returning the path
pub fn persist_to_json(view: &DashboardView, output_dir: impl AsRef<Path>) -> Result<String> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let generated_at = Utc::now();
    let filename = format!("{}_{}.json", file_stem(&view.view), generated_at.format("%Y%m%d_%H%M%S"));
    let filepath = output_dir.join(filename);

    let json_content = serde_json::to_string_pretty(&ViewSnapshot { generated_at, view })?;
    fs::write(&filepath, json_content)?;

    Ok(filepath.to_string_lossy().to_string())
}

fn format_distribution(out: &mut String, title: &str, dist: &Distribution) {
    if dist.is_empty() {
        return;
    }
    let pairs: Vec<String> = dist
        .labels
        .iter()
        .zip(&dist.data)
        .map(|(label, count)| format!("{label} ({count})"))
        .collect();
    let _ = writeln!(out, "   {title}: {}", pairs.join(", "));
}

/// Plain-text summary of a view for the terminal
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n📊 {}", view.view);
    let _ = writeln!(
        out,
        "   Records: {} ({} skipped, {} matching filters)",
        view.total_records, view.skipped_records, view.matching_records
    );
    let _ = writeln!(out, "   Sorted by {} {:?}", view.sort.field, view.sort.direction);

    if view.top_records.is_empty() {
        let _ = writeln!(out, "   No records to show");
    }
    for (rank, record) in view.top_records.iter().enumerate() {
        let year = record.release_year.map_or_else(|| "-".to_string(), |y| y.to_string());
        let rating = record.rating.map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
        let _ = writeln!(
            out,
            "   {}. {} ({}) [{}] rating {} | nominations {} | wins {}",
            rank + 1,
            record.display_name,
            year,
            record.media_type,
            rating,
            record.award_nominations,
            record.award_wins
        );
    }

    format_distribution(&mut out, "Media types", &view.media_types);
    format_distribution(&mut out, "Languages", &view.languages);
    format_distribution(&mut out, "Countries", &view.countries);
    format_distribution(&mut out, "Genres", &view.genres);

    if view.awards_by_year.nominations.iter().any(|n| *n > 0) {
        let years: Vec<String> = view
            .awards_by_year
            .labels
            .iter()
            .zip(view.awards_by_year.nominations.iter().zip(&view.awards_by_year.wins))
            .map(|(year, (n, w))| format!("{year}: {n}/{w}"))
            .collect();
        let _ = writeln!(out, "   Nominations/wins by year: {}", years.join(", "));
    }
    if !view.rating_by_year.labels.is_empty() {
        let years: Vec<String> = view
            .rating_by_year
            .labels
            .iter()
            .zip(&view.rating_by_year.display)
            .map(|(year, avg)| format!("{year}: {avg}"))
            .collect();
        let _ = writeln!(out, "   Average rating by year: {}", years.join(", "));
    }
    out
}
