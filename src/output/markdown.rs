// Markdown report — a shareable snapshot of one analysis.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::preview;
use crate::analysis::AnalysisReport;

/// Render `report` as markdown and write it to `path`, creating parent
/// directories as needed. Returns the path written.
pub fn generate_report(report: &AnalysisReport, labels: &[String], path: &str) -> Result<String> {
    let markdown = render(report, labels, Utc::now())?;

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
        }
    }
    fs::write(path, markdown).with_context(|| format!("Failed to write report to {path}"))?;

    Ok(path.to_string())
}

/// Build the markdown text for a report.
pub fn render(
    report: &AnalysisReport,
    labels: &[String],
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let mut md = String::new();
    render_into(&mut md, report, labels, generated_at).context("Failed to format report")?;
    Ok(md)
}

fn render_into(
    md: &mut String,
    report: &AnalysisReport,
    labels: &[String],
    generated_at: DateTime<Utc>,
) -> fmt::Result {
    let label = |i: usize| {
        labels
            .get(i)
            .map(|l| preview(l, 60))
            .unwrap_or_else(|| format!("Text {i}"))
    };

    writeln!(md, "# Keyword Gap Report\n")?;
    writeln!(md, "Generated: {}\n", generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(
        md,
        "{} texts, {} distinct terms. Gap base: T{}.\n",
        report.document_count(),
        report.vocab_size,
        report.gap_base
    )?;

    writeln!(md, "## Top keywords\n")?;
    for (i, keywords) in report.top_keywords.iter().enumerate() {
        writeln!(md, "### T{i}: {}\n", label(i))?;
        if keywords.is_empty() {
            writeln!(md, "_No keywords._\n")?;
            continue;
        }
        writeln!(md, "| # | Term | TF-IDF |")?;
        writeln!(md, "|---|------|--------|")?;
        for (rank, kw) in keywords.iter().enumerate() {
            writeln!(md, "| {} | {} | {:.4} |", rank + 1, kw.term, kw.score)?;
        }
        md.push('\n');
    }

    writeln!(md, "## Similarity\n")?;
    let n = report.similarity.size();
    let mut header = String::from("| |");
    let mut divider = String::from("|---|");
    for j in 0..n {
        write!(header, " T{j} |")?;
        divider.push_str("---|");
    }
    writeln!(md, "{header}\n{divider}")?;
    for i in 0..n {
        write!(md, "| **T{i}** |")?;
        for j in 0..n {
            write!(md, " {:.3} |", report.similarity.get(i, j))?;
        }
        md.push('\n');
    }
    md.push('\n');

    writeln!(md, "## Gaps\n")?;
    if report.gaps.is_empty() {
        writeln!(md, "_No other texts to compare against._")?;
    }
    for comparison in &report.gaps {
        writeln!(md, "### Stronger in T{} vs T{}\n", report.gap_base, comparison.vs)?;
        if comparison.items.is_empty() {
            writeln!(md, "_No terms above the threshold._\n")?;
            continue;
        }
        writeln!(md, "| Term | Δ | Base | Other |")?;
        writeln!(md, "|------|---|------|-------|")?;
        for item in &comparison.items {
            writeln!(
                md,
                "| {} | {:.4} | {:.4} | {:.4} |",
                item.term, item.delta, item.base_score, item.other_score
            )?;
        }
        md.push('\n');
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisService, AnalyzeRequest};
    use chrono::TimeZone;

    #[test]
    fn test_render_contains_every_section() {
        let service = AnalysisService::default();
        let report = service
            .analyze(&AnalyzeRequest::new([
                "fire safety training for warehouse staff",
                "office ergonomics guide",
            ]))
            .unwrap();
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let md = render(&report, &["base.txt".to_string()], at).unwrap();

        assert!(md.contains("Generated: 2026-01-02 03:04:05 UTC"));
        assert!(md.contains("### T0: base.txt"));
        assert!(md.contains("### T1: Text 1"));
        assert!(md.contains("| fire |"));
        assert!(md.contains("## Similarity"));
        assert!(md.contains("### Stronger in T0 vs T1"));
    }

    #[test]
    fn test_render_blank_and_single_texts() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let blank = AnalysisService::default()
            .analyze(&AnalyzeRequest::new(["", ""]))
            .unwrap();
        let md = render(&blank, &[], at).unwrap();
        assert!(md.contains("_No keywords._"));
        assert!(md.contains("_No terms above the threshold._"));
        assert!(md.contains("| **T1** | 0.000 | 0.000 |"));

        let single = AnalysisService::default()
            .analyze(&AnalyzeRequest::new(["alpha beta"]))
            .unwrap();
        let md = render(&single, &[], at).unwrap();
        assert!(md.contains("_No other texts to compare against._"));
    }

    #[test]
    fn test_generate_report_writes_file() {
        let report = AnalysisService::default()
            .analyze(&AnalyzeRequest::new(["alpha beta", "beta gamma"]))
            .unwrap();
        let dir = std::env::temp_dir().join(format!("keygap-report-{}", std::process::id()));
        let path = dir.join("nested").join("report.md");
        let path_str = path.to_string_lossy().to_string();

        let written = generate_report(&report, &[], &path_str).unwrap();
        assert_eq!(written, path_str);
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Keyword Gap Report"));

        let _ = fs::remove_dir_all(dir);
    }
}
