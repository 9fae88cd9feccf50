// Colored terminal output for analysis reports.
//
// main.rs delegates here for everything the `analyze` command prints.

use colored::Colorize;

use crate::analysis::AnalysisReport;

/// Print the whole report: keywords, similarity, then gaps.
pub fn display_report(report: &AnalysisReport, labels: &[String]) {
    display_top_keywords(report, labels);
    display_similarity(report);
    display_gaps(report);
}

fn label(labels: &[String], index: usize) -> String {
    labels
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("Text {index}"))
}

/// Ranked keyword table per document.
pub fn display_top_keywords(report: &AnalysisReport, labels: &[String]) {
    println!(
        "\n{}",
        format!(
            "=== Top Keywords ({} texts, {} distinct terms) ===",
            report.document_count(),
            report.vocab_size
        )
        .bold()
    );

    for (i, keywords) in report.top_keywords.iter().enumerate() {
        println!(
            "\n  {} {}",
            format!("T{i}").bold(),
            format!("{} ({} terms)", label(labels, i), keywords.len()).dimmed()
        );
        if keywords.is_empty() {
            println!("      {}", "no keywords".dimmed());
            continue;
        }
        for (rank, kw) in keywords.iter().enumerate() {
            println!("    {:>3}. {:<28} {:.4}", rank + 1, kw.term, kw.score);
        }
    }
}

/// Pairwise similarity matrix, colored by strength.
pub fn display_similarity(report: &AnalysisReport) {
    println!("\n{}", "=== Cosine Similarity ===".bold());
    let n = report.similarity.size();

    let mut header = String::from("        ");
    for j in 0..n {
        header.push_str(&format!("{:>8}", format!("T{j}")));
    }
    println!("{}", header.dimmed());

    for i in 0..n {
        print!("  {:>4}  ", format!("T{i}").dimmed());
        for j in 0..n {
            let value = report.similarity.get(i, j);
            let cell = format!("{value:>8.3}");
            let colored_cell = if i == j {
                cell.dimmed()
            } else if value >= 0.5 {
                cell.bright_green()
            } else if value >= 0.2 {
                cell.bright_yellow()
            } else {
                cell.normal()
            };
            print!("{colored_cell}");
        }
        println!();
    }
}

/// Terms the base text emphasizes more than each other text.
pub fn display_gaps(report: &AnalysisReport) {
    println!("\n{}", "=== Keyword Gaps ===".bold());

    if report.gaps.is_empty() {
        println!(
            "  {}",
            "No gap suggestions. Add more texts or adjust thresholds.".dimmed()
        );
        return;
    }

    for comparison in &report.gaps {
        println!(
            "\n  Stronger in T{} vs T{}",
            report.gap_base, comparison.vs
        );
        if comparison.items.is_empty() {
            println!("      {}", "no terms above the threshold".dimmed());
            continue;
        }
        for item in &comparison.items {
            println!(
                "    {:<28} {} {:.4}  {}",
                item.term,
                "Δ".bright_red(),
                item.delta,
                format!("(base {:.4} vs {:.4})", item.base_score, item.other_score).dimmed()
            );
        }
    }
}
