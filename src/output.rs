//! CLI output formatting for every command.
//!
//! Each command has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper that writes them. Reports go to stdout; warnings
//! and staleness go to stderr so scripts can tell them apart.
//!
//! ## Generate
//!
//! ```text
//! Generated 3 files:
//!     docs/overview.md
//!     docs/manifest.md
//!     docs/extensions.md
//!
//! Warnings (1):
//!     extensions.md: section "9. Future Work" not found in spec
//! ```
//!
//! ## Check
//!
//! ```text
//! Spec pages are stale. Regenerate with: spec-pages generate
//!
//! Stale files:
//!     manifest.md
//!     lazy-loading.md (missing from committed output)
//! ```
//!
//! ## Outline
//!
//! ```text
//! 001 1. Introduction
//!     1.1
//! 002 2. Manifest
//!     2.1
//!     2.2
//! ```

use crate::document::{Document, split_subsections};
use crate::freshness::FreshnessReport;
use crate::generate::GenerateReport;
use crate::project::Diagnostic;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Warning block shared by generate and check. Empty when there is nothing to say.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> Vec<String> {
    if diagnostics.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!("Warnings ({}):", diagnostics.len())];
    lines.extend(diagnostics.iter().map(|d| format!("{}{}", indent(1), d)));
    lines
}

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec![format!("Generated {} files:", report.written.len())];
    for path in &report.written {
        lines.push(format!("{}{}", indent(1), path.display()));
    }
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
    print_diagnostics(&report.diagnostics);
}

pub fn format_check_output(report: &FreshnessReport) -> Vec<String> {
    if report.is_fresh() {
        return vec![format!(
            "All {} spec pages in {} are up to date.",
            report.checked.len(),
            report.committed_dir.display()
        )];
    }
    let mut lines = vec![
        "Spec pages are stale. Regenerate with: spec-pages generate".to_string(),
        String::new(),
        "Stale files:".to_string(),
    ];
    lines.extend(report.stale.iter().map(|s| format!("{}{}", indent(1), s)));
    lines
}

pub fn print_check_output(report: &FreshnessReport) {
    let lines = format_check_output(report);
    if report.is_fresh() {
        lines.iter().for_each(|l| println!("{}", l));
    } else {
        lines.iter().for_each(|l| eprintln!("{}", l));
    }
    print_diagnostics(&report.diagnostics);
}

/// Sections in document order, each followed by its subsection prefixes.
///
/// Meant for writing page mappings: the lines show exactly the titles and
/// prefixes the mapping has to name.
pub fn format_outline(doc: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, section) in doc.sections().iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), section.title));
        let split = split_subsections(&section.body, doc.level() + 1);
        for sub in &split.subsections {
            lines.push(format!("{}{}", indent(1), sub.prefix()));
        }
    }
    lines
}

pub fn print_outline(doc: &Document) {
    for line in format_outline(doc) {
        println!("{}", line);
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    let lines = format_diagnostics(diagnostics);
    if lines.is_empty() {
        return;
    }
    eprintln!();
    for line in lines {
        eprintln!("{}", line);
    }
}
