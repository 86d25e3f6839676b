//! Page rendering and emission.
//!
//! Runs the per-page pipeline and writes the results:
//!
//! ```text
//! spec text ─ strip footer ─ parse ─┬─ preamble (once)
//!                                   └─ per page: project ─ promote ─ rewrite links
//!                                                 ─ front matter ─ normalize ─ write
//! ```
//!
//! Rendering ([`render_site`]) is pure and returns every page plus all
//! diagnostics; writing ([`write_site`]) is the only step that touches disk.
//! Running both twice on the same input produces identical bytes.
//!
//! ## Output
//!
//! Each page is a markdown file with a front-matter block the site generator
//! reads:
//!
//! ```text
//! ---
//! title: "Manifest"
//! description: "Manifest fields and validation"
//! ---
//!
//! # 2. Manifest
//! ...
//! ```

use crate::config::{MappingConfig, PageSpec};
use crate::document::Document;
use crate::preamble::{Preamble, extract_preamble};
use crate::project::{Diagnostic, project_page};
use crate::transform::{normalize, promote_headings, rewrite_links, strip_footer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("cannot read specification {path}: {source}")]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One page, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// File name inside the output directory.
    pub output: String,
    /// Full normalized file content, front matter included.
    pub content: String,
}

/// Every page of a run plus the diagnostics collected along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSite {
    pub pages: Vec<RenderedPage>,
    pub diagnostics: Vec<Diagnostic>,
}

/// What a generation run did.
#[derive(Debug)]
pub struct GenerateReport {
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The YAML front-matter block for a page, without a trailing newline.
///
/// Title and description are copied verbatim; [`MappingConfig::validate`]
/// keeps out the characters that would break the quoted scalars.
pub fn front_matter(page: &PageSpec) -> String {
    format!(
        "---\ntitle: \"{}\"\ndescription: \"{}\"\n---",
        page.title, page.description
    )
}

/// Render one page from an already parsed document.
pub fn render_page(
    doc: &Document,
    preamble: &Preamble,
    page: &PageSpec,
    cross_references: &BTreeMap<String, String>,
) -> (RenderedPage, Vec<Diagnostic>) {
    let projection = project_page(doc, preamble, page);

    let mut body = projection.body;
    // The framing page is already at its final heading levels.
    if !page.keep_preamble {
        body = promote_headings(&body);
    }
    body = rewrite_links(&body, cross_references);

    let content = normalize(&format!("{}\n\n{}", front_matter(page), body));
    debug!(page = %page.output, bytes = content.len(), "rendered page");

    (
        RenderedPage {
            output: page.output.clone(),
            content,
        },
        projection.diagnostics,
    )
}

/// Render every page the mapping declares from the specification text.
pub fn render_site(spec_text: &str, config: &MappingConfig) -> RenderedSite {
    let doc = Document::parse(
        strip_footer(spec_text, &config.footer_marker),
        config.section_level,
    );
    let preamble = extract_preamble(&doc.preamble);

    let mut pages = Vec::with_capacity(config.pages.len());
    let mut diagnostics = Vec::new();
    for page in &config.pages {
        let (rendered, page_diagnostics) =
            render_page(&doc, &preamble, page, &config.cross_references);
        pages.push(rendered);
        diagnostics.extend(page_diagnostics);
    }

    RenderedSite { pages, diagnostics }
}

/// Write rendered pages into `out_dir`, creating it if needed.
///
/// Returns the paths written, in page order.
pub fn write_site(site: &RenderedSite, out_dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(site.pages.len());
    for page in &site.pages {
        let path = out_dir.join(&page.output);
        fs::write(&path, &page.content)?;
        written.push(path);
    }
    Ok(written)
}

/// Read the specification, render every page, and write them to `out_dir`.
pub fn generate(config: &MappingConfig, out_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let spec_text =
        fs::read_to_string(&config.source_spec).map_err(|source| GenerateError::ReadSource {
            path: config.source_spec.clone(),
            source,
        })?;

    let site = render_site(&spec_text, config);
    let written = write_site(&site, out_dir)?;
    info!(
        pages = written.len(),
        warnings = site.diagnostics.len(),
        out = %out_dir.display(),
        "generated spec pages"
    );

    Ok(GenerateReport {
        written,
        diagnostics: site.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn front_matter_quotes_title_and_description() {
        let mut spec = page("a.md", &[]);
        spec.title = "Archive Format".into();
        spec.description = "How archives are laid out".into();
        assert_eq!(
            front_matter(&spec),
            "---\ntitle: \"Archive Format\"\ndescription: \"How archives are laid out\"\n---"
        );
    }

    #[test]
    fn front_matter_copies_text_verbatim() {
        let mut spec = page("a.md", &[]);
        spec.title = "Hooks: pre-install & post-install".into();
        spec.description = "Colons, #hashes and 'single quotes' pass through".into();
        assert_eq!(
            front_matter(&spec),
            "---\ntitle: \"Hooks: pre-install & post-install\"\n\
             description: \"Colons, #hashes and 'single quotes' pass through\"\n---"
        );
    }

    #[test]
    fn renders_promoted_page_with_rewritten_links() {
        let (doc, preamble) = sample_document();
        let mut spec = page("introduction.md", &["1. Introduction"]);
        spec.title = "Introduction".into();
        spec.description = "Why ccpkg exists".into();
        let config = config_with(vec![]);

        let (rendered, diagnostics) =
            render_page(&doc, &preamble, &spec, &config.cross_references);
        assert!(diagnostics.is_empty());
        assert_eq!(
            rendered.content,
            "---\ntitle: \"Introduction\"\ndescription: \"Why ccpkg exists\"\n---\n\n\
             # 1. Introduction\n\n\
             The package format bundles components. See [manifest](/specification/manifest/) and [local](#local-only).\n\n\
             ## 1.1 Goals\n\n\
             - Portable archives.\n"
        );
    }

    #[test]
    fn framing_page_keeps_heading_levels() {
        let (doc, preamble) = sample_document();
        let mut spec = page("overview.md", &["1. Introduction"]);
        spec.keep_preamble = true;
        let config = config_with(vec![]);

        let (rendered, _) = render_page(&doc, &preamble, &spec, &config.cross_references);
        assert!(rendered.content.contains(
            "---\n\n# ccpkg Specification\n\n**Version 1.0.0-draft** | Status: Draft\n\n## 1. Introduction\n"
        ));
        assert!(rendered.content.contains("### 1.1 Goals"));
    }

    #[test]
    fn exclude_with_stub_page() {
        let (doc, preamble) = sample_document();
        let mut spec = page("manifest.md", &["2. Manifest"]);
        spec.subsection_filter = Some(exclude_filter(
            "2. Manifest",
            &["2.1"],
            &[("2.1", "See [Fields](/fields/).")],
        ));
        let config = config_with(vec![]);

        let (rendered, diagnostics) =
            render_page(&doc, &preamble, &spec, &config.cross_references);
        assert!(diagnostics.is_empty());
        assert!(rendered.content.contains(
            "## 2.1 Fields\n\n**Description:** The fields of the manifest.\nEach field is required.\n\nSee [Fields](/fields/).\n"
        ));
        assert!(!rendered.content.contains("Field table follows."));
        assert!(rendered.content.contains("## 2.2 Validation\n\n**Description:** Validation rules.\n\nRules are strict.\n"));
        // Heading inside the json fence is not promoted.
        assert!(rendered.content.contains("```json\n## Not a heading inside a fence\n```"));
    }

    #[test]
    fn footer_never_reaches_a_page() {
        let config = config_with(vec![page("ext.md", &["Appendix D. Extensions"])]);
        let site = render_site(SAMPLE_SPEC, &config);
        let content = &site.pages[0].content;
        assert!(!content.contains("CC-BY"));
        assert!(content.ends_with("Lazy body.\n"));
    }

    #[test]
    fn render_site_is_deterministic() {
        let config = config_with(vec![
            page("a.md", &["1. Introduction", "2. Manifest"]),
            page("b.md", &["Appendix D. Extensions"]),
        ]);
        assert_eq!(render_site(SAMPLE_SPEC, &config), render_site(SAMPLE_SPEC, &config));
    }

    #[test]
    fn render_site_collects_all_diagnostics() {
        let config = config_with(vec![
            page("a.md", &["Missing One"]),
            page("b.md", &["1. Introduction", "Missing Two"]),
        ]);
        let site = render_site(SAMPLE_SPEC, &config);
        assert_eq!(site.pages.len(), 2);
        let messages: Vec<String> = site.diagnostics.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "a.md: section \"Missing One\" not found in spec".to_string(),
                "b.md: section \"Missing Two\" not found in spec".to_string(),
            ]
        );
    }

    #[test]
    fn page_with_no_matching_sections_is_front_matter_only() {
        let config = config_with(vec![page("empty.md", &["Nothing"])]);
        let site = render_site(SAMPLE_SPEC, &config);
        assert_eq!(
            site.pages[0].content,
            "---\ntitle: \"empty\"\ndescription: \"\"\n---\n"
        );
    }

    #[test]
    fn write_site_creates_directory_and_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("nested/docs");
        let config = config_with(vec![page("a.md", &["1. Introduction"])]);
        let site = render_site(SAMPLE_SPEC, &config);

        let written = write_site(&site, &out).unwrap();
        assert_eq!(written, vec![out.join("a.md")]);
        assert_eq!(fs::read_to_string(out.join("a.md")).unwrap(), site.pages[0].content);
    }

    #[test]
    fn generate_reads_source_and_reports() {
        let tmp = TempDir::new().unwrap();
        let spec_path = tmp.path().join("spec.md");
        fs::write(&spec_path, SAMPLE_SPEC).unwrap();
        let mut config = config_with(vec![page("a.md", &["1. Introduction", "Gone"])]);
        config.source_spec = spec_path;

        let report = generate(&config, &tmp.path().join("out")).unwrap();
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn generate_missing_source_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_with(vec![page("a.md", &[])]);
        config.source_spec = tmp.path().join("absent.md");

        let err = generate(&config, tmp.path()).unwrap_err();
        assert!(matches!(err, GenerateError::ReadSource { .. }));
    }
}
