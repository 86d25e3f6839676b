//! Page-mapping configuration.
//!
//! One file declares where the specification lives, where pages go, how
//! in-document anchors map to page paths, and which sections make up each
//! page. TOML is the native format; a `.json` file is also accepted and may
//! use the camelCase key spelling (`sourceSpec`, `keepPreamble`, ...).
//!
//! ```toml
//! source_spec = "spec/SPECIFICATION.md"
//! output_dir = "site/src/content/docs/specification"
//! section_level = 2
//!
//! [cross_references]
//! "#manifest" = "/specification/manifest/"
//!
//! [[pages]]
//! output = "overview.md"
//! title = "Overview"
//! description = "What the format is for"
//! sections = ["1. Introduction", "2. Terminology"]
//! keep_preamble = true
//!
//! [[pages]]
//! output = "lazy-loading.md"
//! title = "Lazy Loading"
//! description = "Deferred component loading"
//! sections = ["Appendix D. Extensions"]
//!
//! [pages.subsection_filter]
//! section = "Appendix D. Extensions"
//! include = ["D.4"]
//! ```
//!
//! Relative `source_spec` and `output_dir` paths resolve against the
//! directory holding the mapping file. Unknown keys are rejected to catch
//! typos early.

use crate::filter::SubsectionFilter;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// The whole page mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingConfig {
    /// The specification document to slice.
    #[serde(alias = "sourceSpec")]
    pub source_spec: PathBuf,
    /// Directory the generated pages are committed to.
    #[serde(alias = "outputDir")]
    pub output_dir: PathBuf,
    /// Heading level of top-level sections. Subsections are one deeper.
    #[serde(default = "default_section_level", alias = "sectionLevel")]
    pub section_level: usize,
    /// Start of the publication footer line to strip; empty disables it.
    #[serde(default = "default_footer_marker", alias = "footerMarker")]
    pub footer_marker: String,
    /// Anchor (`#name`) → path used from any generated page.
    #[serde(default, alias = "crossReferences")]
    pub cross_references: BTreeMap<String, String>,
    pub pages: Vec<PageSpec>,
}

fn default_section_level() -> usize {
    2
}

fn default_footer_marker() -> String {
    "*This specification is published".to_string()
}

/// One generated page.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageSpec {
    /// File name inside the output directory.
    pub output: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Section titles to pull, in page order.
    pub sections: Vec<String>,
    /// Keep the document title/version framing and original heading levels.
    #[serde(default, alias = "keepPreamble")]
    pub keep_preamble: bool,
    #[serde(default, alias = "subsectionFilter")]
    pub subsection_filter: Option<PageFilter>,
}

impl PageSpec {
    /// The filter that applies to `section`, if any.
    pub fn filter_for(&self, section: &str) -> Option<&SubsectionFilter> {
        self.subsection_filter
            .as_ref()
            .filter(|f| f.section == section)
            .map(|f| &f.mode)
    }
}

/// A subsection filter scoped to one section of a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPageFilter")]
pub struct PageFilter {
    pub section: String,
    pub mode: SubsectionFilter,
}

/// On-disk shape of a filter: two optional lists, of which exactly one
/// must be present.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPageFilter {
    section: String,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    #[serde(default, alias = "crossRef")]
    cross_ref: BTreeMap<String, String>,
}

impl TryFrom<RawPageFilter> for PageFilter {
    type Error = String;

    fn try_from(raw: RawPageFilter) -> Result<Self, Self::Error> {
        let mode = match (raw.include, raw.exclude) {
            // cross_ref only means something next to exclude; drop it here.
            (Some(prefixes), None) => SubsectionFilter::Include { prefixes },
            (None, Some(prefixes)) => SubsectionFilter::Exclude {
                prefixes,
                stubs: raw.cross_ref,
            },
            (Some(_), Some(_)) => {
                return Err(format!(
                    "subsection filter for \"{}\" sets both include and exclude",
                    raw.section
                ));
            }
            (None, None) => {
                return Err(format!(
                    "subsection filter for \"{}\" needs include or exclude",
                    raw.section
                ));
            }
        };
        Ok(PageFilter {
            section: raw.section,
            mode,
        })
    }
}

impl MappingConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MappingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: MappingConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=5).contains(&self.section_level) {
            return Err(ConfigError::Validation(
                "section_level must be 1-5".into(),
            ));
        }
        if self.pages.is_empty() {
            return Err(ConfigError::Validation(
                "at least one page is required".into(),
            ));
        }

        let mut outputs = HashSet::new();
        for page in &self.pages {
            if page.output.is_empty() || page.output.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "page output \"{}\" must be a plain file name",
                    page.output
                )));
            }
            for (field, value) in [("title", &page.title), ("description", &page.description)] {
                if value.contains(['"', '\\', '\n']) {
                    return Err(ConfigError::Validation(format!(
                        "page \"{}\": {field} may not contain '\"', '\\' or a line break",
                        page.output
                    )));
                }
            }
            if !outputs.insert(page.output.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "page output \"{}\" is declared twice",
                    page.output
                )));
            }
        }

        let framing: Vec<&str> = self
            .pages
            .iter()
            .filter(|p| p.keep_preamble)
            .map(|p| p.output.as_str())
            .collect();
        if framing.len() > 1 {
            return Err(ConfigError::Validation(format!(
                "only one page may keep the preamble, found: {}",
                framing.join(", ")
            )));
        }

        for (anchor, target) in &self.cross_references {
            if !anchor.starts_with('#') {
                return Err(ConfigError::Validation(format!(
                    "cross reference key \"{anchor}\" must start with '#'"
                )));
            }
            if target.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "cross reference \"{anchor}\" has an empty target"
                )));
            }
        }
        Ok(())
    }

    /// Resolve relative paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.source_spec.is_relative() {
            self.source_spec = base.join(&self.source_spec);
        }
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
    }
}

/// Load, validate, and path-resolve a mapping file.
pub fn load_config(path: &Path) -> Result<MappingConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => MappingConfig::from_json_str(&content)?,
        _ => MappingConfig::from_toml_str(&content)?,
    };
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}

/// A fully-commented starter mapping file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r###"# spec-pages mapping
# ==================
# Declares how one specification document is sliced into site pages.
# Relative paths resolve against the directory containing this file.
# Unknown keys will cause an error.

# The authoritative specification document.
source_spec = "spec/SPECIFICATION.md"

# Where generated pages are committed. `spec-pages check` compares against it.
output_dir = "site/src/content/docs/specification"

# Heading level of top-level sections (2 = "## "). Subsections are one deeper.
section_level = 2

# Start of a closing footer line (after a --- rule) to drop before parsing.
# Set to "" to keep the footer.
footer_marker = "*This specification is published"

# ---------------------------------------------------------------------------
# Cross references
# ---------------------------------------------------------------------------
# In-document anchors rewritten to site paths on every page.
[cross_references]
"#manifest" = "/specification/manifest/"

# ---------------------------------------------------------------------------
# Pages
# ---------------------------------------------------------------------------
# The one page with keep_preamble = true carries the document title and
# version line and keeps the original heading levels. All other pages have
# their headings promoted one level.
[[pages]]
output = "overview.md"
title = "Overview"
description = "Introduction and terminology"
sections = ["1. Introduction", "2. Terminology"]
keep_preamble = true

[[pages]]
output = "manifest.md"
title = "Manifest"
description = "Manifest fields and validation"
sections = ["3. Manifest"]

# Optional: narrow one section to some of its subsections, by prefix.
# Use either include (excerpt: only these, no section intro or heading) or
# exclude (everything else; cross_ref swaps an excluded subsection for a
# short stub pointing elsewhere).
[pages.subsection_filter]
section = "3. Manifest"
exclude = ["3.4"]

[pages.subsection_filter.cross_ref]
"3.4" = "See [Lazy Loading](/specification/lazy-loading/)."
"###
}
