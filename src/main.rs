use clap::{ArgAction, Parser, Subcommand};
use spec_pages::{config, document, freshness, generate, logging, output, transform};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "spec-pages")]
#[command(about = "Generate documentation pages from a markdown specification")]
#[command(long_about = "\
Generate documentation pages from a markdown specification

One specification document is sliced into standalone pages according to a
page mapping. Each page pulls a list of top-level sections, optionally
narrowed to some of a section's subsections, with same-document anchor links
rewritten to cross-page paths.

Mapping file (spec-pages.toml):

  source_spec = \"spec/SPECIFICATION.md\"
  output_dir  = \"site/src/content/docs/specification\"

  [cross_references]
  \"#manifest\" = \"/specification/manifest/\"

  [[pages]]
  output   = \"overview.md\"
  title    = \"Overview\"
  sections = [\"1. Introduction\"]
  keep_preamble = true

Run 'spec-pages gen-config' to print a documented mapping file.
Run 'spec-pages check' in CI to fail when committed pages are stale.")]
#[command(version)]
struct Cli {
    /// Page mapping file (.toml, or .json)
    #[arg(long, default_value = "spec-pages.toml", global = true)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write every page into the output directory
    Generate {
        /// Write here instead of the mapping's output_dir
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fail if committed pages differ from freshly generated ones
    Check,
    /// List the specification's sections and subsection prefixes
    Outline,
    /// Print a stock spec-pages.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&logging::LogConfig::from_verbosity(cli.verbose));

    match cli.command {
        Command::Generate { out } => {
            let mapping = config::load_config(&cli.config)?;
            let out_dir = out.unwrap_or_else(|| mapping.output_dir.clone());
            let report = generate::generate(&mapping, &out_dir)?;
            output::print_generate_output(&report);
        }
        Command::Check => {
            let mapping = config::load_config(&cli.config)?;
            let report = freshness::check_freshness(&mapping)?;
            output::print_check_output(&report);
            if !report.is_fresh() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Outline => {
            let mapping = config::load_config(&cli.config)?;
            let text = std::fs::read_to_string(&mapping.source_spec)?;
            let doc = document::Document::parse(
                transform::strip_footer(&text, &mapping.footer_marker),
                mapping.section_level,
            );
            output::print_outline(&doc);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}
