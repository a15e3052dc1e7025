//! grammar2d CLI
//!
//! Usage:
//!   grammar2d [OPTIONS] <FILE>
//!
//! Options:
//!   -l, --layout <PATTERN>  Print resolved component bounds for a pattern
//!   -s, --stage <WxH>       Stage size used by --layout [default: 600x600]
//!   -c, --config <FILE>     Layout configuration (TOML format)
//!       --lint              Report non-fatal grammar and layout defects
//!       --prune             Drop empty values from the exported dictionary
//!   -v, --verbose           Debug logging (otherwise RUST_LOG applies)
//!   -h, --help              Print help

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use grammar2d::layout::{layout_pattern, LayoutConfig, PatternLayout, Size};
use grammar2d::lint::{self, LintWarning};
use grammar2d::{extract_patterns, parse_source, SourceFormat};

#[derive(Parser)]
#[command(name = "grammar2d")]
#[command(about = "Flatten, validate and lay out nested pattern grammars")]
struct Cli {
    /// Pattern source (.yaml, .yml or .toml)
    input: PathBuf,

    /// Print resolved component bounds for this pattern instead of the dictionary
    #[arg(short, long, value_name = "PATTERN")]
    layout: Option<String>,

    /// Stage size used by --layout
    #[arg(short, long, value_name = "WxH", default_value = "600x600", value_parser = parse_stage)]
    stage: Size,

    /// Layout configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report non-fatal grammar and layout defects on stderr
    #[arg(long)]
    lint: bool,

    /// Drop empty values from the exported dictionary
    #[arg(long)]
    prune: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_stage(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid stage dimension '{}': {}", v, e))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}

fn main() {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    let format = match SourceFormat::from_path(&cli.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let text = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let root = match parse_source(&text, format) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error parsing '{}': {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let dict = match extract_patterns(&root) {
        Ok(dict) => dict,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut warnings: Vec<LintWarning> = Vec::new();
    if cli.lint {
        warnings.extend(lint::check_source(&root));
        warnings.extend(lint::check(&dict));
    }

    match &cli.layout {
        Some(id) => match layout_pattern(&dict, id, cli.stage, &config) {
            Ok(layout) => {
                if cli.lint {
                    warnings.extend(lint::check_layout(&layout));
                }
                print_layout(&layout);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            let mut exported = dict.to_source();
            if cli.prune {
                exported = exported.pruned().unwrap_or_else(grammar2d::Node::map);
            }
            match serde_yaml::to_string(&exported) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => {
                    eprintln!("Error writing YAML: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }
}

fn print_layout(layout: &PatternLayout) {
    let b = layout.parent;
    println!(
        "{} x={:.1} y={:.1} w={:.1} h={:.1} cell={:.1}",
        layout.pattern, b.x, b.y, b.width, b.height, layout.cell
    );
    for c in &layout.components {
        let b = c.bounds;
        println!(
            "  {} {} -> {} x={:.1} y={:.1} w={:.1} h={:.1}",
            c.placement, c.name, c.pattern, b.x, b.y, b.width, b.height
        );
    }
    for m in &layout.missing {
        println!(
            "  {} {} -> {} (pattern not found)",
            m.placement, m.component, m.target
        );
    }
}
