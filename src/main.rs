//! navdoc: generate Doxygen sidebar navigation data from annotated C sources.
//!
//! Reads `@defgroup` / `@brief` / `@param` annotated headers and produces the
//! static tables a Doxygen HTML viewer loads (`NAVTREE`, `NAVTREEINDEX`,
//! `modules`, one `group__*` table per group) and checks them for structural
//! problems. Two modes:
//!
//! - **stdin mode**: `navdoc < riscv_nn_activation.h`
//! - **file mode**: `navdoc -o docs/html Include/ Source/**/*.c`

mod anchor;
mod config;
mod model;
mod nav;
mod parser;
mod render;
mod validate;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "navdoc",
    about = "Generate Doxygen navigation data from annotated C headers and sources"
)]
struct Cli {
    /// Input files, directories or glob patterns. If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given, unless --check)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: js (default), json, markdown
    #[arg(short = 'f', long, default_value = "js")]
    format: String,

    /// Config file. Defaults to ./navdoc.toml when present.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Label of the navigation root (overrides the config file)
    #[arg(short = 't', long)]
    title: Option<String>,

    /// Treat a macro as defined while reading sources (NAME or NAME=VALUE).
    /// Can be specified multiple times.
    #[arg(short = 'D', long = "define")]
    defines: Vec<String>,

    /// Only validate the navigation data; write nothing
    #[arg(long)]
    check: bool,

    /// Include @internal functions in output
    #[arg(long)]
    show_internal: bool,

    /// Restrict output to these groups. Can be specified multiple times.
    #[arg(long)]
    group: Vec<String>,

    /// Suppress warnings
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(ref title) = cli.title {
        config.title = title.clone();
    }
    config.predefined.extend(cli.defines.iter().cloned());

    if cli.files.is_empty() {
        return stdin_mode(&cli, &config);
    }

    file_mode(&cli, &config)
}

/// stdin mode: read one header from stdin and print the rendered files.
fn stdin_mode(cli: &Cli, config: &config::Config) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let doc = parser::doxygen::parse(&input, "<stdin>", &config.predefined);
    let (project, site) = build(vec![doc], cli, config)?;
    if cli.check {
        return Ok(());
    }

    let renderer = render::create_renderer(&cli.format)?;
    let files = renderer.render(&project, &site);
    let multi = files.len() > 1;
    for file in files {
        if multi {
            println!("// file: {}", file.name);
        }
        print!("{}", file.content);
    }
    Ok(())
}

/// file mode: parse every input, merge, validate and write to the output directory.
fn file_mode(cli: &Cli, config: &config::Config) -> Result<()> {
    let output_dir = if cli.check {
        None
    } else {
        Some(
            cli.output
                .as_deref()
                .context("--output is required when files are given")?,
        )
    };
    // Fail on a bad format before doing any work
    let renderer = render::create_renderer(&cli.format)?;

    let input_files = expand_globs(&cli.files, cli.quiet)?;
    if input_files.is_empty() {
        anyhow::bail!("no input files");
    }

    let mut docs = Vec::new();
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match parser::parse_file(path, &content, &config.predefined) {
            Ok(doc) => docs.push(doc),
            Err(e) => {
                if !cli.quiet {
                    eprintln!("warning: skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    let (project, site) = build(docs, cli, config)?;
    let Some(output_dir) = output_dir else {
        return Ok(());
    };

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for file in renderer.render(&project, &site) {
        let out_path = output_dir.join(&file.name);
        fs::write(&out_path, &file.content)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// Merge, filter, derive the navigation data and report diagnostics.
/// Errors in the navigation data abort before anything is written.
fn build(
    docs: Vec<model::Document>,
    cli: &Cli,
    config: &config::Config,
) -> Result<(model::Project, nav::SiteIndex)> {
    let mut project = parser::merge::merge(docs, &config.title);
    filter_project(&mut project, cli.show_internal, &cli.group);

    let site = nav::SiteIndex::build(&project, config);
    let diagnostics = validate::validate(&site);
    for diag in &diagnostics {
        if diag.severity == validate::Severity::Error || !cli.quiet {
            eprintln!("{}", diag);
        }
    }

    if validate::has_errors(&diagnostics) {
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == validate::Severity::Error)
            .count();
        anyhow::bail!("navigation data has {} error(s)", errors);
    }
    Ok((project, site))
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String], quiet: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() && !quiet {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| parser::SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Drop @internal functions (unless asked for) and groups not selected with --group.
fn filter_project(project: &mut model::Project, show_internal: bool, groups: &[String]) {
    if !show_internal {
        for group in &mut project.groups {
            group.functions.retain(|f| !f.is_internal);
        }
        project.ungrouped.retain(|f| !f.is_internal);
    }

    if !groups.is_empty() {
        project.groups.retain(|g| groups.contains(&g.name));
        project.ungrouped.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::*;

    fn project() -> Project {
        let func = |name: &str, internal: bool| FunctionDoc {
            name: name.to_string(),
            is_internal: internal,
            ..Default::default()
        };
        Project {
            groups: vec![
                Group {
                    name: "Basic".to_string(),
                    functions: vec![func("add_s8", false), func("helper", true)],
                    ..Default::default()
                },
                Group {
                    name: "Util".to_string(),
                    functions: vec![func("argmax_f32", false)],
                    ..Default::default()
                },
            ],
            ungrouped: vec![func("orphan", false)],
            ..Default::default()
        }
    }

    #[test]
    fn internal_functions_dropped_by_default() {
        let mut p = project();
        filter_project(&mut p, false, &[]);
        assert_eq!(p.groups[0].functions.len(), 1);
        assert_eq!(p.ungrouped.len(), 1);
    }

    #[test]
    fn show_internal_keeps_them() {
        let mut p = project();
        filter_project(&mut p, true, &[]);
        assert_eq!(p.groups[0].functions.len(), 2);
    }

    #[test]
    fn group_filter_selects_groups() {
        let mut p = project();
        filter_project(&mut p, false, &["Util".to_string()]);
        assert_eq!(p.groups.len(), 1);
        assert_eq!(p.groups[0].name, "Util");
        assert!(p.ungrouped.is_empty());
    }

    #[test]
    fn supported_extensions() {
        assert!(has_supported_extension(Path::new("Include/riscv_nn_util.h")));
        assert!(has_supported_extension(Path::new("Source/relu.c")));
        assert!(has_supported_extension(Path::new("mainpage.dox")));
        assert!(!has_supported_extension(Path::new("Makefile")));
    }
}
