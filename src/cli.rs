//! Command-line surface over the core: `generate`, `analyze`, `extend`
//! (spec.md §6). Mirrors the teacher's own `#[derive(Subcommand)]` idiom, one
//! doc comment per variant doubling as `--help` text, `anyhow::Result`
//! everywhere above the core's own error types.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use crate::gen::alternation::AlternationPolicy;
use crate::gen::catalog::Catalog;
use crate::gen::colloscope::{self, Mode};
use crate::gen::{analyzer, extender};

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Solve a catalog into a filled colloscope
    Generate {
        /// Semicolon-separated slot catalog (spec.md §6)
        catalog: PathBuf,
        /// Pin a single solving tier instead of escalating strict -> relaxed -> maximize
        #[arg(short, long)]
        mode: Option<ModeArg>,
        /// Custom alternation-rule mapping (JSON); replaces the default wholesale
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Where to write the filled catalog; stdout if omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Analyze an assignment and print its violation/statistics report
    Analyze {
        /// A catalog whose week columns are already filled in
        assignment: PathBuf,
        /// Custom alternation-rule mapping (JSON); replaces the default wholesale
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Where to write the JSON report; stdout if omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Extend an 8-week assignment to a 24-week cycle by rotating group labels
    Extend {
        /// The 8-week (or fewer) filled assignment to extend
        assignment: PathBuf,
        /// The original catalog the assignment was solved from
        original_catalog: PathBuf,
        /// Where to write the extended catalog; stdout if omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Strict,
    Relaxed,
    Maximize,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Strict => Mode::Strict,
            ModeArg::Relaxed => Mode::Relaxed,
            ModeArg::Maximize => Mode::Maximize,
        }
    }
}

fn read_catalog(path: &Path) -> Result<Catalog> {
    let file = File::open(path).with_context(|| format!("opening catalog '{}'", path.display()))?;
    Catalog::from_reader(file).with_context(|| format!("parsing catalog '{}'", path.display()))
}

fn read_policy(rules: &Option<PathBuf>) -> Result<AlternationPolicy> {
    match rules {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening rules '{}'", path.display()))?;
            AlternationPolicy::from_reader(file)
                .with_context(|| format!("parsing alternation rules '{}'", path.display()))
        }
        None => Ok(AlternationPolicy::default()),
    }
}

fn write_output<F: FnOnce(&mut dyn Write) -> Result<()>>(out: &Option<PathBuf>, write: F) -> Result<()> {
    match out {
        Some(path) => {
            let mut file = File::create(path).with_context(|| format!("creating '{}'", path.display()))?;
            write(&mut file)
        }
        None => {
            let mut stdout = io::stdout();
            write(&mut stdout)
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(message);
    pb
}

fn run_generate(
    catalog: PathBuf,
    mode: Option<ModeArg>,
    rules: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    let catalog = read_catalog(&catalog)?;
    let policy = read_policy(&rules)?;

    let pb = spinner("Solving (strict -> relaxed -> maximize)...");
    let (tier, assignment) = match mode {
        Some(forced) => {
            let tier: Mode = forced.into();
            let assignment = colloscope::solve_mode(&catalog, &policy, tier)
                .with_context(|| format!("solving in forced '{}' mode", tier))?;
            (tier, assignment)
        }
        None => colloscope::solve(&catalog, &policy).context("generating a colloscope")?,
    };
    pb.finish_with_message(format!("Done. Found a solution in '{}' mode.", tier));

    write_output(&out, |w| Ok(assignment.to_writer(w)?))?;
    Ok(())
}

fn run_analyze(assignment: PathBuf, rules: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let assignment = read_catalog(&assignment)?;
    let policy = read_policy(&rules)?;

    let report = analyzer::analyze(&assignment, &policy);

    write_output(&out, |w| {
        serde_json::to_writer_pretty(&mut *w, &report).context("serializing report")?;
        writeln!(w)?;
        Ok(())
    })?;

    if report.resume.total_erreurs > 0 {
        eprintln!(
            "analysis found {} violation(s); see the report for details",
            report.resume.total_erreurs
        );
    }
    Ok(())
}

fn run_extend(assignment: PathBuf, original_catalog: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let assignment = read_catalog(&assignment)?;
    let original_catalog = read_catalog(&original_catalog)?;

    let extended = extender::extend(&assignment, &original_catalog);

    write_output(&out, |w| Ok(extended.to_writer(w)?))?;
    Ok(())
}

pub fn execute(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Generate { catalog, mode, rules, out } => run_generate(catalog, mode, rules, out),
        CliCommand::Analyze { assignment, rules, out } => run_analyze(assignment, rules, out),
        CliCommand::Extend { assignment, original_catalog, out } => {
            run_extend(assignment, original_catalog, out)
        }
    }
}
