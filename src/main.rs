use crate::algos::{Algo, Greedy, Optimal, SolveBudget};
use crate::config::{Algorithm, Config};
use crate::model::Assignments;
use crate::scoring::ScoreParams;
use clap::Parser;
use eyre::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

mod algos;
mod allocation;
mod checks;
mod config;
mod display;
mod duplicate;
mod loaders;
mod model;
mod scoring;
mod sizing;
mod stats;

#[derive(Parser)]
#[command(version, about = "Form student project teams within lab groups")]
struct Opts {
    /// Configuration file
    #[arg(short, long, default_value = "teamform.toml")]
    config: PathBuf,
    /// Skill universe, one skill per line
    #[arg(long)]
    skills: PathBuf,
    /// Projects table
    #[arg(long)]
    projects: PathBuf,
    /// Students table
    #[arg(long)]
    students: PathBuf,
    /// Override the configured assignment algorithm
    #[arg(long, value_enum)]
    algorithm: Option<Algorithm>,
    /// Override the configured RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Write the plain-text team report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Increase verbosity (repeatable)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let opts = Opts::parse();
    let level = match opts.verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = Config::load(&opts.config)?;
    if let Some(algorithm) = opts.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(seed) = opts.seed {
        config.seed = Some(seed);
    }

    let (mut students, mut projects, skills) =
        loaders::load(&opts.skills, &opts.projects, &opts.students)?;
    duplicate::apply(&mut students, &mut projects, &config.duplicates)?;
    let mut assignments = Assignments::new(students, projects, skills)?;

    let mut rng = config
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

    let sizes = sizing::lab_team_sizes(&assignments, config.base_team_size, config.split_threshold);
    checks::ensure_team_count(&assignments, &sizes)?;
    let quotas = sizes.iter().map(Vec::len).collect::<Vec<_>>();
    allocation::allocate(&mut assignments, &quotas, &mut rng)?;
    let lab_ids = assignments.labs.iter().map(|lab| lab.id).collect::<Vec<_>>();
    for (lab, lab_sizes) in lab_ids.into_iter().zip(&sizes) {
        for (project, &size) in assignments.projects_in_lab(lab).into_iter().zip(lab_sizes) {
            assignments.set_capacity(project, size);
        }
    }
    checks::ensure_capacity(&assignments)?;

    let mut algo: Box<dyn Algo + '_> = match config.algorithm {
        Algorithm::Greedy => {
            info!("using greedy assignment");
            Box::new(Greedy::new(
                &mut assignments,
                ScoreParams {
                    pref_scalar: config.pref_scalar,
                    proficiency_threshold: config.proficiency_threshold,
                },
                rng,
            ))
        }
        Algorithm::Optimal => {
            info!("using optimal assignment");
            Box::new(Optimal::new(
                &mut assignments,
                config.pref_weight,
                config.coverage_threshold,
                SolveBudget {
                    time_limit: Duration::from_secs(config.time_limit),
                    gap: config.optimal_gap,
                },
            ))
        }
    };
    algo.assign()?;
    let assignments = algo.get_assignments();
    checks::ensure_assigned(assignments)?;

    display::display_details(assignments);
    display::display_stats(assignments, config.coverage_threshold);
    if let Some(output) = &opts.output {
        display::write_report(assignments, config.proficiency_threshold, output)?;
        info!("report written to {}", output.display());
    }
    Ok(())
}
