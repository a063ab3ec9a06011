use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use crystal_sat::{run_problem, writer, CdclSolver, ProblemConfig, Solution};

#[derive(Parser)]
#[command(author, version, about = "Crystal occupancy as Boolean satisfiability")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Builds and solves one problem file.
    Solve {
        #[arg(short, long)]
        config: PathBuf,

        /// Write one CIF per solution as <output>_<n>.cif
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overrides [solve] solutions.
        #[arg(long)]
        solutions: Option<usize>,

        /// Keep one solution per symmetry class.
        #[arg(long)]
        unique: bool,
    },
    /// Solves every problem file matching a glob pattern.
    Batch {
        #[arg(short, long)]
        pattern: String,

        #[arg(long, default_value = "crystal_sat_out")]
        output_dir: PathBuf,
    },
    /// Writes the accumulated formula in DIMACS CNF.
    Dimacs {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let start_time = Instant::now();

    match cli.command {
        Commands::Solve { config, output, solutions, unique } => {
            println!("--- Crystal SAT ---");
            println!("Reading problem from {:?}...", config);
            let mut problem = ProblemConfig::load(&config)?;
            if let Some(n) = solutions {
                if n == 0 {
                    anyhow::bail!("--solutions must be at least 1");
                }
                problem.solve.solutions = n;
            }
            if unique {
                problem.solve.unique = true;
            }
            println!("-> {} constraints.", problem.constraints.len());

            println!("Solving...");
            let (found, report) = run_problem(&problem, &mut CdclSolver::new())?;
            println!("\n{}", report);

            if let Some(prefix) = output {
                write_solutions(&found, &prefix)?;
            }
        }
        Commands::Batch { pattern, output_dir } => {
            fs::create_dir_all(&output_dir)
                .with_context(|| format!("Could not create {:?}", output_dir))?;
            let paths = glob::glob(&pattern).with_context(|| format!("Bad glob pattern '{}'", pattern))?;

            let (mut solved, mut failed) = (0usize, 0usize);
            for entry in paths {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        tracing::error!("unreadable path: {}", e);
                        failed += 1;
                        continue;
                    }
                };
                println!("Processing {:?}...", path);
                match solve_file(&path, &output_dir) {
                    Ok(n) => {
                        println!("-> {} solution(s).", n);
                        solved += 1;
                    }
                    Err(e) => {
                        tracing::error!("{:?}: {:#}", path, e);
                        failed += 1;
                    }
                }
            }
            println!("\nBatch finished: {} solved, {} failed.", solved, failed);
        }
        Commands::Dimacs { config, output } => {
            println!("Reading problem from {:?}...", config);
            let problem = ProblemConfig::load(&config)?;
            let mut model = problem.build_model()?;
            for (i, constraint) in problem.constraints.iter().enumerate() {
                constraint
                    .apply(&mut model)
                    .with_context(|| format!("Constraint #{} ({}) failed", i + 1, constraint.kind()))?;
            }

            let file = fs::File::create(&output)
                .with_context(|| format!("Could not create {:?}", output))?;
            let comments = vec![
                format!("crystal-sat: {}", problem.name.as_deref().unwrap_or("problem")),
                format!("site-species variables: 1..={}", model.encoder().max_site_var()),
            ];
            let mut out = BufWriter::new(file);
            model
                .formula()
                .write_dimacs(&mut out, &comments)
                .and_then(|_| out.flush())
                .with_context(|| format!("Could not write {:?}", output))?;
            println!(
                "Wrote {} clauses over {} variables to {:?}.",
                model.formula().len(),
                model.formula().num_vars(),
                output
            );
        }
    }

    println!("Done in {:.2?}", start_time.elapsed());
    Ok(())
}

fn write_solutions(found: &[Solution], prefix: &Path) -> Result<()> {
    for (i, solution) in found.iter().enumerate() {
        let path = PathBuf::from(format!("{}_{}.cif", prefix.display(), i + 1));
        println!("Writing {:?}...", path);
        writer::to_cif(&solution.crystal, &path)?;
    }
    Ok(())
}

fn solve_file(path: &Path, output_dir: &Path) -> Result<usize> {
    let problem = ProblemConfig::load(path)?;
    let (found, _) = run_problem(&problem, &mut CdclSolver::new())?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "problem".to_string());
    write_solutions(&found, &output_dir.join(stem))?;
    Ok(found.len())
}
