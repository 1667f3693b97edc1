use std::io::Read;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use sofa::node::Sofa;
use sofa::search::{self, SearchCfg};

mod input;

/// Branch-and-bound upper bounds for the moving-sofa problem.
///
/// Reads the problem (normals, fixed index, initial sofa count, target
/// area) from standard input and explores until the candidate pool drains.
#[derive(Parser)]
#[command(name = "sofa")]
#[command(about = "Exact branch-and-bound search over sofa candidates")]
struct Cmd {
    /// Worker tasks per batch
    #[arg(long, default_value_t = 30)]
    threads: usize,

    /// Iterations per worker per batch
    #[arg(long, default_value_t = 10_000)]
    batch_iters: usize,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    let problem = input::parse_problem(&text)?;

    println!("Using the following normal vectors:\n");
    for c in &problem.normals {
        println!("{},", c);
    }
    println!();
    println!("Number of initial sofas: {}", problem.num_sofas);
    println!("Target: {}", problem.target);

    println!("\nInitializing...\n");
    let sofas = Sofa::a_priori_sofas(&problem.normals, problem.mu_fix_idx, problem.num_sofas);
    tracing::info!(
        angles = problem.normals.len(),
        pool = sofas.len(),
        threads = cmd.threads,
        batch_iters = cmd.batch_iters,
        "starting search"
    );

    let cfg = SearchCfg {
        target: problem.target,
        num_workers: cmd.threads,
        iters_per_batch: cmd.batch_iters,
    };
    let total_iter = search::run(sofas, &cfg);

    println!("Done.");
    println!("Total iteration: {}", total_iter);
    Ok(())
}
