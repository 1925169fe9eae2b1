use sanity::*;

/// Throws seeded random workloads at first-fit and
/// audits every single run.
#[derive(Parser, Debug)]
struct Arg {
    /// How many instances to generate
    #[arg(short, long, default_value_t = 10_000)]
    instances:      u64,

    /// Base seed; instance `i` is drawn with seed `seed + i`
    #[arg(short, long, default_value_t = 0)]
    seed:           u64,

    /// Maximum number of blocks per instance
    #[arg(long, default_value_t = Limits::default().max_blocks)]
    max_blocks:     usize,

    /// Maximum number of processes per instance
    #[arg(long, default_value_t = Limits::default().max_processes)]
    max_processes:  usize,

    /// Maximum block/process size
    #[arg(long, default_value_t = Limits::default().max_size)]
    max_size:       ByteSteps,
}

fn main() -> anyhow::Result<()> {
    let cli = Arg::parse();
    let limits = Limits {
        max_blocks:     cli.max_blocks,
        max_processes:  cli.max_processes,
        max_size:       cli.max_size,
    };

    let total = Instant::now();
    let mut failures: Vec<(u64, Violation)> = (0..cli.instances)
        .into_par_iter()
        .filter_map(|idx| {
            let seed = cli.seed.wrapping_add(idx);
            let (blocks, processes) = random_instance(&mut StdRng::seed_from_u64(seed), &limits);
            check_instance(&blocks, &processes)
                .err()
                .map(|v| (seed, v))
        })
        .collect();
    failures.sort_unstable_by_key(|(seed, _)| *seed);

    println!(
        "Total audit time: {:.2} seconds",
        total.elapsed().as_secs_f64()
    );
    println!("Instances:\t{}\nViolations:\t{}", cli.instances, failures.len());
    for (seed, v) in failures.iter().take(10) {
        eprintln!("seed {seed}: {v}");
    }
    if let Some((seed, v)) = failures.into_iter().next() {
        anyhow::bail!("first violation at seed {seed}: {v}");
    }

    Ok(())
}
