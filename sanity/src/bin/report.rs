use sanity::*;
use anyhow::Context;

/// An utility for auditing first-fit runs saved
/// as JSON by `firstfit run/batch --format json`.
#[derive(Parser, Debug)]
struct Arg {
    /// Paths to JSON files (single runs or batches)
    #[arg(required = true, value_parser = clap::value_parser!(PathBuf))]
    inputs: Vec<PathBuf>,

    /// Size unit label
    #[arg(short, long, default_value = "KB")]
    unit:   String,
}

fn main() -> anyhow::Result<()> {
    let cli = Arg::parse();
    let style = Style::new(cli.unit);
    let mut checked = 0;
    for path in &cli.inputs {
        let runs = read_runs(path)
            .with_context(|| format!("Could not load {}", path.display()))?;
        for (name, run) in &runs {
            audit(run).with_context(|| format!("{name} failed the audit"))?;
            println!(
                "{name}\n\tProcesses:\t\t{} ({} not allocated)\n\tBlocks:\t\t\t{}\n\tInternal fragmentation:\t{}\n\tExternal fragmentation:\t{}",
                run.processes.len(),
                run.unallocated_count(),
                run.blocks.len(),
                style.size(run.internal_frag),
                style.size(run.external_frag),
            );
            checked += 1;
        }
    }
    println!("{checked} runs audited, no violations.");

    Ok(())
}

