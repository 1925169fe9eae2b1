use firstfit::*;
use clap::{Args, Parser, Subcommand};
use anyhow::Context;
use std::io::Write;

/// First-fit placement of processes into fixed memory blocks
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd:    Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Allocate a single request
    Run {
        /// Block sizes, comma-separated (e.g. "100,500,200")
        #[arg(short, long, allow_hyphen_values = true)]
        blocks:     String,

        /// Process sizes, comma-separated, in service order
        #[arg(short, long, allow_hyphen_values = true)]
        processes:  String,

        #[command(flatten)]
        out:        OutputArgs,
    },
    /// Allocate every scenario of a `name;blocks;processes` file
    Batch {
        /// Path to scenario file
        #[arg(value_parser = clap::value_parser!(PathBuf))]
        input:      PathBuf,

        #[command(flatten)]
        out:        OutputArgs,
    },
    /// Prompt for requests on stdin until `quit`
    Interactive {
        /// Size unit label
        #[arg(short, long, default_value = "KB")]
        unit:       String,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Size unit label
    #[arg(short, long, default_value = "KB")]
    unit:   String,

    /// Report allocation time on stderr
    #[arg(long)]
    timing: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Run { blocks, processes, out }     => {
            let (blocks, processes) = parse_request(&blocks, &processes)
                .context(INPUT_HINT)?;
            let start = Instant::now();
            let run = first_fit(&blocks, &processes);
            if out.timing {
                eprintln!("Total allocation time: {} μs", start.elapsed().as_micros());
            }
            println!("{}", render(&run, out.format, &Style::new(out.unit))?);
        },
        Cmd::Batch { input, out }   => {
            let scenarios = ScenarioCSVParser::new(input.clone())
                .read_scenarios()
                .with_context(|| format!("Bad scenario file {}", input.display()))?;
            let start = Instant::now();
            let runs = run_batch(&scenarios);
            if out.timing {
                eprintln!(
                    "Total allocation time: {} μs ({} scenarios)",
                    start.elapsed().as_micros(),
                    runs.len()
                );
            }
            match out.format {
                OutputFormat::Text  => {
                    let style = Style::new(out.unit);
                    for (name, run) in &runs {
                        println!("=== {name}\n\n{}\n", render_text(run, &style));
                    }
                },
                OutputFormat::Json  => {
                    println!("{}", render_json(&runs)?);
                },
            }
        },
        Cmd::Interactive { unit }   => {
            interactive(&Style::new(unit))?;
        },
    }

    Ok(())
}

fn interactive(style: &Style) -> anyhow::Result<()> {
    let mut session = Session::new();
    let mut lines = std::io::stdin().lock().lines();
    println!("First-fit allocation. Enter comma-separated sizes; `show`, `clear` or `quit` at the block prompt.");
    loop {
        let Some(blocks) = prompt(&mut lines, "Block sizes> ")? else { break };
        match blocks.trim() {
            "quit" | "exit" => break,
            "clear" => {
                session.clear();
                println!("Results cleared.");
                continue;
            },
            "show"  => {
                match session.current() {
                    Some(run)   => println!("{}", render_text(run, style)),
                    None        => println!("Nothing to show."),
                }
                continue;
            },
            _   => {}
        }
        let Some(processes) = prompt(&mut lines, "Process sizes> ")? else { break };
        match session.submit(&blocks, &processes) {
            Ok(run) => println!("\n{}\n", render_text(run, style)),
            Err(e)  => eprintln!("Input Error: {e}\n{INPUT_HINT}"),
        }
    }

    Ok(())
}

fn prompt<B: BufRead>(lines: &mut std::io::Lines<B>, label: &str) -> anyhow::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;

    Ok(lines.next().transpose()?)
}
