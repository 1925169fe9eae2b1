use crate::utils::*;

/// Presentation knobs. Numbering on screen is always 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Style {
    /// Label appended to every size, e.g. `KB`.
    pub unit: String,
}

impl Style {
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }

    /// `v` followed by the unit label, if any.
    pub fn size(&self, v: impl std::fmt::Display) -> String {
        if self.unit.is_empty() { v.to_string() }
        else { format!("{} {}", v, self.unit) }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new("KB")
    }
}

/// One row per process: its number, its size, and the block
/// it went to (or `Not Allocated`).
pub fn render_allocation_table(run: &Run) -> String {
    let header = format!("{:<14}{:<15}{}", "Process No.", "Process Size", "Block No.");
    std::iter::once(header)
        .chain(run.outcomes()
            .enumerate()
            .map(|(i, (size, placement))| {
                let target = match placement {
                    Placement::Block(j)     => (j + 1).to_string(),
                    Placement::Unallocated  => String::from("Not Allocated"),
                };
                format!("{:<14}{:<15}{}", i + 1, size, target)
            }))
        .join("\n")
}

/// One row per block: original capacity, what got used, what is left.
pub fn render_block_summary(run: &Run, style: &Style) -> String {
    let header = format!("{:<12}{:<16}{:<16}{}", "Block No.", "Block Size", "Used", "Remaining");
    std::iter::once(header)
        .chain(run.blocks.iter()
            .enumerate()
            .map(|(j, b)| {
                format!(
                    "{:<12}{:<16}{:<16}{}",
                    j + 1,
                    style.size(b.capacity),
                    style.size(b.used()),
                    style.size(b.remaining()),
                )
            }))
        .join("\n")
}

/// The per-category overview: free space and used space of each
/// block, then the fate of each process.
pub fn render_memory_status(run: &Run, style: &Style) -> String {
    let per_block = |f: fn(&Block) -> ByteSteps| {
        if run.blocks.is_empty() { return String::from("-"); }
        run.blocks.iter()
            .enumerate()
            .map(|(j, b)| format!("Block {}: {}", j + 1, style.size(f(b))))
            .join(", ")
    };
    let allocations = run.allocation.iter()
        .enumerate()
        .map(|(i, p)| match p {
            Placement::Block(j)     => format!("Process {} allocated to Block {}", i + 1, j + 1),
            Placement::Unallocated  => format!("Process {} not allocated", i + 1),
        })
        .join("\n");

    let mut res = vec![
        String::from("Memory Status:"),
        format!("{:<14}{}", "Free Space", per_block(Block::remaining)),
        format!("{:<14}{}", "Used Space", per_block(Block::used)),
    ];
    if !allocations.is_empty() {
        res.push(String::from("Allocations"));
        res.push(allocations);
    }

    res.join("\n")
}

pub fn render_totals(run: &Run, style: &Style) -> String {
    format!(
        "Internal Fragmentation:\t{}\nExternal Fragmentation:\t{}",
        style.size(run.internal_frag),
        style.size(run.external_frag),
    )
}

/// Everything above, one section after the other.
pub fn render_text(run: &Run, style: &Style) -> String {
    [
        render_allocation_table(run),
        render_block_summary(run, style),
        render_memory_status(run, style),
        render_totals(run, style),
    ].join("\n\n")
}

pub fn render_json<T: serde::Serialize + ?Sized>(what: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(what)
}

pub fn render(run: &Run, format: OutputFormat, style: &Style) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text  => Ok(render_text(run, style)),
        OutputFormat::Json  => render_json(run),
    }
}
