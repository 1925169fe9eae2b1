use std::collections::HashSet;
use std::fmt;
use std::num::IntErrorKind;
use clap::ValueEnum;
use crate::utils::*;

/// Shown next to any [InputError] that reaches a human.
pub const INPUT_HINT: &str = "Please enter valid integers separated by commas.";

/// Which of the two input lists a problem was found in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Blocks,
    Processes,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Blocks       => write!(f, "block sizes"),
            Field::Processes    => write!(f, "process sizes"),
        }
    }
}

/// Raised while turning user text into sizes. Positions are 1-based,
/// counting comma-separated entries.
///
/// Nothing gets allocated when one of these shows up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{field}: entry #{position} is empty")]
    Empty { field: Field, position: usize },
    #[error("{field}: entry #{position} ({token:?}) is not a valid integer")]
    NotAnInteger { field: Field, position: usize, token: String },
    #[error("{field}: entry #{position} ({token}) is too large")]
    OutOfRange { field: Field, position: usize, token: String },
    #[error("{field}: entry #{position} is negative ({value})")]
    Negative { field: Field, position: usize, value: i128 },
}

impl InputError {
    pub fn field(&self) -> Field {
        match self {
            InputError::Empty { field, .. }
            | InputError::NotAnInteger { field, .. }
            | InputError::OutOfRange { field, .. }
            | InputError::Negative { field, .. } => *field,
        }
    }
}

/// Parses a comma-separated list of non-negative integers.
/// Whitespace around entries is ignored, empty entries are not:
/// `"1,,2"` and `""` are both rejected.
pub fn parse_sizes(field: Field, text: &str) -> Result<Vec<ByteSteps>, InputError> {
    text.split(',')
        .enumerate()
        .map(|(idx, raw)| parse_token(field, idx + 1, raw))
        .collect()
}

fn parse_token(field: Field, position: usize, raw: &str) -> Result<ByteSteps, InputError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(InputError::Empty { field, position });
    }
    match token.parse::<i128>() {
        Ok(value) if value < 0  => Err(InputError::Negative { field, position, value }),
        Ok(value)   => {
            ByteSteps::try_from(value)
                .map_err(|_| InputError::OutOfRange { field, position, token: token.to_string() })
        },
        Err(e)  => {
            match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow   => {
                    Err(InputError::OutOfRange { field, position, token: token.to_string() })
                },
                _   => Err(InputError::NotAnInteger { field, position, token: token.to_string() }),
            }
        }
    }
}

/// Parses both lists of an allocation request, blocks first.
pub fn parse_request(
    blocks:     &str,
    processes:  &str,
) -> Result<(Vec<ByteSteps>, Vec<ByteSteps>), InputError> {
    Ok((
        parse_sizes(Field::Blocks, blocks)?,
        parse_sizes(Field::Processes, processes)?,
    ))
}

/// How results are handed back to the user.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum OutputFormat {
    /// Human-readable tables
    Text,
    /// Pretty-printed JSON
    Json,
}

//---START BATCH SCENARIOS
/// A named pair of block/process lists, ready to be run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    pub name:       String,
    pub blocks:     Vec<ByteSteps>,
    pub processes:  Vec<ByteSteps>,
}

impl Scenario {
    pub fn run(&self) -> Run {
        first_fit(&self.blocks, &self.processes)
    }
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("could not read scenarios")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected `name;blocks;processes`")]
    Malformed { line: usize },
    #[error("line {line}: {source}")]
    Input { line: usize, source: InputError },
    #[error("scenario {name:?} appears more than once")]
    Duplicate { name: String },
}

/// Defines the interface for reading scenarios.
///
/// [ScenarioCSVParser] reads them off a file; other sources only
/// need to satisfy this trait.
pub trait ScenarioGen {
    fn read_scenarios(&self) -> Result<Vec<Scenario>, ScenarioError>;
    /// Builds one [Scenario] out of one line of input. `line` is the
    /// 1-based line number, used for error reporting.
    fn gen_single(&self, data: &str, line: usize) -> Result<Scenario, ScenarioError>;
}

/// Semicolon-separated scenario files:
///
/// ```text
/// name;blocks;processes
/// textbook;100,500,200,300,600;212,417,112,426
/// # comments and blank lines are skipped
/// exact;100;100
/// ```
///
/// The first line is a header and is always skipped.
pub struct ScenarioCSVParser {
    pub path: PathBuf,
}

impl ScenarioCSVParser {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
        }
    }

    /// Does the actual work of [ScenarioGen::read_scenarios], for
    /// any source of lines.
    pub fn read_from<R: BufRead>(&self, reader: R) -> Result<Vec<Scenario>, ScenarioError> {
        let mut res = vec![];
        let mut seen = HashSet::new();
        for (idx, line) in reader.lines()
            .enumerate()
            // First line is the header!
            .skip(1) {
            let line = line?;
            let data = line.trim();
            if data.is_empty() || data.starts_with('#') { continue; }
            let scenario = self.gen_single(data, idx + 1)?;
            if !seen.insert(scenario.name.clone()) {
                return Err(ScenarioError::Duplicate { name: scenario.name });
            }
            res.push(scenario);
        }

        Ok(res)
    }
}

impl ScenarioGen for ScenarioCSVParser {
    fn read_scenarios(&self) -> Result<Vec<Scenario>, ScenarioError> {
        let fd = std::fs::File::open(&self.path)?;
        self.read_from(BufReader::new(fd))
    }

    fn gen_single(&self, data: &str, line: usize) -> Result<Scenario, ScenarioError> {
        let (name, blocks, processes) = data.split(';')
            .map(str::trim)
            .collect_tuple()
            .ok_or(ScenarioError::Malformed { line })?;
        if name.is_empty() {
            return Err(ScenarioError::Malformed { line });
        }
        let (blocks, processes) = parse_request(blocks, processes)
            .map_err(|source| ScenarioError::Input { line, source })?;

        Ok(Scenario {
            name: name.to_string(),
            blocks,
            processes,
        })
    }
}

/// Runs every scenario independently, in parallel. Each run carves its
/// own copy of the blocks, so nothing is shared. The result keeps the
/// order of `scenarios`.
pub fn run_batch(scenarios: &[Scenario]) -> IndexMap<String, Run> {
    scenarios.par_iter()
        .map(|s| (s.name.clone(), s.run()))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}
//---END BATCH SCENARIOS
