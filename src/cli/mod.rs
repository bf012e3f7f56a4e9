/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface structs, functions, and methods.
//!
//! Each module corresponds to a group of commands, and each command is
//! implemented as a submodule.

use crate::graphs::prelude::*;
use crate::pregel::Partitioning;
use anyhow::{anyhow, bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Display;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

pub mod run;

/// The name of the weight property of graphs read with a weight column.
pub const WEIGHT_PROPERTY: &str = "weight";

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(..., value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = num_cpus::get().max(1), value_parser = num_threads_parser)]
    /// The number of threads to use.
    pub num_threads: usize,
}

/// Shared CLI arguments for reading arc lists.
#[derive(Args, Debug)]
pub struct ArcsArgs {
    #[arg(long, default_value_t = '#')]
    /// Ignore lines that start with this symbol.
    pub line_comment_symbol: char,

    #[arg(long, default_value_t = 0)]
    /// How many lines to skip, ignoring comment lines.
    pub lines_to_skip: usize,

    #[arg(long, default_value_t = '\t')]
    /// The column separator.
    pub separator: char,

    #[arg(long, default_value_t = 0)]
    /// The index of the column containing the source node of an arc.
    pub source_column: usize,

    #[arg(long, default_value_t = 1)]
    /// The index of the column containing the target node of an arc.
    pub target_column: usize,

    #[arg(long)]
    /// The index of the column containing the weight of an arc; if
    /// specified, the graph will be weighted.
    pub weight_column: Option<usize>,

    #[arg(long, default_value_t = false)]
    /// Sources and destinations are node identifiers starting from 0, rather
    /// than labels.
    pub exact: bool,
}

/// Reads a list of arcs, one per line.
///
/// Unless [`exact`](ArcsArgs::exact) is set, node labels are mapped to node
/// ids in order of appearance; otherwise, they must be node ids, and the
/// returned map is the identity on the nodes of the graph.
pub fn read_arcs(args: &ArcsArgs, reader: impl BufRead) -> Result<(VecGraph, IdMap<String>)> {
    let mut graph = VecGraph::new();
    let mut ids = IdMap::new();
    let biggest_idx = args
        .source_column
        .max(args.target_column)
        .max(args.weight_column.unwrap_or(0));

    let mut iter = reader.lines().enumerate();
    for _ in 0..args.lines_to_skip {
        let _ = iter.next();
    }

    for (line_num, line) in iter {
        let line = line.with_context(|| format!("Could not read line {}", line_num + 1))?;
        if line.trim().is_empty() || line.trim().starts_with(args.line_comment_symbol) {
            continue;
        }
        let vals = line.split(args.separator).collect::<Vec<_>>();
        if vals.len() <= biggest_idx {
            log::warn!(
                "Line {}: {:?} does not have enough columns: got {} columns but expected at least {} columns separated by {:?} (you can change the separator using the --separator option)",
                line_num + 1,
                line,
                vals.len(),
                biggest_idx + 1,
                args.separator,
            );
            continue;
        }

        let mut node_id = |label: &str| -> Result<usize> {
            if args.exact {
                label.trim().parse::<usize>().with_context(|| {
                    format!("Could not parse node id {:?} at line {}", label, line_num + 1)
                })
            } else {
                Ok(ids.insert(label.to_owned()))
            }
        };
        let src = node_id(vals[args.source_column])?;
        let dst = node_id(vals[args.target_column])?;

        match args.weight_column {
            Some(column) => {
                let weight = vals[column].trim().parse::<f64>().with_context(|| {
                    format!(
                        "Could not parse weight {:?} at line {}",
                        vals[column],
                        line_num + 1
                    )
                })?;
                graph.add_weighted_arcs([(src, dst, weight)]);
            }
            None => {
                graph.add_arcs([(src, dst)]);
            }
        }
    }

    if args.exact {
        for node in 0..graph.num_nodes() {
            ids.insert(node.to_string());
        }
    }
    if args.weight_column.is_some() {
        graph = graph.with_weight_property(WEIGHT_PROPERTY);
    }

    log::info!(
        "Read {} nodes and {} arcs",
        graph.num_nodes(),
        graph.num_arcs()
    );
    Ok((graph, ids))
}

/// Reads a list of arcs from a file.
pub fn load_arcs(args: &ArcsArgs, path: impl AsRef<Path>) -> Result<(VecGraph, IdMap<String>)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open arc list {}", path.display()))?;
    read_arcs(args, std::io::BufReader::new(file))
}

/// Maps a node label to a node id.
pub fn node_by_label(ids: &IdMap<String>, label: &str) -> Result<usize> {
    ids.to_dense(&label.to_owned())
        .ok_or_else(|| anyhow!("Node {:?} does not appear in the arc list", label))
}

#[derive(Debug, Clone, Copy, ValueEnum)]
/// Formats for storing vectors of values.
pub enum VectorFormat {
    /// ASCII format, one value per line.
    Ascii,
    /// ASCII format, one node label and value per line, separated by a TAB.
    Labelled,
    /// A JSON Array.
    Json,
}

impl VectorFormat {
    /// Writes values using the format defined by `self`.
    pub fn write<T: Display>(
        &self,
        mut writer: impl Write,
        values: &[T],
        ids: &IdMap<String>,
    ) -> Result<()> {
        match self {
            VectorFormat::Ascii => {
                for value in values {
                    writeln!(writer, "{}", value)?;
                }
            }
            VectorFormat::Labelled => {
                for (label, value) in ids.externals().iter().zip(values) {
                    writeln!(writer, "{}\t{}", label, value)?;
                }
            }
            VectorFormat::Json => {
                write!(writer, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i != 0 {
                        write!(writer, ", ")?;
                    }
                    write!(writer, "{}", value)?;
                }
                writeln!(writer, "]")?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Stores values in the specified `path` using the format defined by
    /// `self`.
    pub fn store<T: Display>(
        &self,
        path: impl AsRef<Path>,
        values: &[T],
        ids: &IdMap<String>,
    ) -> Result<()> {
        create_parent_dir(&path)?;
        let path_display = path.as_ref().display();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Could not create vector at {}", path_display))?;
        log::info!("Storing in {:?} format at {}", self, path_display);
        self.write(BufWriter::new(file), values, ids)
            .with_context(|| format!("Could not write vector to {}", path_display))
    }
}

/// Creates all parent directories of the given file path.
pub fn create_parent_dir(file_path: impl AsRef<Path>) -> Result<()> {
    // ensure that the dst directory exists
    if let Some(parent_dir) = file_path.as_ref().parent() {
        std::fs::create_dir_all(parent_dir).with_context(|| {
            format!(
                "Failed to create the directory {:?}",
                parent_dir.to_string_lossy()
            )
        })?;
    }
    Ok(())
}

/// Parses a duration from a string.
///
/// If no suffix is given, it is assumed to be in milliseconds. You can use
/// suffixes, the available ones are:
/// - `s` for seconds
/// - `m` for minutes
/// - `h` for hours
/// - `d` for days
///
/// Example: `1d2h3m4s567` this is parsed as: 1 day, 2 hours, 3 minutes, 4 seconds, and 567 milliseconds.
fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
pub fn init_env_logger() -> Result<()> {
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
    use jiff::SpanRound;

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes "s"
    /// for seconds, "m" for minutes, "h" for hours, and "d" for days. If no
    /// suffix is provided it is assumed to be in milliseconds.
    /// Example: "1d2h3m4s567" is parsed as 1 day + 2 hours + 3 minutes + 4
    /// seconds + 567 milliseconds = 93784567 milliseconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[command(subcommand)]
    Run(run::SubCommands),
}

#[derive(Parser, Debug)]
#[command(name = "pregel", version)]
/// Runs vertex-centric algorithms on graphs given as lists of arcs.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::try_parse_from(args)?;
    match cli.command {
        SubCommands::Run(args) => {
            run::main(cli.args, args)?;
        }
    }

    log::info!("The command took {:.3}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Parses a partitioning policy.
impl ValueEnum for Partitioning {
    fn value_variants<'a>() -> &'a [Self] {
        &[Partitioning::Range, Partitioning::Degree, Partitioning::Auto]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arcs_args() -> ArcsArgs {
        ArcsArgs {
            line_comment_symbol: '#',
            lines_to_skip: 0,
            separator: '\t',
            source_column: 0,
            target_column: 1,
            weight_column: None,
            exact: false,
        }
    }

    #[test]
    fn test_read_arcs() -> Result<()> {
        let input = "# comment\nb\ta\n\na\tc\nshort\nc\tb\n";
        let (graph, ids) = read_arcs(&arcs_args(), input.as_bytes())?;
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_arcs(), 3);
        assert_eq!(ids.externals(), &["b", "a", "c"]);
        assert_eq!(node_by_label(&ids, "c")?, 2);
        assert!(node_by_label(&ids, "d").is_err());
        assert_eq!(graph.weight_property(), None);
        Ok(())
    }

    #[test]
    fn test_read_weighted_exact() -> Result<()> {
        let args = ArcsArgs {
            weight_column: Some(2),
            exact: true,
            ..arcs_args()
        };
        let (graph, ids) = read_arcs(&args, "0\t3\t0.5\n2\t0\t1\n".as_bytes())?;
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(ids.externals(), &["0", "1", "2", "3"]);
        assert_eq!(graph.weight_property(), Some(WEIGHT_PROPERTY));
        assert_eq!(graph.successors(0).collect::<Vec<_>>(), vec![(3, 0.5)]);

        assert!(read_arcs(&args, "0\tx\t1\n".as_bytes()).is_err());
        assert!(read_arcs(&args, "0\t1\tx\n".as_bytes()).is_err());
        Ok(())
    }

    #[test]
    fn test_vector_format() -> Result<()> {
        let mut ids = IdMap::new();
        ids.insert("x".to_owned());
        ids.insert("y".to_owned());
        let values = [1.5, 2.0];

        let mut buffer = Vec::new();
        VectorFormat::Labelled.write(&mut buffer, &values, &ids)?;
        assert_eq!(String::from_utf8(buffer)?, "x\t1.5\ny\t2\n");

        let mut buffer = Vec::new();
        VectorFormat::Json.write(&mut buffer, &values, &ids)?;
        assert_eq!(String::from_utf8(buffer)?, "[1.5, 2]\n");
        Ok(())
    }

    #[test]
    fn test_parse_duration() -> Result<()> {
        assert_eq!(parse_duration("1m2s3")?, Duration::from_millis(62_003));
        assert_eq!(parse_duration("500")?, Duration::from_millis(500));
        assert!(parse_duration("").is_err());
        Ok(())
    }
}
