use std::{
    collections::BTreeMap,
    fs::File,
    io::{stdin, stdout, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    process::exit,
};

use anyhow::{Context as _, Result};
use clap::{self, Parser};
use log::{debug, info, warn};
use tempfile::NamedTempFile;
use toposorter::{sort_graph, Graph, SortError};

#[derive(Debug, Clone, Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Subcommand {
    /// Print the nodes so that every node comes after its dependencies
    Sort(SortArgs),
    /// Exit with an error if the graph has a cycle
    Check(CheckArgs),
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum InputFormat {
    Text,
    Json,
}

impl InputFormat {
    fn assume_from_path(p: &Path) -> InputFormat {
        let Some(ext) = p.extension().map(|v| v.to_ascii_lowercase().to_string_lossy().to_string()) else { return InputFormat::Text };
        match ext.as_str() {
            "json" => InputFormat::Json,
            _ => InputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn assume_from_path(p: &Path) -> OutputFormat {
        let Some(ext) = p.extension().map(|v| v.to_ascii_lowercase().to_string_lossy().to_string()) else { return OutputFormat::Text };
        match ext.as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
struct SortArgs {
    #[clap(short, long, value_enum)]
    from: Option<InputFormat>,
    /// Read each edge as `before after` instead of `node dependency`
    #[clap(short = 'I', long)]
    inverted: bool,
    #[clap(short, long, value_enum)]
    to: Option<OutputFormat>,
    #[clap(short, long)]
    output: Option<PathBuf>,
    #[clap(name = "FILE", default_value = "-")]
    file: PathBuf,
}

#[derive(Debug, Clone, clap::Args)]
struct CheckArgs {
    #[clap(short, long, value_enum)]
    from: Option<InputFormat>,
    #[clap(name = "FILE", default_value = "-")]
    file: PathBuf,
}

/// One node per line, followed by any number of nodes it depends on.
/// Blank lines are skipped.
fn load_text<R: BufRead>(r: R) -> Result<Graph<String>> {
    itertools::process_results(r.lines(), |iter| {
        let deps = iter.filter_map(|s| {
            let mut parts = s.split_whitespace().map(str::to_owned);
            let node = parts.next()?;
            Some((node, parts.collect::<Vec<_>>()))
        });
        Graph::from_deps(deps)
    })
    .context("can't load text")
}

fn load_json<R: BufRead>(r: R) -> Result<Graph<String>> {
    let deps: BTreeMap<String, Vec<String>> =
        serde_json::from_reader(r).context("can't load json")?;
    Ok(Graph::from(deps))
}

fn load<R: BufRead>(r: R, format: InputFormat) -> Result<Graph<String>> {
    match format {
        InputFormat::Text => load_text(r),
        InputFormat::Json => load_json(r),
    }
}

fn load_with_path(p: &Path, format: Option<InputFormat>) -> Result<Graph<String>> {
    let format = format.unwrap_or_else(|| InputFormat::assume_from_path(p));
    debug!("input format: {:?}", format);
    if p == Path::new("-") {
        let stdin_lock = stdin().lock();
        let r = BufReader::new(stdin_lock);
        load(r, format)
    } else {
        let f = File::open(p).with_context(|| format!("can't open {}", p.display()))?;
        let r = BufReader::new(f);
        load(r, format)
    }
}

fn dump_text<W: Write>(mut w: W, order: &[String]) -> Result<()> {
    for v in order {
        w.write_all(v.as_bytes())?;
        w.write_all(&[b'\n'])?;
    }
    w.flush()?;
    Ok(())
}

fn dump_json<W: Write>(mut w: W, order: &[String]) -> Result<()> {
    serde_json::to_writer(&mut w, order).context("can't dump json")?;
    w.write_all(b"\n").context("can't dump json")?;
    w.flush().context("can't dump json")
}

fn dump<W: Write>(w: W, order: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => dump_text(w, order),
        OutputFormat::Json => dump_json(w, order),
    }
}

fn dump_with_path(p: &Path, order: &[String], format: Option<OutputFormat>) -> Result<()> {
    let format = format.unwrap_or_else(|| OutputFormat::assume_from_path(p));
    debug!("output format: {:?}", format);
    if p == Path::new("-") {
        let stdout_lock = stdout().lock();
        let w = BufWriter::new(stdout_lock);
        dump(w, order, format)
    } else {
        let dir = p
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let swp = NamedTempFile::new_in(dir)?;
        dump(BufWriter::new(swp.as_file()), order, format)?;
        swp.persist(p)
            .with_context(|| format!("can't write {}", p.display()))?;
        Ok(())
    }
}

/// Sorts the graph, reporting a cycle on stderr and exiting with status 1.
fn sort_or_exit(graph: &Graph<String>) -> Result<Vec<String>> {
    match sort_graph(graph) {
        Ok(order) => Ok(order),
        Err(SortError::CycleDetected { node, cycle }) => {
            warn!("contains a cycle at {}", node);
            for v in cycle.iter() {
                eprintln!("cycle: {}", v);
            }
            exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn sort(_args: &Args, subargs: &SortArgs) -> Result<()> {
    let mut graph = load_with_path(&subargs.file, subargs.from.clone())?;
    if subargs.inverted {
        graph = graph.invert();
    }
    let order = sort_or_exit(&graph)?;
    info!("sorted {} nodes", order.len());
    let output = subargs.output.clone().unwrap_or_else(|| "-".into());
    dump_with_path(&output, &order, subargs.to.clone())
}

fn check(_args: &Args, subargs: &CheckArgs) -> Result<()> {
    let graph = load_with_path(&subargs.file, subargs.from.clone())?;
    sort_or_exit(&graph)?;
    info!("no cycle in {} nodes", graph.len());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    debug!("{:?}", args);
    match &args.subcommand {
        Subcommand::Sort(subargs) => sort(&args, subargs),
        Subcommand::Check(subargs) => check(&args, subargs),
    }
}
