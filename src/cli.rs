use super::VERSION;
use crate::chart::ChartSink;
use crate::error::{GraphError, Result};
use crate::select::Query;
use clap::{App, Arg, ArgMatches, ErrorKind};
use std::ffi::OsString;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Valid JES2 Resources are: JQE, SPOOL, BERT, JOE

The file paths are case sensitive, but the JES2 resource and job_name values are not.
For example, to graph the JES2 Spool data for Job3 with the files in the current directory:

    jre_graph_job SY1.5day.All.data Capacity.data Job3 SPOOL

Add -v to the end of the command for verbose mode, which prints additional data
that could help debug errors or verify the results:

    jre_graph_job SY1.5day.All.data Capacity.data Job3 BERT -v

The graph is saved as jobName_JESResource_graph.svg in the current working directory,
JOB3_SPOOL_graph.svg for the first example above, unless --output or --stdout is given.
The graph is an SVG document, not a PDF; open it with any web browser or convert it
with a tool such as rsvg-convert if a PDF is needed.";

/// Everything one invocation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    pub data_file: PathBuf,
    pub capacity_file: PathBuf,
    pub query: Query,
    pub verbose: bool,
    pub sink: ChartSink,
    pub preview_rows: usize,
    pub csv_out: Option<PathBuf>,
}

/// `<JOBNAME>_<RESOURCE>_graph.svg` in the current directory
pub fn default_graph_path(query: &Query) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}_graph.svg",
        query.job_name(),
        query.resource.mnemonic()
    ))
}

fn app() -> App<'static, 'static> {
    let arg_data = Arg::with_name("data_file")
        .help("PFA_JES2_RESOURCE_EXHAUSTION data file")
        .index(1)
        .required(true);
    let arg_capacity = Arg::with_name("capacity_file")
        .help("capacity file with one Resource,Capacity row per JES2 resource")
        .index(2)
        .required(true);
    let arg_job = Arg::with_name("job_name")
        .help("name of the job to graph, not case sensitive")
        .index(3)
        .required(true);
    let arg_resource = Arg::with_name("resource")
        .help("JES2 resource to graph: JQE, SPOOL, BERT or JOE, not case sensitive")
        .index(4)
        .required(true);
    let arg_verbose = Arg::with_name("verbose")
        .help("print the selection details and a preview of the graphed data")
        .short("v")
        .long("verbose")
        .takes_value(false)
        .required(false);
    let arg_output = Arg::with_name("output")
        .help("name of the output svg file")
        .short("o")
        .long("output")
        .takes_value(true)
        .conflicts_with("stdout");
    let arg_stdout = Arg::with_name("stdout")
        .help("write the svg document to standard output instead of a file")
        .long("stdout")
        .takes_value(false);
    let arg_preview = Arg::with_name("preview_rows")
        .help("number of rows printed in the verbose preview")
        .short("n")
        .long("preview-rows")
        .takes_value(true)
        .default_value("10");
    let arg_csv = Arg::with_name("csv")
        .help("also write the graphed data to this csv file")
        .long("csv")
        .takes_value(true);
    App::new("jre_graph_job")
        .version(VERSION.unwrap_or("unknown"))
        .about("graph the JES2 resource usage of a job from PFA_JES2_RESOURCE_EXHAUSTION data")
        .after_help(AFTER_HELP)
        .arg(arg_data)
        .arg(arg_capacity)
        .arg(arg_job)
        .arg(arg_resource)
        .arg(arg_verbose)
        .arg(arg_output)
        .arg(arg_stdout)
        .arg(arg_preview)
        .arg(arg_csv)
}

/// Accept the single-dash long forms `-help` and `-verbose`.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|a| {
            let a: OsString = a.into();
            if a == "-help" {
                OsString::from("--help")
            } else if a == "-verbose" {
                OsString::from("--verbose")
            } else {
                a
            }
        })
        .collect()
}

fn config_from_matches(m: &ArgMatches) -> Result<GraphConfig> {
    let query = Query::parse(
        m.value_of("resource").unwrap_or_default(),
        m.value_of("job_name").unwrap_or_default(),
    )?;
    let sink = if m.is_present("stdout") {
        ChartSink::Stdout
    } else {
        match m.value_of("output") {
            Some(p) => ChartSink::File(PathBuf::from(p)),
            None => ChartSink::File(default_graph_path(&query)),
        }
    };
    let preview = m.value_of("preview_rows").unwrap_or_default();
    let preview_rows = preview.parse::<usize>().map_err(|_| {
        GraphError::Usage(format!("--preview-rows '{}' is not a row count", preview))
    })?;
    Ok(GraphConfig {
        data_file: PathBuf::from(m.value_of("data_file").unwrap_or_default()),
        capacity_file: PathBuf::from(m.value_of("capacity_file").unwrap_or_default()),
        query,
        verbose: m.is_present("verbose"),
        sink,
        preview_rows,
        csv_out: m.value_of("csv").map(PathBuf::from),
    })
}

/// Parses `args`, the first item being the program name.
/// Help and version requests come back as `Usage` errors carrying the text.
pub fn parse_cli_from<I, T>(args: I) -> Result<GraphConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let m = app().get_matches_from_safe(normalize_args(args))?;
    config_from_matches(&m)
}

/// Takes the CLI arguments of the process; prints help or version and exits when asked.
pub fn parse_cli() -> Result<GraphConfig> {
    let m = match app().get_matches_from_safe(normalize_args(std::env::args_os())) {
        Ok(m) => m,
        Err(e) if e.kind == ErrorKind::HelpDisplayed || e.kind == ErrorKind::VersionDisplayed => {
            e.exit()
        }
        Err(e) => return Err(e.into()),
    };
    config_from_matches(&m)
}
