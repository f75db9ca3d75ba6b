use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("{0}")]
    Usage(String),

    #[error("the specified {kind} file {path:?} does not exist, verify the file and filepath then try again")]
    InputNotFound { kind: &'static str, path: PathBuf },

    #[error("unknown JES2 resource '{0}', valid resources are JQE, SPOOL, BERT, JOE")]
    InvalidResource(String),

    #[error("the specified job name '{0}' does not exist, verify the job name and try again")]
    JobNotFound(String),

    #[error("no capacity found for resource '{0}'")]
    CapacityNotFound(String),

    #[error("job '{job}' has no {resource} data")]
    NoResourceData { job: String, resource: String },

    #[error("{origin}, line {line}: {reason}")]
    Parse {
        origin: String,
        line: usize,
        reason: String,
    },

    #[error("invalid Date_Time '{value}': {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not draw the graph: {0}")]
    Render(String),
}

impl From<clap::Error> for GraphError {
    fn from(e: clap::Error) -> Self {
        match e.kind {
            clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed => {
                GraphError::Usage(e.message)
            }
            _ => GraphError::Usage(format!(
                "{}\nThe supplied arguments are not correct. Specify the data_file, capacity_file, job_name, \
                 and JES2 resource in that order. For help enter 'jre_graph_job -h'",
                strip_clap_prefix(&e.message)
            )),
        }
    }
}

/// Drops the `error:` label clap puts in front of its messages, colored or not.
fn strip_clap_prefix(message: &str) -> &str {
    match message.find("error:") {
        Some(i) if i <= "\u{1b}[1;31m".len() => message[i + "error:".len()..]
            .trim_start_matches("\u{1b}[0m")
            .trim_start(),
        _ => message,
    }
}
