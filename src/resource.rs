use crate::error::GraphError;
use crate::COLUMN_CHAR_LEN;
use std::fmt;
use std::str::FromStr;

/// The JES2 resources tracked by the PFA check.
/// The log stores each one as a single-character key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Jqe,
    Spool,
    Bert,
    Joe,
}

impl Resource {
    pub const ALL: [Resource; 4] = [Resource::Jqe, Resource::Spool, Resource::Bert, Resource::Joe];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Resource::Jqe => "JQE",
            Resource::Spool => "SPOOL",
            Resource::Bert => "BERT",
            Resource::Joe => "JOE",
        }
    }

    /// key used in the `Key` column of the data file
    pub fn code(self) -> &'static str {
        match self {
            Resource::Jqe => "Q",
            Resource::Spool => "S",
            Resource::Bert => "B",
            Resource::Joe => "J",
        }
    }

    pub fn from_code(code: &str) -> Option<Resource> {
        Resource::ALL.iter().copied().find(|r| r.code() == code)
    }

    /// mnemonic blank-padded to the width of the capacity file `Resource` column
    pub fn padded(self) -> String {
        pad_field(self.mnemonic())
    }
}

impl FromStr for Resource {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.mnemonic() == wanted)
            .ok_or_else(|| GraphError::InvalidResource(s.to_string()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Left-justify and blank-pad to the fixed column width of the PFA files.
/// Values already at or over the width are returned unchanged.
pub fn pad_field(s: &str) -> String {
    format!("{:<width$}", s, width = COLUMN_CHAR_LEN)
}
