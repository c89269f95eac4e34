use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (duplicate column, empty column list, etc.).
    ConfigValidation(String),
    /// A column was declared with a type tag the registry does not know.
    UnknownColumnType(String),
    /// A fuzzy threshold outside [0, 100].
    ThresholdOutOfRange { name: &'static str, value: i64 },
    /// A user-weight entry that does not parse as `user:integer`.
    BadWeight(String),
    /// Missing required column in input data.
    MissingColumn { column: String },
    /// Input parse error (CSV or JSON text).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownColumnType(tag) => {
                write!(
                    f,
                    "\"{tag}\" is not a column type (valid types: {})",
                    crate::registry::ColumnType::tag_list()
                )
            }
            Self::ThresholdOutOfRange { name, value } => {
                write!(f, "{name} must be between 0 and 100, got {value}")
            }
            Self::BadWeight(entry) => {
                write!(f, "bad user weight \"{entry}\" (expected user:integer)")
            }
            Self::MissingColumn { column } => {
                write!(f, "\"{column}\" is not a column header in the input")
            }
            Self::Io(msg) => write!(f, "input error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
