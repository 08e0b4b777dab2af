use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fields {} are required.", .0.join(", "))]
    RequiredFieldsMissing(Vec<String>),

    #[error("Cannot import into \"{0}\": the statement already has lines.")]
    StatementAlreadyHasLines(String),

    #[error("Cannot import into \"{0}\": the statement is not in draft state.")]
    StatementNotDraft(String),

    #[error("Check that the mapping profile matches the format of the CSV file.")]
    CsvFormat,

    #[error("Check that the file is effectively a CSV file.")]
    GeneralFailure,

    #[error("Database general failure. Error raised: {0}.")]
    DatabaseGeneralFailure(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Unknown statement: {0}")]
    UnknownStatement(String),

    #[error("Invalid column mapping: {0}")]
    InvalidMapping(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
