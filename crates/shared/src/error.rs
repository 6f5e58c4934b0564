#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing store could not be reached or rejected the statement.
    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("table `{table}` has header {found:?}, expected {expected:?}")]
    SchemaMismatch {
        table: String,
        found: Vec<String>,
        expected: Vec<String>,
    },

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! invalid {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::InvalidRecord(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::InvalidRecord(format!($fmt, $($arg)*)))
    };
}
