// crates/ipgeodb-core/src/error.rs
use thiserror::Error;

/// Everything that can go wrong while parsing, building, loading or querying
/// a range table.
///
/// A well-formed address that matches no range is *not* an error: lookups
/// return `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum IpDbError {
    /// Malformed address text (bad octet, wrong IPv6 group count, ...).
    #[error("Invalid address \"{0}\"")]
    InvalidAddress(String),

    /// Prefix out of range, unparsable value or unusable host count.
    #[error("Invalid CIDR \"{cidr}\": {reason}")]
    InvalidCidr { cidr: String, reason: String },

    /// A range refers to a code that the details dictionary does not know.
    /// Always fatal for a build, never recovered.
    #[error("{context}. Missing code \"{code}\"")]
    MissingCode { context: String, code: String },

    /// All fetch attempts for a source failed.
    #[error("Failed to fetch {url} after {attempts} attempts: {source}")]
    FetchFailed {
        url: String,
        attempts: u32,
        #[source]
        source: Box<IpDbError>,
    },

    #[error("Redirect error: {0}")]
    Redirect(String),

    #[error("Request failed. Status code: {0}")]
    HttpStatus(u16),

    /// An attempt, redirects included, ran past its deadline.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The dataset (or details dictionary) file could not be opened.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The file was readable but its content is not a usable dataset.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "builder")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IpDbError {
    pub(crate) fn invalid_cidr(cidr: &str, reason: impl Into<String>) -> Self {
        IpDbError::InvalidCidr {
            cidr: cidr.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IpDbError>;
