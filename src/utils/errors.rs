use thiserror::Error;

/// Errors surfaced by the loader and the plotter.
///
/// Everything propagates straight to the caller; there are no retries and no
/// internal recovery. Messages carry the offending value (date, column name)
/// so interactive use stays debuggable.
#[derive(Debug, Error)]
pub enum PowerError {
    /// Bad or reversed calendar dates
    #[error("invalid date range: {0}")]
    InvalidRange(String),

    /// Network/transport failure talking to the API
    #[error("error fetching data from API: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Non-success HTTP status from the API
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// Response data that does not match the expected shape
    #[error("malformed data: {0}")]
    Malformed(String),

    /// A requested plot column is absent from the table
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Date filter produced no rows
    #[error("no rows in date range {start} to {end}")]
    EmptyRange { start: String, end: String },

    /// Plotting backend failure
    #[error("failed to render chart: {0}")]
    Render(String),
}
