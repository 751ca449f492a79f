use thiserror::Error;

/// Failure kinds a category run can surface beyond plain driver and I/O
/// errors, so callers can tell a stuck page from a broken one.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("\"load more\" control still visible after {clicks} clicks on {url}")]
    PaginationTimeout { url: String, clicks: usize },

    #[error("product card has no `{0}` element")]
    MissingElement(&'static str),

    #[error("`{element}` element has no `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("could not parse {field} from {text:?}")]
    BadNumber { field: &'static str, text: String },
}
