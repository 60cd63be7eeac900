use tolkit_interchange::TimelineError;

#[derive(Debug, thiserror::Error)]
pub enum MpsServerError {
    /// A URL had to be built but the config lacks a field.
    #[error("mpsserver {field} is not configured")]
    MissingConfig { field: &'static str },

    #[error("invalid mpsserver URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Transport failure or an unreadable body.
    #[error("GET {url} failed: {message}")]
    Request { url: String, message: String },

    /// The body was JSON but not a valid activity timeline.
    #[error("response from {url} is not an activity timeline: {source}")]
    Decode {
        url: String,
        #[source]
        source: TimelineError,
    },
}
