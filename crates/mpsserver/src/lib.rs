//! tolkit-mpsserver: access to the mpsserver activity API.
//!
//! mpsserver serves the child and descendant activities of a record at
//!
//! ```text
//! GET {base}/tol_child_activities-mongodb/{namespace}/{fileId}?parentId={id}&format=TMS
//! GET {base}/tol_descendant_activities-mongodb/{namespace}/{fileId}?parentId={id}&format=TMS
//! ```
//!
//! Both respond with an activity timeline whose first entry is the
//! requested parent, with the subtree nested under its `children`.

mod client;
mod config;
mod endpoint;
mod error;

pub use client::MpsServerClient;
pub use config::{MpsServerConfig, DEFAULT_FORMAT, DEFAULT_TIMEOUT_SECS, TOKEN_ENV_VAR};
pub use endpoint::{activity_url, record_url, Expansion};
pub use error::MpsServerError;
