mod error;
mod memory;
mod traits;

pub mod conformance;

pub use error::StoreError;
pub use memory::{MemoryStore, MemoryStoreBuilder};
pub use traits::TimelineStore;
