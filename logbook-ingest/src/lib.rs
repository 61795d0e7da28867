pub mod discover;
pub mod error;
pub mod load;

pub use discover::{discover, source_of, Discovered};
pub use error::IngestError;
pub use load::{build_overview, load_exercises, load_week_logs};
