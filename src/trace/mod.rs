pub mod formatter;
pub mod indexer;
pub mod record;

pub use formatter::*;
pub use indexer::*;
pub use record::*;
