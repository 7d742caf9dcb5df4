pub mod annotator;
pub mod node;

pub use annotator::*;
pub use node::*;
