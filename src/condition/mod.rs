pub mod controlled;
pub mod editor;
pub mod evaluate;
pub mod model;
pub mod operator;

pub use controlled::*;
pub use editor::*;
pub use evaluate::*;
pub use model::*;
pub use operator::*;
