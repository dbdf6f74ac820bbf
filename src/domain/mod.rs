//! Domain layer: line grammar and tree assembly
//!
//! This layer is independent of external concerns (no I/O, no CLI).

pub mod arena;
pub mod builder;
pub mod line;
pub mod splitter;

pub use arena::{RecordNode, RecordTree, TreeData};
pub use builder::TreeBuilder;
pub use line::{GedLine, LineParser};
pub use splitter::LineSplitter;
