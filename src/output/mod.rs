//! Where the generated artifact goes.

pub mod writer;

pub use writer::{Destination, write_artifact};
