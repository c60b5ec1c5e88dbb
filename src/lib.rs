//! Materialize a directory and file skeleton from a nested description.

pub mod blueprint;
pub mod cli;
pub mod config;
pub mod error;
pub mod fsops;
pub mod logging;
pub mod materialize;
pub mod render;
pub mod runner;
pub mod tree;

pub use error::{EntryKind, MaterializeError};
pub use materialize::{ErrorPolicy, Materializer, Report, materialize};
pub use tree::TreeNode;
