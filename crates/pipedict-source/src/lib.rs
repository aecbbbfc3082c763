//! Dictionary table sources.
//!
//! - [`DictionarySource`] is the contract the editor loads tables through.
//! - [`CatalogSource`] serves the built-in pipe dictionary tables.
//! - [`NodeTree`] is the navigation tree of node titles.
//! - [`LoadSequencer`] discards results of loads superseded by a newer
//!   selection.

pub mod catalog;
pub mod error;
pub mod sequencer;
pub mod tree;

use std::future::Future;

use pipedict_model::Table;

pub use catalog::{CatalogSource, NOTICE_COLUMN};
pub use error::{Result, SourceError};
pub use sequencer::{LoadSequencer, LoadTicket};
pub use tree::{NodeTree, TreeNode};

/// Asynchronous provider of dictionary tables keyed by node title.
///
/// Returned tables are baselined: every row is unchanged and columns carry
/// their required flags.
pub trait DictionarySource {
    fn fetch_table(&self, node: &str) -> impl Future<Output = Result<Table>> + Send;
}
