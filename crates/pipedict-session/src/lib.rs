//! Editing session over one loaded dictionary table.
//!
//! [`EditorSession`] ties the pieces together: it loads tables through a
//! [`pipedict_source::DictionarySource`], keeps the search view and the
//! selected row, guards cell edits and runs the editing commands. Every
//! command returns a [`CommandOutcome`] or a [`SessionError`] carrying the
//! message to show; none of them is fatal.

mod error;
mod outcome;
mod session;

pub use error::{Result, SessionError};
pub use outcome::{CommandOutcome, LoadOutcome};
pub use session::{ActiveTable, EditorSession};
