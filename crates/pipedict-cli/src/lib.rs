//! Library side of the `pipedict` command-line editor.

pub mod logging;
pub mod render;
pub mod settings;
pub mod shell;
