//! Line-oriented command shell over an [`EditorSession`].
//!
//! Each input line is one command. Row arguments are 1-based positions in
//! the visible rows, as printed by `show`. Arguments may be double-quoted to
//! keep spaces.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, trace};

use pipedict_session::{CommandOutcome, EditorSession, LoadOutcome, SessionError};
use pipedict_source::{DictionarySource, NodeTree};
use pipedict_view::SortDirection;

use crate::logging::redact_value;
use crate::render::{error_lines, render_diff, render_nodes, render_table};
use crate::settings::DisplaySettings;

const HELP: &str = "\
Commands:
  load NODE                 load the table of a node
  nodes                     list the nodes
  show                      print the visible rows
  search [KEYWORD]          filter rows; no keyword clears the filter
  sort [COLUMN [asc|desc]]  order rows; no column clears the ordering
  select [ROW]              select a row; no row clears the selection
  check ROW [on|off]        set the checkbox of a row
  checkall on|off           set the checkbox of every row
  set ROW COLUMN VALUE      edit a cell
  diff ROW                  show the changed cells of a row
  add                       add a row
  addcol [NAME]             add a text column
  dup                       duplicate the selected row
  del [--yes]               delete the checked rows
  save                      validate and commit all changes
  edit                      editing help
  quit                      leave the shell";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("'{command}': invalid {argument} '{value}'")]
    InvalidArgument {
        command: &'static str,
        argument: &'static str,
        value: String,
    },
    #[error("unterminated quote")]
    UnterminatedQuote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Load(String),
    Nodes,
    Show,
    Search(String),
    Sort(Option<(String, SortDirection)>),
    Select(Option<usize>),
    Check { row: usize, checked: bool },
    CheckAll(bool),
    Set {
        row: usize,
        column: String,
        value: String,
    },
    Diff(usize),
    Add,
    AddColumn(Option<String>),
    Duplicate,
    Delete { confirmed: bool },
    Save,
    Edit,
    Help,
    Quit,
}

/// Split a line into words, honouring double quotes.
fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err(ParseError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn row_arg(command: &'static str, value: Option<&String>) -> Result<usize, ParseError> {
    let value = value.ok_or(ParseError::MissingArgument {
        command,
        argument: "a row number",
    })?;
    value.parse().map_err(|_| ParseError::InvalidArgument {
        command,
        argument: "row number",
        value: value.clone(),
    })
}

fn switch_arg(command: &'static str, value: &str) -> Result<bool, ParseError> {
    match value.to_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        _ => Err(ParseError::InvalidArgument {
            command,
            argument: "switch",
            value: value.to_string(),
        }),
    }
}

impl ShellCommand {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let words = tokenize(trimmed)?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };
        let rest = args.join(" ");

        let command = match name.to_lowercase().as_str() {
            "load" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "load",
                        argument: "a node title",
                    });
                }
                Self::Load(rest)
            }
            "nodes" => Self::Nodes,
            "show" => Self::Show,
            "search" => Self::Search(rest),
            "sort" => match args {
                [] => Self::Sort(None),
                [column] => Self::Sort(Some((column.clone(), SortDirection::Ascending))),
                [column, direction, ..] => {
                    let direction = SortDirection::parse(direction).ok_or_else(|| {
                        ParseError::InvalidArgument {
                            command: "sort",
                            argument: "direction",
                            value: direction.clone(),
                        }
                    })?;
                    Self::Sort(Some((column.clone(), direction)))
                }
            },
            "select" => match args.first() {
                Some(value) => Self::Select(Some(row_arg("select", Some(value))?)),
                None => Self::Select(None),
            },
            "check" => Self::Check {
                row: row_arg("check", args.first())?,
                checked: match args.get(1) {
                    Some(value) => switch_arg("check", value)?,
                    None => true,
                },
            },
            "checkall" => {
                let value = args.first().ok_or(ParseError::MissingArgument {
                    command: "checkall",
                    argument: "on or off",
                })?;
                Self::CheckAll(switch_arg("checkall", value)?)
            }
            "set" => {
                let row = row_arg("set", args.first())?;
                let column = args.get(1).ok_or(ParseError::MissingArgument {
                    command: "set",
                    argument: "a column",
                })?;
                Self::Set {
                    row,
                    column: column.clone(),
                    value: args.get(2..).map(|words| words.join(" ")).unwrap_or_default(),
                }
            }
            "diff" => Self::Diff(row_arg("diff", args.first())?),
            "add" => Self::Add,
            "addcol" => Self::AddColumn((!rest.is_empty()).then_some(rest)),
            "dup" => Self::Duplicate,
            "del" => Self::Delete {
                confirmed: args.iter().any(|arg| arg == "--yes" || arg == "-y"),
            },
            "save" => Self::Save,
            "edit" => Self::Edit,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// What the shell printed for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Failed(String),
    Quit,
}

fn failure(error: &SessionError) -> Reply {
    let mut text = format!("error: {}", error.user_message());
    if let Some(hint) = error.suggestion() {
        text.push_str("\nhint: ");
        text.push_str(hint);
    }
    Reply::Failed(text)
}

pub struct Shell<S> {
    session: EditorSession,
    source: S,
    tree: NodeTree,
    display: DisplaySettings,
}

impl<S: DictionarySource> Shell<S> {
    pub fn new(session: EditorSession, source: S, display: DisplaySettings) -> Self {
        Self {
            session,
            source,
            tree: NodeTree::new(),
            display,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Run one command, turning session errors into printable replies.
    pub async fn execute(&mut self, command: ShellCommand) -> Reply {
        match self.dispatch(command).await {
            Ok(reply) => reply,
            Err(error) => failure(&error),
        }
    }

    async fn dispatch(&mut self, command: ShellCommand) -> Result<Reply, SessionError> {
        let text = match command {
            ShellCommand::Load(node) => {
                match self.session.select_node(&self.source, &node).await? {
                    LoadOutcome::Loaded { node, rows } => {
                        let known = if self.tree.contains(&node) { "" } else { " (unknown node)" };
                        format!("Loaded {node}{known}: {rows} rows.")
                    }
                    LoadOutcome::Superseded { node } => {
                        format!("Load of {node} was superseded.")
                    }
                }
            }
            ShellCommand::Nodes => render_nodes(&self.tree).to_string(),
            ShellCommand::Show => self.show()?,
            ShellCommand::Search(keyword) => {
                self.session.set_search(&keyword);
                let shown = self
                    .session
                    .active()
                    .map_or(0, |active| active.visible_rows().len());
                format!("{shown} rows match.")
            }
            ShellCommand::Sort(None) => {
                self.session.clear_sort()?;
                "Ordering cleared.".to_string()
            }
            ShellCommand::Sort(Some((column, direction))) => {
                self.session.sort_by(&column, direction)?;
                format!("Sorted by {column}.")
            }
            ShellCommand::Select(None) => {
                self.session.clear_selection();
                "Selection cleared.".to_string()
            }
            ShellCommand::Select(Some(position)) => {
                let row = self.session.row_at(position)?;
                self.session.select_row(row)?;
                format!("Row {position} selected.")
            }
            ShellCommand::Check { row, checked } => {
                let id = self.session.row_at(row)?;
                self.session.check_row(id, checked)?;
                format!("Row {row} {}.", if checked { "checked" } else { "unchecked" })
            }
            ShellCommand::CheckAll(checked) => {
                let count = self.session.set_all_selected(checked)?;
                format!("{count} rows {}.", if checked { "checked" } else { "unchecked" })
            }
            ShellCommand::Set { row, column, value } => {
                let id = self.session.row_at(row)?;
                debug!(row, column = %column, value = redact_value(&value), "set cell");
                if self.session.edit_cell_text(id, &column, &value)? {
                    format!("Row {row} {column} updated.")
                } else {
                    "Value unchanged.".to_string()
                }
            }
            ShellCommand::Diff(row) => {
                let id = self.session.row_at(row)?;
                let diffs = self.session.row_diff(id)?;
                if diffs.iter().any(|(_, diff)| diff.is_changed()) {
                    render_diff(&diffs, &self.display).to_string()
                } else {
                    format!("Row {row} has no changed cells.")
                }
            }
            ShellCommand::Add => self.session.add_row()?.message(),
            ShellCommand::AddColumn(name) => self.session.add_column(name.as_deref())?.message(),
            ShellCommand::Duplicate => self.session.duplicate_row()?.message(),
            ShellCommand::Delete { confirmed } => {
                let outcome = self.session.delete_selected(confirmed)?;
                if outcome == CommandOutcome::Cancelled {
                    "Cancelled. Use 'del --yes' to delete the checked rows.".to_string()
                } else {
                    outcome.message()
                }
            }
            ShellCommand::Save => self.session.save()?.message(),
            ShellCommand::Edit => self.session.edit()?.message(),
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Output(text))
    }

    fn show(&self) -> Result<String, SessionError> {
        let active = self.session.active().ok_or(SessionError::NoActiveTable)?;
        let mut text = render_table(
            active,
            self.session.conventions(),
            &self.display,
            self.session.selected_row(),
        )
        .to_string();
        for line in error_lines(active) {
            text.push('\n');
            text.push_str(&line);
        }
        let pending = active.table.pending_counts();
        text.push_str(&format!(
            "\n{}: {} of {} rows shown; pending {pending}",
            active.node,
            active.visible_rows().len(),
            active.table.active_len(),
        ));
        Ok(text)
    }

    /// Read commands until `quit` or end of input.
    ///
    /// Returns the number of commands that failed.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
        prompt: bool,
    ) -> io::Result<usize> {
        let mut failures = 0;
        if prompt {
            write!(output, "pipedict> ")?;
            output.flush()?;
        }
        for line in input.lines() {
            let line = line?;
            trace!(length = line.len(), "shell input");
            let reply = match ShellCommand::parse(&line) {
                Ok(Some(command)) => self.execute(command).await,
                Ok(None) => Reply::Output(String::new()),
                Err(error) => Reply::Failed(format!("error: {error}")),
            };
            match reply {
                Reply::Quit => break,
                Reply::Output(text) => {
                    if !text.is_empty() {
                        writeln!(output, "{text}")?;
                    }
                }
                Reply::Failed(text) => {
                    failures += 1;
                    writeln!(output, "{text}")?;
                }
            }
            if prompt {
                write!(output, "pipedict> ")?;
                output.flush()?;
            }
        }
        Ok(failures)
    }
}
