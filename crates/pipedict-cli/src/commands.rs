//! Subcommand implementations.

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use pipedict_cli::render::{error_lines, render_nodes, render_table, table_json};
use pipedict_cli::settings::{Settings, save_settings, settings_path};
use pipedict_cli::shell::{Reply, Shell, ShellCommand};
use pipedict_session::{EditorSession, LoadOutcome};
use pipedict_source::{CatalogSource, NodeTree};
use pipedict_view::SortDirection;

use crate::cli::{ConfigArgs, SessionArgs, ShowArgs};

fn catalog(settings: &Settings) -> CatalogSource {
    CatalogSource::new()
        .with_latency(settings.source.latency())
        .with_conventions(settings.conventions.clone())
}

pub fn run_nodes() {
    println!("{}", render_nodes(&NodeTree::new()));
}

pub async fn run_show(args: &ShowArgs, settings: &Settings) -> Result<()> {
    let mut session = EditorSession::new(settings.conventions.clone());
    match session
        .select_node(&catalog(settings), &args.node)
        .await
        .map_err(|error| anyhow!(error.user_message()))?
    {
        LoadOutcome::Loaded { .. } => {}
        LoadOutcome::Superseded { node } => {
            return Err(anyhow!("load of {node} was superseded"));
        }
    }
    if let Some(keyword) = &args.search {
        session.set_search(keyword);
    }
    if let Some(column) = &args.sort {
        let direction = if args.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        session
            .sort_by(column, direction)
            .map_err(|error| anyhow!(error.user_message()))?;
    }

    let active = session.active().context("no table was loaded")?;
    if args.json {
        let value = table_json(active, session.conventions(), &settings.display);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!(
            "{}",
            render_table(active, session.conventions(), &settings.display, None)
        );
        for line in error_lines(active) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Run the shell; returns how many commands failed.
pub async fn run_session(args: &SessionArgs, settings: &Settings) -> Result<usize> {
    let session = EditorSession::new(settings.conventions.clone());
    let mut shell = Shell::new(session, catalog(settings), settings.display.clone());
    let mut failures = 0;

    if let Some(node) = &args.node {
        match shell.execute(ShellCommand::Load(node.clone())).await {
            Reply::Output(text) => println!("{text}"),
            Reply::Failed(text) => {
                eprintln!("{text}");
                failures += 1;
            }
            Reply::Quit => return Ok(failures),
        }
    }

    let mut stdout = io::stdout().lock();
    failures += match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            shell.run(BufReader::new(file), &mut stdout, false).await?
        }
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            shell.run(stdin.lock(), &mut stdout, prompt).await?
        }
    };
    Ok(failures)
}

pub fn run_config(args: &ConfigArgs, explicit: Option<&Path>, settings: &Settings) -> Result<()> {
    let path = explicit.map(Path::to_path_buf).or_else(settings_path);
    if args.path {
        match path {
            Some(path) => println!("{}", path.display()),
            None => println!("(no settings path available)"),
        }
        return Ok(());
    }
    if args.write {
        let path = path.context("no settings path available")?;
        save_settings(&path, settings)?;
        println!("Settings written to {}", path.display());
        return Ok(());
    }
    print!(
        "{}",
        toml::to_string_pretty(settings).context("failed to serialize settings")?
    );
    Ok(())
}
