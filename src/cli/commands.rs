//! Command dispatch and handlers

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::errors::GedResult;
use crate::stream::{from_file, parse_file, GedReader};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Json { file, pretty }) => _json(file.as_deref(), *pretty),
        Some(Commands::Tree { file }) => _tree(file.as_deref()),
        Some(Commands::Stats { file }) => _stats(file.as_deref()),
        Some(Commands::Scan { dir }) => _scan(dir.as_deref()),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

#[instrument]
fn _json(file: Option<&Path>, pretty: bool) -> CliResult<()> {
    debug!("file: {:?}, pretty: {:?}", file, pretty);
    match file {
        Some(path) => emit_json(from_file(path)?, pretty),
        None => emit_json(GedReader::new(io::stdin().lock()), pretty),
    }
}

fn emit_json<R: Read>(reader: GedReader<R>, pretty: bool) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for tree in reader {
        let tree = tree?;
        let Some(data) = tree.to_data() else { continue };
        let json = if pretty {
            serde_json::to_string_pretty(&data)?
        } else {
            serde_json::to_string(&data)?
        };
        writeln!(out, "{}", json)?;
    }
    Ok(())
}

#[instrument]
fn _tree(file: Option<&Path>) -> CliResult<()> {
    debug!("file: {:?}", file);
    match file {
        Some(path) => show_trees(from_file(path)?),
        None => show_trees(GedReader::new(io::stdin().lock())),
    }
}

fn show_trees<R: Read>(reader: GedReader<R>) -> CliResult<()> {
    for tree in reader {
        let tree = tree?;
        if let Some(display) = tree.to_display_tree() {
            output::info(&display);
        }
    }
    Ok(())
}

#[instrument]
fn _stats(file: Option<&Path>) -> CliResult<()> {
    debug!("file: {:?}", file);
    let trees = match file {
        Some(path) => parse_file(path)?,
        None => GedReader::new(io::stdin().lock()).collect::<GedResult<Vec<_>>>()?,
    };

    let counts = trees.iter().filter_map(|tree| tree.root_tag()).counts();

    output::header("Records");
    for (tag, count) in counts.iter().sorted() {
        output::detail(&format!("{:<8} {}", tag, count));
    }

    let nodes: usize = trees.iter().map(|tree| tree.iter().count()).sum();
    let depth = trees.iter().map(|tree| tree.depth()).max().unwrap_or(0);

    output::header("Totals");
    output::detail(&format!("records: {}", trees.len()));
    output::detail(&format!("nodes:   {}", nodes));
    output::detail(&format!("depth:   {}", depth));
    Ok(())
}

#[instrument]
fn _scan(dir: Option<&Path>) -> CliResult<()> {
    let dir = dir.unwrap_or_else(|| Path::new("."));
    debug!("dir: {:?}", dir);
    if !dir.is_dir() {
        return Err(CliError::InvalidArgs(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ged"))
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    output::header(&format!("Scanning {}", dir.display()));
    let results: Vec<(PathBuf, GedResult<usize>)> = files
        .into_par_iter()
        .map(|path| {
            let count = parse_file(&path).map(|trees| trees.len());
            (path, count)
        })
        .collect();

    for (path, result) in results {
        match result {
            Ok(count) => output::success(&format!("{}: {} records", path.display(), count)),
            Err(e) => output::failure(&format!("{}: {}", path.display(), e)),
        }
    }
    Ok(())
}

fn _completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
