/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Collapses every instance in a map file, writing out a single flat map.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use quarry_levels::{
    definitions::standard_definitions, CollapseOptions, Collapser, Definition,
    DefinitionDictionary, FsMapResolver, FsResolver, LoadOptions, Map, NoTextures, SaveFlags,
    TextureResolver,
};

mod error;
use error::full_error_display;

#[derive(Parser, Debug)]
#[command(name = "quarry-collapse")]
#[command(about = "Collapse the instances in a Quake MAP file", long_about = None)]
struct Args {
    /// Map to collapse
    input: PathBuf,

    /// Where to write the collapsed map (default: <input>_collapsed.map)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Entity definitions, as a JSON list
    #[arg(long)]
    definitions: Option<PathBuf>,

    /// Directory to look up texture sizes in
    #[arg(long)]
    textures: Option<PathBuf>,

    /// Directory instance `file` keys are relative to (default: the input's directory)
    #[arg(long)]
    instances: Option<PathBuf>,

    /// Don't write solids
    #[arg(long)]
    no_solids: bool,

    /// Log more
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{}", full_error_display(err));
        process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new().build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .context("Error initialising logger")?;

    let definitions = Arc::new(load_definitions(args.definitions.as_deref())?);
    info!("Using {} entity definitions", definitions.len());

    match args.textures.clone() {
        Some(dir) => run(&args, definitions, FsResolver::new(dir)),
        None => run(&args, definitions, NoTextures),
    }
}

fn run<T: TextureResolver>(
    args: &Args,
    definitions: Arc<DefinitionDictionary>,
    mut textures: T,
) -> Result<()> {
    let options = LoadOptions::default();
    let map = Map::load(&args.input, definitions.clone(), &mut textures, &options)
        .with_context(|| format!("Error loading {}", args.input.display()))?;
    info!(
        "Loaded {} with {} entities",
        args.input.display(),
        map.entity_count()
    );

    let instance_root = match &args.instances {
        Some(dir) => dir.clone(),
        None => args
            .input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let mut resolver = FsMapResolver::new(instance_root, definitions, textures, options);

    let name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let collapsed = Collapser::new(&mut resolver, CollapseOptions::default())
        .collapse_named(&map, &name)
        .context("Error collapsing instances")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));
    fs::write(&output, collapsed.serialize(save_flags(args)))
        .with_context(|| format!("Error writing {}", output.display()))?;
    info!("Wrote {} entities to {}", collapsed.entity_count(), output.display());

    Ok(())
}

/// The standard definitions, plus any from `path`.
fn load_definitions(path: Option<&Path>) -> Result<DefinitionDictionary> {
    let mut definitions = standard_definitions();
    if let Some(path) = path {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Error reading definitions {}", path.display()))?;
        let loaded: Vec<Definition> = serde_json::from_str(&text)
            .with_context(|| format!("Error parsing definitions {}", path.display()))?;
        definitions.extend(loaded);
    }

    Ok(DefinitionDictionary::new(definitions))
}

fn save_flags(args: &Args) -> SaveFlags {
    let mut flags = SaveFlags::all();
    if args.no_solids {
        flags.remove(SaveFlags::SOLIDS);
    }
    flags
}

/// `dir/name.map` becomes `dir/name_collapsed.map`
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());
    input.with_file_name(format!("{}_collapsed.map", stem))
}
