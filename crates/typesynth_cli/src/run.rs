//! The synthesize command: load, run both passes, write declarations

use crate::args::CliArgs;
use anyhow::{Context, Result};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use typesynth::{DtsGenerator, Library, SynthConfig, SynthesisReport, Synthesizer};
use walkdir::WalkDir;

/// Run the command with parsed arguments
pub fn run(args: &CliArgs) -> Result<SynthesisReport> {
    let config = match args.config {
        Some(ref path) => SynthConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SynthConfig::default(),
    };

    let mut primary = load_library(&args.library)?;

    let explicit = args
        .dependencies
        .iter()
        .map(|path| load_library(path))
        .collect::<Result<Vec<_>>>()?;
    let mut candidates = Vec::new();
    if let Some(ref dir) = args.deps_dir {
        for path in collect_documents(dir, &args.library)? {
            match load_library(&path) {
                Ok(library) => candidates.push(library),
                Err(err) => tracing::warn!("skipping {:#}", err),
            }
        }
    }
    let (mut dependencies, missing) = resolve_dependencies(&primary, explicit, candidates);
    for name in &missing {
        tracing::warn!("{} declares dependency {} but no document provides it", primary.name, name);
    }
    tracing::info!(
        "loaded {} with {} dependency librar(ies)",
        primary.name,
        dependencies.len()
    );

    let report = Synthesizer::new(config)
        .run(&mut primary, &mut dependencies)
        .with_context(|| format!("synthesizing declarations for {}", primary.name))?;

    let declarations = DtsGenerator::new(&primary).generate();
    match args.out {
        Some(ref path) => fs::write(path, declarations)
            .with_context(|| format!("writing declarations to {}", path.display()))?,
        None => io::stdout()
            .write_all(declarations.as_bytes())
            .context("writing declarations to stdout")?,
    }

    if let Some(ref path) = args.dump_json {
        let file = fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &primary)
            .with_context(|| format!("writing metadata to {}", path.display()))?;
        writer.flush()?;
    }

    Ok(report)
}

fn load_library(path: &Path) -> Result<Library> {
    Library::from_json_file(path).with_context(|| format!("loading library {}", path.display()))
}

/// Select the dependency libraries reachable from `primary`'s declared
/// dependencies, breadth first in declaration order.
///
/// Explicitly requested libraries are always kept and their own declarations
/// are followed too. Candidates nothing declares are ignored. When two
/// candidates share a name the first one wins. Returns the selected libraries
/// and the declared names no document provided.
fn resolve_dependencies(
    primary: &Library,
    explicit: Vec<Library>,
    candidates: Vec<Library>,
) -> (Vec<Library>, Vec<String>) {
    let mut pool: HashMap<String, Library> = HashMap::new();
    for library in candidates {
        if library.name == primary.name {
            continue;
        }
        match pool.entry(library.name.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!("library {} found twice, keeping the first document", library.name)
            }
            Entry::Vacant(slot) => {
                slot.insert(library);
            }
        }
    }

    let mut seen = HashSet::new();
    seen.insert(primary.name.clone());
    let mut queue: VecDeque<String> = primary.dependencies.iter().cloned().collect();
    let mut resolved = Vec::new();
    for library in explicit {
        seen.insert(library.name.clone());
        queue.extend(library.dependencies.iter().cloned());
        resolved.push(library);
    }

    let mut missing = Vec::new();
    while let Some(name) = queue.pop_front() {
        if !seen.insert(name.clone()) {
            continue;
        }
        match pool.remove(&name) {
            Some(library) => {
                queue.extend(library.dependencies.iter().cloned());
                resolved.push(library);
            }
            None => missing.push(name),
        }
    }

    for name in pool.keys() {
        tracing::debug!("ignoring undeclared library {}", name);
    }
    (resolved, missing)
}

/// Every `*.json` file under `dir`, sorted by path, excluding the primary document
fn collect_documents(dir: &Path, primary: &Path) -> Result<Vec<PathBuf>> {
    let primary = fs::canonicalize(primary).ok();
    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("scanning {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        if primary.is_some() && fs::canonicalize(path).ok() == primary {
            continue;
        }
        documents.push(path.to_path_buf());
    }
    Ok(documents)
}
