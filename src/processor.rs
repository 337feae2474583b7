use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::models::{Definition, DefinitionDocument};
use crate::transformations::Transformation;

/// Where and how results are written.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Output directory; `None` rewrites every input in place.
    pub output_dir: Option<PathBuf>,
    /// Only these definitions are transformed. Empty means all of them.
    pub only: Vec<String>,
    pub stdout: bool,
    pub verbose: bool,
}

/// Entry point for processing: handles single file or directory.
pub fn run<T>(input: &Path, transformer: &T, options: &RunOptions) -> Result<()>
where
    T: Transformation<Definition> + Sync + ?Sized,
{
    let results = process_files(input, transformer, options)?;
    let total = results.len();

    let mut rendered = Vec::with_capacity(total);
    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(text) => rendered.push((path, text)),
            Err(e) => {
                crate::logger!("Error: {:#}", e);
                failed += 1;
            }
        }
    }

    if options.stdout && !rendered.is_empty() {
        let listing = stdout_listing(&rendered);
        let mut out = std::io::stdout().lock();
        out.write_all(listing.as_bytes())
            .and_then(|_| out.flush())
            .context("Failed to write to stdout")?;
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, total);
    }

    Ok(())
}

/// Transforms every JSON file found at `input`.
///
/// Returns each file's rendered document in discovery order. Files are only
/// written to disk when `options.stdout` is off.
pub fn process_files<T>(
    input: &Path,
    transformer: &T,
    options: &RunOptions,
) -> Result<Vec<(PathBuf, Result<String>)>>
where
    T: Transformation<Definition> + Sync + ?Sized,
{
    let files = collect_json_files(input, options.output_dir.as_deref())?;

    if files.is_empty() {
        crate::logger!("No JSON files found in: {}", input.display());
        return Ok(Vec::new());
    }

    if options.verbose {
        crate::logger!(
            "Processing {} JSON file(s) using {} threads...",
            files.len(),
            rayon::current_num_threads()
        );
    }

    // One file per task; definitions inside a file are handled in order.
    let results: Vec<Result<String>> = files
        .par_iter()
        .map(|file_path| process_single_file(input, file_path, transformer, options, files.len()))
        .collect();

    Ok(files.into_iter().zip(results).collect())
}

/// Joins rendered documents for stdout.
///
/// A single document is printed as-is. Several documents are each preceded
/// by a `// FILE: <path>` line, so the combined output is not one JSON value.
pub fn stdout_listing(rendered: &[(PathBuf, String)]) -> String {
    if let [(_, text)] = rendered {
        return text.clone();
    }

    let mut listing = String::new();
    for (path, text) in rendered {
        listing.push_str(&format!("// FILE: {}\n", path.display()));
        listing.push_str(text);
    }
    listing
}

/// Collect all .json files from the given path (file or directory),
/// skipping anything below `exclude`.
pub fn collect_json_files(input: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        anyhow::bail!("Input path does not exist: {}", input.display());
    }

    if input.is_file() {
        if is_json(input) {
            return Ok(vec![input.to_path_buf()]);
        } else {
            return Ok(vec![]);
        }
    }

    // Writing back into INPUT itself is in-place mode, not a nested output tree.
    let root = std::fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve {}", input.display()))?;
    let excluded = exclude
        .and_then(|dir| std::fs::canonicalize(dir).ok())
        .filter(|dir| *dir != root);

    let mut json_files = Vec::new();
    let walker = WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match &excluded {
            Some(dir) if entry.file_type().is_dir() => {
                std::fs::canonicalize(entry.path()).map_or(true, |path| path != *dir)
            }
            _ => true,
        });

    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_file() && is_json(path) {
            json_files.push(path.to_path_buf());
        }
    }
    Ok(json_files)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

/// Applies `transformer` to each selected definition, in document order.
/// Returns how many definitions were transformed.
pub fn transform_document<T>(
    document: &mut DefinitionDocument,
    transformer: &T,
    only: &[String],
    verbose: bool,
) -> usize
where
    T: Transformation<Definition> + ?Sized,
{
    let mut transformed = 0;
    for (name, definition) in &mut document.definitions {
        let name = name.as_str();
        if !only.is_empty() && !only.iter().any(|n| n == name) {
            continue;
        }
        transformer.transform(name, definition);
        transformed += 1;
    }

    if verbose {
        for wanted in only {
            if document.get(wanted).is_none() {
                crate::logger!("Definition not found: {}", wanted);
            }
        }
    }

    transformed
}

/// Transform one file, write it unless printing to stdout, and return the
/// rendered document.
fn process_single_file<T>(
    input_root: &Path,
    input_path: &Path,
    transformer: &T,
    options: &RunOptions,
    total_files: usize,
) -> Result<String>
where
    T: Transformation<Definition> + ?Sized,
{
    let start = std::time::Instant::now();

    if options.verbose || total_files > 1 {
        crate::logger!("Transforming: {}", input_path.display());
    }

    let text = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;
    let mut document = DefinitionDocument::from_json_str(&text)
        .with_context(|| format!("Failed to parse {}", input_path.display()))?;

    let count = transform_document(&mut document, transformer, &options.only, options.verbose);
    let output = document.to_json_string()?;

    if options.stdout {
        return Ok(output);
    }

    let output_path = output_path_for(input_root, input_path, options.output_dir.as_deref());
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    write_atomically(&output_path, &output)?;

    if options.verbose || total_files > 1 {
        crate::logger!(
            "Finished: {} ({} definition(s)) in {:.2?}",
            output_path.display(),
            count,
            start.elapsed()
        );
    } else {
        crate::logger!("Written: {}", output_path.display());
    }

    Ok(output)
}

/// Writes through a sibling temp file renamed over `path`, so an existing
/// file is never left truncated.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .with_context(|| format!("Failed to write to {}", tmp.path().display()))?;

    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    tmp.persist(path)
        .with_context(|| format!("Failed to write to {}", path.display()))?;
    Ok(())
}

/// Mirrors the input layout below `output_dir`, or rewrites in place.
fn output_path_for(input_root: &Path, input_path: &Path, output_dir: Option<&Path>) -> PathBuf {
    let Some(out_dir) = output_dir else {
        return input_path.to_path_buf();
    };

    match input_path.strip_prefix(input_root) {
        Ok(relative) if !relative.as_os_str().is_empty() => out_dir.join(relative),
        _ => out_dir.join(input_path.file_name().unwrap_or_default()),
    }
}
