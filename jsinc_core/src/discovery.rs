use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use tracing::debug;
use tracing::info;

use crate::JsincError;
use crate::JsincResult;
use crate::config::JsincConfig;
use crate::parser::COMPILE_MARKER;
use crate::parser::find_invalid_path_char;

/// Suffix identifying a compilation root candidate.
pub const COMPILE_SUFFIX: &str = ".compile.js";

/// A compilation entry point paired with the destination its output will be
/// written to.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompileRoot {
	pub source: PathBuf,
	pub destination: PathBuf,
}

/// Options controlling root discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
	/// Gitignore-style patterns to exclude from the walk.
	pub exclude_patterns: Vec<String>,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl DiscoverOptions {
	/// Construct [`DiscoverOptions`] from a loaded [`JsincConfig`].
	pub fn from_config(config: Option<&JsincConfig>) -> Self {
		Self {
			exclude_patterns: config.map(|c| c.exclude.clone()).unwrap_or_default(),
			disable_gitignore: config.is_some_and(|c| c.disable_gitignore),
		}
	}
}

/// Enumerate compilation roots under `start`.
///
/// A directory start walks the tree for `*.compile.js` files whose first
/// line carries the `// #compile` marker. A `*.compile.js` file start yields
/// that single candidate; any other file yields nothing. Candidates are
/// returned in sorted path order for deterministic output.
pub fn discover_roots(start: &Path, options: &DiscoverOptions) -> JsincResult<Vec<CompileRoot>> {
	let mut candidates = Vec::new();

	if start.is_dir() {
		let gitignore = if options.disable_gitignore {
			Gitignore::empty()
		} else {
			build_gitignore(start)
		};
		let custom_exclude = build_exclude_matcher(start, &options.exclude_patterns)?;
		let mut visited_dirs = HashSet::new();

		walk_dir(start, &mut candidates, &gitignore, &custom_exclude, &mut visited_dirs)?;
		candidates.sort();
	} else if is_compile_candidate(start) {
		candidates.push(start.to_path_buf());
	} else {
		info!("nothing to do for {}", start.display());
		return Ok(Vec::new());
	}

	let base_dir = if start.is_dir() {
		start.to_path_buf()
	} else {
		start.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
	};

	let mut roots = Vec::new();
	for candidate in candidates {
		if let Some(root) = process_candidate(&candidate, &base_dir)? {
			roots.push(root);
		}
	}

	Ok(roots)
}

fn is_compile_candidate(path: &Path) -> bool {
	path.file_name()
		.and_then(|name| name.to_str())
		.is_some_and(|name| name.ends_with(COMPILE_SUFFIX))
}

/// Confirm a candidate's first line carries the compile marker and resolve
/// its destination from the marker's argument.
fn process_candidate(source: &Path, base_dir: &Path) -> JsincResult<Option<CompileRoot>> {
	let content = std::fs::read_to_string(source)?;
	let Some(first_line) = content.lines().next() else {
		return Ok(None);
	};
	let Some(argument) = first_line.trim().strip_prefix(COMPILE_MARKER) else {
		debug!("skipping {}: no compile marker on first line", source.display());
		return Ok(None);
	};

	let destination = resolve_destination(source, argument.trim(), base_dir)?;
	info!("{} => {}", source.display(), destination.display());

	Ok(Some(CompileRoot {
		source: source.to_path_buf(),
		destination,
	}))
}

/// Resolve the output path for a root from its `#compile` argument.
///
/// - no argument: alongside the source, with the `.compile` marker stripped
///   from the name (`app.compile.js` => `app.js`);
/// - a `.js` path: exactly that file;
/// - anything else: treated as a directory, default name as above.
///
/// Relative destinations resolve against the discovery start directory.
fn resolve_destination(source: &Path, argument: &str, base_dir: &Path) -> JsincResult<PathBuf> {
	let default_name = default_output_name(source);

	if argument.is_empty() {
		let dir = source.parent().map_or_else(|| base_dir.to_path_buf(), Path::to_path_buf);
		return Ok(dir.join(default_name));
	}

	if let Some((column, bad)) = find_invalid_path_char(argument) {
		return Err(JsincError::InvalidDestination {
			path: argument.to_string(),
			reason: format!("invalid character `{bad}` @ column {column}"),
		});
	}

	let normalized = argument.replace('\\', "/");
	let raw = PathBuf::from(&normalized);
	let absolute = if raw.is_absolute() { raw } else { base_dir.join(raw) };

	if normalized.ends_with(".js") {
		Ok(absolute)
	} else {
		Ok(absolute.join(default_name))
	}
}

/// `app.compile.js` => `app.js`. Falls back to the source file name when the
/// marker suffix is absent (single-file invocations are pre-filtered, so
/// this only guards against exotic names).
fn default_output_name(source: &Path) -> String {
	let name = source
		.file_name()
		.map_or_else(String::new, |name| name.to_string_lossy().into_owned());
	name.strip_suffix(COMPILE_SUFFIX)
		.map_or(name.clone(), |stem| format!("{stem}.js"))
}

/// Build a `Gitignore` matcher from exclude patterns in `jsinc.toml`. These
/// follow `.gitignore` syntax and are applied on top of any `.gitignore`
/// rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> JsincResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder
			.add_line(None, pattern)
			.map_err(|e| JsincError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}")))?;
	}
	builder
		.build()
		.map_err(|e| JsincError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the start directory's `.gitignore` (if
/// any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn walk_dir(
	dir: &Path,
	candidates: &mut Vec<PathBuf>,
	gitignore: &Gitignore,
	custom_exclude: &Gitignore,
	visited_dirs: &mut HashSet<PathBuf>,
) -> JsincResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Detect symlink cycles by tracking canonical paths.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(JsincError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			if is_ignored_directory_name(name) {
				continue;
			}
		}

		let is_dir = path.is_dir();

		if gitignore.matched(&path, is_dir).is_ignore() {
			continue;
		}
		if custom_exclude.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_dir(&path, candidates, gitignore, custom_exclude, visited_dirs)?;
		} else if is_compile_candidate(&path) {
			candidates.push(path);
		}
	}

	Ok(())
}
