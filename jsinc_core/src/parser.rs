use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::JsincResult;
use crate::graph::DependencyArena;
use crate::graph::DependencyNode;
use crate::graph::IncludeTarget;
use crate::graph::LineEntry;
use crate::graph::NodeKind;

/// Marker carried by the first line of every compilation root.
pub const COMPILE_MARKER: &str = "// #compile";

/// Keyword that turns a comment line into an include directive. The match is
/// case-sensitive and exact, including the trailing space before the path.
pub const INCLUDE_KEYWORD: &str = "#include ";

/// Characters that can never appear in a filesystem path argument. Control
/// characters are rejected as well.
const INVALID_PATH_CHARS: [char; 4] = ['<', '>', '|', '"'];

/// An `#include` directive recognized on a single line: the raw path
/// argument (quotes stripped) and whether the directive requested region
/// wrapping for its splice.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IncludeDirective {
	pub path: String,
	pub region: bool,
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}

/// Recognize an include directive on a single line.
///
/// A line is a directive only if, after trimming, it starts with the `//`
/// comment marker followed by the exact `#include ` keyword and a path
/// argument. Quote characters are stripped from the argument and an optional
/// trailing bare word `region` requests region wrapping. Anything else is
/// ordinary content and returns `None`.
pub fn parse_include_directive(line: &str) -> Option<IncludeDirective> {
	let trimmed = line.trim();
	let comment = trimmed.strip_prefix("//")?.trim();
	let argument = comment.strip_prefix(INCLUDE_KEYWORD)?;
	let mut path = argument.replace(['"', '\''], "").trim().to_string();

	let mut region = false;
	if let Some(stripped) = path.strip_suffix("region") {
		// Only treat `region` as a flag when it is a separate trailing word,
		// not part of the file name.
		if stripped.ends_with(char::is_whitespace) {
			region = true;
			path = stripped.trim_end().to_string();
		}
	}

	if path.is_empty() {
		return None;
	}

	Some(IncludeDirective { path, region })
}

/// Find the first filesystem-invalid character in a raw path argument.
/// Returns the character and its column (0-indexed within the argument).
pub fn find_invalid_path_char(path: &str) -> Option<(usize, char)> {
	path.chars()
		.enumerate()
		.find(|(_, c)| c.is_control() || INVALID_PATH_CHARS.contains(c))
}

/// Resolve an include path argument to a candidate filesystem path, without
/// touching the filesystem.
///
/// Forward and backward slashes are both accepted. A leading `~/` (or `~\`)
/// prefix resolves the remainder against `working_dir` — the process's
/// working directory in a normal run — instead of `search_root`, the
/// including file's own directory. Absolute paths pass through unchanged.
pub fn resolve_include_path(raw: &str, search_root: &Path, working_dir: &Path) -> PathBuf {
	let normalized = raw.replace('\\', "/");

	if let Some(rest) = normalized.strip_prefix("~/") {
		return working_dir.join(rest);
	}

	let candidate = PathBuf::from(&normalized);
	if candidate.is_absolute() {
		candidate
	} else {
		search_root.join(candidate)
	}
}

/// Parse a compilation root file and, recursively, everything it includes,
/// registering every reached file in the arena. Returns the root's arena key
/// (its canonical path).
///
/// Include problems never abort the parse: a bad directive degrades to a
/// [`IncludeTarget::Failed`] entry on its own line while the rest of the
/// file, and the rest of the run, continue. Only read faults return `Err`.
pub fn parse_root(
	arena: &mut DependencyArena,
	source: &Path,
	working_dir: &Path,
) -> JsincResult<PathBuf> {
	let canonical = source.canonicalize()?;
	if !arena.contains(&canonical) {
		let mut ancestors = Vec::new();
		parse_file(arena, &canonical, NodeKind::Root, &mut ancestors, working_dir)?;
	}
	Ok(canonical)
}

/// Parse one file into the arena. `ancestors` is the inclusion chain from
/// the current root down to (after the push below) this file, used for cycle
/// detection.
fn parse_file(
	arena: &mut DependencyArena,
	canonical: &Path,
	kind: NodeKind,
	ancestors: &mut Vec<PathBuf>,
	working_dir: &Path,
) -> JsincResult<()> {
	let file_name = display_name(canonical);
	debug!("parsing {}", canonical.display());

	// Read the whole file up front so no handle is held across the
	// recursive descent into included files.
	let content = normalize_line_endings(&std::fs::read_to_string(canonical)?);
	let search_root = canonical.parent().map(Path::to_path_buf).unwrap_or_default();

	let mut node = DependencyNode::new(canonical.to_path_buf(), kind);
	ancestors.push(canonical.to_path_buf());

	for (index, line) in content.lines().enumerate() {
		let number = index + 1;
		let Some(directive) = parse_include_directive(line) else {
			continue;
		};

		if let Some((column, bad)) = find_invalid_path_char(&directive.path) {
			warn!("{file_name} LN:{number} CLM:{column} => invalid character `{bad}` in {line}");
			node.entries.push(LineEntry {
				line: number,
				target: IncludeTarget::Failed(format!("{line} => Invalid character @ column {column}")),
				region: directive.region,
			});
			continue;
		}

		let candidate = resolve_include_path(&directive.path, &search_root, working_dir);
		if !candidate.is_file() {
			warn!("{file_name} LN:{number} => File does not exists \"{}\"", directive.path);
			node.entries.push(LineEntry {
				line: number,
				target: IncludeTarget::Failed(format!("{line} => File does not exists")),
				region: directive.region,
			});
			continue;
		}

		let target = candidate.canonicalize()?;
		if ancestors.contains(&target) {
			warn!(
				"{file_name} LN:{number} => Circular reference detected! \"{}\"",
				target.display()
			);
			node.entries.push(LineEntry {
				line: number,
				target: IncludeTarget::Failed(format!("{line} => circular reference detected")),
				region: directive.region,
			});
			continue;
		}

		// A node reached earlier through another chain (or another root) is
		// linked without re-parsing.
		if !arena.contains(&target) {
			parse_file(arena, &target, NodeKind::Direct, ancestors, working_dir)?;
		}

		node.children.push(target.clone());
		node.entries.push(LineEntry {
			line: number,
			target: IncludeTarget::Resolved(target),
			region: directive.region,
		});
	}

	ancestors.pop();
	arena.insert(node);
	Ok(())
}

/// File name component for log messages, falling back to the full path.
pub(crate) fn display_name(path: &Path) -> String {
	path.file_name()
		.map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
