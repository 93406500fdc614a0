use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::JsincResult;
use crate::discovery::CompileRoot;
use crate::graph::DependencyArena;
use crate::graph::IncludeTarget;
use crate::graph::Registry;
use crate::graph::build_registry;
use crate::parser::COMPILE_MARKER;
use crate::parser::display_name;
use crate::parser::normalize_line_endings;
use crate::parser::parse_root;

/// Options controlling a compile run.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
	/// Wrap every include splice in `#region` / `#endregion` markers, even
	/// when the directive itself did not ask for them.
	pub region: bool,
	/// Base directory for `~`-prefixed include paths and relative `#compile`
	/// destinations. Defaults to the process's working directory.
	pub working_dir: Option<PathBuf>,
}

/// A compilation root's finished output, ready to be written.
#[derive(Debug, Clone)]
pub struct CompiledRoot {
	pub source: PathBuf,
	pub destination: PathBuf,
	pub text: String,
}

/// The result of a full compile run over a set of roots.
#[derive(Debug)]
pub struct CompileRun {
	/// Finished output per compilation root, in root discovery order.
	pub outputs: Vec<CompiledRoot>,
	/// The leveled registry the substitution schedule was derived from.
	pub registry: Registry,
	/// The node arena, retained for inspection (`jsinc list`).
	pub arena: DependencyArena,
}

/// Run the whole pipeline over a set of discovered roots: parse every root
/// into a shared arena, fold the trees into one leveled registry, then
/// expand every buffer in descending level order.
///
/// The arena is shared across roots, so a file included by several roots is
/// parsed, read, and expanded exactly once.
pub fn compile_roots(roots: &[CompileRoot], options: &CompileOptions) -> JsincResult<CompileRun> {
	let working_dir = match &options.working_dir {
		Some(dir) => dir.clone(),
		None => std::env::current_dir()?,
	};

	let mut arena = DependencyArena::new();
	let mut root_keys = Vec::with_capacity(roots.len());
	for root in roots {
		let key = parse_root(&mut arena, &root.source, &working_dir)?;
		root_keys.push(key);
	}

	let registry = build_registry(&arena, &root_keys);
	debug!("File Dependency Order\n{}", registry.render_order());

	let finished = substitute(&arena, &registry, options)?;

	let outputs = roots
		.iter()
		.zip(&root_keys)
		.map(|(root, key)| {
			CompiledRoot {
				source: root.source.clone(),
				destination: root.destination.clone(),
				text: finished.get(key).cloned().unwrap_or_default(),
			}
		})
		.collect();

	Ok(CompileRun {
		outputs,
		registry,
		arena,
	})
}

/// Expand every registered node and return the finished text per node.
///
/// Nodes are processed in strictly descending level order — the algorithm's
/// core correctness property. Substitution copies a child's *current* buffer,
/// so a node's own directive lines must already be resolved before anything
/// shallower splices it in. Ties within a level are safe in any order: a
/// same-level dependency would violate the registry's level invariant.
pub fn substitute(
	arena: &DependencyArena,
	registry: &Registry,
	options: &CompileOptions,
) -> JsincResult<HashMap<PathBuf, String>> {
	let schedule = registry.descending_order();

	// Materialize every node's buffer by reading its raw lines exactly once.
	let mut buffers: HashMap<PathBuf, Vec<String>> = HashMap::new();
	for path in &schedule {
		let content = normalize_line_endings(&std::fs::read_to_string(path)?);
		buffers.insert(path.clone(), content.lines().map(str::to_string).collect());
	}

	for path in &schedule {
		let Some(node) = arena.get(path) else {
			continue;
		};
		let Some(mut buffer) = buffers.remove(path) else {
			continue;
		};

		for entry in &node.entries {
			let Some(slot) = entry.line.checked_sub(1).filter(|index| *index < buffer.len()) else {
				continue;
			};

			match &entry.target {
				IncludeTarget::Failed(message) => {
					// A broken include stays visible as a comment at its
					// exact original position.
					buffer[slot] = message.clone();
				}
				IncludeTarget::Resolved(child) => {
					let Some(child_buffer) = buffers.get(child) else {
						continue;
					};
					let block = child_buffer.join("\n");
					buffer[slot] = if entry.region || options.region {
						wrap_region(child, &block)
					} else {
						block
					};
				}
			}
		}

		// A root that still opens with its own compile marker after every
		// substitution gets a banner recording compile time and tool
		// identity. The check is deliberately performed on the
		// post-substitution first line.
		if buffer.first().is_some_and(|line| line.trim().starts_with(COMPILE_MARKER)) {
			buffer[0] = banner_line();
		}

		buffers.insert(path.clone(), buffer);
	}

	Ok(buffers
		.into_iter()
		.map(|(path, lines)| (path, lines.join("\n")))
		.collect())
}

/// Wrap a spliced block in named begin/end markers.
fn wrap_region(child: &Path, block: &str) -> String {
	let name = display_name(child);
	format!("// #region {name} \n{block}\n\n// #endregion {name}\n")
}

fn banner_line() -> String {
	let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
	format!("// compiled @ {now} by jsinc compiler")
}

/// Persist every finished root to its destination, creating intermediate
/// destination directories first. Outputs written before a later fault are
/// not retracted.
pub fn write_outputs(outputs: &[CompiledRoot]) -> JsincResult<()> {
	for output in outputs {
		if let Some(parent) = output.destination.parent() {
			if !parent.exists() {
				debug!("creating path {}", parent.display());
				std::fs::create_dir_all(parent)?;
			}
		}
		debug!("writing file {}", output.destination.display());
		std::fs::write(&output.destination, &output.text)?;
	}
	Ok(())
}
