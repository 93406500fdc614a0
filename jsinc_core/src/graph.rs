use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// How a file entered the dependency graph.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
	/// A compilation entry point (carries a `// #compile` first line).
	Root,
	/// Included by another file.
	Direct,
	/// Created but not yet classified.
	#[default]
	Unresolved,
}

/// The outcome of resolving a single `#include` directive line.
///
/// Resolution failures are data, not errors: the stored message is spliced
/// into the output verbatim at the directive's original line position.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum IncludeTarget {
	/// The directive resolved to a node in the arena, keyed by canonical path.
	Resolved(PathBuf),
	/// The directive could not be resolved; the message replaces the line.
	Failed(String),
}

/// One directive line within a file: its 1-indexed line number, the
/// resolution outcome, and whether this splice requested region wrapping.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LineEntry {
	pub line: usize,
	pub target: IncludeTarget,
	pub region: bool,
}

/// One physical file participating in the dependency graph.
///
/// A file included from several places resolves to the same node: the arena
/// key is the canonical absolute path. `children` holds only successfully
/// resolved includes, in order of appearance; failed directives live solely
/// in `entries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyNode {
	/// Canonical absolute path; the node's arena key.
	pub path: PathBuf,
	pub kind: NodeKind,
	/// Every directive line of the file, in file order.
	pub entries: Vec<LineEntry>,
	/// Arena keys of directly included nodes, in order of appearance.
	pub children: Vec<PathBuf>,
}

impl DependencyNode {
	pub fn new(path: PathBuf, kind: NodeKind) -> Self {
		Self {
			path,
			kind,
			entries: Vec::new(),
			children: Vec::new(),
		}
	}
}

/// Sole owner of every [`DependencyNode`] in a compile run, keyed by
/// canonical path. Children are lookups into the arena rather than owned
/// pointers, so a node reachable from multiple parents exists exactly once.
#[derive(Debug, Default)]
pub struct DependencyArena {
	nodes: HashMap<PathBuf, DependencyNode>,
}

impl DependencyArena {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, node: DependencyNode) {
		self.nodes.insert(node.path.clone(), node);
	}

	pub fn get(&self, path: &Path) -> Option<&DependencyNode> {
		self.nodes.get(path)
	}

	pub fn contains(&self, path: &Path) -> bool {
		self.nodes.contains_key(path)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Iterate over every node in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = &DependencyNode> {
		self.nodes.values()
	}
}

/// Mapping from canonical path to inclusion level.
///
/// A node's level is the length of the *longest* inclusion chain from any
/// compilation root (roots sit at level 0). For every edge the invariant
/// `level(child) >= level(parent) + 1` holds, which is what makes the
/// descending-level substitution schedule safe: same-level nodes can never
/// depend on one another.
#[derive(Debug, Default)]
pub struct Registry {
	levels: HashMap<PathBuf, u32>,
}

impl Registry {
	/// The level assigned to a registered node.
	pub fn level(&self, path: &Path) -> Option<u32> {
		self.levels.get(path).copied()
	}

	pub fn len(&self) -> usize {
		self.levels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.levels.is_empty()
	}

	/// Iterate over registered `(path, level)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&Path, u32)> {
		self.levels.iter().map(|(path, level)| (path.as_path(), *level))
	}

	/// The explicit substitution schedule: every registered path sorted by
	/// level descending (most deeply included first), path ascending within a
	/// level for determinism.
	pub fn descending_order(&self) -> Vec<PathBuf> {
		let mut order: Vec<_> = self.levels.iter().collect();
		order.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
		order.into_iter().map(|(path, _)| path.clone()).collect()
	}

	/// Indented one-line-per-file rendering of the schedule, used for debug
	/// logging and `jsinc list`.
	pub fn render_order(&self) -> String {
		let mut out = String::new();
		for path in self.descending_order() {
			let level = self.level(&path).unwrap_or_default();
			let indent = (level as usize) * 2;
			out.push_str(&format!("{level:<width$}{}\n", path.display(), width = indent + 5));
		}
		out
	}
}

/// Fold one or more compilation roots into a single leveled [`Registry`].
///
/// Roots register at level 0; a node reached at recursion depth `d` from its
/// root is proposed at level `d`. An existing registration with a level at
/// least as large wins; a smaller one is raised and the increase propagates
/// to the node's own children. Levels only ever increase and the arena is
/// cycle-free by construction, so the walk terminates.
pub fn build_registry(arena: &DependencyArena, roots: &[PathBuf]) -> Registry {
	let mut levels: HashMap<PathBuf, u32> = HashMap::new();

	for root in roots {
		levels.insert(root.clone(), 0);
	}
	for root in roots {
		if let Some(node) = arena.get(root) {
			register_children(arena, node, 1, &mut levels);
		}
	}

	Registry { levels }
}

fn register_children(
	arena: &DependencyArena,
	node: &DependencyNode,
	level: u32,
	levels: &mut HashMap<PathBuf, u32>,
) {
	for child in &node.children {
		if levels.get(child).is_some_and(|existing| *existing >= level) {
			continue;
		}
		levels.insert(child.clone(), level);
		if let Some(child_node) = arena.get(child) {
			register_children(arena, child_node, level + 1, levels);
		}
	}
}
