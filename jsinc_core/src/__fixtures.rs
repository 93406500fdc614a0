use std::path::Path;
use std::path::PathBuf;

use crate::CompileOptions;
use crate::CompileRun;
use crate::DiscoverOptions;
use crate::JsincResult;
use crate::compile_roots;
use crate::discover_roots;

/// Write a file under `root`, creating intermediate directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}

/// Discover and compile every root under `root` with default options, using
/// `root` as the working directory for `~`-prefixed includes.
pub fn compile_dir(root: &Path) -> JsincResult<CompileRun> {
	compile_dir_with(
		root,
		&CompileOptions {
			region: false,
			working_dir: Some(root.to_path_buf()),
		},
	)
}

/// Discover and compile every root under `root` with the given options.
pub fn compile_dir_with(root: &Path, options: &CompileOptions) -> JsincResult<CompileRun> {
	let roots = discover_roots(root, &DiscoverOptions::default())?;
	compile_roots(&roots, options)
}

/// The finished text of the single output whose source file name matches.
pub fn output_text(run: &CompileRun, source_name: &str) -> String {
	run.outputs
		.iter()
		.find(|output| {
			output
				.source
				.file_name()
				.is_some_and(|name| name.to_string_lossy() == source_name)
		})
		.map(|output| output.text.clone())
		.unwrap_or_else(|| panic!("no output for source {source_name}"))
}
