use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Flatten JavaScript #include directives into fully expanded output files.",
	long_about = "jsinc is a source-inclusion preprocessor for JavaScript. It scans a directory \
	              tree for `*.compile.js` files whose first line carries a `// #compile` marker, \
	              resolves their `// #include` directives into a dependency graph, and writes \
	              fully expanded output files.\n\nQuick start:\n  jsinc init     Create a sample \
	              project\n  jsinc compile  Expand every root and write the outputs\n  jsinc \
	              list     Show discovered roots and their dependency order"
)]
pub struct JsincCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the directory (or single `*.compile.js` file) to compile.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize a sample project in the target directory.
	///
	/// Creates an `app.compile.js` compilation root, a `util.js` include, and
	/// a commented `jsinc.toml`. Files that already exist are left untouched.
	Init,
	/// Expand every compilation root and write the output files.
	///
	/// Walks the target for `*.compile.js` roots, resolves their `#include`
	/// directives into a dependency graph, expands every buffer in dependency
	/// order, and writes the finished files to their destinations. Broken
	/// includes degrade to inline annotations at their original line; the run
	/// only aborts on filesystem faults.
	Compile {
		/// Report what would be written without writing anything.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// With --dry-run: show a unified diff between the existing
		/// destination file and the new output.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Wrap every include splice in #region / #endregion markers, even
		/// when the directive itself did not ask for them.
		#[arg(long, default_value_t = false)]
		region: bool,
	},
	/// List discovered compilation roots and their dependency order.
	///
	/// Shows every root with its destination, followed by the full dependency
	/// table with inclusion levels (deepest first) — the exact order the
	/// substitution pass would process.
	List {
		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
