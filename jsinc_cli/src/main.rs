use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use jsinc_cli::Commands;
use jsinc_cli::JsincCli;
use jsinc_cli::OutputFormat;
use jsinc_core::AnyEmptyResult;
use jsinc_core::CompileOptions;
use jsinc_core::DiscoverOptions;
use jsinc_core::JsincConfig;
use jsinc_core::build_registry;
use jsinc_core::compile_roots;
use jsinc_core::discover_roots;
use jsinc_core::graph::DependencyArena;
use jsinc_core::parser::parse_root;
use jsinc_core::write_outputs;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = JsincCli::parse();

	// Respect NO_COLOR, the --no-color flag, and terminal detection.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	// `-v` raises core logging to debug; RUST_LOG still wins when set.
	let default_filter = if args.verbose { "jsinc=debug,jsinc_core=debug" } else { "warn" };
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
		)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.init();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Compile {
			dry_run,
			diff,
			region,
		}) => run_compile(&args, dry_run, diff, region),
		Some(Commands::List { format }) => run_list(&args, format),
		None => {
			eprintln!("No subcommand specified. Run `jsinc --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<jsinc_core::JsincError>() {
			Ok(jsinc_err) => {
				let report: miette::Report = (*jsinc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &JsincCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// The directory the config file and relative destinations resolve against:
/// the start directory itself, or a single file's parent.
fn base_dir(start: &Path) -> PathBuf {
	if start.is_dir() {
		start.to_path_buf()
	} else {
		start.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
	}
}

fn run_init(args: &JsincCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let source_path = root.join("app.compile.js");
	let include_path = root.join("util.js");
	let config_path = root.join("jsinc.toml");

	if source_path.exists() {
		println!("Compilation root already exists: {}", source_path.display());
	} else {
		let sample_source =
			"// #compile\n// #include \"util.js\"\n\nconsole.log(util.greet());\n";
		std::fs::write(&source_path, sample_source)?;
		println!("Created compilation root: {}", source_path.display());
	}

	if !include_path.exists() {
		let sample_include =
			"var util = {\n\tgreet: function () {\n\t\treturn \"Hello from jsinc!\";\n\t},\n};\n";
		std::fs::write(&include_path, sample_include)?;
		println!("Created include file: {}", include_path.display());
	}

	if !config_path.exists() {
		let sample_config = "# jsinc configuration\n\n# Gitignore-style patterns excluded from \
		                     root discovery.\n# exclude = [\"vendor/**\", \"*.min.js\"]\n\n# Wrap \
		                     every include splice in #region / #endregion markers.\n# region = \
		                     true\n\n# Skip .gitignore integration during discovery.\n# \
		                     disable_gitignore = false\n";
		std::fs::write(&config_path, sample_config)?;
		println!("Created jsinc.toml");
	}

	println!();
	println!("Next steps:");
	println!("  1. Add `// #include \"<file>\"` directives to app.compile.js");
	println!("  2. Run `jsinc compile` to write the expanded app.js");
	println!("  3. Run `jsinc list` to inspect the dependency order");

	Ok(())
}

fn run_compile(args: &JsincCli, dry_run: bool, diff: bool, region: bool) -> AnyEmptyResult {
	let start = resolve_root(args);
	let base = base_dir(&start);
	let config = JsincConfig::load(&base)?;

	let discover = DiscoverOptions::from_config(config.as_ref());
	let roots = discover_roots(&start, &discover)?;
	if roots.is_empty() {
		println!("No compilable files found.");
		return Ok(());
	}

	let options = CompileOptions {
		region: region || config.as_ref().is_some_and(|c| c.region),
		working_dir: None,
	};
	let run = compile_roots(&roots, &options)?;

	if dry_run {
		println!("Dry run: would write {} file(s):", run.outputs.len());
		for output in &run.outputs {
			println!(
				"  {} => {}",
				make_relative(&output.source, &base),
				make_relative(&output.destination, &base)
			);
			if diff {
				let current = std::fs::read_to_string(&output.destination).unwrap_or_default();
				print_diff(&current, &output.text);
			}
		}
		return Ok(());
	}

	write_outputs(&run.outputs)?;
	println!("Compiled {} file(s).", run.outputs.len());
	if args.verbose {
		for output in &run.outputs {
			println!(
				"  {} => {}",
				make_relative(&output.source, &base),
				make_relative(&output.destination, &base)
			);
		}
	}

	Ok(())
}

fn run_list(args: &JsincCli, format: OutputFormat) -> AnyEmptyResult {
	let start = resolve_root(args);
	let base = base_dir(&start);
	let config = JsincConfig::load(&base)?;

	let discover = DiscoverOptions::from_config(config.as_ref());
	let roots = discover_roots(&start, &discover)?;
	if roots.is_empty() {
		match format {
			OutputFormat::Json => println!("{}", serde_json::json!({ "roots": [], "files": [] })),
			OutputFormat::Text => println!("No compilable files found."),
		}
		return Ok(());
	}

	// Parse without substituting; listing must not rewrite anything.
	let working_dir = std::env::current_dir()?;
	let mut arena = DependencyArena::new();
	let mut keys = Vec::with_capacity(roots.len());
	for root in &roots {
		keys.push(parse_root(&mut arena, &root.source, &working_dir)?);
	}
	let registry = build_registry(&arena, &keys);

	match format {
		OutputFormat::Json => {
			let root_entries: Vec<serde_json::Value> = roots
				.iter()
				.map(|root| {
					serde_json::json!({
						"source": make_relative(&root.source, &base),
						"destination": make_relative(&root.destination, &base),
					})
				})
				.collect();
			let file_entries: Vec<serde_json::Value> = registry
				.descending_order()
				.iter()
				.map(|path| {
					serde_json::json!({
						"path": make_relative(path, &base),
						"level": registry.level(path),
					})
				})
				.collect();
			println!(
				"{}",
				serde_json::json!({ "roots": root_entries, "files": file_entries })
			);
		}
		OutputFormat::Text => {
			println!("{}", colored!("Roots:", bold));
			for root in &roots {
				println!(
					"  {} => {}",
					make_relative(&root.source, &base),
					make_relative(&root.destination, &base)
				);
			}

			println!();
			println!("{}", colored!("Dependency order (deepest first):", bold));
			for path in registry.descending_order() {
				let level = registry.level(&path).unwrap_or_default();
				let indent = "  ".repeat(level as usize);
				println!("  {level}  {indent}{}", make_relative(&path, &base));
			}

			println!(
				"\n{} root(s), {} file(s) in the graph",
				roots.len(),
				registry.len()
			);
		}
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
