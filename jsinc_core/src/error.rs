use miette::Diagnostic;
use thiserror::Error;

/// Fatal failures for a compile run. Per-line include problems (missing
/// files, invalid path characters, circular references) are *not* errors —
/// they degrade the offending line to an inline annotation and the run
/// continues. Only filesystem faults and configuration problems abort.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum JsincError {
	#[error(transparent)]
	#[diagnostic(code(jsinc::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(jsinc::config_parse),
		help(
			"check that jsinc.toml is valid TOML with `exclude`, `region`, and `disable_gitignore` \
			 keys"
		)
	)]
	ConfigParse(String),

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(jsinc::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },

	#[error("invalid compile destination `{path}`: {reason}")]
	#[diagnostic(
		code(jsinc::invalid_destination),
		help("the `// #compile` argument must be a directory or a `.js` file path")
	)]
	InvalidDestination { path: String, reason: String },
}

pub type JsincResult<T> = Result<T, JsincError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
