use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::JsincError;
use crate::JsincResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["jsinc.toml", ".jsinc.toml"];

/// Configuration loaded from `jsinc.toml` at the start directory.
///
/// ```toml
/// # gitignore-style patterns excluded from root discovery
/// exclude = ["vendor/**", "*.min.js"]
///
/// # wrap every include splice in #region / #endregion markers
/// region = true
///
/// # skip .gitignore integration during discovery
/// disable_gitignore = false
/// ```
///
/// Every field is optional; CLI flags override config values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsincConfig {
	/// Gitignore-style patterns excluded from root discovery, relative to the
	/// start directory.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// Wrap every include splice in region markers.
	#[serde(default)]
	pub region: bool,
	/// Disable `.gitignore` integration during discovery.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl JsincConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> JsincResult<Option<JsincConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: JsincConfig =
			toml::from_str(&content).map_err(|e| JsincError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}
}
