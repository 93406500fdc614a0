mod common;

use jsinc_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn compile_writes_expanded_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("app.compile.js"),
		"// #compile\n// #include \"util.js\"\nvar app = 1;\n",
	)?;
	std::fs::write(tmp.path().join("util.js"), "var util = 2;\n")?;

	let mut cmd = common::jsinc_cmd();
	cmd.arg("compile")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Compiled 1 file(s)."));

	let output = std::fs::read_to_string(tmp.path().join("app.js"))?;
	assert!(output.starts_with("// compiled @ "));
	assert!(output.contains("var util = 2;"));
	assert!(output.contains("var app = 1;"));
	assert!(!output.contains("#include"));

	Ok(())
}

#[test]
fn compile_dry_run_writes_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("app.compile.js"), "// #compile\nvar app = 1;\n")?;

	let mut cmd = common::jsinc_cmd();
	cmd.arg("compile")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("Dry run: would write 1 file(s):")
				.and(predicates::str::contains("app.js")),
		);

	assert!(!tmp.path().join("app.js").exists());

	Ok(())
}

#[test]
fn compile_annotates_missing_includes_inline() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("app.compile.js"),
		"// #compile\n// #include \"missing.js\"\nvar app = 1;\n",
	)?;

	let mut cmd = common::jsinc_cmd();
	cmd.arg("compile").arg("--path").arg(tmp.path()).assert().success();

	let output = std::fs::read_to_string(tmp.path().join("app.js"))?;
	assert!(output.contains("// #include \"missing.js\" => File does not exists"));
	assert!(output.contains("var app = 1;"));

	Ok(())
}

#[test]
fn compile_region_flag_wraps_splices() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("app.compile.js"),
		"// #compile\n// #include \"util.js\"\n",
	)?;
	std::fs::write(tmp.path().join("util.js"), "var util = 2;\n")?;

	let mut cmd = common::jsinc_cmd();
	cmd.arg("compile")
		.arg("--region")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let output = std::fs::read_to_string(tmp.path().join("app.js"))?;
	assert!(output.contains("// #region util.js"));
	assert!(output.contains("// #endregion util.js"));

	Ok(())
}

#[test]
fn compile_reads_region_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("jsinc.toml"), "region = true\n")?;
	std::fs::write(
		tmp.path().join("app.compile.js"),
		"// #compile\n// #include \"util.js\"\n",
	)?;
	std::fs::write(tmp.path().join("util.js"), "var util = 2;\n")?;

	let mut cmd = common::jsinc_cmd();
	cmd.arg("compile").arg("--path").arg(tmp.path()).assert().success();

	let output = std::fs::read_to_string(tmp.path().join("app.js"))?;
	assert!(output.contains("// #region util.js"));

	Ok(())
}

#[test]
fn compile_with_no_roots_reports_nothing_to_do() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("plain.js"), "var plain = 1;\n")?;

	let mut cmd = common::jsinc_cmd();
	cmd.arg("compile")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No compilable files found."));

	Ok(())
}

#[test]
fn compile_excludes_configured_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("jsinc.toml"), "exclude = [\"vendor/**\"]\n")?;
	std::fs::write(tmp.path().join("keep.compile.js"), "// #compile\nvar keep = 1;\n")?;
	std::fs::create_dir_all(tmp.path().join("vendor"))?;
	std::fs::write(
		tmp.path().join("vendor/skip.compile.js"),
		"// #compile\nvar skip = 1;\n",
	)?;

	let mut cmd = common::jsinc_cmd();
	cmd.arg("compile")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Compiled 1 file(s)."));

	assert!(tmp.path().join("keep.js").is_file());
	assert!(!tmp.path().join("vendor/skip.js").exists());

	Ok(())
}
