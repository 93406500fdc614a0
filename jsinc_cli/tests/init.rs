mod common;

use jsinc_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn init_scaffolds_sample_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::jsinc_cmd();
	cmd.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("Created compilation root:")
				.and(predicates::str::contains("Created include file:"))
				.and(predicates::str::contains("Created jsinc.toml"))
				.and(predicates::str::contains("Next steps:")),
		);

	assert!(tmp.path().join("app.compile.js").exists());
	assert!(tmp.path().join("util.js").exists());
	assert!(tmp.path().join("jsinc.toml").exists());

	Ok(())
}

#[test]
fn init_leaves_existing_files_alone() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("app.compile.js");
	std::fs::write(&source, "// #compile\nvar mine = true;\n")?;

	let mut cmd = common::jsinc_cmd();
	cmd.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Compilation root already exists:"));

	let content = std::fs::read_to_string(&source)?;
	assert_eq!(content, "// #compile\nvar mine = true;\n");

	Ok(())
}

#[test]
fn init_then_compile_produces_runnable_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut init = common::jsinc_cmd();
	init.arg("init").arg("--path").arg(tmp.path()).assert().success();

	let mut compile = common::jsinc_cmd();
	compile
		.arg("compile")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Compiled 1 file(s)."));

	let output = std::fs::read_to_string(tmp.path().join("app.js"))?;
	assert!(output.contains("Hello from jsinc!"));
	assert!(output.contains("console.log(util.greet());"));
	assert!(!output.contains("#include"));

	Ok(())
}
