use assert_cmd::Command;

pub fn jsinc_cmd() -> Command {
	let mut cmd =
		Command::cargo_bin("jsinc").unwrap_or_else(|e| panic!("failed to locate jsinc binary: {e}"));
	cmd.env("NO_COLOR", "1");
	cmd
}
