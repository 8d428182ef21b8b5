use std::process::{Command, Output};

pub fn run_clicker(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_clicker"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}
