use std::{env, env::VarError};

const HELP: &str = include_str!("./cli-help.txt");

/// Every variable the server reads. None of them hold secrets, so all are safe to print.
const CONFIG_ENVS: [&str; 11] = [
    "RUST_LOG",
    "DRINKS_HOST",
    "DRINKS_PORT",
    "DRINKS_DATABASE_URL",
    "DRINKS_AUTH0_DOMAIN",
    "DRINKS_API_AUDIENCE",
    "DRINKS_JWKS_URL",
    "DRINKS_JWKS_FILE",
    "DRINKS_JWKS_CACHE_TTL",
    "DRINKS_RESET_DB",
    "DRINKS_SEED_DB",
];

/// The server takes no arguments. If any are given, the help text and current configuration are printed and `true`
/// is returned, in which case the caller should exit.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        println!("\n{HELP}\n");
        println!("Current environment values:");
        for line in env_summary() {
            println!("{line}");
        }
    }
    has_cli_args
}

fn env_summary() -> Vec<String> {
    CONFIG_ENVS.iter().map(|&name| format!("  {name:<35} {:<15}", env_value(name))).collect()
}

fn env_value(name: &str) -> String {
    match env::var(name) {
        Ok(s) => s,
        Err(VarError::NotPresent) => "Not set".into(),
        Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
    }
}
