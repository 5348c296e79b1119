//! Send Money - scripted session runner
//!
//! Plays newline-delimited tool calls against a single transfer session:
//!
//! ```text
//! ┌────────────┐    ┌───────────────┐    ┌──────────────┐    ┌──────────┐
//! │ tool calls │───▶│ TransferAgent │───▶│ stage policy │───▶│  stdout  │
//! │  (JSONL)   │    │  (operation)  │    │  (advance)   │    │ (JSONL)  │
//! └────────────┘    └───────────────┘    └──────────────┘    └──────────┘
//! ```
//!
//! Usage: `send-money [--env dev] [--script calls.jsonl] [--tools]`

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use anyhow::{Context, Result};
use serde_json::json;

use send_money::config::AppConfig;
use send_money::tools::{TransferAgent, tool_definitions};

fn get_arg(names: &[&str]) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if names.contains(&args[i].as_str()) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn get_env() -> String {
    get_arg(&["--env", "-e"]).unwrap_or_else(|| "dev".to_string())
}

fn print_tools_mode() -> bool {
    std::env::args().any(|a| a == "--tools")
}

fn main() -> Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = send_money::logging::init_logging(&app_config);

    tracing::info!("Starting send-money session runner in {} mode", env);

    let coordinator = app_config.coordinator()?;

    if print_tools_mode() {
        let defs = tool_definitions(coordinator.lookup());
        println!("{}", serde_json::to_string_pretty(&defs)?);
        return Ok(());
    }

    let agent = TransferAgent::new(coordinator);
    let mut session = agent.new_session();

    let input: Box<dyn BufRead> = match get_arg(&["--script", "-s"]) {
        Some(path) => Box::new(BufReader::new(
            File::open(&path).with_context(|| format!("Failed to open script {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut calls = 0usize;

    for line in input.lines() {
        let line = line.context("Failed to read tool call")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let response = agent.handle_json(&mut session, line);
        calls += 1;
        let record = json!({
            "response": response,
            "state": session.snapshot(),
        });
        writeln!(out, "{}", record)?;
    }

    tracing::info!(
        calls,
        stage = %session.stage(),
        "Session runner finished"
    );
    Ok(())
}
