//! validate-config: check a focuslock config file and print the effective policy

use clap::Parser;
use focuslock_config::{CURRENT_CONFIG_VERSION, ConfigError, Policy, load_config};
use focuslock_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "validate-config")]
#[command(about = "Validate a focuslock configuration file", long_about = None)]
struct Args {
    /// Config file to check (default: $FOCUSLOCK_CONFIG or ~/.config/focuslock/config.toml)
    #[arg(default_value_os_t = default_config_path())]
    path: PathBuf,
}

fn print_policy(policy: &Policy) {
    let limits = &policy.limits;
    println!("service:");
    println!("  tick interval      {} ms", policy.service.tick_interval.as_millis());
    println!("  auto current time  {}", policy.service.auto_current_time);
    println!("limits:");
    println!("  max minutes        {}", limits.max_minutes);
    println!("  suggested minutes  {}", limits.suggested_minutes);
    println!("  min goal chars     {}", limits.min_goal_chars);

    println!("keywords:");
    let keywords = &policy.keywords;
    for (name, list) in [
        ("goal", &keywords.goal),
        ("deny", &keywords.deny),
        ("urgent", &keywords.urgent),
        ("positive", &keywords.positive),
        ("completion", &keywords.completion),
        ("extend", &keywords.extend),
    ] {
        println!("  {:<10} {}", name, list.join(" / "));
    }

    println!("phrases:");
    for phrase in &policy.phrases.encouragement {
        println!("  {}", phrase);
    }
}

fn report_error(error: &ConfigError) {
    match error {
        ConfigError::ValidationFailed { errors } => {
            for err in errors {
                eprintln!("  {}", err);
            }
            eprintln!("{} problem(s) found", errors.len());
        }
        ConfigError::UnsupportedVersion(found) => {
            eprintln!("  config_version = {}, this build reads {}", found, CURRENT_CONFIG_VERSION);
        }
        other => eprintln!("  {}", other),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match load_config(&args.path) {
        Ok(policy) => {
            println!("{}: ok", args.path.display());
            print_policy(&policy);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: invalid", args.path.display());
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}
