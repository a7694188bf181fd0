// src/bin/batspawn.rs

use anyhow::Result;
use batspawn::{
    CancellationToken,
    cli::{Action, Cli, TargetArgs, echo_args_tail},
    models::SpawnPlan,
    system::{config, executor},
};
use clap::Parser;
use colored::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The main entry point of the `batspawn` application.
/// It sets up logging, parses arguments, dispatches to the correct action,
/// and performs centralized error handling.
#[tokio::main]
async fn main() {
    let cancellation_token = Arc::new(AtomicBool::new(false));
    env_logger::init();
    watch_for_interrupt(Arc::clone(&cancellation_token));

    let cli = Cli::parse();
    let outcome = tokio::task::spawn_blocking(move || run_cli(cli, &cancellation_token))
        .await
        .map_err(anyhow::Error::from)
        .and_then(|result| result);

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            if is_cancelled(&e) {
                std::process::exit(130);
            }
            eprintln!("\n{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Raises the token on Ctrl+C so a running child is killed instead of orphaned.
fn watch_for_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Received Ctrl+C, cancelling...");
                token.store(true, Ordering::SeqCst);
            }
            Err(e) => log::warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });
}

fn is_cancelled(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<executor::ExecutionError>(),
        Some(executor::ExecutionError::Cancelled)
    )
}

fn run_cli(cli: Cli, cancellation_token: &CancellationToken) -> Result<i32> {
    log::debug!("CLI args parsed: {:?}", cli);

    match cli.action {
        Action::Plan { target, json } => {
            let plan = spawner_for(&target)?.plan(&target.to_spec()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan)?;
            }
            Ok(0)
        }
        Action::Run { target } => {
            let status = spawner_for(&target)?.run(&target.to_spec()?, cancellation_token)?;
            if !status.success() {
                log::warn!("Command exited with code: {:?}", status.code());
            }
            Ok(status.code().unwrap_or(1))
        }
        Action::EchoArgs { .. } => {
            for arg in echo_args_tail(std::env::args_os()) {
                println!("{}", arg);
            }
            Ok(0)
        }
    }
}

/// Loads the settings file and applies the `--platform` override.
fn spawner_for(target: &TargetArgs) -> Result<executor::Spawner> {
    let mut settings = config::load_settings()?;
    if let Some(platform) = target.platform {
        settings.platform = Some(platform);
    }
    Ok(executor::Spawner::from_settings(&settings))
}

fn print_plan(plan: &SpawnPlan) -> Result<()> {
    let mode = if plan.is_wrapped() {
        "wrapped".yellow()
    } else {
        "direct".green()
    };
    println!("{} {} ({})", "executable:".bold(), plan.executable().cyan(), mode);
    println!("{}", "args:".bold());
    for (i, arg) in plan.args().iter().enumerate() {
        println!("  {} {}", format!("[{}]", i).dimmed(), arg);
    }
    println!(
        "{} {}",
        "options:".bold(),
        serde_json::to_string(plan.options())?
    );
    Ok(())
}
