//! CODEOWNERS Tree CLI
//!
//! A command-line tool for exploring who owns what in a repository.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode as StdExitCode;
use std::time::Duration;
use tokio::signal;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Args;
use cli::config::{ExitCode, ValidatedConfig};
use cli::output::{HumanOutput, write_json};
use cli::report::Outcome;

#[tokio::main]
async fn main() -> StdExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.verbose, args.json);

    let exit_code = run(args).await;

    if matches!(exit_code, ExitCode::Terminated | ExitCode::TimedOut) {
        // The blocking pass may still be running; don't wait for it on
        // runtime shutdown.
        let _ = io::stdout().flush();
        std::process::exit(i32::from(exit_code));
    }

    StdExitCode::from(u8::from(exit_code))
}

/// Initialize tracing based on verbosity level.
fn init_tracing(verbosity: u8, json_output: bool) {
    // Don't output logs when using JSON output mode
    if json_output {
        return;
    }

    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    // Directory walking is noisy below debug.
    if let Ok(directive) = "ignore=info".parse() {
        filter = filter.add_directive(directive);
    }

    // `init` also routes the core library's `log` records through tracing.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}

/// Resolves once `limit` has elapsed, or never without a limit.
async fn deadline(limit: Option<Duration>) {
    match limit {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}

/// How the ownership pass ended when it produced no outcome.
#[derive(Debug)]
enum Interrupted {
    Signal,
    Deadline(Duration),
    Failed(String),
}

/// Runs the ownership pass on a blocking thread, racing it against
/// SIGINT/SIGTERM and the configured timeout.
///
/// Must not hold the stdout or stderr lock: the worker logs through them.
async fn collect(config: &ValidatedConfig) -> Result<Outcome, Interrupted> {
    let session = config.session();
    let command = config.command.clone();
    let work = tokio::task::spawn_blocking(move || Outcome::collect(&session, &command));

    let joined = tokio::select! {
        joined = work => joined,
        _ = shutdown_signal() => return Err(Interrupted::Signal),
        _ = deadline(config.timeout) => {
            return Err(Interrupted::Deadline(config.timeout.unwrap_or_default()));
        }
    };

    match joined {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(e)) => Err(Interrupted::Failed(e.to_string())),
        Err(e) => {
            error!("Ownership task failed: {}", e);
            Err(Interrupted::Failed(e.to_string()))
        }
    }
}

/// Run one command with the given arguments.
async fn run(args: Args) -> ExitCode {
    // Validate configuration
    let config = match ValidatedConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            let use_colors = !args.json && io::stderr().is_terminal();
            let _ = HumanOutput::new(io::stderr().lock(), use_colors).write_error(&e.to_string());
            return ExitCode::StartupFailure;
        }
    };

    let use_colors = !config.json_output && io::stdout().is_terminal();

    debug!("Validated configuration: {:?}", config);
    info!("Repository path: {}", config.repo_path.display());

    let outcome = collect(&config).await;

    // The worker has finished or been abandoned; only now take the locks.
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(Interrupted::Signal) => return ExitCode::Terminated,
        Err(Interrupted::Deadline(limit)) => {
            let message = format!("timed out after {}s", limit.as_secs());
            let _ = HumanOutput::new(&mut stderr, use_colors).write_error(&message);
            return ExitCode::TimedOut;
        }
        Err(Interrupted::Failed(message)) => {
            let _ = HumanOutput::new(&mut stderr, use_colors).write_error(&message);
            return ExitCode::StartupFailure;
        }
    };

    info!("CODEOWNERS file: {}", outcome.rule_file);
    for warning in &outcome.warnings {
        warn!("{}: {}", outcome.rule_file, warning);
    }

    // Output results
    let written = if config.json_output {
        write_json(&outcome, &mut stdout)
    } else {
        HumanOutput::new(&mut stdout, use_colors).write_outcome(&outcome)
    };
    if let Err(e) = written {
        error!("Failed to write output: {}", e);
        return ExitCode::StartupFailure;
    }

    if outcome.matched {
        ExitCode::Success
    } else {
        ExitCode::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".github")).unwrap();
        fs::create_dir_all(dir.path().join("src/sub")).unwrap();
        fs::write(
            dir.path().join(".github/CODEOWNERS"),
            "src @a\nsrc/sub @b\n*.ts @ts\n",
        )
        .unwrap();
        fs::write(dir.path().join("src/lib.rs"), "").unwrap();
        fs::write(dir.path().join("src/sub/mod.ts"), "").unwrap();
        dir
    }

    fn args(repo: &TempDir, rest: &[&str]) -> Args {
        let repo = repo.path().to_str().unwrap();
        let mut argv = vec!["codeowners-tree", "--repository-path", repo];
        argv.extend_from_slice(rest);
        Args::parse_from(argv)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_run_completes_while_worker_logs() {
        // Route every record, including the core's `log` output, to stdout.
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .try_init();

        let repo = setup_repo();
        for rest in [&["-vv", "owners"][..], &["-vv", "tree", "@a"][..]] {
            let code = tokio::time::timeout(Duration::from_secs(30), run(args(&repo, rest)))
                .await
                .expect("run should not block on the output streams");
            assert_eq!(code, ExitCode::Success);
        }
    }

    #[tokio::test]
    async fn test_collect_reports_missing_rule_file() {
        let repo = TempDir::new().unwrap();
        let config = ValidatedConfig::from_args(&args(&repo, &["owners"])).unwrap();
        match collect(&config).await {
            Err(Interrupted::Failed(message)) => assert!(message.contains("CODEOWNERS")),
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_unknown_owner_is_no_match() {
        let repo = setup_repo();
        let code = run(args(&repo, &["tree", "@ghost"])).await;
        assert_eq!(code, ExitCode::NoMatch);
    }
}
