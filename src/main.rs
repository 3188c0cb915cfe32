//! Labelwright CLI entrypoint for triaging open pull requests.
//!
//! ```text
//! labelwright all [FLAGS]
//! labelwright range <first PR> <last PR> [FLAGS]
//! labelwright --task close-reopen --input-file <failures.json> [FLAGS]
//! ```

use std::ffi::OsString;
use std::process::ExitCode;

use labelwright::triage::{load_targets, validate_request};
use labelwright::{
    DryRunMutations, FileLogSink, Gateways, LabelwrightConfig, MutationGateway, OctocrabGateway,
    OctocrabMutationGateway, PersonalAccessToken, RateLimiter, RunRequest, RunSettings,
    TriageError, TriageRunner, TriageTask,
};
use ortho_config::OrthoConfig;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Flags whose value is the following argument.
const VALUE_FLAGS: [&str; 25] = [
    "--token",
    "-t",
    "--owner",
    "-o",
    "--repo",
    "-r",
    "--github-url",
    "-g",
    "--base-branch",
    "-b",
    "--per-page",
    "-n",
    "--rate-limit-interval-ms",
    "-i",
    "--checkpoint-interval",
    "-c",
    "--log-dir",
    "-l",
    "--snapshot-dir",
    "-s",
    "--task",
    "-k",
    "--input-file",
    "-f",
    "--config-path",
];

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(
                %error,
                upstream = error.is_upstream_failure(),
                "triage run failed"
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), TriageError> {
    let (positionals, flags) = extract_positional_arguments(std::env::args_os());
    let request = RunRequest::from_positionals(&positionals);
    let config = load_config(flags)?;
    let task = config.task()?;
    let targets = if task == TriageTask::CloseReopen {
        load_targets(config.input_file()?)?
    } else {
        validate_request(
            &request.mode,
            request.start.as_deref(),
            request.end.as_deref(),
        )?;
        Vec::new()
    };

    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let locator = config.repository_locator()?;
    let reader = OctocrabGateway::for_token(&token, &locator)?;

    let production = config.is_production_run();
    let mutations: Box<dyn MutationGateway> = if production {
        Box::new(OctocrabMutationGateway::new(reader.client().clone()))
    } else {
        Box::new(DryRunMutations)
    };
    tracing::info!(
        owner = locator.owner().as_str(),
        repo = locator.repository().as_str(),
        task = task.log_name(),
        production,
        "starting triage"
    );

    let settings = RunSettings {
        task,
        base_branch: config.base_branch().to_owned(),
        per_page: config.per_page()?,
        checkpoint_interval: config.checkpoint_interval(),
        snapshot_dir: config.snapshot_dir.clone(),
    };
    let runner = TriageRunner::new(
        Gateways {
            repository: &reader,
            files: &reader,
            mutations: mutations.as_ref(),
        },
        &locator,
        RateLimiter::for_task(task, config.rate_limit_interval_ms()),
        settings,
    )?;
    let sink = FileLogSink::for_run(&config.log_dir(), config.run_kind(), task.log_name());
    let log_path = sink.path();

    if task == TriageTask::CloseReopen {
        let report = runner.close_reopen(&targets, sink).await?;
        tracing::info!(
            restarted = report.restarted,
            skipped = report.skipped,
            log = %log_path,
            "successfully completed closing and reopening"
        );
    } else if let Some(report) = runner.run(&request, sink).await? {
        tracing::info!(
            first = report.window.first(),
            last = report.window.last(),
            processed = report.processed,
            log = %log_path,
            "successfully completed labelling"
        );
    }
    Ok(())
}

/// Loads configuration from CLI flags, environment, and files.
///
/// # Errors
///
/// Returns [`TriageError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config(args: Vec<OsString>) -> Result<LabelwrightConfig, TriageError> {
    LabelwrightConfig::load_from_iter(args).map_err(|error| TriageError::Configuration {
        message: error.to_string(),
    })
}

/// Splits positional arguments from flags so the flags can be handed to
/// ortho-config.
///
/// The first argument (the program name) always stays with the flags. The
/// argument after a value-taking flag is treated as that flag's value, and
/// everything after `--` is positional.
fn extract_positional_arguments<I>(args: I) -> (Vec<String>, Vec<OsString>)
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let mut flags: Vec<OsString> = iter.next().into_iter().collect();
    let mut positionals = Vec::new();
    let mut expects_value = false;
    let mut after_separator = false;

    for arg in iter {
        if after_separator {
            positionals.push(arg.to_string_lossy().into_owned());
            continue;
        }
        if expects_value {
            flags.push(arg);
            expects_value = false;
            continue;
        }
        let text = arg.to_string_lossy().into_owned();
        if text == "--" {
            after_separator = true;
        } else if text.starts_with('-') && text.len() > 1 {
            expects_value = VALUE_FLAGS.contains(&text.as_str());
            flags.push(arg);
        } else {
            positionals.push(text);
        }
    }

    (positionals, flags)
}
