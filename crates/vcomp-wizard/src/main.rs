//! Command-line front end for the composition wizard.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vcomp_client::{ClientConfig, ComposerClient, LocalVideoFile};
use vcomp_models::{format_file_size, TransitionKind};
use vcomp_wizard::{Wizard, WizardConfig, WizardStep};

#[derive(Parser, Debug)]
#[command(name = "vcomp", version, about = "Compose videos with transitions on a remote backend")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "COMPOSER_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload videos, compose them and download the result.
    Compose(ComposeArgs),
    /// Check that the backend is up.
    Health,
    /// List the transitions the backend offers.
    Transitions,
    /// List files stored on the backend.
    Files,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Video files, in composition order.
    #[arg(required = true, num_args = 2..)]
    files: Vec<PathBuf>,

    /// Transition applied between every pair of clips.
    #[arg(long, default_value = "fade")]
    transition: TransitionKind,

    /// Transition duration in seconds (0.5, 1.0, 1.5, 2.0 or 3.0).
    #[arg(long, default_value_t = 1.0)]
    duration: f64,

    /// Directory the composed video is saved to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the links without downloading.
    #[arg(long)]
    no_download: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();

    let mut client_config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        client_config = client_config.with_base_url(url);
    }
    let client = ComposerClient::new(&client_config)
        .with_context(|| format!("invalid backend URL {}", client_config.base_url))?;

    match cli.cmd {
        Command::Compose(args) => run_compose(client, args).await,
        Command::Health => {
            let health = client.health().await?;
            println!("{} (version {}, {})", health.status, health.version, health.timestamp);
            Ok(())
        }
        Command::Transitions => {
            for transition in client.transitions().await? {
                println!("{:<12} {:<12} {}", transition.kind, transition.name, transition.description);
            }
            Ok(())
        }
        Command::Files => {
            let files = client.list_files().await?;
            println!("Uploads:");
            for file in &files.upload_files {
                println!("  {:<40} {:>10}  {}", file.filename, format_file_size(file.size), file.modified);
            }
            println!("Outputs:");
            for file in &files.output_files {
                println!("  {:<40} {:>10}  {}", file.filename, format_file_size(file.size), file.modified);
            }
            Ok(())
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"))
        .add_directive("vcomp=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

async fn run_compose(client: ComposerClient, args: ComposeArgs) -> anyhow::Result<()> {
    let wizard = Wizard::new(client, WizardConfig::from_env());
    info!(session_id = %wizard.session_id(), "Starting composition session");

    // Upload
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        match LocalVideoFile::probe(path).await {
            Ok(file) => files.push(file),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    let report = wizard.upload_files(files).await;
    print_notifications(&wizard);
    if !report.is_clean() {
        warn!(
            "{} file(s) rejected, {} failed",
            report.rejected.len(),
            report.failed.len()
        );
    }

    let stats = wizard.stats();
    println!(
        "{} videos, {} transitions, {} total, {} runtime",
        stats.video_count,
        stats.transition_count,
        stats.total_size_display(),
        stats.total_duration_display()
    );

    // Configure
    if wizard.step() != WizardStep::Configure {
        wizard.go_to_step(WizardStep::Configure)?;
    }
    wizard.set_transition(args.transition);
    wizard.set_duration(args.duration)?;
    println!(
        "Transition: {} ({}s)",
        args.transition.label(),
        args.duration
    );

    // Processing
    let mut progress = wizard.subscribe_progress();
    let settings = wizard.config().progress_settings();
    let reporter = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let value = *progress.borrow_and_update();
            println!(
                "Processing... {:>3.0}% (about {}s left)",
                value,
                settings.eta(value).as_secs()
            );
        }
    });

    let outcome = wizard.compose().await;
    reporter.abort();
    print_notifications(&wizard);
    let result = outcome?;

    // Done
    println!("Output:   {}", result.output_filename);
    println!("Download: {}", wizard.download_link()?);
    println!("Preview:  {}", wizard.preview_link()?);

    if !args.no_download {
        let file = wizard.download(&args.output_dir).await?;
        println!("Saved {} ({})", file.path.display(), format_file_size(file.bytes));
    }
    print_notifications(&wizard);

    Ok(())
}

fn print_notifications(wizard: &Wizard) {
    for notification in wizard.drain_notifications() {
        println!("{}", notification);
    }
}
