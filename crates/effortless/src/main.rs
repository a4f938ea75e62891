//! Effortless Inbox - terminal client for the Mail Service.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use anyhow::Context as _;
use clap::Parser;
use effortless::cli::{self, Command};
use effortless::{Message, Runtime, Session};
use effortless_core::{DemoMailService, HttpMailService, MailService, Settings};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal client for the Effortless Inbox Mail Service.
#[derive(Debug, Parser)]
#[command(name = "effortless", version, about)]
struct Args {
    /// Mail Service base URL (overrides settings and environment).
    #[arg(long)]
    url: Option<String>,

    /// Use the built-in demo service instead of a remote one.
    #[arg(long)]
    demo: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "effortless=info,effortless_core=info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the command output stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Effortless Inbox");

    if args.demo {
        return run(DemoMailService::new()).await;
    }

    let settings = Settings::load()
        .await
        .context("Failed to load settings")?
        .with_service_url(args.url);
    let service = HttpMailService::new(&settings).context("Invalid Mail Service settings")?;
    info!("Using Mail Service at {}", service.base_url());
    run(service).await
}

/// Reads commands from stdin until `quit` or end of input.
async fn run<S: MailService>(service: S) -> anyhow::Result<()> {
    let runtime = Runtime::new(service);
    let mut session = Session::new();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    write_out(&mut stdout, cli::HELP).await?;
    runtime.dispatch(&mut session, Message::Login).await;
    report(&mut stdout, &mut session).await?;
    if session.is_logged_in() {
        write_out(&mut stdout, &cli::render_list(&session)).await?;
    }

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match cli::parse(&line, &session) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => write_out(&mut stdout, cli::HELP).await?,
            Ok(Some(Command::List)) => write_out(&mut stdout, &cli::render_list(&session)).await?,
            Ok(Some(Command::Show)) => write_out(&mut stdout, &cli::render_item(&session)).await?,
            Ok(Some(Command::Dispatch(message))) => {
                let shows_prompts = matches!(message, Message::Prompts(_));
                let shows_compose = matches!(message, Message::Compose(_));
                runtime.dispatch(&mut session, message).await;
                report(&mut stdout, &mut session).await?;

                if shows_prompts {
                    write_out(&mut stdout, &cli::render_prompts(&session)).await?;
                } else if let Some(compose) =
                    cli::render_compose(&session).filter(|_| shows_compose)
                {
                    write_out(&mut stdout, &compose).await?;
                } else if session.selected_item().is_some() {
                    write_out(&mut stdout, &cli::render_item(&session)).await?;
                } else if session.is_logged_in() {
                    write_out(&mut stdout, &cli::render_list(&session)).await?;
                }
            }
            Err(e) => write_out(&mut stdout, &e.to_string()).await?,
        }
    }

    info!("Exiting");
    Ok(())
}

async fn report(stdout: &mut tokio::io::Stdout, session: &mut Session) -> anyhow::Result<()> {
    for notification in session.drain_notifications() {
        write_out(stdout, &cli::render_notification(&notification)).await?;
    }
    Ok(())
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> anyhow::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    Ok(())
}
