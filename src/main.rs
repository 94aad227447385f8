use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scilog::config::ClientConfig;
use scilog::models::{Logbook, LogbookMessage};
use scilog::SciLog;

/// Command-line interface to SciLog.
///
/// Similar to ELOG's interface but not fully compatible.
#[derive(Parser)]
#[command(name = "scilog")]
#[command(about = "Post a message to a SciLog logbook")]
struct Cli {
    /// Server address (defaults to the configured URL)
    #[arg(long)]
    host: Option<String>,

    /// Port
    #[arg(short, long)]
    port: Option<u16>,

    /// Name (title) of the logbook; not needed if the group owns only one
    #[arg(short, long)]
    logbook: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// User name (e-mail address); must be in the access group of the logbook
    #[arg(short, long)]
    user: Option<String>,

    /// Password
    #[arg(short = 'w', long)]
    password: Option<String>,

    /// Owner group, like 'p12345'
    #[arg(short, long)]
    group: Option<String>,

    /// Attachment file; can be repeated
    #[arg(short = 'f', long = "attach")]
    attach: Vec<PathBuf>,

    /// Tag; can be repeated
    #[arg(short, long = "tag")]
    tag: Vec<String>,

    /// Reply to ID (recorded as a tag)
    #[arg(short, long)]
    reply_to: Option<String>,

    /// Markup of the message file: 1 plain (lines joined with <br>), 2 HTML
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=2))]
    markup: u8,

    /// Message file
    #[arg(short, long)]
    message_file: Option<PathBuf>,

    /// Message text
    message: Option<String>,
}

/// Initialize tracing with output to stderr
fn init_tracing(verbose: bool) {
    let default = if verbose { "scilog=debug" } else { "scilog=info" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn api_address(host: &str, port: Option<u16>) -> String {
    match port {
        Some(port) => format!("https://{}:{}/api/v1", host, port),
        None => format!("https://{}/api/v1", host),
    }
}

/// Wrap plain text lines in a paragraph, one `<br>` per line break.
fn plain_to_html(text: &str) -> String {
    format!("<p>{}</p>", text.lines().collect::<Vec<_>>().join("<br>"))
}

fn build_message(cli: &Cli) -> anyhow::Result<LogbookMessage> {
    let mut msg = LogbookMessage::new();

    if let Some(ref text) = cli.message {
        msg.add_text(text);
    }
    if let Some(ref path) = cli.message_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message file {}", path.display()))?;
        if cli.markup == 2 {
            msg.add_text(&text);
        } else {
            msg.add_text(&plain_to_html(&text));
        }
    }
    for path in &cli.attach {
        msg.add_file(path);
    }
    msg.add_tags(cli.tag.iter().cloned());
    if let Some(ref id) = cli.reply_to {
        msg.add_tag(format!("reply-to:{}", id));
    }

    Ok(msg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ClientConfig::load();
    if let Some(ref host) = cli.host {
        config.address = api_address(host, cli.port);
    }

    let mut log = SciLog::from_config(&config)?;

    let user = cli.user.clone().or_else(|| config.username.clone());
    if let (Some(user), Some(password)) = (user, cli.password.as_deref()) {
        log.login(&user, password)
            .await
            .with_context(|| format!("Login as {} failed", user))?;
    }

    let mut filter = Logbook::default();
    if let Some(ref group) = cli.group {
        filter.base.owner_group.set(group.clone());
    }
    if let Some(ref name) = cli.logbook {
        filter.name.set(name.clone());
    }

    let mut logbooks = log
        .get_logbooks(filter)
        .await
        .context("Failed to list logbooks")?;
    let logbook = match logbooks.len() {
        0 => bail!("no logbooks match filter criteria"),
        1 => logbooks.remove(0),
        n => bail!("multiple logbooks ({}) match filter criteria", n),
    };
    log.select_logbook(logbook);

    let msg = build_message(&cli)?;
    let entry = log
        .send_logbook_message(msg)
        .await
        .context("Failed to send message")?;

    tracing::info!(
        "Created entry {}",
        entry.base.id.value().map_or("<unknown>", |id| id.as_str())
    );

    Ok(())
}
