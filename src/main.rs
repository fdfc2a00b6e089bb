use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use support_chat::core::config::{self, CliOverrides};
use support_chat::core::message;
use support_chat::tui;

#[derive(Parser)]
#[command(name = "support-chat", about = "Terminal client for the support chat service")]
struct Args {
    /// Server to talk to (overrides config file and SUPPORT_CHAT_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Give up on a request after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// JSON file of prior messages to show on startup
    #[arg(long)]
    history: Option<PathBuf>,

    /// Ask the server to attach debug traces (written to the log)
    #[arg(long)]
    debug: bool,

    /// Where to write the log
    #[arg(long, default_value = "support-chat.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().map_err(std::io::Error::other)?;
    let overrides = CliOverrides {
        base_url: args.base_url,
        timeout_ms: args.timeout_ms,
        debug: args.debug,
    };
    let resolved = config::resolve(&file_config, &overrides);
    log::info!(
        "support-chat starting up against {} (timeout {:?})",
        resolved.base_url,
        resolved.timeout
    );

    let history = match &args.history {
        Some(path) => message::load_history(path).map_err(std::io::Error::other)?,
        None => Vec::new(),
    };

    tui::run(resolved, history)
}
