mod api;
mod commands;
mod gateway;
mod i18n;
mod reminders;

#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use minitats_channels::TelegramChannel;
use minitats_core::{
    config::{self, Config},
    context::{persona_prompt, Context},
    traits::{Channel, DateResolver, Provider},
};
use minitats_dates::SpanishDateParser;
use minitats_memory::Store;
use minitats_providers::{CannedReplies, OpenAiProvider};
use reminders::{ReminderManager, Scheduler};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "minitats",
    version,
    about = "Minitats — a caring Telegram assistant with natural-language reminders"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Show configuration and stored state.
    Status,
    /// Send a one-shot message to the chat provider.
    Ask {
        /// The message to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    match cli.command {
        Commands::Start => {
            let _guard = init_logging(&cfg)?;
            start(cfg).await?;
        }
        Commands::Status => {
            init_console_logging(&cfg);
            status(&cli.config, &cfg).await?;
        }
        Commands::Ask { message } => {
            init_console_logging(&cfg);
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: minitats ask <message>");
            }
            ask(&cfg, &message.join(" ")).await?;
        }
    }

    Ok(())
}

fn env_filter(cfg: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.minitats.log_level))
}

/// Stderr plus a daily-rolling file under `<data_dir>/logs`. Keep the guard
/// alive for the life of the process so buffered lines get flushed.
fn init_logging(cfg: &Config) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = cfg.minitats.data_path().join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::daily(&log_dir, "minitats.log");
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(cfg))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}

fn init_console_logging(cfg: &Config) {
    tracing_subscriber::fmt().with_env_filter(env_filter(cfg)).init();
}

async fn start(cfg: Config) -> anyhow::Result<()> {
    let tg = match cfg.channel.telegram.as_ref() {
        Some(tg) if tg.enabled && !tg.bot_token.is_empty() => tg.clone(),
        Some(tg) if tg.enabled => anyhow::bail!(
            "Telegram is enabled but bot_token is empty. \
             Set it in config.toml or the TELEGRAM_TOKEN env var."
        ),
        _ => anyhow::bail!("Telegram is not configured. Set TELEGRAM_TOKEN or [channel.telegram]."),
    };
    let channel: Arc<dyn Channel> = Arc::new(TelegramChannel::new(tg));

    let tz = cfg.minitats.tz()?;
    let store = Store::new(cfg.minitats.data_path()).await?;
    let resolver: Arc<dyn DateResolver> = Arc::new(SpanishDateParser::new(tz)?);
    let manager = ReminderManager::new(
        store.clone(),
        Scheduler::new(),
        resolver,
        channel.clone(),
        &cfg.minitats.language,
        tz,
    );

    let provider = build_provider(&cfg);
    if provider.is_none() {
        tracing::info!("no OpenAI key configured, replying with canned messages");
    }

    let gw = Arc::new(gateway::Gateway::new(channel, provider, store, manager, cfg));
    gw.run().await
}

async fn status(config_path: &str, cfg: &Config) -> anyhow::Result<()> {
    println!("{} — Status Check\n", cfg.minitats.name);
    println!("Config:    {config_path}");
    println!("Data dir:  {}", cfg.minitats.data_path().display());
    println!("Language:  {}", cfg.minitats.language);
    println!("Time zone: {}", cfg.minitats.timezone);
    println!();

    let telegram = match cfg.channel.telegram.as_ref() {
        Some(tg) if tg.enabled && !tg.bot_token.is_empty() => "configured",
        Some(tg) if tg.enabled => "enabled but missing bot_token",
        Some(_) => "disabled",
        None => "not configured",
    };
    println!("  telegram: {telegram}");
    match build_provider(cfg) {
        Some(p) => println!("  provider: {} (available: {})", p.name(), p.is_available().await),
        None => println!("  provider: canned replies only"),
    }
    println!();

    let store = Store::new(cfg.minitats.data_path()).await?;
    let reminders = store.load_reminders().await;
    let pending = reminders.iter().filter(|r| !r.sent).count();
    println!("  reminders: {} stored, {pending} pending", reminders.len());
    println!("  users:     {}", store.load_users().await.len());
    match store.load_status().await.last_start {
        Some(at) => println!("  last start: {at}"),
        None => println!("  last start: never"),
    }
    Ok(())
}

async fn ask(cfg: &Config, prompt: &str) -> anyhow::Result<()> {
    let general = &cfg.minitats;
    let Some(provider) = build_provider(cfg) else {
        println!("{}", CannedReplies::new(&general.partner_name, &general.language).pick());
        return Ok(());
    };

    let mut context = Context::new(prompt);
    context.system_prompt = persona_prompt(&general.name, &general.partner_name, &general.language);
    let response = provider.complete(&context).await?;
    println!("{}", response.text);
    Ok(())
}

/// The OpenAI provider when an API key is configured.
fn build_provider(cfg: &Config) -> Option<Arc<dyn Provider>> {
    cfg.provider
        .openai_enabled()
        .map(|openai| Arc::new(OpenAiProvider::from_config(openai)) as Arc<dyn Provider>)
}
