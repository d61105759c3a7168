use std::{path::PathBuf, time::Duration};

use clap::Parser;

use nrd_core::{
    config::{Config, DEFAULT_WEBHOOK_ENV},
    digest::{build_digest, DEFAULT_BYTE_LIMIT},
    snapshot::Snapshot,
};
use nrd_wecom::WecomClient;

/// Build a daily AI news digest from a snapshot JSON and push it to a
/// WeCom robot webhook.
#[derive(Parser)]
#[command(name = "nrd", version)]
struct Cli {
    /// Path to the snapshot JSON
    #[arg(long, default_value = "data/latest-24h.json")]
    input: PathBuf,

    /// Max items to include before truncation
    #[arg(long, default_value_t = 12)]
    top_n: usize,

    /// Keyword required by the WeCom robot security policy
    #[arg(long, default_value = "AI新闻雷达")]
    keyword: String,

    /// WeCom markdown content byte limit
    #[arg(long, default_value_t = DEFAULT_BYTE_LIMIT)]
    byte_limit: usize,

    /// Optional public site URL for a "view details" link
    #[arg(long, default_value = "")]
    site_url: String,

    /// Env var name storing the WeCom webhook URL
    #[arg(long, default_value = DEFAULT_WEBHOOK_ENV)]
    webhook_env: String,

    /// Webhook URL (overrides the env var)
    #[arg(long, default_value = "")]
    webhook_url: String,

    /// Webhook HTTP timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Print the generated markdown instead of sending
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            input: self.input,
            top_n: self.top_n,
            keyword: self.keyword,
            byte_limit: self.byte_limit,
            site_url: none_if_empty(self.site_url),
            webhook_url: none_if_empty(self.webhook_url),
            webhook_env: self.webhook_env,
            send_timeout: Duration::from_secs(self.timeout),
            dry_run: self.dry_run,
        }
    }
}

fn none_if_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Cli::parse().into_config();
    nrd_core::logging::init("nrd")?;

    let snapshot = Snapshot::load(&cfg.input)?;
    let digest = build_digest(&snapshot, &cfg.digest_options());

    if digest.content.len() > cfg.byte_limit {
        // Best-effort result after the shrink budget is exhausted.
        tracing::warn!(
            "digest exceeds byte limit after shrinking: {} > {}",
            digest.content.len(),
            cfg.byte_limit
        );
    }

    if cfg.dry_run {
        println!("{}", digest.content);
        println!("\n[dry-run] shown={}", digest.shown);
        return Ok(());
    }

    let webhook = cfg.resolve_webhook()?;
    let client = WecomClient::new(webhook, cfg.send_timeout);
    let receipt = client.send_markdown(&digest.content).await?;

    tracing::info!(
        "wecom push ok: errcode={} errmsg={} shown={}",
        receipt.errcode,
        receipt.errmsg.as_deref().unwrap_or("-"),
        digest.shown
    );

    Ok(())
}
