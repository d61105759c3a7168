use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    digest::DigestOptions,
    errors::Error,
    Result,
};

/// Env var consulted for the webhook URL when no explicit override is given.
pub const DEFAULT_WEBHOOK_ENV: &str = "WECOM_WEBHOOK_URL";

/// Typed configuration for one digest run.
///
/// Assembled from CLI flags by the binary; nothing here reads the
/// environment except [`Config::resolve_webhook`].
#[derive(Clone, Debug)]
pub struct Config {
    pub input: PathBuf,
    pub top_n: usize,
    pub keyword: String,
    pub byte_limit: usize,
    pub site_url: Option<String>,

    // Delivery
    pub webhook_url: Option<String>,
    pub webhook_env: String,
    pub send_timeout: Duration,
    pub dry_run: bool,
}

impl Config {
    /// Formatting parameters for the digest builder.
    pub fn digest_options(&self) -> DigestOptions {
        DigestOptions {
            keyword: self.keyword.clone(),
            top_n: self.top_n,
            byte_limit: self.byte_limit,
            site_url: self.site_url.clone(),
        }
    }

    /// Resolve the webhook URL: explicit override first, then the named
    /// env var (a local `.env` is honored without overriding real env).
    pub fn resolve_webhook(&self) -> Result<String> {
        load_dotenv_if_present(Path::new(".env"));

        let url = self
            .webhook_url
            .clone()
            .and_then(non_empty)
            .or_else(|| env_str(&self.webhook_env).and_then(non_empty));

        match url {
            Some(u) => Ok(u.trim().to_string()),
            None => Err(Error::Config(format!(
                "missing webhook URL: pass --webhook-url or set {}",
                self.webhook_env
            ))),
        }
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
