use anyhow::Context as _;
use once_cell::sync::OnceCell;

pub const ENV_LOG: &str = "AOTRT_LOG";
pub const ENV_PRINT_FLUSH: &str = "AOTRT_PRINT_FLUSH";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// `tracing` filter directive for the stderr subscriber.
    pub log_filter: String,
    /// Flush stdout after every `print`.
    pub print_flush: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            print_flush: true,
        }
    }
}

static CONFIG: OnceCell<RuntimeConfig> = OnceCell::new();

/// Case-insensitive `1`/`0`, `true`/`false`, `yes`/`no`.
fn parse_flag(name: &str, raw: &str) -> anyhow::Result<bool> {
    let value = raw.trim().to_ascii_lowercase();
    match value.as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => anyhow::bail!("{name} must be a flag such as 1 or 0, got {raw:?}"),
    }
}

impl RuntimeConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = RuntimeConfig::default();
        if let Some(raw) = lookup(ENV_LOG) {
            let raw = raw.trim();
            if !raw.is_empty() {
                cfg.log_filter = raw.to_string();
            }
        }
        if let Some(raw) = lookup(ENV_PRINT_FLUSH) {
            cfg.print_flush =
                parse_flag(ENV_PRINT_FLUSH, &raw).context("read runtime configuration")?;
        }
        Ok(cfg)
    }
}

/// The process-wide configuration, read from the environment on first use.
///
/// A bad value is reported once on stderr and the defaults are used instead;
/// generated programs have no way to react to a configuration error.
pub fn config() -> &'static RuntimeConfig {
    CONFIG.get_or_init(|| match RuntimeConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("aotrt: {err:#}; using defaults");
            RuntimeConfig::default()
        }
    })
}
