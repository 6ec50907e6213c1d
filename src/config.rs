use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_LOG_FILTER: &str = "info";

pub(crate) const API_URL_VAR: &str = "GASTOS_API_URL";
pub(crate) const DATA_DIR_VAR: &str = "GASTOS_DATA_DIR";
pub(crate) const LOG_VAR: &str = "GASTOS_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) api_url: String,
    pub(crate) data_dir: PathBuf,
    pub(crate) log_filter: String,
}

impl Config {
    /// Read the environment and strip `--api <url>` out of `args`.
    pub(crate) fn load(args: &mut Vec<String>) -> Result<Self> {
        let api_flag = take_flag(args, "--api");
        Self::resolve(|key| std::env::var(key).ok(), api_flag)
    }

    pub(crate) fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        api_flag: Option<String>,
    ) -> Result<Self> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = api_flag
            .filter(|v| !v.trim().is_empty())
            .or_else(|| non_blank(API_URL_VAR))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim().trim_end_matches('/').to_string();

        let data_dir = match non_blank(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let log_filter = non_blank(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            api_url,
            data_dir,
            log_filter,
        })
    }

    pub(crate) fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.data_dir.display()
            )
        })
    }

    pub(crate) fn db_path(&self) -> PathBuf {
        self.data_dir.join("gastos.db")
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join("gastos.log")
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "gastos", "Gastos")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Remove `flag <value>` from `args` and return the value.
pub(crate) fn take_flag(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    if pos + 1 >= args.len() {
        args.remove(pos);
        return None;
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Some(value)
}
