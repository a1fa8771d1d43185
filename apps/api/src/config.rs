use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::render::OutputFormat;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub llm_timeout_secs: u64,
    pub template_path: PathBuf,
    pub job_listings_path: PathBuf,
    pub output_dir: PathBuf,
    pub default_output_format: OutputFormat,
    pub pdf_converter: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: env_or("OPENAI_MODEL", crate::llm_client::DEFAULT_MODEL),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            template_path: env_or("TEMPLATE_PATH", "assets/resume-template.docx").into(),
            job_listings_path: env_or("JOB_LISTINGS_PATH", "job_listings.json").into(),
            output_dir: env_or("OUTPUT_DIR", "generated_resumes").into(),
            default_output_format: parse_env("DEFAULT_OUTPUT_FORMAT", OutputFormat::Docx)?,
            pdf_converter: env_or("PDF_CONVERTER", "soffice"),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env("PORT", 5000)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} is invalid ({raw:?}): {e}")),
        Err(_) => Ok(default),
    }
}
