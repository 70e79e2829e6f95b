//! yt-dlp backed extractor
//!
//! Runs the `yt-dlp` binary in single-JSON mode and parses the info-dict
//! it prints on stdout.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::cookies::CookieFile;
use super::process::run_with_timeout;
use super::MediaExtractor;
use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::media::MediaInfo;

const BINARY_NAME: &str = "yt-dlp";
const VERSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Extractor that shells out to yt-dlp
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    program: PathBuf,
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    /// Create an extractor, locating the binary from config or `PATH`
    pub fn new(config: ExtractorConfig) -> Self {
        let program = resolve_program(config.ytdlp_path.as_deref());
        Self::with_program(program, config)
    }

    /// Create an extractor that runs `program`
    pub fn with_program(program: impl Into<PathBuf>, config: ExtractorConfig) -> Self {
        Self {
            program: program.into(),
            config,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command line for one extraction
    pub fn build_args(&self, url: &str, cookies: Option<&Path>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-J".into(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--skip-download".into(),
            "--socket-timeout".into(),
            self.config.socket_timeout_secs.to_string().into(),
        ];

        if self.config.no_check_certificate {
            args.push("--no-check-certificate".into());
        }
        if let Some(proxy) = &self.config.proxy {
            args.push("--proxy".into());
            args.push(proxy.into());
        }
        if let Some(user_agent) = &self.config.user_agent {
            args.push("--user-agent".into());
            args.push(user_agent.into());
        }
        if let Some(path) = cookies {
            args.push("--cookies".into());
            args.push(path.into());
        }

        // Keep a URL starting with '-' from being read as an option.
        args.push("--".into());
        args.push(url.into());
        args
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        BINARY_NAME
    }

    async fn extract(&self, url: &str) -> Result<MediaInfo, ExtractError> {
        let cookies = CookieFile::from_env(&self.config.cookies_env)?;
        let args = self.build_args(url, cookies.as_ref().map(CookieFile::path));

        tracing::debug!(
            program = %self.program.display(),
            with_cookies = cookies.is_some(),
            "Running extractor"
        );
        let started = Instant::now();
        let output = run_with_timeout(
            self.program.as_os_str(),
            &args,
            Duration::from_secs(self.config.timeout_secs),
        )
        .await;
        drop(cookies);
        let output = output?;

        if !output.status.success() {
            let message = failure_message(&output.stderr, &output.status);
            tracing::warn!(status = %output.status, "Extractor failed: {}", message);
            return Err(ExtractError::Failed(message));
        }

        let info = MediaInfo::from_json(&output.stdout)?;
        tracing::info!(
            id = info.id.as_deref().unwrap_or("-"),
            formats = info.formats.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Extraction finished"
        );
        Ok(info)
    }

    async fn version(&self) -> Option<String> {
        let output = run_with_timeout(self.program.as_os_str(), ["--version"], VERSION_TIMEOUT)
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!version.is_empty()).then_some(version)
    }
}

/// Configured path if it exists, else `PATH` lookup, else the bare name.
fn resolve_program(configured: Option<&str>) -> PathBuf {
    if let Some(path) = configured {
        let path = Path::new(path);
        if path.exists() {
            return path.to_path_buf();
        }
        tracing::warn!(
            "Configured yt-dlp path {} does not exist; searching PATH",
            path.display()
        );
    }
    which::which(BINARY_NAME).unwrap_or_else(|_| PathBuf::from(BINARY_NAME))
}

/// The last `ERROR:` line of stderr, else all of stderr, else the exit status.
fn failure_message(stderr: &[u8], status: &std::process::ExitStatus) -> String {
    let text = String::from_utf8_lossy(stderr);
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with("ERROR:"))
        .map(str::to_string)
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("{} exited with {}", BINARY_NAME, status))
}
