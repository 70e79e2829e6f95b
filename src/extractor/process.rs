//! Child process execution with a deadline

use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::error::ExtractError;

/// Run `program` to completion, capturing stdout and stderr.
///
/// The child is killed if it is still running after `timeout`.
pub async fn run_with_timeout<I, S>(
    program: &OsStr,
    args: I,
    timeout: Duration,
) -> Result<Output, ExtractError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                ExtractError::ToolNotFound(program.to_string_lossy().into_owned())
            }
            _ => ExtractError::Spawn(e),
        })?;

    // Dropping the wait future on timeout drops the child, which kills it.
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(ExtractError::Spawn),
        Err(_) => Err(ExtractError::Timeout(timeout.as_secs())),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_output() {
        let out = run_with_timeout(OsStr::new("sh"), ["-c", "echo out; echo err >&2"], Duration::from_secs(5))
            .await
            .unwrap();
        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout), "out\n");
        assert_eq!(String::from_utf8_lossy(&out.stderr), "err\n");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = run_with_timeout(
            OsStr::new("/nonexistent/definitely-not-here"),
            Vec::<&str>::new(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExtractError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let err = run_with_timeout(OsStr::new("sleep"), ["5"], Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Timeout(_)));
    }
}
