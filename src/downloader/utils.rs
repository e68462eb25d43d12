// Helper functions shared by the orchestration core and extractors

use std::process::{Output, Stdio};
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::errors::ExtractorError;

/// Run a command to completion with a hard timeout.
///
/// The child is killed when the timeout fires; stdout/stderr are captured in
/// full.
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<Output, ExtractorError> {
    let child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractorError::ToolNotFound(program.to_string())
            } else {
                ExtractorError::ExecutionFailed(format!("Failed to start {}: {}", program, e))
            }
        })?;

    match timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| {
            ExtractorError::ExecutionFailed(format!("Failed to wait for {}: {}", program, e))
        }),
        Err(_) => Err(ExtractorError::TimedOut(timeout_secs)),
    }
}

/// Byte count to megabytes, rounded to 2 decimal places.
pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    (bytes as f64 / 1_048_576.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_megabyte_conversion() {
        assert_eq!(bytes_to_megabytes(104_857_600), 100.0);
        assert_eq!(bytes_to_megabytes(1_048_576), 1.0);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        // 1.5 MB plus a little
        assert_eq!(bytes_to_megabytes(1_572_864), 1.5);
        assert_eq!(bytes_to_megabytes(1_234_567), 1.18);
    }

    #[tokio::test]
    async fn test_missing_program_is_tool_not_found() {
        let err = run_output_with_timeout("definitely-not-a-real-tool-1a2b3c", &[], 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::ToolNotFound(_)));
    }
}
