use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::JqError;

/// Pipe rendered JSON through the external `jq` binary
pub(crate) fn filter_json(json: &str, filter: &str) -> Result<String, JqError> {
    let filter = filter.trim();
    if filter.is_empty() {
        return Err(JqError::Filter("empty filter expression".to_string()));
    }

    let mut child = Command::new("jq")
        .arg(filter)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => JqError::NotFound,
            _ => JqError::Spawn(e),
        })?;

    // Dropping stdin closes the pipe so jq sees EOF
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(json.as_bytes()).map_err(JqError::Stdin)?;
    }

    let output = child.wait_with_output().map_err(JqError::Wait)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(JqError::Filter(stderr.trim().to_string()));
    }
    String::from_utf8(output.stdout).map_err(JqError::Utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_is_rejected_before_spawning() {
        let err = filter_json("{}", "   ").unwrap_err();
        assert_eq!(err.to_string(), "jq error: empty filter expression");
    }
}
