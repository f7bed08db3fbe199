//! Diagnostic collection: best-effort, never on the primary path's books.

use crate::session::SessionLike;
use std::path::Path;
use tracing::warn;

/// Prints the session's buffered browser log entries to stdout.
///
/// A retrieval failure is converted to a printed notice here; nothing this
/// function does can fail the scenario.
pub async fn print_session_logs<S: SessionLike>(session: &S) {
    match session.browser_logs().await {
        Ok(entries) => {
            println!("browser log: {} entries", entries.len());
            for entry in &entries {
                println!("[{}] {}", entry.level, entry.text.as_deref().unwrap_or("<no text>"));
            }
        }
        Err(err) => println!("browser log unavailable: {err}"),
    }
}

/// Prints both external log files, or a notice for each one that is missing.
/// Runs during teardown on every exit path.
pub fn print_external_logs(browser_log: &Path, driver_log: &Path) {
    print_log_file("browser debug log", browser_log);
    print_log_file("driver log", driver_log);
}

fn print_log_file(label: &str, path: &Path) {
    match read_log_file(path) {
        Some(contents) => {
            println!("=== {label}: {} ===", path.display());
            println!("{contents}");
        }
        None => println!("no log file found: {} ({label})", path.display()),
    }
}

/// Reads an external log file, treating unreadable the same as missing.
///
/// A file that disappears between the existence check and the read counts as
/// missing too; teardown diagnostics never fail the scenario.
fn read_log_file(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(err) => {
            warn!(
                target = "smoke",
                path = %path.display(),
                error = %err,
                "log file vanished or is unreadable"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSession;

    #[test]
    fn missing_log_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_log_file(&dir.path().join("absent.log")).is_none());
    }

    #[test]
    fn present_log_file_reads_in_full_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chrome_debug.log");
        std::fs::write(&path, "line one\nline two\n").unwrap();

        let first = read_log_file(&path).unwrap();
        let second = read_log_file(&path).unwrap();
        assert_eq!(first, "line one\nline two\n");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn a_log_fetch_failure_is_swallowed() {
        let session = ScriptedSession::happy();
        session.fail_log_fetch();

        // Must not panic or propagate anything.
        print_session_logs(&session).await;
    }

    #[test]
    fn external_log_printing_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        print_external_logs(
            &dir.path().join("chrome_debug.log"),
            &dir.path().join("chromedriver.log"),
        );
    }
}
