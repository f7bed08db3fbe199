//! Driver process lifecycle.
//!
//! Spawns the WebDriver BiDi driver binary on a local port and tears it down
//! again. The orchestration core never touches this; the binary uses it when
//! a driver executable is configured instead of an already-running driver.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};

/// How often the launcher probes the driver's port.
const PORT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Manages a locally spawned driver process.
#[derive(Debug)]
pub struct DriverServer {
    process: Child,
}

impl DriverServer {
    /// Launches the driver on `port`, directing its log to `log_path`.
    ///
    /// Fails when the process cannot be spawned, exits immediately, or never
    /// starts accepting connections on the port.
    pub async fn launch(binary: &Path, port: u16, log_path: &Path, verbose: bool) -> Result<Self> {
        let mut command = Command::new(binary);
        command
            .arg(format!("--port={port}"))
            .arg(format!("--log-path={}", log_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());
        if verbose {
            command.arg("--verbose");
        }

        let mut child = command.spawn().map_err(|err| {
            Error::LaunchFailed(format!("failed to spawn {}: {err}", binary.display()))
        })?;
        tracing::debug!(binary = %binary.display(), port, "driver spawned");

        // A bad flag or missing browser makes the driver bail out at once.
        tokio::time::sleep(Duration::from_millis(100)).await;
        match child.try_wait() {
            Ok(Some(status)) => {
                return Err(Error::LaunchFailed(format!(
                    "driver exited immediately with {status}"
                )));
            }
            Ok(None) => {}
            Err(err) => {
                let _ = child.kill().await;
                let _ = child.wait().await;
                return Err(Error::LaunchFailed(format!(
                    "failed to check driver status: {err}"
                )));
            }
        }

        if let Err(err) = wait_for_port(port, 50).await {
            // The driver is alive but unreachable; don't leave it running.
            let _ = child.kill().await;
            let _ = child.wait().await;
            return Err(err);
        }
        tracing::info!(port, "driver accepting connections");

        Ok(Self { process: child })
    }

    /// Kills the driver process and reaps it.
    pub async fn shutdown(mut self) -> Result<()> {
        self.process
            .kill()
            .await
            .map_err(|err| Error::LaunchFailed(format!("failed to kill driver: {err}")))?;
        let _ = self.process.wait().await;
        Ok(())
    }
}

/// Polls until something accepts on `port`, up to `attempts` probes.
async fn wait_for_port(port: u16, attempts: u32) -> Result<()> {
    for _ in 0..attempts {
        if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(PORT_POLL_INTERVAL).await;
    }
    Err(Error::LaunchFailed(format!(
        "driver did not open port {port}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn launch_rejects_a_missing_binary() {
        let err = DriverServer::launch(
            Path::new("/nonexistent/driver"),
            19515,
            Path::new("/tmp/driver-test.log"),
            false,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::LaunchFailed(_)));
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launch_detects_an_immediate_exit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("driver.sh");
        std::fs::write(&script, "#!/bin/sh\nexit 3\n").unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let err = DriverServer::launch(&script, 19516, &dir.path().join("driver.log"), false)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("exited immediately"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launch_kills_a_driver_that_never_opens_its_port() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("driver.pid");
        let script = dir.path().join("driver.sh");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho $$ > {}\nexec sleep 60\n", pid_file.display()),
        )
        .unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let err = DriverServer::launch(&script, 19517, &dir.path().join("driver.log"), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("did not open port"));

        // The child must be dead and reaped, not orphaned behind the error.
        let pid: u32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        let alive = std::process::Command::new("kill")
            .arg("-0")
            .arg(pid.to_string())
            .status()
            .unwrap()
            .success();
        assert!(!alive, "driver process {pid} survived the failed launch");
    }

    #[tokio::test]
    async fn wait_for_port_sees_a_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        wait_for_port(port, 5).await.unwrap();
    }

    #[tokio::test]
    async fn wait_for_port_gives_up() {
        // Port 1 is privileged; nothing in a test environment listens there.
        let err = wait_for_port(1, 2).await.unwrap_err();
        assert!(err.to_string().contains("did not open port"));
    }
}
