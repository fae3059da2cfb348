//! Timed executor for the program under test
//!
//! Each testcase is run as `<exec> <args...> <input_path>`, spawned directly
//! (no shell) in its own process group. The harness owns the timeout: when it
//! elapses the whole group is killed and the child is reaped before the
//! result is returned.

use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tokio::sync::watch;

use crate::config::{HarnessConfig, StreamMode};
use crate::error::{HarnessError, HarnessResult};

use super::outcome::RunResult;
use super::testcase::TestcaseRef;

/// Runs the executable against one testcase at a time
#[derive(Debug, Clone)]
pub struct Executor {
    exec: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    timeout: Duration,
    stream_mode: StreamMode,
}

impl Executor {
    /// Create a new executor
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            exec: config.exec.clone(),
            args: config.args.clone(),
            cwd: config.cwd.clone(),
            timeout: config.timeout,
            stream_mode: config.stream_mode,
        }
    }

    /// Run the executable against a single testcase.
    ///
    /// Timeouts and spawn failures are returned as [`RunResult`]s. The only
    /// error is [`HarnessError::Interrupted`], returned when `shutdown` flips
    /// to `true` while the child is running; the child is killed and reaped
    /// first.
    pub async fn run(
        &self,
        testcase: &TestcaseRef,
        shutdown: &mut watch::Receiver<bool>,
    ) -> HarnessResult<RunResult> {
        let mut command = self.command(&testcase.path);

        let start = Instant::now();
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return Ok(RunResult::invocation_error(
                    &testcase.name,
                    start.elapsed(),
                    format!("Failed to spawn {}: {}", self.exec.display(), e),
                ));
            }
        };

        // Read before waiting: the pid is gone once the child is reaped
        let pid = child.id();

        tokio::select! {
            status = child.wait() => {
                let elapsed = start.elapsed();
                match status {
                    Ok(status) => Ok(RunResult::completed(
                        &testcase.name,
                        elapsed,
                        status.code(),
                        status.signal(),
                    )),
                    Err(e) => {
                        terminate(&mut child, pid).await;
                        Ok(RunResult::invocation_error(
                            &testcase.name,
                            elapsed,
                            format!("Failed to wait for process: {}", e),
                        ))
                    }
                }
            }
            _ = tokio::time::sleep(self.timeout) => {
                terminate(&mut child, pid).await;
                Ok(RunResult::timed_out(&testcase.name, self.timeout))
            }
            _ = wait_for_shutdown(shutdown) => {
                tracing::info!("Shutdown requested, killing testcase {}", testcase.name);
                terminate(&mut child, pid).await;
                Err(HarnessError::Interrupted)
            }
        }
    }

    /// Build the command line for one input
    fn command(&self, input: &Path) -> Command {
        let mut command = Command::new(&self.exec);
        command
            .args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .process_group(0)
            .kill_on_drop(true);

        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        if self.stream_mode == StreamMode::Discard {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        command
    }
}

/// Kill the child's process group, then kill and reap the child itself
async fn terminate(child: &mut Child, pid: Option<u32>) {
    if let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) {
        // The child called setpgid(0, 0), so its pid is the group id
        match killpg(Pid::from_raw(pid), Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => tracing::warn!("Failed to kill process group {}: {}", pid, e),
        }
    }

    if let Err(e) = child.kill().await {
        tracing::warn!("Failed to reap child process: {}", e);
    }
}

/// Resolve once `shutdown` is set; never resolves if the sender is gone
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::outcome::Outcome;
    use tempfile::TempDir;

    /// Executor that runs `/bin/sh <script> <input>`
    fn sh_executor(script: &Path, timeout: Duration) -> Executor {
        let mut config = HarnessConfig::new("/unused", "/bin/sh");
        config.args = vec![script.display().to_string()];
        config.timeout = timeout;
        config.stream_mode = StreamMode::Discard;
        Executor::new(&config)
    }

    fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        path
    }

    fn testcase(dir: &TempDir, name: &str) -> TestcaseRef {
        let path = dir.path().join(name);
        std::fs::write(&path, "").unwrap();
        TestcaseRef {
            name: name.to_string(),
            path,
        }
    }

    fn no_shutdown() -> watch::Receiver<bool> {
        // A closed channel never signals shutdown
        watch::channel(false).1
    }

    /// Linux: running unless absent or a zombie
    fn is_running(pid: i32) -> bool {
        let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
            return false;
        };
        let state = stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.trim_start().chars().next());
        !matches!(state, Some('Z') | Some('X') | None)
    }

    #[tokio::test]
    async fn test_instant_exit_completes() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "ok.sh", "exit 0");
        let executor = sh_executor(&script, Duration::from_secs(10));

        let result = executor
            .run(&testcase(&dir, "a.cnf"), &mut no_shutdown())
            .await
            .unwrap();

        assert_eq!(result.outcome, Outcome::Completed);
        assert_eq!(result.testcase, "a.cnf");
        assert_eq!(result.exit_code, Some(0));
        assert!(result.elapsed < Duration::from_secs(2));
        assert!(result.elapsed < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_elapsed_matches_known_sleep() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "sleepy.sh", "sleep 0.3");
        let executor = sh_executor(&script, Duration::from_secs(5));

        let result = executor
            .run(&testcase(&dir, "a.cnf"), &mut no_shutdown())
            .await
            .unwrap();

        assert_eq!(result.outcome, Outcome::Completed);
        assert_eq!(result.exit_code, Some(0));
        let drift = (result.elapsed.as_secs_f64() - 0.3).abs();
        assert!(drift <= 0.05, "elapsed {:?} is off by {drift:.3}s", result.elapsed);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_completed() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "unsat.sh", "exit 20");
        let executor = sh_executor(&script, Duration::from_secs(10));

        let result = executor
            .run(&testcase(&dir, "a.cnf"), &mut no_shutdown())
            .await
            .unwrap();

        assert_eq!(result.outcome, Outcome::Completed);
        assert_eq!(result.exit_code, Some(20));
        assert!(result.is_abnormal_exit());
    }

    #[tokio::test]
    async fn test_arguments_and_cwd() {
        let dir = TempDir::new().unwrap();
        let workdir = TempDir::new().unwrap();
        let out = dir.path().join("argv.txt");
        let script = write_script(
            &dir,
            "argv.sh",
            &format!("echo \"$@\" > '{}'\npwd >> '{}'", out.display(), out.display()),
        );

        let mut config = HarnessConfig::new("/unused", "/bin/sh");
        config.args = vec![script.display().to_string(), "--input".to_string()];
        config.cwd = Some(workdir.path().to_path_buf());
        config.stream_mode = StreamMode::Discard;
        let executor = Executor::new(&config);

        let tc = testcase(&dir, "b.cnf");
        let result = executor.run(&tc, &mut no_shutdown()).await.unwrap();
        assert_eq!(result.exit_code, Some(0));

        let recorded = std::fs::read_to_string(&out).unwrap();
        let mut lines = recorded.lines();
        assert_eq!(
            lines.next().unwrap(),
            format!("--input {}", tc.path.display())
        );
        assert_eq!(
            std::fs::canonicalize(lines.next().unwrap()).unwrap(),
            std::fs::canonicalize(workdir.path()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_timeout_kills_process_group() {
        let dir = TempDir::new().unwrap();
        let pid_file = dir.path().join("pid");
        let grandchild_file = dir.path().join("grandchild");
        let script = write_script(
            &dir,
            "hang.sh",
            &format!(
                "echo $$ > '{}'\nsleep 30 &\necho $! > '{}'\nwait",
                pid_file.display(),
                grandchild_file.display()
            ),
        );
        let timeout = Duration::from_millis(500);
        let executor = sh_executor(&script, timeout);

        let started = Instant::now();
        let result = executor
            .run(&testcase(&dir, "slow.cnf"), &mut no_shutdown())
            .await
            .unwrap();

        assert_eq!(result.outcome, Outcome::TimedOut);
        assert_eq!(result.elapsed, timeout);
        assert_eq!(result.elapsed_seconds(), "0.500");
        assert!(started.elapsed() < Duration::from_secs(10));

        let pid: i32 = std::fs::read_to_string(&pid_file).unwrap().trim().parse().unwrap();
        assert_eq!(
            nix::sys::signal::kill(Pid::from_raw(pid), None::<Signal>),
            Err(Errno::ESRCH),
            "child should be killed and reaped"
        );

        if cfg!(target_os = "linux") {
            let grandchild: i32 = std::fs::read_to_string(&grandchild_file)
                .unwrap()
                .trim()
                .parse()
                .unwrap();
            let deadline = Instant::now() + Duration::from_secs(2);
            while is_running(grandchild) && Instant::now() < deadline {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            assert!(!is_running(grandchild), "descendants should be killed too");
        }
    }

    #[tokio::test]
    async fn test_missing_executable_is_invocation_error() {
        let dir = TempDir::new().unwrap();
        let executor = Executor::new(&HarnessConfig::new("/unused", dir.path().join("no-such-solver")));

        let result = executor
            .run(&testcase(&dir, "a.cnf"), &mut no_shutdown())
            .await
            .unwrap();

        assert_eq!(result.outcome, Outcome::InvocationError);
        assert!(result.error_message.unwrap().starts_with("Failed to spawn"));
        assert!(result.elapsed < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_non_executable_is_invocation_error() {
        let dir = TempDir::new().unwrap();
        let solver = dir.path().join("solver");
        std::fs::write(&solver, "#!/bin/sh\nexit 0\n").unwrap();
        // Written without any execute bit

        let executor = Executor::new(&HarnessConfig::new("/unused", &solver));
        let result = executor
            .run(&testcase(&dir, "a.cnf"), &mut no_shutdown())
            .await
            .unwrap();

        assert_eq!(result.outcome, Outcome::InvocationError);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_running_child() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "hang.sh", "exec sleep 30");
        let executor = sh_executor(&script, Duration::from_secs(60));

        let (tx, mut rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let _ = tx.send(true);
        });

        let started = Instant::now();
        let err = executor
            .run(&testcase(&dir, "a.cnf"), &mut rx)
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::Interrupted));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
