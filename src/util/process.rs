//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context, Result};

/// Receives the child's output one line at a time.
pub trait LineSink {
    fn line(&mut self, line: &str);
}

impl<F: FnMut(&str)> LineSink for F {
    fn line(&mut self, line: &str) {
        self(line)
    }
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Create a process builder from a full argument vector.
    ///
    /// The first element is the program. Returns `None` for an empty vector.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(ProcessBuilder::new(program).args(args))
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Build the Command. The environment is inherited unchanged.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and capture its output.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let output = child
            .wait_with_output()
            .with_context(|| format!("failed to wait for `{}`", self.program.display()))?;

        Ok(output)
    }

    /// Execute with stderr merged into stdout, handing each line to `sink`
    /// as soon as it is read.
    ///
    /// The pipe is drained to EOF before waiting, so a chatty child can never
    /// block on a full pipe. Every line written before exit reaches the sink
    /// before this returns.
    pub fn exec_streaming(&self, sink: &mut dyn LineSink) -> io::Result<ExitStatus> {
        let (reader, writer) = io::pipe()?;

        let mut child = {
            let mut cmd = self.build_command();
            cmd.stdin(Stdio::null());
            cmd.stdout(writer.try_clone()?);
            cmd.stderr(writer);
            cmd.spawn()?
            // `cmd` drops here and closes our copies of the write end.
        };

        let result = relay_lines(reader, sink);
        let status = child.wait();
        result?;
        status
    }

    /// Display the command for log and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Forward every line of `reader` to `sink`, tolerating invalid UTF-8.
fn relay_lines(reader: impl io::Read, sink: &mut dyn LineSink) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }

        let mut line = &buf[..];
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest;
        }
        if let Some(rest) = line.strip_suffix(b"\r") {
            line = rest;
        }
        sink.line(&String::from_utf8_lossy(line));
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("cmake").args(["--build", ".", "--", "-j4"]);
        assert_eq!(pb.display_command(), "cmake --build . -- -j4");
    }

    #[test]
    fn test_from_argv() {
        let argv = vec!["wsl.exe".to_string(), "cmake".to_string(), ".".to_string()];
        let pb = ProcessBuilder::from_argv(&argv).unwrap();
        assert_eq!(pb.get_program(), Path::new("wsl.exe"));
        assert_eq!(pb.get_args(), ["cmake", "."]);

        assert!(ProcessBuilder::from_argv(&[]).is_none());
    }

    #[test]
    fn test_relay_lines_strips_endings() {
        let mut lines = Vec::new();
        let mut sink = |line: &str| lines.push(line.to_string());
        relay_lines(&b"one\r\ntwo\n\nthree"[..], &mut sink).unwrap();

        assert_eq!(lines, ["one", "two", "", "three"]);
    }

    #[test]
    fn test_relay_lines_lossy() {
        let mut lines = Vec::new();
        let mut sink = |line: &str| lines.push(line.to_string());
        relay_lines(&b"ok \xff\n"[..], &mut sink).unwrap();

        assert_eq!(lines, ["ok \u{fffd}"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_captures_output() {
        let output = ProcessBuilder::new("echo").arg("hello").exec().unwrap();

        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_streaming_merges_stderr() {
        let mut lines = Vec::new();
        let mut sink = |line: &str| lines.push(line.to_string());

        let status = ProcessBuilder::new("sh")
            .args(["-c", "echo out; echo err 1>&2; echo done"])
            .exec_streaming(&mut sink)
            .unwrap();

        assert!(status.success());
        assert_eq!(lines, ["out", "err", "done"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_streaming_drains_large_output() {
        let mut count = 0usize;
        let mut last = String::new();
        let mut sink = |line: &str| {
            count += 1;
            last = line.to_string();
        };

        // Far more than a pipe buffer holds.
        let status = ProcessBuilder::new("sh")
            .args(["-c", "i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done; exit 3"])
            .exec_streaming(&mut sink)
            .unwrap();

        assert_eq!(status.code(), Some(3));
        assert_eq!(count, 20000);
        assert_eq!(last, "line-19999");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_streaming_runs_in_cwd() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut lines = Vec::new();
        let mut sink = |line: &str| lines.push(line.to_string());

        ProcessBuilder::new("pwd")
            .cwd(tmp.path())
            .exec_streaming(&mut sink)
            .unwrap();

        let expected = tmp.path().canonicalize().unwrap();
        assert_eq!(Path::new(&lines[0]).canonicalize().unwrap(), expected);
    }

    #[test]
    fn test_exec_streaming_missing_program() {
        let mut sink = |_: &str| {};
        let err = ProcessBuilder::new("definitely-not-a-real-program-4711")
            .exec_streaming(&mut sink)
            .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
