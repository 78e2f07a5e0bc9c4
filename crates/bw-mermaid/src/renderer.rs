//! Diagram renderer trait and the `mmdc` implementation.

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::consts::{DEFAULT_COMMAND, INPUT_EXTENSION, POLL_INTERVAL, RENDER_TIMEOUT};
use crate::format::RenderOptions;

/// Outcome of rendering one diagram: the image path or why it failed.
pub type RenderResult = Result<PathBuf, RenderFailure>;

/// Renderer could not be set up.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Converter executable is not on `PATH`.
    #[error(
        "{command} not found on PATH (install with `npm install -g @mermaid-js/mermaid-cli`)"
    )]
    Configuration {
        /// Executable that was looked up.
        command: String,
    },
}

/// Why a single diagram failed to render.
#[derive(Debug, thiserror::Error)]
pub enum RenderFailure {
    /// Converter ran past the time limit and was killed.
    #[error("conversion timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    /// Converter exited unsuccessfully.
    #[error("converter failed ({status}): {message}")]
    Exit {
        /// Exit status as reported by the OS.
        status: String,
        /// Captured stderr, or stdout when stderr is empty.
        message: String,
    },

    /// Converter exited successfully without writing the image.
    #[error("output not produced: {}", .0.display())]
    OutputMissing(PathBuf),

    /// Scratch file or process I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts diagram source into an image file.
pub trait DiagramRenderer {
    /// Render `source` into `output_dir/{name}.{ext}`.
    fn render(
        &self,
        source: &str,
        output_dir: &Path,
        name: &str,
        options: &RenderOptions,
    ) -> RenderResult;

    /// Render `(source, name)` pairs sequentially, in input order.
    ///
    /// A failure does not stop later items.
    fn render_many(
        &self,
        items: &[(String, String)],
        output_dir: &Path,
        options: &RenderOptions,
    ) -> Vec<RenderResult> {
        items
            .iter()
            .map(|(source, name)| self.render(source, output_dir, name, options))
            .collect()
    }
}

/// Renderer backed by the mermaid-cli executable.
#[derive(Debug, Clone)]
pub struct MermaidRenderer {
    executable: PathBuf,
    timeout: Duration,
}

impl MermaidRenderer {
    /// Locate `mmdc` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Configuration`] if the executable is missing.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_command(DEFAULT_COMMAND)
    }

    /// Locate a specific converter executable (name on `PATH` or a path).
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Configuration`] if the executable is missing.
    pub fn with_command(command: &str) -> Result<Self, RenderError> {
        let executable = which::which(command).map_err(|_| RenderError::Configuration {
            command: command.to_owned(),
        })?;
        tracing::debug!(executable = %executable.display(), "Found diagram converter");
        Ok(Self {
            executable,
            timeout: RENDER_TIMEOUT,
        })
    }

    /// Whether `command` can be found, without constructing a renderer.
    #[must_use]
    pub fn is_available(command: &str) -> bool {
        which::which(command).is_ok()
    }

    /// Override the execution time limit (default 60 seconds).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolved converter path.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn run(&self, input: &Path, output: &Path, options: &RenderOptions) -> Result<(), RenderFailure> {
        let mut command = Command::new(&self.executable);
        command
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("-t")
            .arg(&options.theme)
            .arg("-b")
            .arg(&options.background);

        let finished = run_with_timeout(command, self.timeout)?;
        if !finished.status.success() {
            let message = if finished.stderr.trim().is_empty() {
                finished.stdout.trim().to_owned()
            } else {
                finished.stderr.trim().to_owned()
            };
            return Err(RenderFailure::Exit {
                status: finished.status.to_string(),
                message,
            });
        }
        if !output.exists() {
            return Err(RenderFailure::OutputMissing(output.to_path_buf()));
        }
        Ok(())
    }
}

impl DiagramRenderer for MermaidRenderer {
    fn render(
        &self,
        source: &str,
        output_dir: &Path,
        name: &str,
        options: &RenderOptions,
    ) -> RenderResult {
        fs::create_dir_all(output_dir)?;
        let input = ScratchFile(output_dir.join(format!("{name}.{INPUT_EXTENSION}")));
        let output = output_dir.join(format!("{name}.{}", options.format.extension()));

        fs::write(&input.0, source)?;
        match self.run(&input.0, &output, options) {
            Ok(()) => {
                tracing::info!(output = %output.display(), "Rendered diagram");
                Ok(output)
            }
            Err(failure) => {
                tracing::warn!(diagram = name, error = %failure, "Diagram rendering failed");
                Err(failure)
            }
        }
    }
}

/// Input file removed when dropped, whatever the render outcome.
struct ScratchFile(PathBuf);

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.0)
            && e.kind() != ErrorKind::NotFound
        {
            tracing::debug!(path = %self.0.display(), error = %e, "Failed to remove scratch file");
        }
    }
}

/// Exit status and captured output of a finished process.
struct Finished {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Run `command`, killing it once `timeout` elapses.
///
/// Pipes are drained on helper threads so a chatty converter cannot block on
/// a full pipe while it is being polled.
fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<Finished, RenderFailure> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn()?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(RenderFailure::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(Finished {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::format::ImageFormat;
    use pretty_assertions::assert_eq;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Writes `-o` target with the received arguments.
    const WRITES_OUTPUT: &str = r#"#!/bin/sh
out=""
args="$*"
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf '%s' "$args" > "$out"
"#;

    const FAILS: &str = "#!/bin/sh\necho 'Parse error on line 1' >&2\nexit 1\n";

    const SUCCEEDS_WITHOUT_OUTPUT: &str = "#!/bin/sh\nexit 0\n";

    const HANGS: &str = "#!/bin/sh\nexec sleep 5\n";

    fn fake_converter(dir: &Path, script: &str) -> MermaidRenderer {
        let path = dir.join("fake-mmdc");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        MermaidRenderer::with_command(path.to_str().unwrap()).unwrap()
    }

    fn leftover_inputs(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == INPUT_EXTENSION))
            .count()
    }

    #[test]
    fn test_missing_executable_is_configuration_error() {
        let err = MermaidRenderer::with_command("bw-definitely-not-installed-mmdc").unwrap_err();
        assert!(matches!(err, RenderError::Configuration { .. }));
        assert!(!MermaidRenderer::is_available("bw-definitely-not-installed-mmdc"));
    }

    #[test]
    fn test_render_success_passes_options() {
        let tools = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let renderer = fake_converter(tools.path(), WRITES_OUTPUT);
        let options = RenderOptions {
            format: ImageFormat::Svg,
            theme: "forest".to_owned(),
            background: "transparent".to_owned(),
        };

        let path = renderer
            .render("graph TD\n A-->B", out.path(), "flow", &options)
            .unwrap();

        assert_eq!(path, out.path().join("flow.svg"));
        let args = fs::read_to_string(&path).unwrap();
        assert!(args.contains("-t forest -b transparent"), "{args}");
        assert!(args.contains("flow.mmd"), "{args}");
        assert_eq!(leftover_inputs(out.path()), 0);
    }

    #[test]
    fn test_render_nonzero_exit() {
        let tools = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let renderer = fake_converter(tools.path(), FAILS);

        let err = renderer
            .render("nonsense", out.path(), "bad", &RenderOptions::default())
            .unwrap_err();

        match err {
            RenderFailure::Exit { message, .. } => assert_eq!(message, "Parse error on line 1"),
            other => panic!("unexpected failure: {other:?}"),
        }
        assert_eq!(leftover_inputs(out.path()), 0);
    }

    #[test]
    fn test_render_zero_exit_without_output() {
        let tools = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let renderer = fake_converter(tools.path(), SUCCEEDS_WITHOUT_OUTPUT);

        let err = renderer
            .render("graph TD", out.path(), "ghost", &RenderOptions::default())
            .unwrap_err();

        assert!(matches!(err, RenderFailure::OutputMissing(_)));
        assert!(err.to_string().starts_with("output not produced"));
        assert_eq!(leftover_inputs(out.path()), 0);
    }

    #[test]
    fn test_render_timeout() {
        let tools = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let renderer =
            fake_converter(tools.path(), HANGS).timeout(Duration::from_millis(200));

        let started = Instant::now();
        let err = renderer
            .render("graph TD", out.path(), "slow", &RenderOptions::default())
            .unwrap_err();

        assert!(matches!(err, RenderFailure::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(leftover_inputs(out.path()), 0);
    }

    #[test]
    fn test_render_many_continues_after_failure() {
        let tools = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let renderer = fake_converter(tools.path(), WRITES_OUTPUT);
        // An unwritable name makes the middle render fail
        let items = vec![
            ("graph TD".to_owned(), "first".to_owned()),
            ("graph TD".to_owned(), "missing-dir/second".to_owned()),
            ("graph LR".to_owned(), "third".to_owned()),
        ];

        let results = renderer.render_many(&items, out.path(), &RenderOptions::default());

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap(), &out.path().join("third.png"));
    }

    #[test]
    fn test_render_creates_output_dir() {
        let tools = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let nested = out.path().join("scratch");
        let renderer = fake_converter(tools.path(), WRITES_OUTPUT);

        let path = renderer
            .render("graph TD", &nested, "d", &RenderOptions::default())
            .unwrap();

        assert!(path.starts_with(&nested));
    }
}
