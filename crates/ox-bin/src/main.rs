//! oxvi entrypoint: replays a key sequence against a text and prints the result.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{Editor, parse_notation};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxvi", version, about = "Headless modal editing replay")]
struct Args {
    /// Text file to load as the initial buffer. Empty buffer when omitted.
    pub path: Option<PathBuf>,
    /// Keys to replay, in Vim notation (`"2dd<Esc>"`, `"<C-r>"`).
    #[arg(long = "keys", default_value = "")]
    pub keys: String,
    /// Configuration file path (overrides discovery of `oxvi.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Print the full editor view as JSON instead of the buffer text.
    #[arg(long = "json")]
    pub json: bool,
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let output = replay(&args)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}")?;
    info!(target: "runtime", "shutdown");
    Ok(())
}

/// Logs go to `oxvi.log` in the working directory, filtered by `RUST_LOG`.
/// The returned guard flushes the writer on drop.
fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("oxvi.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "oxvi.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
        .ok()
        // Global subscriber already installed; dropping the guard shuts the writer down.
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Load text and config, feed every key, and render the requested output.
fn replay(args: &Args) -> Result<String> {
    let text = match args.path.as_deref() {
        Some(path) => read_text(path)?,
        None => String::new(),
    };
    let config = core_config::load_from(args.config.clone())?;
    let keys = parse_notation(&args.keys).with_context(|| format!("parsing keys {:?}", args.keys))?;

    let mut editor = Editor::with_config(&text, &config);
    for key in &keys {
        editor.submit_key(key);
    }
    info!(
        target: "runtime",
        keys = keys.len(),
        mode = %editor.query_mode(),
        undo_depth = editor.undo_depth(),
        "replay_complete"
    );

    if args.json {
        Ok(serde_json::to_string_pretty(&editor.query_view())?)
    } else {
        Ok(editor.query_text())
    }
}

/// Read a file as editor text: CRLF becomes LF and one trailing newline is dropped.
fn read_text(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut text = raw.replace("\r\n", "\n");
    if text.ends_with('\n') {
        text.pop();
    }
    debug!(target: "runtime", file = %path.display(), size_bytes = raw.len(), lines = text.split('\n').count(), "file_read_ok");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(path: Option<PathBuf>, keys: &str, json: bool) -> Args {
        Args {
            path,
            keys: keys.to_owned(),
            config: Some(PathBuf::from("__oxvi_test_no_config__.toml")),
            json,
        }
    }

    fn text_file(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn replays_keys_over_file_text() {
        let file = text_file("The quick brown fox\r\njumps over the lazy dog\n");
        let out = replay(&args(Some(file.path().to_path_buf()), "dwjx", false)).unwrap();
        assert_eq!(out, "uick brown fox\numps over the lazy dog");
    }

    #[test]
    fn empty_buffer_without_path() {
        let out = replay(&args(None, "ihello<Esc>", false)).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn json_view_output() {
        let out = replay(&args(None, "iab<Esc>v", true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["mode"], "visual");
        assert_eq!(value["lines"], serde_json::json!(["ab"]));
        assert_eq!(value["cursor"], serde_json::json!({ "x": 1, "y": 0 }));
        assert_eq!(value["undo_depth"], 1);
    }

    #[test]
    fn malformed_keys_are_an_error() {
        let err = replay(&args(None, "x<Esc", false)).unwrap_err();
        assert!(err.to_string().contains("parsing keys"));
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let missing = PathBuf::from("__oxvi_missing_input__.txt");
        let err = replay(&args(Some(missing), "", false)).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }

    #[test]
    fn cli_parses_flags() {
        let parsed = Args::try_parse_from(["oxvi", "notes.txt", "--keys", "2dd", "--json"]).unwrap();
        assert_eq!(parsed.path, Some(PathBuf::from("notes.txt")));
        assert_eq!(parsed.keys, "2dd");
        assert!(parsed.json);
        assert!(parsed.config.is_none());
    }
}
