//! Worker side of the protocol.
//!
//! The worker carries its own reduced rule set (comments, debug statements,
//! whitespace) and never touches the advanced backends, so it can run in an
//! isolated thread or process.

use super::protocol::{WorkerRequest, WorkerResponse};
use crate::core::engine::literals::{strip_comment, Lexer, ProtectedText, QUOTED};
use crate::core::engine::panic_message;
use crate::core::models::{
    CommentStyle, LineSensitivity, MinificationOptions, MinificationResult, SupportedLanguage,
};
use crate::utils::{MinifyError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 64;

// Strings are scanned together with comments so `"a // b"` stays a string
static MARKUP_LEXER: Lazy<Lexer> = Lazy::new(|| {
    Lexer::new(
        r#"(?P<comment><!--[\s\S]*?-->)|=\s*(?P<lit>"[^"]*"|'[^']*')"#,
        strip_comment,
    )
});
static SLASH_LEXER: Lazy<Lexer> = Lazy::new(|| {
    Lexer::new(
        &format!(r"(?P<comment>/\*[\s\S]*?\*/|//[^\n]*)|{}|`(?:[^`\\]|\\[\s\S])*`", QUOTED),
        strip_comment,
    )
});
static HASH_LEXER: Lazy<Lexer> = Lazy::new(|| {
    Lexer::new(
        &format!(
            r#"(?P<comment>(?:(?m:^)|[ \t])#(?:[^!\n][^\n]*)?(?m:$))|"""[\s\S]*?"""|'''[\s\S]*?'''|{}"#,
            QUOTED
        ),
        strip_comment,
    )
});
static STRING_LEXER: Lazy<Lexer> = Lazy::new(|| Lexer::new(QUOTED, strip_comment));
static CONSOLE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bconsole\.[A-Za-z_$][\w$]*\s*\((?:[^()]|\([^()]*\))*\)\s*;?").unwrap()
});
static DEBUGGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdebugger\b\s*;?").unwrap());
static ALL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HORIZONTAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static LINE_EDGES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]+|[ \t\r]+$").unwrap());
static TRAILING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)[ \t\r]+$").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*\r?\n").unwrap());
static INTER_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").unwrap());

/// Answer one request. Never panics; failures become `success: false`.
pub fn handle_request(request: WorkerRequest) -> WorkerResponse {
    let WorkerRequest {
        id,
        code,
        language,
        options,
    } = request;

    match panic::catch_unwind(AssertUnwindSafe(|| reduced_minify(&code, language, &options))) {
        Ok(Ok(result)) => WorkerResponse::ok(id, result),
        Ok(Err(err)) => WorkerResponse::failed(id, err.to_string()),
        Err(payload) => WorkerResponse::failed(id, format!("Worker panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn reduced_minify(
    code: &str,
    language: SupportedLanguage,
    options: &MinificationOptions,
) -> Result<MinificationResult> {
    if language == SupportedLanguage::Json {
        let value: serde_json::Value =
            serde_json::from_str(code).map_err(|e| MinifyError::invalid_json(&e, code))?;
        let compact = serde_json::to_string(&value)
            .map_err(|e| MinifyError::Internal(e.to_string()))?;
        return Ok(MinificationResult::new(code, compact, Vec::new()));
    }

    let lexer: &Lexer = match language.comment_style() {
        CommentStyle::Markup => &MARKUP_LEXER,
        CommentStyle::CFamily | CommentStyle::Php => &SLASH_LEXER,
        CommentStyle::Hash | CommentStyle::PowerShell => &HASH_LEXER,
        _ => &STRING_LEXER,
    };
    let protected = ProtectedText::scan(code, lexer, options.remove_comments)?;

    let mut warnings = Vec::new();
    let mut text = protected.text().to_string();

    if matches!(language, SupportedLanguage::Javascript | SupportedLanguage::Typescript) {
        if options.remove_console_log {
            text = CONSOLE_CALL.replace_all(&text, "").into_owned();
        }
        if options.remove_debugger {
            text = DEBUGGER.replace_all(&text, "").into_owned();
        }
        if options.mangle_variables {
            warnings.push("Variable mangling is not available in the worker".to_string());
        }
    }

    if options.remove_whitespace {
        let lines_matter = options.preserve_line_breaks
            || matches!(language, SupportedLanguage::Javascript | SupportedLanguage::Typescript)
            || language.line_sensitivity() == LineSensitivity::Lines;
        if language.line_sensitivity() == LineSensitivity::Indentation {
            text = TRAILING.replace_all(&text, "").into_owned();
        } else if lines_matter {
            text = HORIZONTAL.replace_all(&text, " ").into_owned();
            text = LINE_EDGES.replace_all(&text, "").into_owned();
        } else {
            text = ALL_WHITESPACE.replace_all(&text, " ").into_owned();
        }
        if language.comment_style() == CommentStyle::Markup {
            text = INTER_TAG.replace_all(&text, "><").into_owned();
        }
    }
    if options.remove_empty_lines {
        text = BLANK_LINES.replace_all(&text, "").into_owned();
    }

    let minified = protected.restore(text.trim());
    Ok(MinificationResult::new(code, minified, warnings))
}

/// Start a worker thread. Requests go in through the sender, responses come
/// out of the receiver in completion order. The thread exits when either side
/// is dropped.
pub fn spawn_worker() -> (mpsc::Sender<WorkerRequest>, mpsc::Receiver<WorkerResponse>) {
    let (request_tx, mut request_rx) = mpsc::channel::<WorkerRequest>(CHANNEL_CAPACITY);
    let (response_tx, response_rx) = mpsc::channel::<WorkerResponse>(CHANNEL_CAPACITY);

    let spawned = std::thread::Builder::new()
        .name("codeshrink-worker".to_string())
        .spawn(move || {
            while let Some(request) = request_rx.blocking_recv() {
                tracing::debug!("Worker handling request {}", request.id);
                if response_tx.blocking_send(handle_request(request)).is_err() {
                    break;
                }
            }
        });
    // Without a thread the receiver closes and every request fails as disconnected
    if let Err(e) = spawned {
        tracing::error!("Failed to start worker thread: {}", e);
    }

    (request_tx, response_rx)
}

/// Serve the protocol as JSON lines: one request per input line, one response per output line.
/// Returns the number of requests answered.
pub fn serve_lines<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<usize> {
    let mut answered = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<WorkerRequest>(&line) {
            Ok(request) => handle_request(request),
            Err(err) => WorkerResponse::failed(request_id_of(&line), format!("Malformed request: {}", err)),
        };
        let encoded = serde_json::to_string(&response)
            .map_err(|e| MinifyError::Internal(format!("Failed to encode response: {}", e)))?;
        writeln!(writer, "{}", encoded)?;
        writer.flush()?;
        answered += 1;
    }
    Ok(answered)
}

/// Best-effort id recovery so a malformed request still gets a correlatable reply
fn request_id_of(line: &str) -> String {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|value| value.get("id").and_then(|id| id.as_str()).map(str::to_string))
        .unwrap_or_default()
}

/// `serve_lines` over the process's stdin and stdout
pub fn serve_stdio() -> Result<usize> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve_lines(stdin.lock(), stdout.lock())
}
