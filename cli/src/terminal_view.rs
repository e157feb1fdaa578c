use rag_client::{QueryResult, Trigger, View};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

const RULE: &str = "----------------------------------------";
const CLEARED: &str = "========================================";

/// Plain-text view: notices go to one stream, the results list to another.
/// Nothing is interpreted as markup, so backend content is written verbatim.
///
/// The output stream is append-only. Clearing a non-empty results list
/// writes a `CLEARED` line, so everything after the last one is the
/// current rendering.
pub struct TerminalView<O: Write + Send, N: Write + Send> {
    out: Mutex<O>,
    notices: Mutex<N>,
    has_output: AtomicBool,
}

impl TerminalView<std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write + Send, N: Write + Send> TerminalView<O, N> {
    pub fn new(out: O, notices: N) -> Self {
        Self {
            out: Mutex::new(out),
            notices: Mutex::new(notices),
            has_output: AtomicBool::new(false),
        }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (O, N) {
        (
            self.out.into_inner().unwrap_or_else(|p| p.into_inner()),
            self.notices.into_inner().unwrap_or_else(|p| p.into_inner()),
        )
    }

    fn write_out(&self, text: &str) {
        self.has_output.store(true, Ordering::Release);
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            log::error!("Failed to write results: {}", e);
        }
    }
}

impl<O: Write + Send, N: Write + Send> View for TerminalView<O, N> {
    fn alert(&self, message: &str) {
        let mut notices = self.notices.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = writeln!(notices, "{}", message) {
            log::error!("Failed to write notice: {}", e);
        }
    }

    fn set_trigger_enabled(&self, trigger: Trigger, enabled: bool) {
        log::debug!("{:?} trigger {}", trigger, if enabled { "enabled" } else { "disabled" });
    }

    fn clear_results(&self) {
        if self.has_output.swap(false, Ordering::AcqRel) {
            let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
            if let Err(e) = writeln!(out, "{}", CLEARED) {
                log::error!("Failed to write results: {}", e);
            }
        }
    }

    fn show_placeholder(&self, text: &str) {
        self.write_out(text);
    }

    fn append_result(&self, result: &QueryResult) {
        self.write_out(&format!(
            "{}\nRank: {}\nSource: {}\nContent: {}",
            RULE, result.rank, result.source, result.content
        ));
    }
}
