use crate::{
    bridge::{
        bridge::Bridge,
        messages::{CompileRequest, WorkerMessage},
    },
    errors::errors::{Error, ErrorImpl},
    sanitizer::sanitizer::sanitize,
};

use super::transcript::{DisplayMode, OutputLine, Transcript, View};

pub const COMPILING: &str = "Compiling...";
pub const CLEARED: &str = "Console cleared.";
pub const SUCCEEDED: &str = "Compilation successful";
pub const FINISHED_WITH_ERRORS: &str = "Compilation finished with errors";

/// The foreground end of a compile channel.
pub trait CompileChannel {
    /// Queues a request without waiting for any reply.
    fn post(&self, request: CompileRequest) -> Result<(), Error>;
    /// Next delivered event, if any is waiting.
    fn try_next(&self) -> Option<WorkerMessage>;
    /// Blocks for the next event, `None` once the other side is gone.
    fn next(&self) -> Option<WorkerMessage>;
}

impl CompileChannel for Bridge {
    fn post(&self, request: CompileRequest) -> Result<(), Error> {
        Bridge::post(self, request)
    }

    fn try_next(&self) -> Option<WorkerMessage> {
        self.try_recv()
    }

    fn next(&self) -> Option<WorkerMessage> {
        self.recv()
    }
}

/// Drives a compile channel and keeps the console transcript.
///
/// At most one request is outstanding: `run` is a no-op until the `done`
/// event of the previous run has been handled.
pub struct Console<C: CompileChannel> {
    channel: C,
    transcript: Transcript,
    mode: DisplayMode,
    busy: bool,
    run_had_errors: bool,
}

impl<C: CompileChannel> Console<C> {
    pub fn new(channel: C, banner: &str) -> Self {
        Console {
            channel,
            transcript: Transcript::new(OutputLine::system(banner)),
            mode: DisplayMode::default(),
            busy: false,
            run_had_errors: false,
        }
    }

    /// Sanitizes `source` and dispatches it. Returns `false` without touching
    /// anything when a run is already in flight.
    pub fn run(&mut self, source: &str) -> bool {
        if self.busy {
            log::debug!("run ignored, a compile request is outstanding");
            return false;
        }

        let code = sanitize(source);
        log::debug!("sanitized source: {}", code);

        self.busy = true;
        self.run_had_errors = false;
        self.transcript.push(OutputLine::system(COMPILING));

        if let Err(error) = self.channel.post(CompileRequest::new(code)) {
            log::warn!("could not dispatch compile request: {}", error);
            self.transcript
                .push(OutputLine::system(format!("Error: {}", error)));
            self.busy = false;
        }

        true
    }

    pub fn on_event(&mut self, event: WorkerMessage) {
        match event {
            WorkerMessage::Stdout { text } => self.transcript.push(OutputLine::out(text)),
            WorkerMessage::Stderr { text } => {
                self.run_had_errors = true;
                self.transcript
                    .push(OutputLine::system(format!("Error: {}", text)));
            }
            WorkerMessage::Done => {
                self.busy = false;
                let line = if self.run_had_errors {
                    OutputLine::system(FINISHED_WITH_ERRORS)
                } else {
                    OutputLine::success(SUCCEEDED)
                };
                self.transcript.push(line);
            }
        }
    }

    /// Handles every event already delivered, without blocking.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;

        while let Some(event) = self.channel.try_next() {
            self.on_event(event);
            handled += 1;
        }

        handled
    }

    pub fn wait(&mut self) {
        self.wait_with(|_| {});
    }

    /// Blocks until the outstanding run is done, showing each event to
    /// `observer` before handling it.
    pub fn wait_with<F>(&mut self, mut observer: F)
    where
        F: FnMut(&WorkerMessage),
    {
        while self.busy {
            match self.channel.next() {
                Some(event) => {
                    observer(&event);
                    self.on_event(event);
                }
                None => {
                    let error = Error::new(ErrorImpl::WorkerUnavailable);
                    self.transcript
                        .push(OutputLine::system(format!("Error: {}", error)));
                    self.busy = false;
                }
            }
        }
    }

    /// Replaces the transcript with a single marker line. The bridge and an
    /// outstanding run are left alone.
    pub fn clear(&mut self) {
        self.transcript.reset(OutputLine::system(CLEARED));
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> DisplayMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn view(&self) -> View<'_> {
        self.transcript.project(self.mode)
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }
}
