use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    path::Path,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    config::Config,
    errors::errors::{Error, ErrorImpl},
};

use super::{
    messages::{CompileRequest, WorkerMessage},
    module::{CompilerModule, ModuleConfig, ModuleLoader, OutputHook},
};

const WORKER_THREAD: &str = "velvex-worker";
const LOADER_THREAD: &str = "velvex-module-loader";

/// Lifecycle of the compiler module, owned by the worker thread.
enum ModuleState {
    Uninitialized,
    Initializing,
    Ready(Box<dyn CompilerModule>),
}

impl ModuleState {
    fn name(&self) -> &'static str {
        match self {
            ModuleState::Uninitialized => "uninitialized",
            ModuleState::Initializing => "initializing",
            ModuleState::Ready(_) => "ready",
        }
    }
}

/// Everything the worker thread can receive.
enum Inbox {
    Request(CompileRequest),
    /// Posted by the loader thread, together with the request that started it.
    Loaded(Result<Box<dyn CompilerModule>, Error>, CompileRequest),
    Terminate,
}

struct Worker {
    loader: Arc<dyn ModuleLoader>,
    module_config: ModuleConfig,
    entry_point: String,
    state: ModuleState,
    inbox: Sender<Inbox>,
    events: Sender<WorkerMessage>,
}

impl Worker {
    fn run(mut self, requests: Receiver<Inbox>) {
        log::info!("compiler worker started");

        while let Ok(message) = requests.recv() {
            match message {
                Inbox::Request(request) => self.handle_request(request),
                Inbox::Loaded(result, request) => self.handle_loaded(result, request),
                Inbox::Terminate => break,
            }
        }

        log::info!("compiler worker stopped ({})", self.state.name());
    }

    fn handle_request(&mut self, request: CompileRequest) {
        match self.state {
            ModuleState::Uninitialized => self.begin_initialization(request),
            ModuleState::Initializing => {
                log::debug!("dropping compile request while the compiler module initializes");
            }
            ModuleState::Ready(_) => self.invoke(request),
        }
    }

    fn begin_initialization(&mut self, request: CompileRequest) {
        self.state = ModuleState::Initializing;
        log::info!("instantiating compiler module");

        let loader = Arc::clone(&self.loader);
        let config = self.module_config.clone();
        let inbox = self.inbox.clone();

        let spawned = thread::Builder::new()
            .name(String::from(LOADER_THREAD))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| loader.instantiate(config)))
                    .unwrap_or_else(|payload| Err(panicked(payload.as_ref())));

                if inbox.send(Inbox::Loaded(result, request)).is_err() {
                    log::debug!("worker gone before the compiler module finished loading");
                }
            });

        if let Err(err) = spawned {
            self.state = ModuleState::Uninitialized;
            self.fail(Error::new(ErrorImpl::WorkerSpawn {
                message: err.to_string(),
            }));
        }
    }

    fn handle_loaded(
        &mut self,
        result: Result<Box<dyn CompilerModule>, Error>,
        request: CompileRequest,
    ) {
        match result {
            Ok(module) => {
                log::info!("compiler module ready");
                self.state = ModuleState::Ready(module);
                self.invoke(request);
            }
            Err(error) => {
                log::warn!("compiler module failed to load: {}", error);
                self.state = ModuleState::Uninitialized;
                self.fail(error);
            }
        }
    }

    fn invoke(&mut self, request: CompileRequest) {
        let ModuleState::Ready(module) = &mut self.state else {
            return;
        };

        let entry_point = self.entry_point.as_str();
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| module.call(entry_point, &request.code)));

        match outcome {
            Ok(Ok(())) => self.emit(WorkerMessage::Done),
            Ok(Err(error)) => self.fail(error),
            Err(payload) => self.fail(panicked(payload.as_ref())),
        }
    }

    /// Reports `error` as a `stderr` event, always followed by `done`.
    fn fail(&self, error: Error) {
        log::warn!("compile request failed: {}", error);
        self.emit(WorkerMessage::stderr(error.to_string()));
        self.emit(WorkerMessage::Done);
    }

    fn emit(&self, message: WorkerMessage) {
        if self.events.send(message).is_err() {
            log::debug!("event receiver dropped");
        }
    }
}

fn panicked(payload: &(dyn Any + Send)) -> Error {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        String::from(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown error")
    };

    Error::new(ErrorImpl::ModulePanicked { message })
}

fn output_hook(
    events: &Sender<WorkerMessage>,
    stream: fn(String) -> WorkerMessage,
) -> OutputHook {
    let events = events.clone();
    Arc::new(move |text: &str| {
        log::trace!("module output: {}", text);
        if events.send(stream(String::from(text))).is_err() {
            log::debug!("event receiver dropped");
        }
    })
}

/// Foreground handle to the compiler worker.
///
/// Requests go in through `post`, events come back in emission order
/// through `try_recv`, `recv` or `recv_timeout`. Dropping the bridge stops
/// the worker once it has handled what is already queued, and joins it.
pub struct Bridge {
    requests: Sender<Inbox>,
    events: Receiver<WorkerMessage>,
    worker: Option<JoinHandle<()>>,
}

impl Bridge {
    pub fn spawn<L: ModuleLoader>(loader: L, config: &Config) -> Result<Bridge, Error> {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let asset = config.asset.clone();
        let asset_root = config.asset_root.clone();
        let module_config = ModuleConfig {
            print: output_hook(&event_tx, |text| WorkerMessage::Stdout { text }),
            print_err: output_hook(&event_tx, |text| WorkerMessage::Stderr { text }),
            locate_file: Arc::new(move |path: &str, prefix: &Path| {
                if path == asset {
                    asset_root.join(path)
                } else {
                    prefix.join(path)
                }
            }),
        };

        let worker = Worker {
            loader: Arc::new(loader),
            module_config,
            entry_point: config.entry_point.clone(),
            state: ModuleState::Uninitialized,
            inbox: request_tx.clone(),
            events: event_tx,
        };

        let handle = thread::Builder::new()
            .name(String::from(WORKER_THREAD))
            .spawn(move || worker.run(request_rx))
            .map_err(|err| {
                Error::new(ErrorImpl::WorkerSpawn {
                    message: err.to_string(),
                })
            })?;

        Ok(Bridge {
            requests: request_tx,
            events: event_rx,
            worker: Some(handle),
        })
    }

    /// Queues a request and returns immediately.
    pub fn post(&self, request: CompileRequest) -> Result<(), Error> {
        self.requests
            .send(Inbox::Request(request))
            .map_err(|_| Error::new(ErrorImpl::WorkerUnavailable))
    }

    pub fn try_recv(&self) -> Option<WorkerMessage> {
        self.events.try_recv().ok()
    }

    /// Blocks for the next event. `None` once the worker is gone.
    pub fn recv(&self) -> Option<WorkerMessage> {
        self.events.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerMessage> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Stops the worker after the queued requests and waits for it.
    pub fn terminate(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };

        let _ = self.requests.send(Inbox::Terminate);
        if handle.join().is_err() {
            log::warn!("compiler worker panicked");
        }
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}
