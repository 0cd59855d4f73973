//! Integration tests for the playground pipeline.
//!
//! These tests drive a `Console` over a real `Bridge` worker thread, with
//! in-test compiler modules standing in for the external compiler.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc, Mutex,
    },
    time::Duration,
};

use velvex::{
    bridge::{
        bridge::Bridge,
        messages::WorkerMessage,
        module::{CompilerModule, ModuleConfig, ModuleLoader},
    },
    config::{Config, DEFAULT_BANNER},
    console::{
        console::{Console, COMPILING, FINISHED_WITH_ERRORS, SUCCEEDED},
        transcript::{DisplayMode, LineKind, OutputLine, ViewItem},
    },
    errors::errors::Error,
};

/// Prints the received code back, split on the newline marker.
struct MarkerSplitter {
    config: ModuleConfig,
}

impl CompilerModule for MarkerSplitter {
    fn call(&mut self, _entry_point: &str, code: &str) -> Result<(), Error> {
        for part in code.split("\\n") {
            (self.config.print)(part.trim());
        }
        Ok(())
    }
}

struct Exploding;

impl CompilerModule for Exploding {
    fn call(&mut self, _entry_point: &str, _code: &str) -> Result<(), Error> {
        panic!("stack overflow in compile_velvet")
    }
}

struct TestLoader {
    explode: bool,
    instances: Arc<AtomicUsize>,
    gate: Mutex<Option<mpsc::Receiver<()>>>,
}

impl TestLoader {
    fn new(explode: bool) -> Self {
        TestLoader {
            explode,
            instances: Arc::new(AtomicUsize::new(0)),
            gate: Mutex::new(None),
        }
    }
}

impl ModuleLoader for TestLoader {
    fn instantiate(&self, config: ModuleConfig) -> Result<Box<dyn CompilerModule>, Error> {
        self.instances.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = self.gate.lock().unwrap().take() {
            let _ = gate.recv();
        }

        if self.explode {
            Ok(Box::new(Exploding))
        } else {
            Ok(Box::new(MarkerSplitter { config }))
        }
    }
}

fn console_with(loader: TestLoader) -> Console<Bridge> {
    let bridge = Bridge::spawn(loader, &Config::default()).unwrap();
    Console::new(bridge, DEFAULT_BANNER)
}

#[test]
fn test_run_to_completion() {
    let mut console = console_with(TestLoader::new(false));

    assert!(console.run("f(x) = 2\r\nTxt[done]"));
    console.wait();

    let texts: Vec<&str> = console
        .transcript()
        .lines()
        .iter()
        .map(|line| line.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec![DEFAULT_BANNER, COMPILING, "f ( x )   =  2", "Txt[done]", SUCCEEDED]
    );
    assert!(!console.is_busy());
}

#[test]
fn test_single_flight_initialization_and_busy_guard() {
    let (open, gate) = mpsc::channel();
    let loader = TestLoader::new(false);
    let instances = Arc::clone(&loader.instances);
    *loader.gate.lock().unwrap() = Some(gate);
    let mut console = console_with(loader);

    assert!(console.run("a+b"));
    let length = console.transcript().len();

    // Still initializing: the second run never reaches the bridge.
    assert!(!console.run("c+d"));
    assert_eq!(console.transcript().len(), length);

    open.send(()).unwrap();
    console.wait();

    assert_eq!(instances.load(Ordering::SeqCst), 1);
    assert_eq!(
        console.transcript().lines()[length..],
        [OutputLine::out("a + b"), OutputLine::success(SUCCEEDED)]
    );
    assert_eq!(
        console.channel().recv_timeout(Duration::from_millis(200)),
        None
    );
}

#[test]
fn test_throwing_invocation_ends_with_error_then_terminal_line() {
    let mut console = console_with(TestLoader::new(true));

    console.run("x");
    console.wait();

    let lines = console.transcript().lines();
    assert_eq!(
        lines[lines.len() - 2],
        OutputLine::system("Error: stack overflow in compile_velvet")
    );
    assert_eq!(lines[lines.len() - 1], OutputLine::system(FINISHED_WITH_ERRORS));
    assert!(!console.is_busy());

    assert!(console.run("y"));
}

#[test]
fn test_render_mode_aggregates_two_outputs() {
    let mut console = console_with(TestLoader::new(false));

    console.run("x\ny");
    console.wait();

    console.set_mode(DisplayMode::Render);
    let render = console.view();
    assert_eq!(render.math().map(|block| block.source.as_str()), Some("xy"));

    let raw = console.transcript().project(DisplayMode::Raw);
    let outs = raw
        .items
        .iter()
        .filter(|item| matches!(item, ViewItem::Line(line) if line.kind == LineKind::Out))
        .count();
    assert_eq!(outs, 2);
}

#[test]
fn test_sequential_runs_reuse_the_module() {
    let loader = TestLoader::new(false);
    let instances = Arc::clone(&loader.instances);
    let mut console = console_with(loader);

    for source in ["a", "b", "c"] {
        assert!(console.run(source));
        console.wait();
    }

    assert_eq!(instances.load(Ordering::SeqCst), 1);
    let outs: Vec<&str> = console
        .transcript()
        .lines()
        .iter()
        .filter(|line| line.kind == LineKind::Out)
        .map(|line| line.text.as_str())
        .collect();
    assert_eq!(outs, vec!["a", "b", "c"]);
}

#[test]
fn test_events_serialize_to_the_wire_protocol() {
    let bridge = Bridge::spawn(TestLoader::new(false), &Config::default()).unwrap();
    let mut console = Console::new(bridge, DEFAULT_BANNER);

    console.run("z");
    let mut wire = vec![];
    console.wait_with(|event| wire.push(event.to_json().unwrap()));

    assert_eq!(
        wire,
        vec![
            r#"{"type":"stdout","text":"z"}"#.to_string(),
            r#"{"type":"done"}"#.to_string(),
        ]
    );
    assert_eq!(
        WorkerMessage::from_json(&wire[1]).unwrap(),
        WorkerMessage::Done
    );
    console.into_channel().terminate();
}
