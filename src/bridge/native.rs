use std::{
    env, fs,
    io::{BufRead, BufReader, Read, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use crate::errors::errors::{Error, ErrorImpl};

use super::module::{CompilerModule, ModuleConfig, ModuleLoader, OutputHook};

/// Loads the compiler as a native executable.
///
/// The executable is found by asking the `locate_file` hook for `asset`,
/// with the current directory as the default prefix.
pub struct NativeLoader {
    asset: String,
    prefix: PathBuf,
}

impl NativeLoader {
    pub fn new(asset: &str) -> Self {
        NativeLoader {
            asset: String::from(asset),
            prefix: env::current_dir().unwrap_or_default(),
        }
    }
}

impl ModuleLoader for NativeLoader {
    fn instantiate(&self, config: ModuleConfig) -> Result<Box<dyn CompilerModule>, Error> {
        let binary = (config.locate_file)(&self.asset, &self.prefix);

        if !binary.is_file() {
            return Err(Error::new(ErrorImpl::ModuleNotFound {
                path: binary.to_string_lossy().into_owned(),
            }));
        }
        ensure_executable(&binary)?;

        log::info!("using compiler at {}", binary.display());

        Ok(Box::new(NativeModule {
            binary,
            print: config.print,
            print_err: config.print_err,
        }))
    }
}

#[cfg(unix)]
fn ensure_executable(binary: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(binary).map_err(|err| {
        Error::new(ErrorImpl::ModuleLoad {
            message: err.to_string(),
        })
    })?;

    if metadata.permissions().mode() & 0o111 == 0 {
        return Err(Error::new(ErrorImpl::ModuleLoad {
            message: format!("{} is not executable", binary.display()),
        }));
    }

    Ok(())
}

#[cfg(not(unix))]
fn ensure_executable(binary: &Path) -> Result<(), Error> {
    fs::metadata(binary).map(|_| ()).map_err(|err| {
        Error::new(ErrorImpl::ModuleLoad {
            message: err.to_string(),
        })
    })
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Reads `pipe` line by line on its own thread, tagging each line with
/// `stream`. Invalid UTF-8 is replaced rather than ending the stream.
fn read_lines<R>(pipe: R, stream: Stream, lines: Sender<(Stream, String)>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut buffer = vec![];

        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buffer);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if lines.send((stream, line)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    log::debug!("could not read compiler {:?}: {}", stream, err);
                    break;
                }
            }
        }
    })
}

/// Runs the compiler once per call: the entry point is passed as the first
/// argument and the code on stdin. Each stdout line goes to `print`, each
/// stderr line to `print_err`, in the order they arrive.
pub struct NativeModule {
    binary: PathBuf,
    print: OutputHook,
    print_err: OutputHook,
}

impl CompilerModule for NativeModule {
    fn call(&mut self, entry_point: &str, code: &str) -> Result<(), Error> {
        let invocation_error = |message: String| {
            Error::new(ErrorImpl::Invocation {
                entry_point: String::from(entry_point),
                message,
            })
        };

        let mut child = Command::new(&self.binary)
            .arg(entry_point)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| invocation_error(err.to_string()))?;

        // Fed from its own thread so a chatty compiler cannot fill its pipes first.
        let stdin = child.stdin.take();
        let input = code.as_bytes().to_vec();
        let writer = thread::spawn(move || match stdin {
            Some(mut stdin) => stdin.write_all(&input),
            None => Ok(()),
        });

        let (line_tx, line_rx) = mpsc::channel();
        let mut readers = vec![];
        if let Some(stdout) = child.stdout.take() {
            readers.push(read_lines(stdout, Stream::Stdout, line_tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(read_lines(stderr, Stream::Stderr, line_tx.clone()));
        }
        drop(line_tx);

        for (stream, line) in line_rx {
            match stream {
                Stream::Stdout => (self.print)(&line),
                Stream::Stderr => (self.print_err)(&line),
            }
        }

        for reader in readers {
            if reader.join().is_err() {
                log::warn!("compiler output reader panicked");
            }
        }

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => log::debug!("compiler closed stdin early: {}", err),
            Err(_) => log::warn!("stdin writer thread panicked"),
        }

        let status = child
            .wait()
            .map_err(|err| invocation_error(err.to_string()))?;

        if !status.success() {
            log::warn!("compiler exited with {}", status);
        }

        Ok(())
    }
}
