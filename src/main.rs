use std::{
    env, fs,
    io::{self, Read},
    path::Path,
    process,
    time::Instant,
};

use velvex::{
    bridge::{bridge::Bridge, native::NativeLoader},
    config::{Config, Options},
    console::console::Console,
    errors::errors::{Error, ErrorImpl, ErrorTip},
    grammar::grammar::highlight_html,
};

fn main() {
    env_logger::init();

    if let Err(error) = run() {
        display_error(&error);
        process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let options = Options::parse(env::args().skip(1))?;
    let source = read_source(options.file.as_deref())?;

    if options.highlight {
        println!("{}", highlight_html(&source));
        return Ok(());
    }

    let config = Config::from_env()?;
    let bridge = Bridge::spawn(NativeLoader::new(&config.asset), &config)?;
    let mut console = Console::new(bridge, &config.banner);
    console.set_mode(options.mode);

    let start = Instant::now();
    console.run(&source);
    console.wait_with(|event| {
        if options.events {
            match event.to_json() {
                Ok(json) => println!("{}", json),
                Err(error) => log::warn!("could not encode event: {}", error),
            }
        }
    });
    log::info!("Compiled in {:?}", start.elapsed());

    if !options.events {
        print!("{}", console.view());
    }

    console.into_channel().terminate();
    Ok(())
}

fn read_source(file: Option<&Path>) -> Result<String, Error> {
    match file {
        Some(path) => fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorImpl::ReadInput {
                path: path.to_string_lossy().into_owned(),
                message: err.to_string(),
            })
        }),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source).map_err(|err| {
                Error::new(ErrorImpl::ReadInput {
                    path: String::from("<stdin>"),
                    message: err.to_string(),
                })
            })?;
            Ok(source)
        }
    }
}

fn display_error(error: &Error) {
    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", error);
}
