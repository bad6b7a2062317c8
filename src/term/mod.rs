extern crate ansi_term;
extern crate ctrlc;
use basic::error;
use basic::lang::{CancelHandle, Error};
use basic::mach::{compile, Options};
use ansi_term::Style;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};

const USAGE: &str = "USAGE: basicc [--trace] [--capacity TOKENS] [FILE]";

pub fn main() {
    let cancel = CancelHandle::new();
    let cancel_moved = cancel.clone();
    // A scanner blocked reading stdin only sees the cancel once the read
    // returns, so a second Ctrl-C exits outright.
    let handler = move || {
        if cancel_moved.is_cancelled() {
            std::process::exit(error!(Interrupted).exit_status());
        }
        cancel_moved.cancel();
    };
    if let Err(error) = ctrlc::set_handler(handler) {
        eprintln!("{}", Style::new().bold().paint(error.to_string()));
    }
    if let Err(error) = main_loop(cancel) {
        eprintln!("{}", Style::new().bold().paint(error.to_string()));
        std::process::exit(error.exit_status());
    }
}

fn main_loop(cancel: CancelHandle) -> Result<(), Error> {
    let (options, path) = parse_args(std::env::args().skip(1), cancel)?;
    let source: Box<dyn Read + Send> = match path {
        Some(path) => Box::new(open(&path)?),
        None => Box::new(std::io::stdin()),
    };
    let text = compile(source, &options)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(error) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        return Err(error!(InternalError; error.to_string()));
    }
    Ok(())
}

fn parse_args<I>(args: I, cancel: CancelHandle) -> Result<(Options, Option<String>), Error>
where
    I: Iterator<Item = String>,
{
    let mut options = Options {
        cancel: Some(cancel),
        ..Options::default()
    };
    let mut path = None;
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--trace" => options.trace = true,
            "--capacity" => {
                let capacity = args.next().and_then(|s| s.parse::<usize>().ok());
                match capacity {
                    Some(0) => options.channel_capacity = None,
                    Some(n) => options.channel_capacity = Some(n),
                    None => return Err(error!(InternalError; USAGE)),
                }
            }
            _ if arg.starts_with("--") || path.is_some() => {
                return Err(error!(InternalError; USAGE))
            }
            _ => path = Some(arg),
        }
    }
    Ok((options, path))
}

fn open(filename: &str) -> Result<File, Error> {
    match File::open(filename) {
        Ok(file) => Ok(file),
        Err(error) => {
            let msg = match error.kind() {
                ErrorKind::NotFound => format!("FILE NOT FOUND {}", filename),
                _ => error.to_string(),
            };
            Err(error!(InternalError; msg))
        }
    }
}

