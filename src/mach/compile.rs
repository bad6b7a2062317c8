use super::{translate, Generator, Options};
use crate::error;
use crate::lang::{channel, scan, CancelHandle, Constants, Error, Scanner};
use std::io::Read;
use std::thread;

type Result<T> = std::result::Result<T, Error>;

/// Compiles one BASIC program to stack machine text.
///
/// The scanner runs on a scoped thread feeding the channel while the
/// generator consumes on this one. On any error the scanner is cancelled;
/// it is always joined before this returns.
pub fn compile<R: Read + Send>(source: R, options: &Options) -> Result<String> {
    let cancel = options.cancel.clone().unwrap_or_else(CancelHandle::new);
    let constants = Constants::new();
    let scanner = Scanner::new(source, constants.clone(), cancel.clone());
    let (sender, mut receiver) = channel(options.channel_capacity, cancel);
    thread::scope(|s| {
        let scanning = s.spawn(move || scan(scanner, sender));
        let result = translate(&mut receiver, Generator::new(constants), options.trace);
        if result.is_err() {
            receiver.cancel();
        }
        match scanning.join() {
            Ok(()) => result,
            Err(_) => Err(error!(InternalError; "SCANNER THREAD PANICKED")),
        }
    })
}
