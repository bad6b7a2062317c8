use super::{Error, Token};
use crate::error;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Result<T> = std::result::Result<T, Error>;

/// How often a blocked side re-checks a cancel raised outside the channel,
/// such as from a signal handler.
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// ## Token hand-off from the scanner thread to the consumer
///
/// One producer, one consumer, one lock. Tokens arrive in the order they
/// were enqueued. [`channel`] returns both ends.

pub fn channel(capacity: Option<usize>, cancel: CancelHandle) -> (TokenSender, TokenReceiver) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            queue: VecDeque::new(),
            closed: None,
        }),
        changed: Condvar::new(),
        capacity: capacity.unwrap_or(usize::MAX).max(1),
        cancel,
    });
    (
        TokenSender {
            shared: shared.clone(),
        },
        TokenReceiver {
            shared,
            pushed_back: vec![],
        },
    )
}

/// How the producer stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    Finished,
    Failed(Error),
    Cancelled,
}

/// Shared stop request. Clones refer to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> CancelHandle {
        CancelHandle::default()
    }
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

struct Shared {
    state: Mutex<State>,
    changed: Condvar,
    capacity: usize,
    cancel: CancelHandle,
}

struct State {
    queue: VecDeque<Token>,
    closed: Option<Termination>,
}

impl Shared {
    fn cancel(&self) {
        self.cancel.cancel();
        let _state = self.state.lock();
        self.changed.notify_all();
    }
}

pub struct TokenSender {
    shared: Arc<Shared>,
}

impl TokenSender {
    /// Appends to the tail, blocking while a bounded queue is full.
    /// Returns false when the consumer has cancelled; the token is dropped.
    pub fn enqueue(&self, token: Token) -> bool {
        let mut state = self.shared.state.lock();
        loop {
            if self.shared.cancel.is_cancelled() {
                return false;
            }
            if state.queue.len() < self.shared.capacity {
                break;
            }
            self.shared.changed.wait_for(&mut state, CANCEL_POLL);
        }
        let was_empty = state.queue.is_empty();
        state.queue.push_back(token);
        if was_empty {
            self.shared.changed.notify_all();
        }
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Records how the producer stopped and wakes the consumer.
    pub fn close(self, termination: Termination) {
        let mut state = self.shared.state.lock();
        if state.closed.is_none() {
            state.closed = Some(termination);
        }
        self.shared.changed.notify_all();
    }
}

impl Drop for TokenSender {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        if state.closed.is_none() {
            state.closed = Some(Termination::Failed(
                error!(InternalError; "SCANNER STOPPED WITHOUT CLOSING"),
            ));
            self.shared.changed.notify_all();
        }
    }
}

pub struct TokenReceiver {
    shared: Arc<Shared>,
    pushed_back: Vec<Token>,
}

impl TokenReceiver {
    /// Removes the head of the channel, blocking while it is empty.
    ///
    /// Pushed back tokens come first. Once the producer has closed and the
    /// queue is drained this returns the termination instead of blocking:
    /// `EndOfFile` again after a clean finish, the scanner's error after a
    /// failure, or `Interrupted` after a cancel.
    pub fn dequeue(&mut self) -> Result<Token> {
        if let Some(token) = self.pushed_back.pop() {
            return Ok(token);
        }
        let mut state = self.shared.state.lock();
        loop {
            if let Some(token) = state.queue.pop_front() {
                if state.queue.len() + 1 == self.shared.capacity {
                    self.shared.changed.notify_all();
                }
                return Ok(token);
            }
            match &state.closed {
                Some(Termination::Finished) => return Ok(Token::EndOfFile),
                Some(Termination::Failed(error)) => return Err(error.clone()),
                Some(Termination::Cancelled) => {
                    return Err(error!(Interrupted; "SCANNER CANCELLED"))
                }
                None => {}
            }
            if self.shared.cancel.is_cancelled() {
                return Err(error!(Interrupted; "SCANNER CANCELLED"));
            }
            self.shared.changed.wait_for(&mut state, CANCEL_POLL);
        }
    }

    /// Returns a token to this side of the channel; the next dequeue yields
    /// it first. Most recent first.
    pub fn push_back(&mut self, token: Token) {
        self.pushed_back.push(token);
    }

    /// Peeks at the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token> {
        if self.pushed_back.is_empty() {
            let token = self.dequeue()?;
            self.pushed_back.push(token);
        }
        match self.pushed_back.last() {
            Some(token) => Ok(token),
            None => Err(error!(InternalError; "PEEK UNDERFLOW")),
        }
    }

    /// Asks the producer to stop and wakes anything blocked on the channel.
    pub fn cancel(&self) {
        self.shared.cancel()
    }

    /// Termination recorded by the producer, if it has stopped.
    pub fn termination(&self) -> Option<Termination> {
        self.shared.state.lock().closed.clone()
    }
}
