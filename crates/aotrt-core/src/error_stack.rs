//! Cooperative error propagation.
//!
//! Generated code brackets every region that can fail with
//! `push_context`/`pop_context` and checks `has_error` after each call that
//! can raise. Nothing here transfers control: `raise` only marks the current
//! frame, and `rethrow` copies the error one frame outward.
//!
//! Rust callers get the same machinery as values: [`Raised`], [`Outcome`],
//! [`ErrorStack::scope`] and [`ContextGuard`], which pop their frame on every
//! exit path.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use crate::{RtError, Text};

#[derive(Debug, Default)]
struct Frame {
    // Errored iff Some, so a clean frame can never hold text.
    error: Option<Text>,
}

/// The frames of one execution context, innermost last.
#[derive(Debug, Default)]
pub struct ErrorStack {
    frames: Vec<Frame>,
}

/// What `rethrow` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rethrow {
    /// No frame, or the top frame is clean.
    NotErrored,
    /// The error was copied into the enclosing frame.
    Propagated,
    /// The top frame is errored but is the outermost one; the error is lost.
    Unhandled,
}

/// A `raise` with no frame to receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uncaught {
    message: Text,
}

impl Uncaught {
    pub fn message(&self) -> &Text {
        &self.message
    }
}

impl fmt::Display for Uncaught {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str("Uncaught exception")
        } else {
            write!(f, "Uncaught exception: {}", self.message)
        }
    }
}

impl core::error::Error for Uncaught {}

impl ErrorStack {
    pub const fn new() -> Self {
        ErrorStack { frames: Vec::new() }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_context(&mut self) -> Result<(), RtError> {
        self.frames.try_reserve(1).map_err(|_| RtError::OutOfMemory)?;
        self.frames.push(Frame::default());
        tracing::trace!(depth = self.frames.len(), "push error context");
        Ok(())
    }

    /// Drops the top frame and whatever it holds.
    pub fn pop_context(&mut self) -> bool {
        let popped = self.frames.pop();
        tracing::trace!(
            depth = self.frames.len(),
            popped = popped.is_some(),
            "pop error context"
        );
        popped.is_some()
    }

    /// Pops frames until at most `depth` remain.
    pub fn unwind_to(&mut self, depth: usize) {
        if self.frames.len() > depth {
            tracing::trace!(from = self.frames.len(), to = depth, "unwind error contexts");
            self.frames.truncate(depth);
        }
    }

    /// Marks the top frame errored with a copy of `message`, replacing any
    /// earlier message.
    ///
    /// With no frame there is nobody to receive the error; the caller gets it
    /// back as [`Uncaught`] and is expected to terminate.
    pub fn raise(&mut self, message: &[u8]) -> Result<(), Uncaught> {
        // Out of memory keeps the flag and loses the text.
        let message = Text::from_bytes(message).unwrap_or_default();
        let depth = self.frames.len();
        let Some(top) = self.frames.last_mut() else {
            tracing::error!(text = %message, "raise with no error context");
            return Err(Uncaught { message });
        };
        tracing::debug!(depth, text = %message, "raise");
        top.error = Some(message);
        Ok(())
    }

    pub fn has_error(&self) -> bool {
        self.frames.last().is_some_and(|f| f.error.is_some())
    }

    /// Copy of the top frame's message, or empty text.
    pub fn message(&self) -> Result<Text, RtError> {
        match self.frames.last().and_then(|f| f.error.as_ref()) {
            Some(message) => message.try_clone(),
            None => Ok(Text::empty()),
        }
    }

    /// Resets the top frame. `false` if there is no frame.
    pub fn clear(&mut self) -> bool {
        match self.frames.last_mut() {
            Some(top) => {
                top.error = None;
                true
            }
            None => false,
        }
    }

    /// Copies the top frame's error into the enclosing frame.
    ///
    /// The top frame keeps its error; generated code pops it next.
    pub fn rethrow(&mut self) -> Rethrow {
        let Some((top, outer)) = self.frames.split_last_mut() else {
            return Rethrow::NotErrored;
        };
        let Some(message) = top.error.as_ref() else {
            return Rethrow::NotErrored;
        };
        let Some(enclosing) = outer.last_mut() else {
            tracing::warn!(text = %message, "rethrow from outermost error context dropped");
            return Rethrow::Unhandled;
        };
        enclosing.error = Some(message.try_clone().unwrap_or_default());
        Rethrow::Propagated
    }

    /// Moves the top frame's error out as an `Err`, leaving the frame clean.
    pub fn check(&mut self) -> Outcome<()> {
        match self.frames.last_mut().and_then(|f| f.error.take()) {
            Some(message) => Err(Raised { message }),
            None => Ok(()),
        }
    }

    /// Stores a value-level error into the top frame.
    pub fn record(&mut self, raised: &Raised) -> Result<(), Uncaught> {
        self.raise(raised.message.as_bytes())
    }

    /// Runs `body` inside a fresh frame.
    ///
    /// An error left in the frame by the flag-based API becomes the `Err` of
    /// the result. The frame, and any frame `body` forgot to pop, is released
    /// on every exit path, including a panic unwinding through here.
    pub fn scope<T>(&mut self, body: impl FnOnce(&mut ErrorStack) -> Outcome<T>) -> Outcome<T> {
        let base = self.depth();
        if self.push_context().is_err() {
            return Err(Raised::out_of_memory());
        }
        let guard = ScopeGuard { stack: self, base };
        let result = body(&mut *guard.stack);
        let pending = guard
            .stack
            .frames
            .get_mut(base)
            .and_then(|f| f.error.take());
        match (result, pending) {
            (Err(raised), _) => Err(raised),
            (Ok(_), Some(message)) => Err(Raised { message }),
            (Ok(value), None) => Ok(value),
        }
    }
}

struct ScopeGuard<'a> {
    stack: &'a mut ErrorStack,
    base: usize,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.stack.unwind_to(self.base);
    }
}

/// An error raised through the cooperative model, carried as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raised {
    message: Text,
}

impl Raised {
    pub fn new(message: impl AsRef<[u8]>) -> Self {
        Raised {
            message: Text::from_bytes(message.as_ref()).unwrap_or_default(),
        }
    }

    fn out_of_memory() -> Self {
        Raised::new(RtError::OutOfMemory.as_str())
    }

    pub fn message(&self) -> &Text {
        &self.message
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.message, f)
    }
}

impl core::error::Error for Raised {}

pub type Outcome<T> = Result<T, Raised>;

pub trait OutcomeExt<T> {
    /// Mirrors an `Err` into the current frame so code still using the flag
    /// API sees it, then hands the outcome back for `?`.
    fn propagate(self, stack: &mut ErrorStack) -> Outcome<T>;
}

impl<T> OutcomeExt<T> for Outcome<T> {
    fn propagate(self, stack: &mut ErrorStack) -> Outcome<T> {
        if let Err(raised) = &self {
            if stack.record(raised).is_err() {
                tracing::warn!(text = %raised, "propagated error has no enclosing context");
            }
        }
        self
    }
}

/// Where a variant keeps the error stack of the current execution context.
pub trait StackCell {
    fn with_stack<R>(f: impl FnOnce(&mut ErrorStack) -> R) -> R;
}

/// Pushes a frame on creation and pops it (plus anything left above it) on
/// drop. Not `Send`: frames belong to the context that pushed them.
pub struct ContextGuard<C: StackCell> {
    base: usize,
    _cell: PhantomData<*const C>,
}

impl<C: StackCell> ContextGuard<C> {
    pub fn enter() -> Result<Self, RtError> {
        C::with_stack(|stack| {
            let base = stack.depth();
            stack.push_context()?;
            Ok(ContextGuard {
                base,
                _cell: PhantomData,
            })
        })
    }

    pub fn has_error(&self) -> bool {
        C::with_stack(|stack| stack.has_error())
    }

    /// Takes the frame's error, if any, as an outcome.
    pub fn check(&self) -> Outcome<()> {
        C::with_stack(|stack| stack.check())
    }
}

impl<C: StackCell> Drop for ContextGuard<C> {
    fn drop(&mut self) {
        C::with_stack(|stack| stack.unwind_to(self.base));
    }
}
