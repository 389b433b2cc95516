//! Shared core of the aotrt native runtime.
//!
//! Generated programs link one of the variant crates (`aotrt-hosted`,
//! `aotrt-embedded`, `aotrt-wasm`). Each of them is a thin shell around this
//! crate: a [`Host`] implementation, a [`StackCell`] deciding where the error
//! frames live, and one invocation of [`export_runtime_abi!`].
//!
//! Everything here is `no_std` + `alloc` so the bare-metal variant can use it.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::missing_safety_doc)]

extern crate alloc;

pub mod abi;
pub mod error;
pub mod error_stack;
pub mod fmt;
pub mod host;
pub mod io;
pub mod text;
pub mod utf8;
pub mod variant;

pub use abi::Runtime;
pub use error::RtError;
pub use error_stack::{
    ContextGuard, ErrorStack, Outcome, OutcomeExt, Raised, Rethrow, StackCell, Uncaught,
};
pub use host::Host;
pub use text::Text;
pub use variant::{Variant, VariantCaps};
