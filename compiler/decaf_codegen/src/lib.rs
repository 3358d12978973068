//! Decaf code generation - semantic lowering onto an instruction builder
//!
//! This crate walks a [`decaf_ast::Program`] and drives any
//! [`decaf_backend::IrBuilder`]:
//!
//! - Externs, package fields and method signatures are declared first, so
//!   methods may call each other in any order (recursion included)
//! - Each method body gets an `entry` block, one stack slot per parameter
//!   and local, and structured control flow built from named blocks
//!   (`if.*`, `while.*`, `for.*`, `and.*`, `or.*`)
//! - `&&`/`||` short-circuit through a phi
//! - Bools flowing into int destinations (assignments, arguments, returns)
//!   are zero-extended
//!
//! # Symbol Resolution
//!
//! A [`ScopeStack`] of frames maps names to [`Descriptor`]s. The global
//! frame holds externs, fields and methods; each method body and block
//! pushes a frame. Loop jump targets live on a separate [`LoopStack`].
//!
//! # Policies
//!
//! [`CodegenOptions`] decides what happens when a non-void method can fall
//! off its end ([`MissingReturn`]) and when `break`/`continue` appear
//! outside a loop ([`JumpOutsideLoop`]). Non-fatal outcomes are reported as
//! [`CodegenWarning`]s in the returned [`CodegenOutput`].
//!
//! # Tracing
//!
//! Set `RUST_LOG=decaf_codegen=debug` after calling [`init_tracing`] to see
//! one event per declared item and lowered method; `trace` adds blocks,
//! bindings and calls.

mod context;
mod descriptor;
mod error;
mod loop_ctx;
mod lower;
mod options;
mod scope;
mod stack;

use std::sync::Once;

pub use descriptor::{Descriptor, DescriptorKind, Handle};
pub use error::{CodegenError, CodegenOutput, CodegenWarning};
pub use loop_ctx::{LoopContext, LoopStack};
pub use lower::{compile_to_module, generate};
pub use options::{CodegenOptions, JumpOutsideLoop, MissingReturn};
pub use scope::ScopeStack;

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber for debugging output.
///
/// Only installs a subscriber when `RUST_LOG` is set; safe to call more
/// than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
