//! Surface Host - Revision publication and the runtime-facing DOM binding
//!
//! This crate hosts the `dom` query engine: it owns the current revision of
//! every running surface, publishes commits atomically, tracks pointer
//! capture, and exposes the engine to a scripting runtime through
//! `NativeDom`.
//!
//! ```text
//! commit pipeline ─→ SurfaceRegistry ─→ EventBus (Started/Committed/Stopped)
//!                          ↓ RevisionProvider
//!                      DomEngine ─→ NativeDom ←─ runtime values
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod events;
pub mod pointer;
pub mod registry;

pub use binding::{DirectManipulation, HostValue, NativeDom};
pub use config::HostConfig;
pub use error::{HostError, Result};
pub use events::{EventBus, SurfaceEvent};
pub use pointer::PointerCaptureRegistry;
pub use registry::SurfaceRegistry;
