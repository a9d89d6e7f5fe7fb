//! # System Lifecycle
//!
//! [`CompanySystem`] starts one store actor per entity type, wires the handlers
//! onto a single router and shuts the stores down again. [`setup_tracing`]
//! installs the log subscriber once per process.
//!
//! ## Graceful Shutdown
//!
//! Store actors stop when the last client handle is dropped. The handlers behind
//! the router hold client handles, so every clone of the router has to be gone
//! before [`CompanySystem::shutdown`] can complete.

pub mod company_system;
pub mod tracing;

pub use self::company_system::*;
pub use self::tracing::*;
