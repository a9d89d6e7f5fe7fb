//! # CRUD Sample
//!
//! A company directory built on `crud-framework`: companies at `/api/company` and
//! their employees nested at `/api/company/{companyId}/employee`, backed by
//! in-memory store actors.
//!
//! This library exposes the application modules for the binary and the
//! integration tests.

pub mod config;
pub mod converters;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod store;
