//! connpanel - ConnMan and oFono state for desktop panels.
//!
//! Mirrors ConnMan's technology switches and oFono's modems from the system
//! bus, derives a single ranked status per modem and for the whole fleet,
//! and forwards everything a panel needs to draw to a [`Presenter`].
//!
//! The synchronisation logic lives in plain state machines
//! ([`FleetRegistry`], [`TechnologyRegistry`]) that consume events and return
//! effects; the services run them against zbus.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use connpanel::{config::Config, services::{TelephonyService, TracingPresenter}};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let telephony = TelephonyService::start(&config.telephony, Arc::new(TracingPresenter)).await?;
//! println!("modems: {}", telephony.status());
//! # Ok(())
//! # }
//! ```
//!
//! [`Presenter`]: services::Presenter
//! [`FleetRegistry`]: services::FleetRegistry
//! [`TechnologyRegistry`]: services::TechnologyRegistry

/// Configuration schema definitions and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface.
pub mod cli;

/// Bus-backed services and their state machines.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{ConnpanelError, Result};
