//! # Communications interface crate.
//!
//! Provides the interface between the truck simulation engine and whatever
//! host drives it (the command line, the headless executable, or a GUI).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Commands sent from the host to the simulation loop
pub mod tc;

/// Telemetry published by the simulation loop
pub mod tm;

/// Objects placed in the world by the host
pub mod world;
