//! # Truck library.
//!
//! A fuzzy logic controller which drives a simulated truck into a parking bay, avoiding
//! rectangular obstacles on the way. This library allows the executables in the workspace to run
//! and control the simulation.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Fuzzy inference engine - membership functions, fuzzy sets, rules and Mamdani inference
pub mod fuzzy;

/// Collision detection - separating axis overlap tests between the truck and obstacles
pub mod collision;

/// Truck controller - the controller's variables and rule matrices
pub mod truck_ctrl;

/// Simulation - the truck model and the worker thread which runs it
pub mod sim;
