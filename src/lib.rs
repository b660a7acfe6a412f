//! Pharmacokinetic concentration-time curves from free-text commands.
//!
//! A command such as `show me metformin at 500 mg` is interpreted into a
//! [`dosing::DoseCommand`], its one-compartment parameters are resolved, the
//! curve is simulated on a fixed time grid and packaged as a
//! [`output::ChartDescriptor`] for a renderer.

pub mod config;
pub mod dosing;
pub mod error;
pub mod fallback;
pub mod interpreter;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod repl;
pub mod resolver;
pub mod services;
pub mod simulation;
pub mod validation;

pub use error::{PKError, PKResult};
