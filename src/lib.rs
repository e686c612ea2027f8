//! Driver of parcelc: reads the configuration, runs the pipeline and
//! writes the generated bindings.
pub mod cli;
pub mod config;
pub mod runner;
