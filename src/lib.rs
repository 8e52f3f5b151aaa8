pub mod config;
pub mod constants;
pub mod error;
pub mod knowledge;
pub mod lexicon;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod samples;
pub mod shell;

// Application use cases and the adapters that deliver their output
pub mod app;
pub mod infra;

// Domain data shapes shared across layers
pub mod domain;
