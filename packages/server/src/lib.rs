// Employer Enricher - Core
//
// Pulls employer records from a JBoard job board, asks an LLM to repair each
// employer's website and description, and patches the result back.
// The job board is the system of record; nothing is persisted here.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
