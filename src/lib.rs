#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod eval;
pub mod gateway;
pub mod media;
pub mod providers;
pub mod store;

pub use config::Config;
pub use error::{EvalError, PhodoError, Result};
pub use eval::{Evaluation, Evaluator};
