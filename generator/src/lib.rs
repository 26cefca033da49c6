//! SVG generation: prompt in, SVG document text out.
//!
//! DESIGN
//! ======
//! The editor only needs "a prompt eventually yields SVG text or an error
//! message", so the seam is the [`SvgGenerate`] trait. [`ReplicateClient`]
//! implements it against a hosted text-to-SVG model; tests and alternative
//! hosts substitute their own implementation. Configuration comes from
//! environment variables (see [`config::GeneratorConfig::from_env`]).

pub mod config;
pub mod replicate;
pub mod types;

pub use config::GeneratorConfig;
pub use replicate::ReplicateClient;
pub use types::{GenerateError, SvgGenerate};
