//! Deploy Module
//!
//! The one-shot redeployment procedure.
//!
//! ## Structure
//!
//! - `options` - What to deploy (`DeployOptions`)
//! - `result` - Outcome types (`DeployReport`, `StepFailure`)
//! - `use_case` - Step sequencing (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use deploy_agent::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(source_host, runtime, bootstrap);
//! let report = use_case.execute(&DeployOptions::new(repositories))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::{DeployReport, StepFailure};
pub use use_case::DeployUseCase;

#[cfg(test)]
mod tests;
