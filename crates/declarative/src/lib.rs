//! # Declarative
//!
//! Host-side abstractions for declarative package management.
//!
//! A configuration host describes the desired state of a set of packages,
//! asks a [`PackageProvider`] what is currently installed, and converges the
//! two. Providers only implement three operations: `query`, `install` and
//! `uninstall`.
//!
//! ## Core Concepts
//!
//! - **PackageProvider**: The three-method contract a provider implements
//! - **Resource**: Something with state that can be managed
//! - **PackageResource**: A package with an [`Ensure`] value, applied via a provider
//! - **Executor**: Applies the resources that differ from their desired state
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{Ensure, ExecuteOptions, PackageResource, execute_simple};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(MyProvider::default());
//! let resources: Vec<declarative::BoxedResource> = vec![Box::new(
//!     PackageResource::new("firefox", Ensure::Present, "brew_cask", provider),
//! )];
//!
//! let summary = execute_simple(&resources, &ExecuteOptions::default())?;
//! ```

pub mod context;
pub mod diff;
pub mod executor;
pub mod package;
pub mod provider;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{
    ApplyContext, AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback,
};
pub use diff::{
    DiffReport, DiffSummary, ResourceDiff, UnreadableResource, compute_diffs, diff_resources,
};
pub use executor::{execute, execute_simple};
pub use package::{Ensure, PackageResource};
pub use provider::{PackageProvider, PackageStatus};
pub use resource::{BoxedResource, Resource};
pub use types::{ApplyResult, ExecuteOptions, ExecuteSummary, ResourceState};
