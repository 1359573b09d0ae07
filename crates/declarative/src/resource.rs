//! Resource trait for declarative state management
//!
//! A Resource represents something that can be in a certain state,
//! and can be changed to reach a desired state.

use crate::context::ApplyContext;
use crate::types::{ApplyResult, ResourceState};
use anyhow::Result;
use std::fmt;

/// Core trait for declarative resources
///
/// Every resource in the system implements this trait, which provides:
/// - Identity (id, description, type)
/// - State detection (current vs desired)
/// - State convergence (apply)
///
/// # Example
///
/// ```ignore
/// use declarative::{Resource, ResourceState, ApplyResult, ApplyContext};
///
/// #[derive(Debug)]
/// struct MarkerFile {
///     path: String,
/// }
///
/// impl Resource for MarkerFile {
///     fn id(&self) -> String {
///         self.path.clone()
///     }
///
///     fn description(&self) -> String {
///         format!("Ensure marker exists at {}", self.path)
///     }
///
///     fn resource_type(&self) -> &'static str {
///         "file"
///     }
///
///     fn current_state(&self) -> Result<ResourceState> {
///         if std::path::Path::new(&self.path).exists() {
///             Ok(ResourceState::Present { details: None })
///         } else {
///             Ok(ResourceState::Absent)
///         }
///     }
///
///     fn desired_state(&self) -> ResourceState {
///         ResourceState::Present { details: None }
///     }
///
///     fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult> {
///         if ctx.dry_run {
///             return Ok(ApplyResult::Skipped { reason: "Dry run".into() });
///         }
///         std::fs::write(&self.path, "")?;
///         Ok(ApplyResult::Created)
///     }
/// }
/// ```
pub trait Resource: fmt::Debug {
    /// Unique identifier for this resource
    ///
    /// This should be stable and uniquely identify the resource
    /// within its type, e.g. "firefox" for a cask.
    fn id(&self) -> String;

    /// Human-readable description of what this resource does
    fn description(&self) -> String;

    /// Resource type category, e.g. "brew_cask"
    fn resource_type(&self) -> &'static str;

    /// Detect the current state of this resource
    ///
    /// This should query the system every time; nothing is cached.
    fn current_state(&self) -> Result<ResourceState>;

    /// Get the desired state for this resource
    fn desired_state(&self) -> ResourceState;

    /// Check if the resource needs changes to reach desired state
    ///
    /// Default implementation compares current and desired states.
    fn needs_apply(&self) -> Result<bool> {
        let current = self.current_state()?;
        let desired = self.desired_state();
        Ok(current != desired)
    }

    /// Apply changes to reach the desired state
    ///
    /// This method should:
    /// 1. Check if already in desired state (return NoChange)
    /// 2. Respect ctx.dry_run (return Skipped if true)
    /// 3. Make the necessary changes
    /// 4. Return the appropriate ApplyResult
    fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult>;
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;
