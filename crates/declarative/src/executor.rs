//! Execution engine - applies resources one at a time

use crate::context::{ApplyContext, ConfirmCallback, ProgressCallback};
use crate::diff::diff_resources;
use crate::resource::{BoxedResource, Resource};
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary};
use anyhow::Result;

/// Execute resources with the given options and callbacks
///
/// Only resources whose current state differs from the desired state are
/// applied. Resources are applied sequentially, in order; a failing
/// resource is recorded as `Failed` and does not stop the run. Resources
/// whose current state cannot be read are counted as `Failed` up front and
/// never applied.
pub fn execute<P, C>(
    resources: &[BoxedResource],
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let report = diff_resources(resources);
    let mut summary = ExecuteSummary::default();
    for unreadable in &report.unreadable {
        summary.add_result(&ApplyResult::Failed {
            error: unreadable.error.clone(),
        });
    }

    let diffs = report.diffs;
    if diffs.is_empty() || opts.dry_run {
        return Ok(summary);
    }

    if !confirm.confirm("Apply changes?")? {
        summary.skipped += diffs.len();
        return Ok(summary);
    }

    let pending: Vec<&BoxedResource> = resources
        .iter()
        .filter(|r| diffs.iter().any(|d| d.resource_id == r.id()))
        .collect();

    let ctx = ApplyContext::new(false, opts.verbose);

    progress.on_start(pending.len());
    for resource in pending {
        let id = resource.id();
        progress.on_resource_start(&id, &resource.description());
        let result = apply_resource(resource.as_ref(), &ctx);
        progress.on_resource_complete(&id, &result);
        summary.add_result(&result);
    }
    progress.on_complete();

    Ok(summary)
}

/// Apply a single resource
fn apply_resource(resource: &dyn Resource, ctx: &ApplyContext) -> ApplyResult {
    match resource.apply(ctx) {
        Ok(result) => result,
        Err(e) => {
            log::error!("{}: {e:#}", resource.id());
            ApplyResult::Failed {
                error: format!("{e:#}"),
            }
        }
    }
}

/// Simple execution without callbacks
///
/// For basic use cases where you don't need progress or confirmation.
pub fn execute_simple(
    resources: &[BoxedResource],
    opts: &ExecuteOptions,
) -> Result<ExecuteSummary> {
    use crate::context::{AutoConfirm, NoProgress};

    execute(resources, opts, &mut NoProgress, &mut AutoConfirm)
}
