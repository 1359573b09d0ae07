//! Execution engine - declarative executor with UI integration

use anyhow::Result;
use colored::Colorize;
use declarative::{
    ApplyResult, BoxedResource, ConfirmCallback, ExecuteOptions, ExecuteSummary,
    ProgressCallback, diff_resources,
};

use super::differ::{display_diff, display_unreadable};

/// Options for `apply` (includes `yes` for confirmation skip)
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Skip confirmation prompts
    pub yes: bool,
    /// Verbose output
    pub verbose: bool,
}

/// Show the diff, confirm, and converge `resources`
pub fn apply(resources: &[BoxedResource], opts: ApplyOptions) -> Result<ExecuteSummary> {
    let report = diff_resources(resources);
    if !report.diffs.is_empty() || report.unreadable.is_empty() {
        display_diff(&report.diffs);
    }
    display_unreadable(&report.unreadable);

    if report.is_clean() {
        return Ok(ExecuteSummary::default());
    }

    if opts.dry_run {
        println!();
        println!("  {} Dry run - no changes made", "ℹ".blue());
        return Ok(ExecuteSummary {
            failed: report.unreadable.len(),
            ..Default::default()
        });
    }

    let exec_opts = ExecuteOptions {
        dry_run: false,
        verbose: opts.verbose,
    };
    let summary = declarative::execute(
        resources,
        &exec_opts,
        &mut ConsoleProgress,
        &mut PromptConfirm { yes: opts.yes },
    )?;

    print_summary(&summary);
    Ok(summary)
}

/// Asks on the terminal unless `yes` was given
pub struct PromptConfirm {
    pub yes: bool,
}

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.yes {
            return Ok(true);
        }

        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;

        if !confirmed {
            println!();
            println!("  {} Aborted", "✗".red());
        }
        Ok(confirmed)
    }
}

/// Prints one line per applied resource
pub struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_start(&mut self, count: usize) {
        println!();
        println!("  {} Applying {} casks...", "→".cyan(), count);
    }

    fn on_resource_start(&mut self, id: &str, description: &str) {
        log::info!("{id}: {description}");
    }

    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult) {
        println!("    {}", result_line(id, result));
    }

    fn on_complete(&mut self) {}
}

fn result_line(id: &str, result: &ApplyResult) -> String {
    let symbol = match result {
        ApplyResult::Failed { .. } => result.symbol().red(),
        ApplyResult::Skipped { .. } => result.symbol().yellow(),
        ApplyResult::NoChange => result.symbol().dimmed(),
        _ => result.symbol().green(),
    };

    match result {
        ApplyResult::Created => format!("{symbol} {id} installed"),
        ApplyResult::Modified => format!("{symbol} {id} reinstalled"),
        ApplyResult::Removed => format!("{symbol} {id} removed"),
        ApplyResult::NoChange => format!("{symbol} {id}"),
        ApplyResult::Skipped { reason } => format!("{symbol} {id} ({reason})"),
        ApplyResult::Failed { error } => format!("{symbol} {id}: {error}"),
    }
}

/// Print final summary
fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!("  {} Casks converged successfully!", "✓".green().bold());
    } else {
        println!("  {} Casks converged with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} casks installed", summary.created);
    }
    if summary.modified > 0 {
        println!("    • {} casks reinstalled", summary.modified);
    }
    if summary.removed > 0 {
        println!("    • {} casks removed", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} casks skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "casks".red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{ApplyContext, Resource, ResourceState};

    #[derive(Debug)]
    struct UnreadableCask;

    impl Resource for UnreadableCask {
        fn id(&self) -> String {
            "docker".into()
        }

        fn description(&self) -> String {
            "Install docker".into()
        }

        fn resource_type(&self) -> &'static str {
            caskkit::RESOURCE_TYPE
        }

        fn current_state(&self) -> Result<ResourceState> {
            anyhow::bail!("Permission denied (os error 13)")
        }

        fn desired_state(&self) -> ResourceState {
            ResourceState::Present { details: None }
        }

        fn apply(&self, _ctx: &ApplyContext) -> Result<ApplyResult> {
            Ok(ApplyResult::Created)
        }
    }

    #[test]
    fn test_apply_counts_unreadable_cask_as_failed() {
        let resources: Vec<BoxedResource> = vec![Box::new(UnreadableCask)];
        let opts = ApplyOptions {
            yes: true,
            ..Default::default()
        };

        let summary = apply(&resources, opts).unwrap();
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_dry_run_counts_unreadable_cask_as_failed() {
        let resources: Vec<BoxedResource> = vec![Box::new(UnreadableCask)];
        let opts = ApplyOptions {
            dry_run: true,
            ..Default::default()
        };

        let summary = apply(&resources, opts).unwrap();
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_result_line_mentions_outcome() {
        colored::control::set_override(false);

        assert_eq!(result_line("firefox", &ApplyResult::Created), "✓ firefox installed");
        assert_eq!(result_line("docker", &ApplyResult::Removed), "✓ docker removed");
        assert_eq!(
            result_line(
                "iterm2",
                &ApplyResult::Failed {
                    error: "brew exited 1".into()
                }
            ),
            "✗ iterm2: brew exited 1"
        );
    }

    #[test]
    fn test_prompt_confirm_with_yes_does_not_prompt() {
        let mut confirm = PromptConfirm { yes: true };
        assert!(confirm.confirm("Apply changes?").unwrap());
    }
}
