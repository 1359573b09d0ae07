//! Diff display for the terminal

use colored::Colorize;
use declarative::{DiffSummary, ResourceDiff, ResourceState, UnreadableResource};
use std::collections::BTreeMap;

/// Display a list of diffs in a user-friendly format
pub fn display_diff(diffs: &[ResourceDiff]) {
    if diffs.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    let mut by_type: BTreeMap<&str, Vec<&ResourceDiff>> = BTreeMap::new();
    for diff in diffs {
        by_type
            .entry(diff.resource_type.as_str())
            .or_default()
            .push(diff);
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Cask Diff".bold()
    );
    println!("│");

    for (resource_type, type_diffs) in &by_type {
        let type_name = match *resource_type {
            caskkit::RESOURCE_TYPE => "Casks",
            other => other,
        };
        println!("│ {}", type_name.bold());

        for diff in type_diffs {
            println!(
                "│   {} {:<30} {}",
                symbol(diff),
                diff.resource_id,
                describe(&diff.current, &diff.desired).dimmed()
            );
        }
        println!("│");
    }

    let summary = DiffSummary::from_diffs(diffs);
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} changes ({} to install, {} to remove, {} to change)",
        summary.total().to_string().bold(),
        summary.additions.to_string().green(),
        summary.removals.to_string().red(),
        summary.modifications.to_string().yellow()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

/// List resources whose installed state could not be read
pub fn display_unreadable(unreadable: &[UnreadableResource]) {
    if unreadable.is_empty() {
        return;
    }

    println!();
    println!(
        "  {} Could not read the state of {} casks:",
        "✗".red(),
        unreadable.len()
    );
    for entry in unreadable {
        println!("    {} {}: {}", "✗".red(), entry.resource_id, entry.error.dimmed());
    }
}

fn symbol(diff: &ResourceDiff) -> colored::ColoredString {
    if diff.is_addition() {
        "+".green()
    } else if diff.is_removal() {
        "-".red()
    } else {
        "~".yellow()
    }
}

/// Short text for a state transition, e.g. `118.0 → 119.0`
pub fn describe(current: &ResourceState, desired: &ResourceState) -> String {
    match (current, desired) {
        (ResourceState::Absent, ResourceState::Present { details }) => format!(
            "(not installed){}",
            details
                .as_ref()
                .map(|d| format!(" → {d}"))
                .unwrap_or_default()
        ),
        (ResourceState::Present { details: from }, ResourceState::Present { details: to }) => {
            format!(
                "{} → {}",
                from.as_deref().unwrap_or("current"),
                to.as_deref().unwrap_or("desired")
            )
        }
        (ResourceState::Present { .. }, ResourceState::Absent) => "(will remove)".to_string(),
        _ => String::new(),
    }
}
