//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status
//! lines, a spinner for long-running operations and per-tool summaries of
//! a response envelope.

use crate::tools::ToolResponse;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dlsweep::output::OutputFormatter;
    /// OutputFormatter::error("Path /tmp/missing does not exist");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// A ticking spinner on stderr. Hidden automatically when stderr is not
    /// a terminal.
    ///
    /// ```no_run
    /// use dlsweep::output::OutputFormatter;
    /// let spinner = OutputFormatter::spinner("Scanning downloads");
    /// spinner.finish_and_clear();
    /// ```
    pub fn spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Prints a two-column table of names to counts with a total row.
    pub fn summary_table(title: &str, label: &str, counts: &BTreeMap<String, usize>) {
        Self::header(title);

        let width = counts
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(label.len())
            .max(5);

        println!("{:<width$} | {}", label.bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));

        for (name, count) in counts {
            println!(
                "{:<width$} | {} {}",
                name,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        let total: usize = counts.values().sum();
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            plural(total),
            width = width
        );
    }

    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints a human summary of `response` for `tool`.
    pub fn render(tool: &str, response: &ToolResponse) {
        if !response.ok {
            let error = response.error.as_deref().unwrap_or("unknown error");
            match &response.code {
                Some(code) => Self::error(&format!("{error} [{code}]")),
                None => Self::error(error),
            }
            return;
        }
        let Some(data) = &response.data else {
            Self::success("Done");
            return;
        };

        match tool {
            "organize-by-type" | "organize-by-date" => render_organize(data),
            "find-duplicates" => render_duplicates(data),
            "clean-old-files" => render_old_files(data),
            "folder-stats" => render_stats(data),
            "archive-old-files" => render_archive(data),
            "extract-archives" => render_extract(data),
            _ => render_generic(data),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

fn count_of(data: &Value, key: &str) -> usize {
    data[key].as_u64().unwrap_or(0) as usize
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_errors(data: &Value) {
    let Some(errors) = data["errors"].as_array() else {
        return;
    };
    if errors.is_empty() {
        return;
    }
    OutputFormatter::warning(&format!("{} problem(s):", errors.len()));
    for error in errors {
        OutputFormatter::plain(&format!("  - {}", text(error)));
    }
}

fn render_organize(data: &Value) {
    let dry_run = data["dry_run"].as_bool().unwrap_or(false);
    let mut counts = BTreeMap::new();
    if let Some(moved) = data["moved_files"].as_object() {
        for (folder, files) in moved {
            counts.insert(folder.clone(), files.as_array().map_or(0, Vec::len));
        }
    }

    if counts.is_empty() {
        OutputFormatter::success("Nothing to organize");
    } else {
        OutputFormatter::summary_table("SUMMARY", "Folder", &counts);
    }
    render_errors(data);

    if dry_run {
        OutputFormatter::dry_run_notice("No files were moved.");
    } else {
        let moved = count_of(data, "total_files");
        OutputFormatter::success(&format!("Moved {moved} {}", plural(moved)));
    }
}

fn render_duplicates(data: &Value) {
    let count = count_of(data, "count");
    if count == 0 {
        OutputFormatter::success("No duplicates found");
        return;
    }

    OutputFormatter::header("DUPLICATES");
    if let Some(duplicates) = data["duplicates"].as_array() {
        for duplicate in duplicates {
            OutputFormatter::plain(&format!(
                "  {} {} {}",
                text(&duplicate["file"]),
                "=".dimmed(),
                text(&duplicate["original"]).cyan()
            ));
        }
    }

    let verb = if data["deleted"].as_bool().unwrap_or(false) {
        "Freed"
    } else {
        "Could free"
    };
    OutputFormatter::success(&format!(
        "{count} duplicate {}; {verb} {} MB",
        plural(count),
        data["space_saved_mb"]
    ));
}

fn render_old_files(data: &Value) {
    let count = count_of(data, "count");
    let days = data["days_threshold"].as_u64().unwrap_or(0);
    if count == 0 {
        OutputFormatter::success(&format!("No files older than {days} days"));
        return;
    }

    OutputFormatter::header(&format!("OLDER THAN {days} DAYS"));
    if let Some(files) = data["old_files"].as_array() {
        for file in files {
            OutputFormatter::plain(&format!(
                "  {:>5}d  {}",
                file["age_days"].as_u64().unwrap_or(0),
                text(&file["file"])
            ));
        }
    }

    let summary = format!("{count} {} ({} MB)", plural(count), data["total_size_mb"]);
    if data["deleted"].as_bool().unwrap_or(false) {
        OutputFormatter::success(&format!("Deleted {summary}"));
    } else {
        OutputFormatter::info(&format!("Found {summary}; pass --delete to remove them"));
    }
}

fn render_stats(data: &Value) {
    let mut counts = BTreeMap::new();
    if let Some(categories) = data["by_category"].as_object() {
        for (category, stats) in categories {
            counts.insert(category.clone(), count_of(stats, "count"));
        }
    }
    OutputFormatter::summary_table("BY CATEGORY", "Category", &counts);

    if let Some(largest) = data["largest_files"].as_array()
        && !largest.is_empty()
    {
        OutputFormatter::header("LARGEST FILES");
        for file in largest {
            OutputFormatter::plain(&format!(
                "  {:>10} MB  {}",
                file["size_mb"].to_string(),
                text(&file["file"])
            ));
        }
    }

    OutputFormatter::info(&format!("Total size: {} MB", data["total_size_mb"]));
}

fn render_archive(data: &Value) {
    let archived = count_of(data, "archived_files");
    OutputFormatter::success(&format!(
        "Archived {archived} {} into {}",
        plural(archived),
        text(&data["archive_name"]).bold()
    ));
    OutputFormatter::plain(&format!(
        "  {} MB -> {} MB ({}% saved)",
        data["original_size_mb"], data["archive_size_mb"], data["compression_ratio"]
    ));
}

fn render_extract(data: &Value) {
    let count = count_of(data, "count");
    if let Some(extracted) = data["extracted"].as_array() {
        for entry in extracted {
            OutputFormatter::plain(&format!(
                "  {} -> {}/",
                text(&entry["archive"]),
                text(&entry["extracted_to"]).cyan()
            ));
        }
    }
    render_errors(data);
    OutputFormatter::success(&format!("Extracted {count} archive(s)"));
}

fn render_generic(data: &Value) {
    match serde_json::to_string_pretty(data) {
        Ok(pretty) => OutputFormatter::plain(&pretty),
        Err(_) => OutputFormatter::plain(&data.to_string()),
    }
}
