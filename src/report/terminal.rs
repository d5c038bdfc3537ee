use crate::constants::{CRITICAL_THRESHOLD, WARN_THRESHOLD};
use crate::formatting::{format_percent, format_time_remaining_at, progress_bar};
use crate::types::{ExtraUsage, QuotaSnapshot, QuotaWindow};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

const LABEL_WIDTH: usize = 14;

// Green below 50%, yellow below 80%, red otherwise
fn colorize_by_usage(text: &str, percent: f64) -> ColoredString {
    if percent < WARN_THRESHOLD {
        text.green()
    } else if percent < CRITICAL_THRESHOLD {
        text.yellow()
    } else {
        text.red()
    }
}

/// Fixed-layout report printed by the command line tool
pub fn render_terminal_report(snapshot: &QuotaSnapshot, width: usize, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Claude Usage".bold());
    let _ = writeln!(out);

    push_window(&mut out, "Session (5h)", &snapshot.session, width, now);
    push_window(&mut out, "Weekly (7d)", &snapshot.weekly, width, now);

    if !snapshot.per_model_weekly.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Weekly by model".bold());
        for (model, utilization) in &snapshot.per_model_weekly {
            let percent = utilization.clamp(0.0, 100.0);
            let _ = writeln!(
                out,
                "  {:<width$}{} {}",
                model,
                colorize_by_usage(&progress_bar(percent, width), percent),
                format_percent(percent),
                width = LABEL_WIDTH - 2,
            );
        }
    }

    if let Some(extra) = &snapshot.extra_usage {
        let _ = writeln!(out);
        push_extra_usage(&mut out, extra);
    }

    out
}

fn push_window(out: &mut String, label: &str, window: &QuotaWindow, width: usize, now: DateTime<Utc>) {
    let used = window.used_percent();
    let bar = progress_bar(used, width);
    let _ = writeln!(
        out,
        "{:<width$}{} {} used | {} remaining",
        label,
        colorize_by_usage(&bar, used),
        colorize_by_usage(&format_percent(used), used),
        format_percent(window.remaining_percent()),
        width = LABEL_WIDTH,
    );
    let _ = writeln!(
        out,
        "{:<width$}{}",
        "",
        format!(
            "resets in {}",
            format_time_remaining_at(window.resets_at.as_deref(), now)
        )
        .magenta(),
        width = LABEL_WIDTH,
    );
}

fn push_extra_usage(out: &mut String, extra: &ExtraUsage) {
    if !extra.is_enabled {
        let _ = writeln!(out, "{:<width$}{}", "Extra usage", "disabled".dimmed(), width = LABEL_WIDTH);
        return;
    }

    let detail = match (extra.used_usd(), extra.monthly_limit_usd()) {
        (Some(used), Some(limit)) if limit > 0.0 => {
            let percent = used / limit * 100.0;
            format!(
                "${:.2} / ${:.2} ({})",
                used,
                limit,
                colorize_by_usage(&format_percent(percent), percent)
            )
        }
        (Some(used), _) => format!("${:.2} used", used),
        _ => "enabled".to_string(),
    };
    let _ = writeln!(out, "{:<width$}{}", "Extra usage", detail, width = LABEL_WIDTH);
}
