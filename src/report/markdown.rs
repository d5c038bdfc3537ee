use crate::config::QuotaConfig;
use crate::fetcher::QuotaOutcome;
use crate::formatting::{
    format_duration, format_number_with_commas, format_percent, format_time_remaining_at,
    format_token_count, progress_bar,
};
use crate::types::{LocalUsageSnapshot, QuotaSnapshot, QuotaWindow};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const REMOTE_HEADING: &str = "## Claude Subscription Quota";
const LOCAL_HEADING: &str = "## Local Usage (this session)";

/// Full report for the `quota` tool: remote quota first, local counters second
pub fn render_quota_report(
    outcome: &QuotaOutcome,
    local: &LocalUsageSnapshot,
    config: &QuotaConfig,
    now: DateTime<Utc>,
) -> String {
    let remote = match outcome {
        QuotaOutcome::Available(snapshot) => {
            render_remote_section(snapshot, config.progress_bar_width, now)
        }
        QuotaOutcome::Unavailable(_) => render_unavailable_section(),
    };
    format!("{}\n---\n\n{}", remote, render_local_section(local, config))
}

pub fn render_remote_section(snapshot: &QuotaSnapshot, width: usize, now: DateTime<Utc>) -> String {
    let mut out = format!("{}\n\n", REMOTE_HEADING);
    push_window(&mut out, "Session (5h)", &snapshot.session, width, now);
    push_window(&mut out, "Weekly (7d)", &snapshot.weekly, width, now);

    if !snapshot.per_model_weekly.is_empty() {
        out.push_str("**Weekly by model:**\n\n");
        for (model, utilization) in &snapshot.per_model_weekly {
            let _ = writeln!(out, "- {}: {} used", model, format_percent(*utilization));
        }
        out.push('\n');
    }

    if let Some(extra) = snapshot.extra_usage.as_ref().filter(|e| e.is_enabled) {
        match (extra.used_usd(), extra.monthly_limit_usd()) {
            (Some(used), Some(limit)) => {
                let _ = writeln!(out, "**Extra usage:** ${:.2} of ${:.2} this month\n", used, limit);
            }
            (Some(used), None) => {
                let _ = writeln!(out, "**Extra usage:** ${:.2} this month\n", used);
            }
            _ => out.push_str("**Extra usage:** enabled\n\n"),
        }
    }

    out
}

fn push_window(out: &mut String, label: &str, window: &QuotaWindow, width: usize, now: DateTime<Utc>) {
    let _ = writeln!(
        out,
        "**{}:** `{}` {} used | {} remaining",
        label,
        progress_bar(window.used_percent(), width),
        format_percent(window.used_percent()),
        format_percent(window.remaining_percent()),
    );
    let _ = writeln!(
        out,
        "Resets in: {}\n",
        format_time_remaining_at(window.resets_at.as_deref(), now)
    );
}

/// Shown in place of the remote section when the quota could not be fetched
pub fn render_unavailable_section() -> String {
    format!(
        "{}\n\n\
         Could not fetch quota information.\n\n\
         Possible causes:\n\
         - No Anthropic OAuth credentials found (log in with an Anthropic account first)\n\
         - The access token expired and could not be refreshed\n\
         - The usage API is unreachable or rejected the request\n",
        REMOTE_HEADING
    )
}

pub fn render_local_section(local: &LocalUsageSnapshot, config: &QuotaConfig) -> String {
    let state = &local.state;
    let mut out = format!("{}\n\n", LOCAL_HEADING);

    out.push_str("| Type | Tokens |\n|------|--------|\n");
    for (label, count) in [
        ("Input", state.input_tokens),
        ("Output", state.output_tokens),
        ("Reasoning", state.reasoning_tokens),
        ("Cache read", state.cache_read_tokens),
        ("Cache write", state.cache_write_tokens),
    ] {
        let _ = writeln!(out, "| {} | {} |", label, format_token_count(count));
    }
    let _ = writeln!(
        out,
        "| **Total** | **{}** |\n",
        format_number_with_commas(local.total_tokens)
    );

    let daily_percent = local.percent_of(config.daily_token_limit);
    let _ = writeln!(
        out,
        "Daily budget: `{}` {} of {}",
        progress_bar(daily_percent, config.progress_bar_width),
        format_percent(daily_percent),
        format_token_count(config.daily_token_limit)
    );
    let _ = writeln!(out, "Requests: {}", state.request_count);
    let _ = writeln!(
        out,
        "Session duration: {}",
        format_duration(local.session_duration.num_milliseconds())
    );
    let _ = writeln!(out, "Cost: {}", state.cost);

    out
}

/// One-line summary returned by the `quota_reset` tool
pub fn render_reset_summary(previous: &LocalUsageSnapshot) -> String {
    format!(
        "Reset local usage. Previous: {} tokens, {} requests, {}",
        format_token_count(previous.total_tokens),
        previous.state.request_count,
        previous.state.cost
    )
}

/// Text of the idle notification
pub fn render_idle_toast(local: &LocalUsageSnapshot, config: &QuotaConfig) -> String {
    let percent = local.percent_of(config.daily_token_limit);
    format!(
        "{} Tokens: {} / {} ({}) | Cost: {} | Requests: {}",
        progress_bar(percent, config.progress_bar_width),
        format_token_count(local.total_tokens),
        format_token_count(config.daily_token_limit),
        format_percent(percent),
        local.state.cost,
        local.state.request_count
    )
}
