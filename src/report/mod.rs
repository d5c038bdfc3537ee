pub mod markdown;
pub mod terminal;

pub use markdown::{
    render_idle_toast, render_local_section, render_quota_report, render_remote_section,
    render_reset_summary, render_unavailable_section,
};
pub use terminal::render_terminal_report;
