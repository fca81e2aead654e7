//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes command replies, validation errors and the status report.

use crate::application::mutator::StatusReport;
use crate::domain::types::FilterMode;

pub const AUTH_DENIED: &str = "🚫 **Authorization Denied**.";

pub const FOLLOW_USAGE: &str = "Usage: `.follow <handle>`";
pub const UNFOLLOW_USAGE: &str = "Usage: `.unfollow <handle>`";
pub const KEYWORDS_USAGE: &str =
    "Usage: `.keywords [add <words...> | remove <words...> | clear]`";
pub const MODE_USAGE: &str = "Usage: `.mode <none|include|exclude>`";
pub const CASE_USAGE: &str = "Usage: `.case <on|off>`";

pub fn followed(handle: &str) -> String {
    format!("✅ Now following **@{handle}**. Posts published from now on will be relayed.")
}

pub fn already_followed(handle: &str) -> String {
    format!("ℹ️ **@{handle}** is already being followed.")
}

pub fn invalid_handle(handle: &str) -> String {
    format!("⚠️ `{handle}` is not a valid handle (expected something like `alice.bsky.social`).")
}

pub fn account_not_found(handle: &str) -> String {
    format!("❓ No account found for **@{handle}**.")
}

pub fn lookup_failed(handle: &str, err: &str) -> String {
    format!("⚠️ Could not look up **@{handle}**: {err}")
}

pub fn unfollowed(handle: &str) -> String {
    format!("🗑️ Stopped following **@{handle}**.")
}

pub fn not_followed(handle: &str) -> String {
    format!("ℹ️ **@{handle}** is not being followed.")
}

pub const NO_ACCOUNTS: &str = "📭 No accounts are being monitored.";

pub fn account_list(accounts: &[String]) -> String {
    let mut msg = format!("**📋 Monitored accounts ({})**\n", accounts.len());
    for account in accounts {
        msg.push_str(&format!("* @{account}\n"));
    }
    msg
}

pub fn keywords_added(added: &[String], present: &[String]) -> String {
    let mut msg = if added.is_empty() {
        String::from("ℹ️ No new keywords added.")
    } else {
        format!("✅ Added: {}", quote_list(added))
    };
    if !present.is_empty() {
        msg.push_str(&format!("\nAlready present: {}", quote_list(present)));
    }
    msg
}

pub fn keywords_removed(removed: &[String], absent: &[String]) -> String {
    let mut msg = if removed.is_empty() {
        String::from("ℹ️ No keywords removed.")
    } else {
        format!("🗑️ Removed: {}", quote_list(removed))
    };
    if !absent.is_empty() {
        msg.push_str(&format!("\nNot present: {}", quote_list(absent)));
    }
    msg
}

pub fn keywords_cleared(count: usize) -> String {
    format!("🧹 Cleared {count} keyword(s).")
}

pub fn keyword_list(keywords: &[String], mode: FilterMode) -> String {
    if keywords.is_empty() {
        return format!("**🔎 Keywords**: none (mode: `{}`)", mode.as_str());
    }
    format!(
        "**🔎 Keywords** (mode: `{}`): {}",
        mode.as_str(),
        quote_list(keywords)
    )
}

pub fn mode_set(mode: FilterMode) -> String {
    let detail = match mode {
        FilterMode::None => "every new post is relayed",
        FilterMode::Include => "only posts containing a keyword are relayed",
        FilterMode::Exclude => "posts containing a keyword are skipped",
    };
    format!("✅ Filter mode set to `{}`: {detail}.", mode.as_str())
}

pub fn invalid_mode(mode: &str) -> String {
    format!("⚠️ Unknown mode `{mode}`. {MODE_USAGE}")
}

pub fn case_set(case_sensitive: bool) -> String {
    if case_sensitive {
        String::from("✅ Keyword matching is now **case-sensitive**.")
    } else {
        String::from("✅ Keyword matching is now **case-insensitive**.")
    }
}

pub fn status(report: &StatusReport) -> String {
    let mut msg = String::from("**📡 Relay Status**\n");
    msg.push_str(&format!("**Accounts**: {}\n", report.accounts.len()));
    msg.push_str(&format!("**Mode**: {}\n", report.mode.as_str()));
    msg.push_str(&format!(
        "**Keywords**: {}\n",
        if report.keywords.is_empty() {
            String::from("none")
        } else {
            quote_list(&report.keywords)
        }
    ));
    msg.push_str(&format!(
        "**Case-sensitive**: {}\n",
        if report.case_sensitive { "yes" } else { "no" }
    ));
    msg.push_str(&format!(
        "**Poll interval**: {}s\n",
        report.poll_interval.as_secs()
    ));
    msg.push_str(&format!("**Cycles**: {}\n", report.cycles_completed));

    match &report.last_cycle {
        Some(cycle) => {
            let started = cycle
                .started_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| String::from("unknown"));
            msg.push_str(&format!(
                "**Last cycle**: {started} ({}ms) · relayed {} · filtered {} · baseline {} · unchanged {} · empty {} · fetch errors {} · delivery errors {}\n",
                cycle.duration.as_millis(),
                cycle.relayed,
                cycle.filtered,
                cycle.baseline,
                cycle.unchanged,
                cycle.no_post,
                cycle.fetch_errors,
                cycle.delivery_errors,
            ));
        }
        None => msg.push_str("**Last cycle**: not run yet\n"),
    }
    msg
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("`{i}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
