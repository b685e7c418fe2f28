//! Display helpers
//!
//! Small pure functions the display layer uses to label records. No markup
//! is produced here beyond the `<mark>` wrapper for search highlighting.

use regex::Regex;

use crate::evidence::EvidenceStatus;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size in 1024 steps, at most two decimals, e.g. `1.5 KB`
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

pub fn status_badge_class(status: EvidenceStatus) -> &'static str {
    match status {
        EvidenceStatus::Pending => "warning",
        EvidenceStatus::Approved => "success",
        EvidenceStatus::Rejected => "danger",
        EvidenceStatus::UnderReview => "info",
        EvidenceStatus::Unknown => "secondary",
    }
}

pub fn file_icon(mime_type: &str) -> &'static str {
    if mime_type.starts_with("image/") {
        "🖼️"
    } else if mime_type.starts_with("video/") {
        "🎥"
    } else if mime_type.starts_with("audio/") {
        "🎵"
    } else if mime_type == "application/pdf" {
        "📄"
    } else {
        "📁"
    }
}

/// First 16 hex characters of a digest followed by `...`
pub fn short_digest(digest: &str) -> String {
    let prefix: String = digest.chars().take(16).collect();
    format!("{}...", prefix)
}

pub fn results_summary(shown: usize, total: usize) -> String {
    format!("Showing {} of {} evidence items", shown, total)
}

/// Wrap every case-insensitive occurrence of `term` in `<mark>` tags.
/// The term is matched literally.
pub fn highlight_term(text: &str, term: &str) -> String {
    if text.is_empty() || term.is_empty() {
        return text.to_string();
    }

    match Regex::new(&format!("(?i)({})", regex::escape(term))) {
        Ok(pattern) => pattern.replace_all(text, "<mark>${1}</mark>").into_owned(),
        Err(_) => text.to_string(),
    }
}
