use chrono::NaiveDateTime;

/// Format used in the task file and in command arguments, e.g. `2019-12-02 1800`
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H%M";

/// Format used when showing a task, e.g. `Dec 02 2019, 6:00PM`
const DISPLAY_FORMAT: &str = "%b %d %Y, %-I:%M%p";

/// `yyyy-MM-dd HHmm` is always exactly this many bytes
const STORAGE_LEN: usize = 15;

/// Parse a `yyyy-MM-dd HHmm` timestamp. Surrounding whitespace is ignored;
/// anything else that deviates from the fixed-width form is rejected.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.len() != STORAGE_LEN {
        return None;
    }
    NaiveDateTime::parse_from_str(text, STORAGE_FORMAT).ok()
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

pub fn format_display(ts: NaiveDateTime) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}
