use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Memory sizes as the table shows them: `812K`, `14.2M`, `3.1G`.
pub fn format_kb(kb: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = 1024 * 1024;
    const TB: u64 = 1024 * 1024 * 1024;

    if kb >= TB {
        format!("{:.1}T", kb as f64 / TB as f64)
    } else if kb >= GB {
        format!("{:.1}G", kb as f64 / GB as f64)
    } else if kb >= MB {
        format!("{:.1}M", kb as f64 / MB as f64)
    } else {
        format!("{kb}K")
    }
}

/// Accumulated CPU time. Below an hour it reads `m:ss.cc`; above, `XhYYm`.
pub fn format_ticks(ticks: u64, hz: u64) -> String {
    let hz = hz.max(1);
    let hundredths = ticks.saturating_mul(100) / hz;
    let total_secs = hundredths / 100;
    let minutes = total_secs / 60;
    if minutes < 60 {
        format!("{minutes}:{:02}.{:02}", total_secs % 60, hundredths % 100)
    } else {
        format!("{}h{:02}m", minutes / 60, minutes % 60)
    }
}

pub fn format_uptime(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    match days {
        0 => format!("{hours:02}:{minutes:02}"),
        1 => format!("1 day, {hours:02}:{minutes:02}"),
        d => format!("{d} days, {hours:02}:{minutes:02}"),
    }
}
