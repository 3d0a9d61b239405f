//! Human-readable sizes and speeds

const KB: f64 = 1024.0;
const MB: f64 = 1024.0 * 1024.0;

/// "0 B", "x.xx KB" or "x.xx MB"
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.2} MB", bytes / MB)
    } else {
        format!("{:.2} KB", bytes / KB)
    }
}

/// "0 B/s", "x.x KB/s" or "x.x MB/s"
pub fn format_speed(bytes_per_second: u64) -> String {
    if bytes_per_second == 0 {
        return "0 B/s".to_string();
    }
    let bps = bytes_per_second as f64;
    if bps >= MB {
        format!("{:.1} MB/s", bps / MB)
    } else {
        format!("{:.1} KB/s", bps / KB)
    }
}

/// Remaining time in minutes as "N分钟" or "N秒"
pub fn format_remaining(minutes: f64) -> String {
    if minutes <= 0.0 || !minutes.is_finite() {
        return "--".to_string();
    }
    if minutes < 1.0 {
        format!("{}秒", (minutes * 60.0).ceil() as u64)
    } else {
        format!("{}分钟", minutes.ceil() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "0.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(0), "0 B/s");
        assert_eq!(format_speed(1536), "1.5 KB/s");
        assert_eq!(format_speed(2 * 1024 * 1024), "2.0 MB/s");
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0.0), "--");
        assert_eq!(format_remaining(0.5), "30秒");
        assert_eq!(format_remaining(2.2), "3分钟");
    }
}
