pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Base-1024 size with at most two decimals: `1536 -> "1.5 KB"`.
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
        if size == 0 {
            return "0 B".to_string();
        }

        let mut value = size as f64;
        let mut unit_index = 0;
        while value >= 1024.0 && unit_index < UNITS.len() - 1 {
            value /= 1024.0;
            unit_index += 1;
        }

        let rounded = format!("{:.2}", value);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}", trimmed, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::FileSizeUtils;

    #[test]
    fn formats_like_the_console() {
        assert_eq!(FileSizeUtils::format_size(0), "0 B");
        assert_eq!(FileSizeUtils::format_size(100), "100 B");
        assert_eq!(FileSizeUtils::format_size(1024), "1 KB");
        assert_eq!(FileSizeUtils::format_size(1536), "1.5 KB");
        assert_eq!(FileSizeUtils::format_size(2_456_000), "2.34 MB");
        assert_eq!(FileSizeUtils::format_size(1024 * 1024 * 1024 * 5 / 2), "2.5 GB");
    }

    #[test]
    fn caps_at_terabytes() {
        let size = 2048u64 * 1024 * 1024 * 1024 * 1024;
        assert_eq!(FileSizeUtils::format_size(size), "2048 TB");
    }
}
