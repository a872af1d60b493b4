//! UI Theme - colors and icons shared by all terminal output

use crossterm::style::Color;

/// Visual constants for ghinst output
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub colors: ColorScheme,
    pub icons: Icons,
}

#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Section headers and secondary details
    pub header: Color,
    /// Asset and file names
    pub name: Color,
    pub success: Color,
    pub warning: Color,
    /// Download progress
    pub active: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::DarkGrey,
            name: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            active: Color::Blue,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Icons {
    pub active: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub removed: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            active: "●",
            success: "✓",
            warning: "⚠",
            info: "ℹ",
            removed: "-",
        }
    }
}

/// Format bytes for human-readable display
pub fn format_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    if mb >= 1024.0 {
        format!("{:.1} GB", mb / 1024.0)
    } else if kb >= 1024.0 {
        format!("{mb:.1} MB")
    } else if kb >= 1.0 {
        format!("{kb:.1} KB")
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024 * 5), "5.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
    }
}
