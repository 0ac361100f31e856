//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Inspect
//!
//! ```text
//! photo.jpg
//!     Type: image/jpeg
//!     Dimensions: 850x566
//!     Size: 48.2 KiB
//! ```
//!
//! ## Stage / Resize
//!
//! ```text
//! photo.jpg → public/avatars/cat-512.jpg
//!     Dimensions: 512x512 (resized)
//!     Size: 31.0 KiB
//!     Original: removed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::detail::Detail;
use crate::handle::Finished;

/// Human-readable byte count: bytes below 1 KiB, otherwise one decimal.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn detail_lines(detail: &Detail, resized: bool) -> Vec<String> {
    let suffix = if resized { " (resized)" } else { "" };
    vec![
        format!("    Type: {}", detail.mime),
        format!("    Dimensions: {}x{}{suffix}", detail.width, detail.height),
        format!("    Size: {}", format_size(detail.size)),
    ]
}

pub fn format_detail(input: &str, detail: &Detail) -> Vec<String> {
    let mut lines = vec![input.to_string()];
    lines.extend(detail_lines(detail, false));
    lines
}

pub fn format_finished(input: &str, finished: &Finished) -> Vec<String> {
    let header = match &finished.published {
        Some(path) => format!("{input} → {}", path.display()),
        None => input.to_string(),
    };
    let mut lines = vec![header];
    lines.extend(detail_lines(&finished.detail, finished.resized));
    if finished.origin_removed {
        lines.push("    Original: removed".to_string());
    }
    lines
}

pub fn print_detail(input: &str, detail: &Detail) {
    for line in format_detail(input, detail) {
        println!("{}", line);
    }
}

pub fn print_finished(input: &str, finished: &Finished) {
    for line in format_finished(input, finished) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn detail() -> Detail {
        Detail {
            width: 850,
            height: 566,
            mime: "image/jpeg".to_string(),
            size: 49_357,
        }
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KiB");
        assert_eq!(format_size(49_357), "48.2 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn detail_output() {
        let lines = format_detail("photo.jpg", &detail());
        assert_eq!(
            lines,
            vec![
                "photo.jpg",
                "    Type: image/jpeg",
                "    Dimensions: 850x566",
                "    Size: 48.2 KiB",
            ]
        );
    }

    #[test]
    fn finished_output_with_publish_and_removal() {
        let finished = Finished {
            detail: detail(),
            published: Some(PathBuf::from("public/cat.jpg")),
            resized: true,
            origin_removed: true,
        };
        let lines = format_finished("photo.jpg", &finished);
        assert_eq!(lines[0], "photo.jpg → public/cat.jpg");
        assert_eq!(lines[2], "    Dimensions: 850x566 (resized)");
        assert_eq!(lines.last().unwrap(), "    Original: removed");
    }

    #[test]
    fn finished_output_without_publish() {
        let finished = Finished {
            detail: detail(),
            published: None,
            resized: false,
            origin_removed: false,
        };
        let lines = format_finished("photo.jpg", &finished);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "photo.jpg");
    }
}
