/// Formatting helpers shared by the TUI and the one-shot commands

use std::time::Duration;

const BYTE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count with the largest base-1024 unit that keeps the
/// scaled value at or above 1
pub fn format_bytes(bytes: u64) -> String {
    // log(0) is undefined, zero gets its own literal
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let unit_index = exponent.min(BYTE_UNITS.len() - 1);

    if unit_index == 0 {
        format!("{} {}", bytes, BYTE_UNITS[0])
    } else {
        let scaled = bytes as f64 / 1024f64.powi(unit_index as i32);
        format!("{:.2} {}", scaled, BYTE_UNITS[unit_index])
    }
}

/// Format a percentage with two decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Human readable polling interval, e.g. "2s 500ms"
pub fn format_interval(interval: Duration) -> String {
    humantime::format_duration(interval).to_string()
}

/// Truncate string with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Docker container status as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Exited,
    Paused,
    Restarting,
    Created,
    Dead,
    Unknown,
}

impl From<&str> for ContainerState {
    fn from(status: &str) -> Self {
        let status_lower = status.trim().to_lowercase();
        if status_lower.starts_with("running") || status_lower.starts_with("up") {
            ContainerState::Running
        } else if status_lower.starts_with("exited") || status_lower.starts_with("stopped") {
            ContainerState::Exited
        } else if status_lower.starts_with("paused") {
            ContainerState::Paused
        } else if status_lower.starts_with("restarting") {
            ContainerState::Restarting
        } else if status_lower.starts_with("created") {
            ContainerState::Created
        } else if status_lower.starts_with("dead") || status_lower.starts_with("removing") {
            ContainerState::Dead
        } else {
            ContainerState::Unknown
        }
    }
}

impl ContainerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContainerState::Running => "Running",
            ContainerState::Exited => "Exited",
            ContainerState::Paused => "Paused",
            ContainerState::Restarting => "Restarting",
            ContainerState::Created => "Created",
            ContainerState::Dead => "Dead",
            ContainerState::Unknown => "Unknown",
        }
    }

    /// Badge tone: running is healthy, exited is an alert, the rest muted
    pub fn tone(&self) -> StatusTone {
        match self {
            ContainerState::Running => StatusTone::Success,
            ContainerState::Exited => StatusTone::Destructive,
            _ => StatusTone::Muted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Destructive,
    Muted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(1), "1 Bytes");
        assert_eq!(format_bytes(1023), "1023 Bytes");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
        assert_eq!(format_bytes(3 * 1024u64.pow(4)), "3.00 TB");
    }

    #[test]
    fn test_format_bytes_caps_at_terabytes() {
        assert_eq!(format_bytes(2048 * 1024u64.pow(4)), "2048.00 TB");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.3456), "12.35%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_millis(2500)), "2s 500ms");
        assert_eq!(format_interval(Duration::from_secs(5)), "5s");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("nginx", 10), "nginx");
        assert_eq!(truncate_string("registry.example.com/team/app", 12), "registry....");
    }

    #[test]
    fn test_container_state() {
        assert_eq!(ContainerState::from("running"), ContainerState::Running);
        assert_eq!(ContainerState::from("Up 2 hours"), ContainerState::Running);
        assert_eq!(ContainerState::from("exited"), ContainerState::Exited);
        assert_eq!(ContainerState::from("created"), ContainerState::Created);
        assert_eq!(ContainerState::from("weird"), ContainerState::Unknown);
        assert!(ContainerState::Running.is_running());
        assert!(!ContainerState::Exited.is_running());
    }

    #[test]
    fn test_status_tone() {
        assert_eq!(ContainerState::Running.tone(), StatusTone::Success);
        assert_eq!(ContainerState::Exited.tone(), StatusTone::Destructive);
        assert_eq!(ContainerState::Paused.tone(), StatusTone::Muted);
    }
}
