use greenlight_core::{Project, ProjectSet};

pub struct TableFormatter {
    id_width: usize,
    name_width: usize,
    status_width: usize,
    last_run_width: usize,
    progress_width: usize,
}

impl TableFormatter {
    pub fn new(projects: &ProjectSet) -> Self {
        let id_width = projects
            .ids()
            .map(|id| id.as_str().chars().count())
            .max()
            .unwrap_or(2)
            .clamp(2, 20);

        let name_width = projects
            .iter()
            .map(|p| p.display_name().chars().count())
            .max()
            .unwrap_or(16)
            .clamp(4, 40); // Between "Name" header min and reasonable terminal width max

        Self {
            id_width,
            name_width,
            status_width: 9,
            last_run_width: 19,
            progress_width: 8,
        }
    }

    pub fn print_table(&self, projects: &ProjectSet, now_ms: f64) {
        print!("{}", self.render(projects, now_ms));
    }

    pub fn render(&self, projects: &ProjectSet, now_ms: f64) -> String {
        let mut out = String::new();
        for line in [self.top_border(), self.header_row(), self.separator()] {
            out.push_str(&line);
            out.push('\n');
        }
        for project in projects.iter() {
            out.push_str(&self.row(project, now_ms));
            out.push('\n');
        }
        out.push_str(&self.bottom_border());
        out.push('\n');
        out
    }

    fn row(&self, project: &Project, now_ms: f64) -> String {
        let progress = if project.is_in_progress() {
            format_progress(project.progress_percent(now_ms))
        } else {
            String::new()
        };

        format!(
            "│ {:<width_id$} │ {:<width_name$} │ {:<width_status$} │ {:<width_last_run$} │ {:<width_progress$} │",
            truncate(project.project_id.as_str(), self.id_width),
            truncate(&project.display_name(), self.name_width),
            project.status().label(),
            format_timestamp(project.mtime),
            truncate(&progress, self.progress_width),
            width_id = self.id_width,
            width_name = self.name_width,
            width_status = self.status_width,
            width_last_run = self.last_run_width,
            width_progress = self.progress_width,
        )
    }

    fn header_row(&self) -> String {
        format!(
            "│ {:<width_id$} │ {:<width_name$} │ {:<width_status$} │ {:<width_last_run$} │ {:<width_progress$} │",
            "ID",
            "Name",
            "Status",
            "Last run",
            "Progress",
            width_id = self.id_width,
            width_name = self.name_width,
            width_status = self.status_width,
            width_last_run = self.last_run_width,
            width_progress = self.progress_width,
        )
    }

    fn border(&self, left: &str, middle: &str, right: &str) -> String {
        let cells: Vec<String> = [
            self.id_width,
            self.name_width,
            self.status_width,
            self.last_run_width,
            self.progress_width,
        ]
        .iter()
        .map(|width| "─".repeat(width + 2))
        .collect();
        format!("{}{}{}", left, cells.join(middle), right)
    }

    fn top_border(&self) -> String {
        self.border("┌", "┬", "┐")
    }

    fn separator(&self) -> String {
        self.border("├", "┼", "┤")
    }

    fn bottom_border(&self) -> String {
        self.border("└", "┴", "┘")
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        // Safely truncate at character boundaries, not byte boundaries
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

/// Epoch milliseconds as a UTC timestamp, "-" when unknown or zero.
pub fn format_timestamp(ms: Option<f64>) -> String {
    ms.filter(|ms| *ms > 0.0)
        .and_then(|ms| chrono::DateTime::from_timestamp_millis(ms as i64))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_progress(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{:.0}%", p),
        None => "...".to_string(),
    }
}

pub fn format_duration_ms(ms: f64) -> String {
    let secs = ms / 1000.0;
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{}m{:02}s", (secs / 60.0) as u64, (secs % 60.0) as u64)
    }
}
