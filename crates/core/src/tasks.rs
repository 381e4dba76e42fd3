//! Task naming and color
//!
//! Task names are `namespace:name` (`deploy:ftp_sync`) or bare (`cleanup`).
//! The namespace is shown dimmed and the short name gets a stable color, so the
//! steps of one pipeline stay apart from each other in `list`, `plan` and `run`
//! output.

use colored::*;

/// Label colors, kept clear of the red/yellow/green used for status
const TASK_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::BrightCyan,
    Color::BrightBlue,
    Color::BrightMagenta,
];

/// Split a task name at its last `:` into namespace and short name
pub fn split_task_name(task_name: &str) -> (Option<&str>, &str) {
    match task_name.rsplit_once(':') {
        Some((namespace, short)) if !namespace.is_empty() && !short.is_empty() => {
            (Some(namespace), short)
        }
        _ => (None, task_name),
    }
}

/// Get a consistent color for a task name, picked from its short name
pub fn get_task_color(task_name: &str) -> Color {
    let (_, short) = split_task_name(task_name);
    // FNV-1a
    let hash = short.bytes().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
        (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3)
    });
    TASK_COLORS[(hash % TASK_COLORS.len() as u64) as usize]
}

/// Render a task name with a dimmed namespace and a colored short name
pub fn styled_task_name(task_name: &str) -> String {
    let (namespace, short) = split_task_name(task_name);
    let short = short.color(get_task_color(task_name)).bold();
    match namespace {
        Some(namespace) => format!("{}{}{}", namespace.dimmed(), ":".dimmed(), short),
        None => short.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOY_TASKS: [&str; 5] = [
        "deploy:compile",
        "deploy:update_submodules",
        "deploy:ftp_setup",
        "deploy:ftp_sync",
        "deploy:ftp",
    ];

    #[test]
    fn test_split_task_name() {
        assert_eq!(split_task_name("deploy:ftp_sync"), (Some("deploy"), "ftp_sync"));
        assert_eq!(split_task_name("cleanup"), (None, "cleanup"));
        assert_eq!(split_task_name("db:migrate:up"), (Some("db:migrate"), "up"));
        assert_eq!(split_task_name(":odd"), (None, ":odd"));
        assert_eq!(split_task_name("odd:"), (None, "odd:"));
    }

    #[test]
    fn test_color_follows_short_name() {
        assert_eq!(get_task_color("deploy:compile"), get_task_color("deploy:compile"));
        assert_eq!(get_task_color("deploy:compile"), get_task_color("compile"));
        assert_eq!(get_task_color("staging:ftp"), get_task_color("production:ftp"));
    }

    #[test]
    fn test_pipeline_steps_spread_across_palette() {
        let colors: Vec<Color> = DEPLOY_TASKS.iter().map(|n| get_task_color(n)).collect();
        let mut distinct = colors.clone();
        distinct.dedup();
        assert!(distinct.len() >= 3, "colors: {:?}", colors);
        assert_ne!(get_task_color("deploy:ftp_sync"), get_task_color("deploy:ftp_setup"));
    }

    #[test]
    fn test_styled_name_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(styled_task_name("deploy:ftp"), "deploy:ftp");
        assert_eq!(styled_task_name("cleanup"), "cleanup");
        colored::control::unset_override();
    }
}
