use std::time::Instant;

use super::state::{BannerKind, DirectoryState};
use crate::models::User;

const HEADERS: [&str; 6] = ["Name", "Email", "Age", "Address", "Created", "Id"];

pub const EMPTY_STATE: &str = "No users found.";

fn row(user: &User) -> [String; 6] {
    [
        user.name.clone(),
        user.email.clone(),
        user.age.to_string(),
        user.address.clone(),
        user.created_at.format("%Y-%m-%d").to_string(),
        user.id.clone(),
    ]
}

/// Plain-text table with columns padded to their widest cell.
pub fn render_table(users: &[&User]) -> String {
    if users.is_empty() {
        return format!("{}\n", EMPTY_STATE);
    }

    let rows: Vec<[String; 6]> = users.iter().map(|u| row(u)).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = line(&header);
    out.push('\n');
    out.push_str(&widths.map(|w| "-".repeat(w)).join("  "));
    out.push('\n');
    for cells in &rows {
        out.push_str(&line(cells));
        out.push('\n');
    }
    out
}

/// Banner (if still visible) followed by the filtered table.
pub fn render(state: &DirectoryState, now: Instant) -> String {
    let mut out = String::new();

    if let Some(banner) = state.visible_banner(now) {
        let tag = match banner.kind {
            BannerKind::Success => "✔",
            BannerKind::Error => "✖",
        };
        out.push_str(&format!("{} {}\n\n", tag, banner.message));
    }

    out.push_str(&render_table(&state.visible_users()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(name: &str, address: &str) -> User {
        User {
            id: format!("{:0>24}", name.len()),
            name: name.into(),
            email: format!("{}@x.com", name.to_lowercase()),
            age: 30,
            address: address.into(),
            created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_state() {
        assert_eq!(render_table(&[]), "No users found.\n");
    }

    #[test]
    fn test_columns_are_aligned() {
        let ann = user("Ann", "1 Main St");
        let bea = user("Beatrice", "2 Long Avenue");
        let out = render_table(&[&ann, &bea]);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name      Email"));
        assert!(lines[2].starts_with("Ann       ann@x.com"));
        assert!(lines[3].contains("2024-03-01"));
        assert_eq!(lines[0].find("Email"), lines[3].find("beatrice@x.com"));
    }

    #[test]
    fn test_render_applies_query_and_banner() {
        let mut state = DirectoryState::new();
        state.users = vec![user("Ann", "1 Main St"), user("Bob", "Harbour Lane")];
        state.query = "harbour".into();

        let out = render(&state, Instant::now());
        assert!(out.contains("Bob"));
        assert!(!out.contains("Ann"));
        assert!(!out.contains('✔'));
    }
}
