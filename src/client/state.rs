//! Directory view model.
//!
//! All mutable client state lives in [`DirectoryState`]; every operation
//! receives it explicitly. Mutations never touch the cache locally: they
//! call the API and then reload, so after a round trip the cache is exactly
//! what the server returned.

use std::time::{Duration, Instant};

use super::api::{DirectoryApi, UserForm};
use crate::models::User;

const SUCCESS_TTL: Duration = Duration::from_secs(3);
const ERROR_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Transient message shown above the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub expires_at: Instant,
}

impl Banner {
    fn new(kind: BannerKind, message: String) -> Self {
        let ttl = match kind {
            BannerKind::Success => SUCCESS_TTL,
            BannerKind::Error => ERROR_TTL,
        };
        Banner {
            kind,
            message,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Where a form submission goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone, Default)]
pub struct DirectoryState {
    /// Last list fetched from the API.
    pub users: Vec<User>,
    pub mode: FormMode,
    pub query: String,
    pub banner: Option<Banner>,
}

impl DirectoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add User",
            FormMode::Edit { .. } => "Update User",
        }
    }

    /// Banner still within its display window.
    pub fn visible_banner(&self, now: Instant) -> Option<&Banner> {
        self.banner.as_ref().filter(|b| b.is_visible(now))
    }

    /// Users matching the current query.
    pub fn visible_users(&self) -> Vec<&User> {
        search(&self.users, &self.query)
    }

    fn success(&mut self, message: &str) {
        self.banner = Some(Banner::new(BannerKind::Success, message.to_string()));
    }

    fn error(&mut self, context: &str, err: impl std::fmt::Display) {
        self.banner = Some(Banner::new(BannerKind::Error, format!("{}: {}", context, err)));
    }
}

/// Case-insensitive substring filter on name, email and address.
/// A blank query returns the whole list in order.
pub fn search<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return users.iter().collect();
    }

    users
        .iter()
        .filter(|user| {
            user.name.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
                || user.address.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Replaces the cache with the server list. On failure the cache is emptied.
pub async fn load(api: &dyn DirectoryApi, state: &mut DirectoryState) {
    match api.list().await {
        Ok(users) => {
            log::debug!("loaded {} users", users.len());
            state.users = users;
        }
        Err(e) => {
            log::warn!("load failed: {}", e);
            state.users.clear();
            state.error("Error loading users", e);
        }
    }
}

pub async fn add(api: &dyn DirectoryApi, state: &mut DirectoryState, form: &UserForm) -> bool {
    match api.create(form).await {
        Ok(_) => {
            state.success("User added successfully!");
            load(api, state).await;
            true
        }
        Err(e) => {
            state.error("Error adding user", e);
            false
        }
    }
}

pub async fn update(
    api: &dyn DirectoryApi,
    state: &mut DirectoryState,
    id: &str,
    form: &UserForm,
) -> bool {
    match api.update(id, form).await {
        Ok(_) => {
            state.success("User updated successfully!");
            cancel_edit(state);
            load(api, state).await;
            true
        }
        Err(e) => {
            state.error("Error updating user", e);
            false
        }
    }
}

pub async fn delete(api: &dyn DirectoryApi, state: &mut DirectoryState, id: &str) -> bool {
    match api.delete(id).await {
        Ok(_) => {
            state.success("User deleted successfully!");
            load(api, state).await;
            true
        }
        Err(e) => {
            state.error("Error deleting user", e);
            false
        }
    }
}

/// Form submit: update in edit mode, create otherwise.
pub async fn submit(api: &dyn DirectoryApi, state: &mut DirectoryState, form: &UserForm) -> bool {
    match state.mode.clone() {
        FormMode::Edit { id } => update(api, state, &id, form).await,
        FormMode::Create => add(api, state, form).await,
    }
}

/// Enters edit mode for a cached user and returns the pre-filled form.
/// Ids not in the cache are ignored.
pub fn begin_edit(state: &mut DirectoryState, id: &str) -> Option<UserForm> {
    let form = state.users.iter().find(|u| u.id == id).map(UserForm::from)?;
    state.mode = FormMode::Edit { id: id.to_string() };
    Some(form)
}

pub fn cancel_edit(state: &mut DirectoryState) {
    state.mode = FormMode::Create;
}
