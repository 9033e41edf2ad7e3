//! Directory client: a cached view of the user list driven over the HTTP API.

pub mod api;
pub mod state;
pub mod view;

pub use api::{ClientError, DirectoryApi, HttpDirectoryApi, UserForm, DEFAULT_API_URL};
pub use state::{
    add, begin_edit, cancel_edit, delete, load, search, submit, update, Banner, BannerKind,
    DirectoryState, FormMode,
};
