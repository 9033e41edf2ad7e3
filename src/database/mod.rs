mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;

use crate::models::{NewUser, User};
use crate::utils::AppError;

pub const USERS_COLLECTION: &str = "users";

/// Persistence for user records.
///
/// Every method is a single independent operation; there are no
/// transactions spanning calls and concurrent replaces are last-write-wins.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Assigns `id` and `createdAt`. Fails with `Conflict` on a taken email.
    /// A database reply without a usable inserted id is reported as
    /// `ServiceUnavailable`, the same as any other failed database call.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    /// Fails with `NotFound` when `id` is unknown or not a valid id.
    async fn replace(&self, id: &str, user: NewUser) -> Result<User, AppError>;

    async fn remove(&self, id: &str) -> Result<(), AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
