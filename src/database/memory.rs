use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::UserStore;
use crate::models::{NewUser, User, UserDocument};
use crate::utils::AppError;

/// In-process store with the same rules as the `users` collection:
/// server-assigned ids, unique email, insertion order on list.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_id(doc: &UserDocument, id: &str) -> bool {
    doc.id.map(|oid| oid.to_hex() == id).unwrap_or(false)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().cloned().map(User::from).collect())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if users.iter().any(|doc| doc.email == user.email) {
            return Err(AppError::duplicate_email());
        }

        let mut document = UserDocument::from_new(user);
        document.id = Some(ObjectId::new());
        users.push(document.clone());

        Ok(User::from(document))
    }

    async fn replace(&self, id: &str, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        let index = users
            .iter()
            .position(|doc| matches_id(doc, id))
            .ok_or_else(AppError::user_not_found)?;

        if users
            .iter()
            .enumerate()
            .any(|(i, doc)| i != index && doc.email == user.email)
        {
            return Err(AppError::duplicate_email());
        }

        users[index].apply(user);
        Ok(User::from(users[index].clone()))
    }

    async fn remove(&self, id: &str) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|doc| !matches_id(doc, id));

        if users.len() == before {
            return Err(AppError::user_not_found());
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".into(),
            email: email.into(),
            age: 30,
            address: "1 Main St".into(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store.insert(new_user("a@x.com")).await.unwrap();
        let b = store.insert(new_user("b@x.com")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 24);
        assert_eq!(store.list().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.insert(new_user("a@x.com")).await.unwrap();
        let other = store.insert(new_user("b@x.com")).await.unwrap();

        assert!(matches!(
            store.insert(new_user("a@x.com")).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            store.replace(&other.id, new_user("a@x.com")).await,
            Err(AppError::Conflict(_))
        ));
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_replace_keeps_id_and_created_at() {
        let store = MemoryStore::new();
        let created = store.insert(new_user("a@x.com")).await.unwrap();

        let mut changed = new_user("a@x.com");
        changed.name = "Ann B".into();
        changed.age = 31;
        let updated = store.replace(&created.id, changed).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Ann B");
        assert_eq!(updated.age, 31);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = MemoryStore::new();
        let unknown = ObjectId::new().to_hex();

        assert!(matches!(
            store.replace(&unknown, new_user("a@x.com")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(store.remove(&unknown).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.remove("garbage").await, Err(AppError::NotFound(_))));
    }
}
