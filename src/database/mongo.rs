use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{ClientOptions, IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};
use std::time::Duration;

use super::{UserStore, USERS_COLLECTION};
use crate::models::{NewUser, User, UserDocument};
use crate::utils::AppError;

const DEFAULT_DATABASE: &str = "user_directory";

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connects, verifies the server answers, and ensures the unique email index.
    /// Fails when the index cannot be built, e.g. over existing duplicate emails.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let db_name = database
            .map(str::to_string)
            .or_else(|| client_options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        let store = Self { db };
        store.ping().await?;
        log::info!("✅ Connected to MongoDB database: {}", db_name);

        store.ensure_indexes().await?;

        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.db
            .collection::<Document>(USERS_COLLECTION)
            .create_index(email_index)
            .await
            .map_err(|e| {
                log::error!("❌ Could not create users(email) index: {}", e);
                AppError::ServiceUnavailable(format!(
                    "Could not create unique index on users.email: {}",
                    e
                ))
            })?;

        log::info!("   ✅ Index ready: users(email) unique");
        Ok(())
    }

    fn users(&self) -> Collection<UserDocument> {
        self.db.collection(USERS_COLLECTION)
    }
}

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::user_not_found())
}

#[async_trait]
impl UserStore for MongoStore {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        let cursor = self.users().find(doc! {}).await?;
        let docs: Vec<UserDocument> = cursor.try_collect().await?;

        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut document = UserDocument::from_new(user);
        let result = self.users().insert_one(&document).await?;

        document.id = result.inserted_id.as_object_id();
        if document.id.is_none() {
            return Err(AppError::ServiceUnavailable(
                "Database returned an unexpected inserted id".to_string(),
            ));
        }

        Ok(User::from(document))
    }

    async fn replace(&self, id: &str, user: NewUser) -> Result<User, AppError> {
        let object_id = parse_id(id)?;

        let updated = self
            .users()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": {
                    "name": user.name,
                    "email": user.email,
                    "age": user.age,
                    "address": user.address,
                } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        updated.map(User::from).ok_or_else(AppError::user_not_found)
    }

    async fn remove(&self, id: &str) -> Result<(), AppError> {
        let object_id = parse_id(id)?;
        let result = self.users().delete_one(doc! { "_id": object_id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::user_not_found());
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
