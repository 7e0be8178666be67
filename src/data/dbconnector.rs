use anyhow::Context;
use log::info;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait,
    Schema, Set, Statement,
};
use std::env;

use crate::data::configuration::{Configuration, DatabaseConfig};
use crate::entity::{favourite, people, planet, user};

#[allow(async_fn_in_trait)]
pub trait HCDBConnection {
    async fn connect(&mut self) -> Result<(), anyhow::Error>;
    async fn check(&self) -> Result<(), anyhow::Error>;
    async fn close(&self) -> Result<(), anyhow::Error>;
}

pub struct SQLConnector {
    url: String,
    database_connection: Option<DatabaseConnection>,
}

impl SQLConnector {
    pub fn new(url: &str) -> Self {
        SQLConnector {
            url: url.to_string(),
            database_connection: None,
        }
    }

    /// DATABASE_URL wins when set; otherwise a file-backed SQLite store
    /// under the configured path.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        match env::var("DATABASE_URL") {
            Ok(url) => SQLConnector::new(&url),
            Err(_) => SQLConnector::new(&format!("sqlite://{}/db.sqlite?mode=rwc", config.path)),
        }
    }

    pub fn conn(&self) -> Result<&DatabaseConnection, anyhow::Error> {
        self.database_connection
            .as_ref()
            .context("database connection not established")
    }

    pub async fn is_initialized(&self) -> Result<bool, anyhow::Error> {
        let db = self.conn()?;
        let backend = db.get_database_backend();
        let sql = match backend {
            DbBackend::Sqlite => {
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'user'"
            }
            DbBackend::Postgres => {
                "SELECT tablename FROM pg_tables WHERE schemaname = current_schema() AND tablename = 'user'"
            }
            other => anyhow::bail!("unsupported database backend: {other:?}"),
        };

        let row = db
            .query_one(Statement::from_string(backend, sql.to_owned()))
            .await?;
        Ok(row.is_some())
    }

    /// Creates the four tables and inserts the configured seed rows.
    /// The favourite table goes last so its foreign keys resolve.
    pub async fn initialize(&self, config: &Configuration) -> Result<(), anyhow::Error> {
        let db = self.conn()?;
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);

        for mut statement in [
            schema.create_table_from_entity(user::Entity),
            schema.create_table_from_entity(planet::Entity),
            schema.create_table_from_entity(people::Entity),
            schema.create_table_from_entity(favourite::Entity),
        ] {
            statement.if_not_exists();
            db.execute(backend.build(&statement)).await?;
        }

        for seed in &config.seed.users {
            let record = user::ActiveModel {
                email: Set(seed.email.clone()),
                password: Set(seed.password.clone()),
                is_active: Set(seed.is_active),
                ..Default::default()
            };
            record.insert(db).await.context("failed to seed user")?;
        }
        for seed in &config.seed.people {
            let record = people::ActiveModel {
                name: Set(seed.name.clone()),
                age: Set(seed.age),
                ..Default::default()
            };
            record.insert(db).await.context("failed to seed person")?;
        }
        for seed in &config.seed.planets {
            let record = planet::ActiveModel {
                name: Set(seed.name.clone()),
                population: Set(seed.population),
                ..Default::default()
            };
            record.insert(db).await.context("failed to seed planet")?;
        }

        info!(
            "Initialized database with {} users, {} people, {} planets",
            config.seed.users.len(),
            config.seed.people.len(),
            config.seed.planets.len()
        );
        Ok(())
    }

    pub async fn get_users(&self) -> Result<Vec<user::Model>, anyhow::Error> {
        let users = user::Entity::find().all(self.conn()?).await?;
        Ok(users)
    }

    pub async fn get_user(&self, user_id: i32) -> Result<Option<user::Model>, anyhow::Error> {
        let user = user::Entity::find_by_id(user_id).one(self.conn()?).await?;
        Ok(user)
    }

    pub async fn get_people(&self) -> Result<Vec<people::Model>, anyhow::Error> {
        let all_people = people::Entity::find().all(self.conn()?).await?;
        Ok(all_people)
    }

    pub async fn get_person(&self, people_id: i32) -> Result<Option<people::Model>, anyhow::Error> {
        let person = people::Entity::find_by_id(people_id)
            .one(self.conn()?)
            .await?;
        Ok(person)
    }

    pub async fn get_planets(&self) -> Result<Vec<planet::Model>, anyhow::Error> {
        let planets = planet::Entity::find().all(self.conn()?).await?;
        Ok(planets)
    }

    pub async fn get_planet(&self, planet_id: i32) -> Result<Option<planet::Model>, anyhow::Error> {
        let planet = planet::Entity::find_by_id(planet_id)
            .one(self.conn()?)
            .await?;
        Ok(planet)
    }
}

impl HCDBConnection for SQLConnector {
    async fn connect(&mut self) -> Result<(), anyhow::Error> {
        let db = Database::connect(self.url.clone()).await?;

        self.database_connection = Some(db);
        Ok(())
    }

    async fn check(&self) -> Result<(), anyhow::Error> {
        if let Some(ref db) = self.database_connection {
            db.ping().await?;
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), anyhow::Error> {
        if let Some(ref db) = self.database_connection {
            let db = db.clone();
            db.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialization_is_detected_and_idempotent() {
        let mut config = Configuration::default();
        config.seed.users = vec![crate::data::configuration::SeedUser {
            email: "leia@rebellion.example".to_string(),
            password: "alderaan".to_string(),
            is_active: true,
        }];

        let mut connector = SQLConnector::new("sqlite::memory:");
        connector.connect().await.unwrap();
        connector.check().await.unwrap();

        assert!(!connector.is_initialized().await.unwrap());
        connector.initialize(&config).await.unwrap();
        assert!(connector.is_initialized().await.unwrap());

        let users = connector.get_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[0].email, "leia@rebellion.example");
        assert!(connector.get_user(99).await.unwrap().is_none());
    }
}
