use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Default, Debug)]
pub struct Configuration {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedData,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = std::fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&config)?;
        Ok(cfg)
    }
}

#[derive(Deserialize, Serialize, Default, Debug)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Rows inserted on first run. There are no creation endpoints for
/// users, people or planets; this is the only way they enter the store.
#[derive(Deserialize, Serialize, Default, Debug)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub people: Vec<SeedPerson>,
    #[serde(default)]
    pub planets: Vec<SeedPlanet>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Deserialize, Serialize, Default, Debug)]
pub struct SeedPerson {
    pub name: Option<String>,
    pub age: Option<i32>,
}

#[derive(Deserialize, Serialize, Default, Debug)]
pub struct SeedPlanet {
    pub name: String,
    pub population: Option<i64>,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seed_lists_and_defaults_is_active() {
        let raw = r#"
            [database]
            path = "/tmp/holocron"

            [[seed.users]]
            email = "luke@rebellion.example"
            password = "red5"

            [[seed.people]]
            name = "Leia Organa"
            age = 23

            [[seed.planets]]
            name = "Hoth"
        "#;

        let config: Configuration = toml::from_str(raw).unwrap();
        assert_eq!(config.database.path, "/tmp/holocron");
        assert_eq!(config.seed.users.len(), 1);
        assert!(config.seed.users[0].is_active);
        assert_eq!(config.seed.people[0].age, Some(23));
        assert_eq!(config.seed.planets[0].population, None);
    }

    #[test]
    fn seed_section_is_optional() {
        let config: Configuration = toml::from_str("[database]\npath = \".\"").unwrap();
        assert!(config.seed.users.is_empty());
        assert!(config.seed.planets.is_empty());
    }
}
