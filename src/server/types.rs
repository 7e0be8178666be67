use serde::{Deserialize, Serialize};

use crate::entity::helpers::ResolvedFavourite;
use crate::entity::{people, planet, user};

#[derive(Debug, Deserialize)]
pub struct FavouriteRequest {
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
}

// password and is_active stay internal
impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        UserResponse {
            id: model.id,
            email: model.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanetResponse {
    pub id: i32,
    pub name: String,
    pub population: Option<i64>,
}

impl From<planet::Model> for PlanetResponse {
    fn from(model: planet::Model) -> Self {
        PlanetResponse {
            id: model.id,
            name: model.name,
            population: model.population,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PeopleResponse {
    pub id: i32,
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl From<people::Model> for PeopleResponse {
    fn from(model: people::Model) -> Self {
        PeopleResponse {
            id: model.id,
            name: model.name,
            age: model.age,
        }
    }
}

/// Unset sides serialize as JSON null.
#[derive(Debug, Serialize)]
pub struct FavouriteResponse {
    pub id: i32,
    pub user: Option<UserResponse>,
    pub planet: Option<PlanetResponse>,
    pub people: Option<PeopleResponse>,
}

impl From<ResolvedFavourite> for FavouriteResponse {
    fn from(resolved: ResolvedFavourite) -> Self {
        FavouriteResponse {
            id: resolved.favourite.id,
            user: resolved.user.map(UserResponse::from),
            planet: resolved.planet.map(PlanetResponse::from),
            people: resolved.people.map(PeopleResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::favourite;

    #[test]
    fn user_serialization_omits_credentials() {
        let response = UserResponse::from(user::Model {
            id: 1,
            email: "luke@rebellion.example".to_string(),
            password: "red5".to_string(),
            is_active: true,
        });

        let value = serde_json::to_value(&response).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["id"], 1);
        assert_eq!(object["email"], "luke@rebellion.example");
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("is_active"));
    }

    #[test]
    fn favourite_serialization_keeps_unset_sides_null() {
        let resolved = ResolvedFavourite {
            favourite: favourite::Model {
                id: 7,
                user_id: Some(1),
                planet_id: Some(3),
                people_id: None,
            },
            user: Some(user::Model {
                id: 1,
                email: "luke@rebellion.example".to_string(),
                password: "red5".to_string(),
                is_active: true,
            }),
            planet: Some(planet::Model {
                id: 3,
                name: "Dagobah".to_string(),
                population: None,
            }),
            people: None,
        };

        let value = serde_json::to_value(FavouriteResponse::from(resolved)).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["planet"]["name"], "Dagobah");
        assert_eq!(value["user"]["email"], "luke@rebellion.example");
        assert!(value["people"].is_null());
    }
}
