use crate::data::configuration::Configuration;
use crate::data::dbconnector::SQLConnector;
use crate::entity::helpers;
use crate::server::error::ApiError;
use crate::server::types::{
    FavouriteRequest, FavouriteResponse, MessageResponse, PeopleResponse, PlanetResponse,
    UserResponse,
};
pub mod error;
pub(crate) mod types;
use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::routing::{delete, get, post};
use axum::{extract::State, http::StatusCode, Json, Router};
use log::debug;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct ServerConfig {
    pub database_connection: Arc<SQLConnector>,
}

/// The route table; `sitemap` renders it, `app` must stay in sync.
const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/users"),
    ("GET", "/user/{id}"),
    ("GET", "/users/favourites"),
    ("GET", "/people"),
    ("GET", "/people/{id}"),
    ("GET", "/planets"),
    ("GET", "/planets/{id}"),
    ("POST", "/favourite/planet/{id}"),
    ("DELETE", "/favourite/planet/{id}"),
    ("POST", "/favourite/people/{id}"),
    ("DELETE", "/favourite/people/{id}"),
];

pub fn app(state: ServerConfig) -> Router {
    Router::new()
        .route("/", get(sitemap))
        .route("/users", get(list_users))
        .route("/user/{id}", get(get_user))
        .route("/users/favourites", get(list_favourites))
        .route("/people", get(list_people))
        .route("/people/{id}", get(get_person))
        .route("/planets", get(list_planets))
        .route("/planets/{id}", get(get_planet))
        .route("/favourite/planet/{id}", post(add_favourite_planet))
        .route("/favourite/planet/{id}", delete(delete_favourite_planet))
        .route("/favourite/people/{id}", post(add_favourite_people))
        .route("/favourite/people/{id}", delete(delete_favourite_people))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(_config: Configuration, database_connection: SQLConnector, port: u16) {
    debug!("Starting server on port {}", port);

    let shared_db = Arc::new(database_connection);

    let app = app(ServerConfig {
        database_connection: shared_db,
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .unwrap();

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}

async fn sitemap() -> Json<Vec<String>> {
    Json(
        ENDPOINTS
            .iter()
            .map(|(method, path)| format!("{method} {path}"))
            .collect(),
    )
}

async fn list_users(
    State(state): State<ServerConfig>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.database_connection.get_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn get_user(
    State(state): State<ServerConfig>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    match state.database_connection.get_user(user_id).await? {
        Some(user) => Ok(Json(user.into())),
        None => Err(ApiError::NotFound("User")),
    }
}

async fn list_people(
    State(state): State<ServerConfig>,
) -> Result<Json<Vec<PeopleResponse>>, ApiError> {
    let all_people = state.database_connection.get_people().await?;
    Ok(Json(
        all_people.into_iter().map(PeopleResponse::from).collect(),
    ))
}

async fn get_person(
    State(state): State<ServerConfig>,
    Path(people_id): Path<i32>,
) -> Result<Json<PeopleResponse>, ApiError> {
    match state.database_connection.get_person(people_id).await? {
        Some(person) => Ok(Json(person.into())),
        None => Err(ApiError::NotFound("Person")),
    }
}

async fn list_planets(
    State(state): State<ServerConfig>,
) -> Result<Json<Vec<PlanetResponse>>, ApiError> {
    let planets = state.database_connection.get_planets().await?;
    Ok(Json(planets.into_iter().map(PlanetResponse::from).collect()))
}

async fn get_planet(
    State(state): State<ServerConfig>,
    Path(planet_id): Path<i32>,
) -> Result<Json<PlanetResponse>, ApiError> {
    match state.database_connection.get_planet(planet_id).await? {
        Some(planet) => Ok(Json(planet.into())),
        None => Err(ApiError::NotFound("Planet")),
    }
}

/// Pulls `user_id` out of the request body; anything short of a JSON
/// body carrying the field is the caller's fault.
fn required_user_id(
    body: Result<Json<FavouriteRequest>, JsonRejection>,
) -> Result<i32, ApiError> {
    body.ok()
        .and_then(|Json(request)| request.user_id)
        .ok_or(ApiError::UserIdRequired)
}

async fn list_favourites(
    State(state): State<ServerConfig>,
    body: Result<Json<FavouriteRequest>, JsonRejection>,
) -> Result<Json<Vec<FavouriteResponse>>, ApiError> {
    let user_id = required_user_id(body)?;
    state
        .database_connection
        .get_user(user_id)
        .await?
        .ok_or(ApiError::UserMissing)?;

    let db = state.database_connection.conn()?;
    let favourites = helpers::favourites_of(db, user_id).await?;
    // A user with nothing favourited gets a 404, not an empty list.
    if favourites.is_empty() {
        return Err(ApiError::NoFavourites);
    }

    let mut responses = Vec::with_capacity(favourites.len());
    for favourite in favourites {
        let resolved = helpers::resolve_favourite(db, favourite).await?;
        responses.push(resolved.into());
    }
    Ok(Json(responses))
}

async fn add_favourite_planet(
    State(state): State<ServerConfig>,
    Path(planet_id): Path<i32>,
    body: Result<Json<FavouriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FavouriteResponse>), ApiError> {
    let user_id = required_user_id(body)?;
    let user = state
        .database_connection
        .get_user(user_id)
        .await?
        .ok_or(ApiError::UserMissing)?;
    let planet = state
        .database_connection
        .get_planet(planet_id)
        .await?
        .ok_or(ApiError::PlanetMissing)?;

    let db = state.database_connection.conn()?;
    let favourite = helpers::add_planet_favourite(db, user.id, planet.id).await?;
    debug!("User {} favourited planet {}", user.id, planet.id);

    let resolved = helpers::resolve_favourite(db, favourite).await?;
    Ok((StatusCode::CREATED, Json(resolved.into())))
}

async fn delete_favourite_planet(
    State(state): State<ServerConfig>,
    Path(planet_id): Path<i32>,
    body: Result<Json<FavouriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let user_id = required_user_id(body)?;
    let user = state
        .database_connection
        .get_user(user_id)
        .await?
        .ok_or(ApiError::UserMissing)?;
    let planet = state
        .database_connection
        .get_planet(planet_id)
        .await?
        .ok_or(ApiError::PlanetMissing)?;

    let db = state.database_connection.conn()?;
    let favourite = helpers::find_planet_favourite(db, user.id, planet.id)
        .await?
        .ok_or(ApiError::FavouriteMissing)?;
    helpers::remove_favourite(db, favourite.id).await?;
    debug!("User {} unfavourited planet {}", user.id, planet.id);

    // 201 on delete is part of the legacy contract
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            msg: "Favourite successfully deleted".to_string(),
        }),
    ))
}

async fn add_favourite_people(
    State(state): State<ServerConfig>,
    Path(people_id): Path<i32>,
    body: Result<Json<FavouriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FavouriteResponse>), ApiError> {
    let user_id = required_user_id(body)?;
    let user = state
        .database_connection
        .get_user(user_id)
        .await?
        .ok_or(ApiError::UserMissing)?;
    let person = state
        .database_connection
        .get_person(people_id)
        .await?
        .ok_or(ApiError::PeopleMissing)?;

    let db = state.database_connection.conn()?;
    let favourite = helpers::add_people_favourite(db, user.id, person.id).await?;
    debug!("User {} favourited person {}", user.id, person.id);

    let resolved = helpers::resolve_favourite(db, favourite).await?;
    Ok((StatusCode::CREATED, Json(resolved.into())))
}

async fn delete_favourite_people(
    State(state): State<ServerConfig>,
    Path(people_id): Path<i32>,
    body: Result<Json<FavouriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let user_id = required_user_id(body)?;
    let user = state
        .database_connection
        .get_user(user_id)
        .await?
        .ok_or(ApiError::UserMissing)?;
    let person = state
        .database_connection
        .get_person(people_id)
        .await?
        .ok_or(ApiError::PeopleMissing)?;

    let db = state.database_connection.conn()?;
    let favourite = helpers::find_people_favourite(db, user.id, person.id)
        .await?
        .ok_or(ApiError::FavouriteMissing)?;
    helpers::remove_favourite(db, favourite.id).await?;
    debug!("User {} unfavourited person {}", user.id, person.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            msg: "Favourite successfully deleted".to_string(),
        }),
    ))
}
