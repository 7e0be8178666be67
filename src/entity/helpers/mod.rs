use anyhow::Context;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::{favourite, people, planet, user};

/// A favourite row with its foreign keys dereferenced.
pub struct ResolvedFavourite {
    pub favourite: favourite::Model,
    pub user: Option<user::Model>,
    pub planet: Option<planet::Model>,
    pub people: Option<people::Model>,
}

pub async fn favourites_of(
    db: &DatabaseConnection,
    user_id: i32,
) -> anyhow::Result<Vec<favourite::Model>> {
    let favourites = favourite::Entity::find()
        .filter(favourite::Column::UserId.eq(user_id))
        .order_by_asc(favourite::Column::Id)
        .all(db)
        .await?;

    Ok(favourites)
}

pub async fn add_planet_favourite(
    db: &DatabaseConnection,
    user_id: i32,
    planet_id: i32,
) -> anyhow::Result<favourite::Model> {
    let link = favourite::ActiveModel {
        user_id: Set(Some(user_id)),
        planet_id: Set(Some(planet_id)),
        ..Default::default()
    };

    link.insert(db)
        .await
        .context("failed to insert planet favourite")
}

pub async fn add_people_favourite(
    db: &DatabaseConnection,
    user_id: i32,
    people_id: i32,
) -> anyhow::Result<favourite::Model> {
    let link = favourite::ActiveModel {
        user_id: Set(Some(user_id)),
        people_id: Set(Some(people_id)),
        ..Default::default()
    };

    link.insert(db)
        .await
        .context("failed to insert people favourite")
}

/// Duplicates are not ruled out by the schema; the lowest id wins so
/// repeated deletes drain them oldest-first.
pub async fn find_planet_favourite(
    db: &DatabaseConnection,
    user_id: i32,
    planet_id: i32,
) -> anyhow::Result<Option<favourite::Model>> {
    let found = favourite::Entity::find()
        .filter(favourite::Column::UserId.eq(user_id))
        .filter(favourite::Column::PlanetId.eq(planet_id))
        .order_by_asc(favourite::Column::Id)
        .one(db)
        .await?;

    Ok(found)
}

pub async fn find_people_favourite(
    db: &DatabaseConnection,
    user_id: i32,
    people_id: i32,
) -> anyhow::Result<Option<favourite::Model>> {
    let found = favourite::Entity::find()
        .filter(favourite::Column::UserId.eq(user_id))
        .filter(favourite::Column::PeopleId.eq(people_id))
        .order_by_asc(favourite::Column::Id)
        .one(db)
        .await?;

    Ok(found)
}

/// No-op when the row is already gone; callers check existence first.
pub async fn remove_favourite(db: &DatabaseConnection, favourite_id: i32) -> anyhow::Result<()> {
    favourite::Entity::delete_by_id(favourite_id)
        .exec(db)
        .await
        .context("failed to delete favourite")?;
    Ok(())
}

pub async fn resolve_favourite(
    db: &DatabaseConnection,
    favourite: favourite::Model,
) -> anyhow::Result<ResolvedFavourite> {
    // Fetch each referenced row by id rather than joining, so an unset
    // side stays None without ambiguous SQL.
    let user = match favourite.user_id {
        Some(id) => user::Entity::find_by_id(id).one(db).await?,
        None => None,
    };
    let planet = match favourite.planet_id {
        Some(id) => planet::Entity::find_by_id(id).one(db).await?,
        None => None,
    };
    let people = match favourite.people_id {
        Some(id) => people::Entity::find_by_id(id).one(db).await?,
        None => None,
    };

    Ok(ResolvedFavourite {
        favourite,
        user,
        planet,
        people,
    })
}
