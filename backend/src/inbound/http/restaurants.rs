//! Restaurant guide endpoints. Reads are open to any supporter; edits are
//! restricted to administrators.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Restaurant, RestaurantDraft, RestaurantId, RestaurantPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser};
use crate::inbound::http::state::HttpState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RestaurantListQuery {
    /// Exact area name, e.g. `Kokura`.
    pub area: Option<String>,
    /// Exact genre, e.g. `Izakaya`.
    pub genre: Option<String>,
}

/// Body for `POST /restaurants`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub area: String,
    pub genre: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl TryFrom<CreateRestaurantRequest> for RestaurantDraft {
    type Error = Error;

    fn try_from(value: CreateRestaurantRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.name,
            &value.area,
            &value.genre,
            value.address.as_deref(),
            value.description.as_deref(),
            value.url.as_deref(),
        )
    }
}

/// Body for `PUT /restaurants/{restaurantId}`. Absent fields are left
/// unchanged; an empty `address`, `description` or `url` clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub area: Option<String>,
    pub genre: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl TryFrom<UpdateRestaurantRequest> for RestaurantPatch {
    type Error = Error;

    fn try_from(value: UpdateRestaurantRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.name.as_deref(),
            value.area.as_deref(),
            value.genre.as_deref(),
            value.address.as_deref(),
            value.description.as_deref(),
            value.url.as_deref(),
        )
    }
}

fn restaurant_id(path: web::Path<String>) -> Result<RestaurantId, Error> {
    RestaurantId::new(path.into_inner())
}

#[utoipa::path(
    get,
    path = "/restaurants",
    params(RestaurantListQuery),
    responses((status = 200, description = "Restaurants sorted by name", body = [Restaurant])),
    tags = ["restaurants"],
    operation_id = "listRestaurants"
)]
#[get("/restaurants")]
pub async fn list_restaurants(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    query: web::Query<RestaurantListQuery>,
) -> ApiResult<web::Json<Vec<Restaurant>>> {
    let restaurants = state
        .restaurants
        .list(query.area.as_deref(), query.genre.as_deref())
        .await?;
    Ok(web::Json(restaurants))
}

#[utoipa::path(
    get,
    path = "/restaurants/{restaurantId}",
    params(("restaurantId" = String, Path, description = "Restaurant identifier")),
    responses(
        (status = 200, description = "Restaurant", body = Restaurant),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "getRestaurant"
)]
#[get("/restaurants/{restaurant_id}")]
pub async fn get_restaurant(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Restaurant>> {
    Ok(web::Json(state.restaurants.get(&restaurant_id(path)?).await?))
}

#[utoipa::path(
    post,
    path = "/restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant added", body = Restaurant),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "createRestaurant"
)]
#[post("/restaurants")]
pub async fn create_restaurant(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    payload: web::Json<CreateRestaurantRequest>,
) -> ApiResult<web::Json<Restaurant>> {
    let draft = RestaurantDraft::try_from(payload.into_inner())?;
    Ok(web::Json(state.restaurants.create(draft).await?))
}

#[utoipa::path(
    put,
    path = "/restaurants/{restaurantId}",
    params(("restaurantId" = String, Path, description = "Restaurant identifier")),
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, description = "Updated restaurant", body = Restaurant),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "updateRestaurant"
)]
#[put("/restaurants/{restaurant_id}")]
pub async fn update_restaurant(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<UpdateRestaurantRequest>,
) -> ApiResult<web::Json<Restaurant>> {
    let id = restaurant_id(path)?;
    let patch = RestaurantPatch::try_from(payload.into_inner())?;
    Ok(web::Json(state.restaurants.update(&id, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{restaurantId}",
    params(("restaurantId" = String, Path, description = "Restaurant identifier")),
    responses(
        (status = 204, description = "Restaurant removed"),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "deleteRestaurant"
)]
#[delete("/restaurants/{restaurant_id}")]
pub async fn delete_restaurant(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.restaurants.delete(&restaurant_id(path)?).await?;
    Ok(HttpResponse::NoContent().finish())
}
