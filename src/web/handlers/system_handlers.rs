// src/web/handlers/system_handlers.rs

use crate::core::ServerSettings;
use crate::share::{contact_links, ContactLinks};
use crate::site::SiteRoute;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{debug, info};

fn entry(route: SiteRoute) -> RouteEntry {
    RouteEntry {
        title: route.title().to_string(),
        path: route.path(),
    }
}

pub async fn site_map_handler() -> Json<DataResponse<SiteMap>> {
    Json(DataResponse::success(
        "Site navigation".to_string(),
        SiteMap {
            navigation: SiteRoute::navigation().into_iter().map(entry).collect(),
            footer: SiteRoute::footer().into_iter().map(entry).collect(),
        },
    ))
}

pub async fn resolve_route_handler(path: String) -> Json<DataResponse<SiteRoute>> {
    let route = SiteRoute::parse(&path);
    debug!("Resolved {} -> {:?}", path, route);
    Json(DataResponse::success(route.title().to_string(), route))
}

pub async fn contact_handler(settings: &State<ServerSettings>) -> Json<DataResponse<ContactLinks>> {
    Json(DataResponse::success(
        "Contact our recruiters".to_string(),
        contact_links(&settings.contact_email, &settings.contact_phone),
    ))
}

pub async fn health_handler() -> Json<TextResponse> {
    info!("Health check");
    Json(TextResponse::success("OK".to_string()))
}
