//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod hello_view;
pub mod hello_viewset;
pub mod schemas;
pub mod views;

use actix_web::web;

pub use error::ApiResult;

use self::error::json_error_handler;
use self::hello_view::{HELLO_VIEW_PATH, HelloApiView};
use self::hello_viewset::{HELLO_VIEWSET_PREFIX, HelloViewSet};
use self::views::{api_view_resource, register_viewset};

/// Scope every API route is mounted under.
pub const API_SCOPE: &str = "/api";

/// JSON body limits and error mapping shared by every API route.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .content_type_required(false)
        .error_handler(json_error_handler)
}

/// Mount the API scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use profiles_api::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_SCOPE)
            .app_data(json_config())
            .service(api_view_resource(HELLO_VIEW_PATH, HelloApiView))
            .configure(|scope| register_viewset(scope, HELLO_VIEWSET_PREFIX, HelloViewSet)),
    );
}
