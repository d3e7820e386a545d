//! `/api/hello-viewset/`: a resource-action demonstration endpoint.

use actix_web::HttpResponse;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ApiResult;

use super::hello_view::greet;
use super::views::{Action, ViewSet};

/// Router prefix of the viewset inside the `/api` scope.
pub const HELLO_VIEWSET_PREFIX: &str = "hello-viewset";

const FEATURES: [&str; 3] = [
    "Uses actions (list, create, retrieve, update, partial_update, destroy)",
    "Automatically maps to URLs using Routers",
    "Provides more functionality with less code",
];

/// `list` response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct HelloViewSetResponse {
    /// Always `Hello!`.
    #[schema(example = "Hello!")]
    pub message: String,
    /// Features of a resource-action handler.
    pub a_viewset: Vec<String>,
}

/// Echo of the verb an item action received.
#[derive(Debug, Serialize, ToSchema)]
pub struct HttpMethodEchoResponse {
    /// Upper-case verb name.
    #[schema(example = "GET")]
    pub http_method: String,
}

fn echo(action: Action) -> HttpResponse {
    HttpResponse::Ok().json(HttpMethodEchoResponse {
        http_method: action.verb().as_str().to_owned(),
    })
}

/// Test viewset exposing every standard action.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelloViewSet;

#[async_trait(?Send)]
impl ViewSet for HelloViewSet {
    const ACTIONS: &'static [Action] = &[
        Action::List,
        Action::Create,
        Action::Retrieve,
        Action::Update,
        Action::PartialUpdate,
        Action::Destroy,
    ];

    async fn list(&self) -> ApiResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(HelloViewSetResponse {
            message: "Hello!".to_owned(),
            a_viewset: FEATURES.map(str::to_owned).to_vec(),
        }))
    }

    async fn create(&self, body: Value) -> ApiResult<HttpResponse> {
        greet(&body)
    }

    async fn retrieve(&self, _pk: String) -> ApiResult<HttpResponse> {
        Ok(echo(Action::Retrieve))
    }

    async fn update(&self, _pk: String) -> ApiResult<HttpResponse> {
        Ok(echo(Action::Update))
    }

    async fn partial_update(&self, _pk: String) -> ApiResult<HttpResponse> {
        Ok(echo(Action::PartialUpdate))
    }

    async fn destroy(&self, _pk: String) -> ApiResult<HttpResponse> {
        Ok(echo(Action::Destroy))
    }
}
