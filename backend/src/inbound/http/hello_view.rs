//! `/api/hello-view/`: a verb-dispatch demonstration endpoint.

use actix_web::HttpResponse;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{ApiResult, Error, HelloValidator, Validator};

use super::views::{ApiView, Verb};

/// Path of the view relative to the `/api` scope.
pub const HELLO_VIEW_PATH: &str = "/hello-view/";

const FEATURES: [&str; 4] = [
    "Uses HTTP methods as functions (get, post, patch, put, delete)",
    "Is similar to a traditional Django view",
    "Gives you the most control over your application logic",
    "Is mapped manually to URLs",
];

/// `GET` response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct HelloViewResponse {
    /// Always `Hello world`.
    #[schema(example = "Hello world")]
    pub message: String,
    /// Features of a verb-dispatch view.
    #[serde(rename = "an-apiview")]
    pub features: Vec<String>,
}

/// Greeting returned for a valid name.
#[derive(Debug, Serialize, ToSchema)]
pub struct GreetingResponse {
    /// `Hello <name>`.
    #[schema(example = "Hello Sam")]
    pub message: String,
}

/// Echo of the verb a placeholder handler received.
#[derive(Debug, Serialize, ToSchema)]
pub struct MethodEchoResponse {
    /// Upper-case verb name.
    #[schema(example = "PUT")]
    pub method: String,
}

/// Validate a greeting body and answer with `Hello <name>`.
pub(crate) fn greet(body: &Value) -> ApiResult<HttpResponse> {
    let name = HelloValidator.validate(body).map_err(|errors| {
        debug!(?errors, "greeting rejected");
        Error::from(errors)
    })?;
    Ok(HttpResponse::Ok().json(GreetingResponse {
        message: name.greeting(),
    }))
}

fn echo(verb: Verb) -> HttpResponse {
    HttpResponse::Ok().json(MethodEchoResponse {
        method: verb.as_str().to_owned(),
    })
}

/// Test view answering every CRUD verb.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelloApiView;

#[async_trait(?Send)]
impl ApiView for HelloApiView {
    const ALLOWED: &'static [Verb] = &[Verb::Get, Verb::Post, Verb::Put, Verb::Patch, Verb::Delete];

    async fn get(&self) -> ApiResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(HelloViewResponse {
            message: "Hello world".to_owned(),
            features: FEATURES.map(str::to_owned).to_vec(),
        }))
    }

    async fn post(&self, body: Value) -> ApiResult<HttpResponse> {
        greet(&body)
    }

    async fn put(&self) -> ApiResult<HttpResponse> {
        Ok(echo(Verb::Put))
    }

    async fn patch(&self) -> ApiResult<HttpResponse> {
        Ok(echo(Verb::Patch))
    }

    async fn delete(&self) -> ApiResult<HttpResponse> {
        Ok(echo(Verb::Delete))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::views::api_view_resource;
    use actix_web::http::StatusCode;
    use actix_web::App;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    #[actix_web::test]
    async fn get_lists_features() {
        let app = actix_test::init_service(
            App::new().service(api_view_resource(HELLO_VIEW_PATH, HelloApiView)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(HELLO_VIEW_PATH).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "Hello world");
        assert_eq!(body["an-apiview"].as_array().map(Vec::len), Some(FEATURES.len()));
    }

    #[rstest]
    #[case(actix_test::TestRequest::put(), "PUT")]
    #[case(actix_test::TestRequest::patch(), "PATCH")]
    #[case(actix_test::TestRequest::delete(), "DELETE")]
    #[actix_web::test]
    async fn placeholder_verbs_echo_their_method(
        #[case] request: actix_test::TestRequest,
        #[case] expected: &str,
    ) {
        let app = actix_test::init_service(
            App::new().service(api_view_resource(HELLO_VIEW_PATH, HelloApiView)),
        )
        .await;

        let res = actix_test::call_service(&app, request.uri(HELLO_VIEW_PATH).to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, json!({ "method": expected }));
    }

    #[rstest]
    fn greet_rejects_long_names_with_field_errors() {
        let err = greet(&json!({ "name": "abcdefghijk" })).expect_err("too long");
        let details = err.details().expect("details");
        assert_eq!(details["fields"]["name"][0]["code"], "max_length");
    }
}
