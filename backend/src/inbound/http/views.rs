//! Request-handler capabilities and their route registration.
//!
//! Two shapes of handler are supported:
//!
//! - [`ApiView`]: one method per HTTP verb on a single path, mapped by hand
//!   with [`api_view_resource`].
//! - [`ViewSet`]: named resource actions mapped automatically to a
//!   collection path and an item path by [`register_viewset`].
//!
//! Verbs a handler does not declare are answered with `405 Method Not
//! Allowed` carrying an `Allow` header.

use actix_web::dev::Payload;
use actix_web::http::{Method, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, Resource, Route, web};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use serde_json::{Map, Value, json};

use crate::domain::{ApiResult, Error};

/// HTTP verbs a handler can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Verb {
    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// The actix method this verb matches.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }
}

/// Resource actions a [`ViewSet`] can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `GET /{prefix}/`
    List,
    /// `POST /{prefix}/`
    Create,
    /// `GET /{prefix}/{pk}/`
    Retrieve,
    /// `PUT /{prefix}/{pk}/`
    Update,
    /// `PATCH /{prefix}/{pk}/`
    PartialUpdate,
    /// `DELETE /{prefix}/{pk}/`
    Destroy,
}

impl Action {
    /// Verb the router binds this action to.
    #[must_use]
    pub const fn verb(self) -> Verb {
        match self {
            Self::List | Self::Retrieve => Verb::Get,
            Self::Create => Verb::Post,
            Self::Update => Verb::Put,
            Self::PartialUpdate => Verb::Patch,
            Self::Destroy => Verb::Delete,
        }
    }

    /// Whether the action addresses a single item (`/{prefix}/{pk}/`).
    #[must_use]
    pub const fn is_detail(self) -> bool {
        !matches!(self, Self::List | Self::Create)
    }

    /// Snake-case action name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Retrieve => "retrieve",
            Self::Update => "update",
            Self::PartialUpdate => "partial_update",
            Self::Destroy => "destroy",
        }
    }
}

/// Wire names for an `Allow` list. `HEAD` follows `GET`, which answers it.
fn allowed_names(allowed: &[Verb]) -> Vec<&'static str> {
    let mut names = Vec::with_capacity(allowed.len() + 1);
    for verb in allowed {
        names.push(verb.as_str());
        if *verb == Verb::Get {
            names.push("HEAD");
        }
    }
    names
}

fn method_not_allowed(method: &Method, allowed: &[Verb]) -> Error {
    let allowed = allowed_names(allowed);
    Error::method_not_allowed(format!("Method \"{method}\" not allowed."))
        .with_details(json!({ "allowed": allowed }))
}

/// Fallback route answering every unmatched verb with 405.
fn reject_unlisted(allowed: Vec<Verb>) -> Route {
    web::to(move |req: HttpRequest| {
        let err = method_not_allowed(req.method(), &allowed);
        async move { ApiResult::<HttpResponse>::Err(err) }
    })
}

/// Verb-dispatch handler bound to one path.
///
/// Only verbs listed in [`ApiView::ALLOWED`] are routed; the default method
/// bodies exist so implementors override just what they list.
#[async_trait(?Send)]
pub trait ApiView: 'static {
    /// Verbs routed to this view.
    const ALLOWED: &'static [Verb];

    /// Handle `GET`.
    async fn get(&self) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::GET, Self::ALLOWED))
    }

    /// Handle `POST` with a JSON body.
    async fn post(&self, _body: Value) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::POST, Self::ALLOWED))
    }

    /// Handle `PUT`.
    async fn put(&self) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::PUT, Self::ALLOWED))
    }

    /// Handle `PATCH`.
    async fn patch(&self) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::PATCH, Self::ALLOWED))
    }

    /// Handle `DELETE`.
    async fn delete(&self) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::DELETE, Self::ALLOWED))
    }
}

/// JSON request body where a request without one reads as `{}`.
///
/// Non-empty bodies go through [`web::Json`], so the app's `JsonConfig`
/// still governs content type, size limit and parse errors.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl JsonBody {
    /// The decoded payload.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

fn declares_empty_body(req: &HttpRequest) -> bool {
    let headers = req.headers();
    match headers.get(header::CONTENT_LENGTH) {
        Some(length) => length
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            == Some(0),
        None => !headers.contains_key(header::TRANSFER_ENCODING),
    }
}

impl FromRequest for JsonBody {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if declares_empty_body(req) {
            return Box::pin(async { Ok(Self(Value::Object(Map::new()))) });
        }
        let json = web::Json::<Value>::from_request(req, payload);
        Box::pin(async move { json.await.map(|body| Self(body.into_inner())) })
    }
}

async fn view_get<V: ApiView>(view: web::Data<V>) -> ApiResult<HttpResponse> {
    view.get().await
}

async fn view_post<V: ApiView>(
    view: web::Data<V>,
    body: JsonBody,
) -> ApiResult<HttpResponse> {
    view.post(body.into_inner()).await
}

async fn view_put<V: ApiView>(view: web::Data<V>) -> ApiResult<HttpResponse> {
    view.put().await
}

async fn view_patch<V: ApiView>(view: web::Data<V>) -> ApiResult<HttpResponse> {
    view.patch().await
}

async fn view_delete<V: ApiView>(view: web::Data<V>) -> ApiResult<HttpResponse> {
    view.delete().await
}

/// Build the resource serving `view` at `path`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use profiles_api::inbound::http::hello_view::{HELLO_VIEW_PATH, HelloApiView};
/// use profiles_api::inbound::http::views::api_view_resource;
///
/// let _app = App::new().service(api_view_resource(HELLO_VIEW_PATH, HelloApiView));
/// ```
pub fn api_view_resource<V: ApiView>(path: &str, view: V) -> Resource {
    let mut resource = web::resource(path).app_data(web::Data::new(view));
    for verb in V::ALLOWED {
        resource = match verb {
            Verb::Get => resource
                .route(web::get().to(view_get::<V>))
                .route(web::head().to(view_get::<V>)),
            Verb::Post => resource.route(web::post().to(view_post::<V>)),
            Verb::Put => resource.route(web::put().to(view_put::<V>)),
            Verb::Patch => resource.route(web::patch().to(view_patch::<V>)),
            Verb::Delete => resource.route(web::delete().to(view_delete::<V>)),
        };
    }
    resource.default_service(reject_unlisted(V::ALLOWED.to_vec()))
}

/// Resource-action handler mapped onto a collection and an item path.
///
/// Item actions receive the raw `{pk}` path segment.
#[async_trait(?Send)]
pub trait ViewSet: 'static {
    /// Actions the router exposes.
    const ACTIONS: &'static [Action];

    /// List the collection.
    async fn list(&self) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::GET, &[]))
    }

    /// Create an item from a JSON body.
    async fn create(&self, _body: Value) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::POST, &[]))
    }

    /// Fetch one item.
    async fn retrieve(&self, _pk: String) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::GET, &[]))
    }

    /// Replace one item.
    async fn update(&self, _pk: String) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::PUT, &[]))
    }

    /// Modify part of one item.
    async fn partial_update(&self, _pk: String) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::PATCH, &[]))
    }

    /// Remove one item.
    async fn destroy(&self, _pk: String) -> ApiResult<HttpResponse> {
        Err(method_not_allowed(&Method::DELETE, &[]))
    }
}

async fn viewset_list<V: ViewSet>(viewset: web::Data<V>) -> ApiResult<HttpResponse> {
    viewset.list().await
}

async fn viewset_create<V: ViewSet>(
    viewset: web::Data<V>,
    body: JsonBody,
) -> ApiResult<HttpResponse> {
    viewset.create(body.into_inner()).await
}

async fn viewset_retrieve<V: ViewSet>(
    viewset: web::Data<V>,
    pk: web::Path<String>,
) -> ApiResult<HttpResponse> {
    viewset.retrieve(pk.into_inner()).await
}

async fn viewset_update<V: ViewSet>(
    viewset: web::Data<V>,
    pk: web::Path<String>,
) -> ApiResult<HttpResponse> {
    viewset.update(pk.into_inner()).await
}

async fn viewset_partial_update<V: ViewSet>(
    viewset: web::Data<V>,
    pk: web::Path<String>,
) -> ApiResult<HttpResponse> {
    viewset.partial_update(pk.into_inner()).await
}

async fn viewset_destroy<V: ViewSet>(
    viewset: web::Data<V>,
    pk: web::Path<String>,
) -> ApiResult<HttpResponse> {
    viewset.destroy(pk.into_inner()).await
}

/// Collection path for a router prefix: `/{prefix}/`.
#[must_use]
pub fn collection_path(prefix: &str) -> String {
    format!("/{}/", prefix.trim_matches('/'))
}

/// Item path for a router prefix: `/{prefix}/{pk}/`.
#[must_use]
pub fn detail_path(prefix: &str) -> String {
    format!("/{}/{{pk}}/", prefix.trim_matches('/'))
}

/// Register `viewset` under `prefix`, deriving the collection and item
/// routes from [`ViewSet::ACTIONS`].
pub fn register_viewset<V: ViewSet>(cfg: &mut web::ServiceConfig, prefix: &str, viewset: V) {
    let data = web::Data::new(viewset);
    let mut collection = web::resource(collection_path(prefix)).app_data(data.clone());
    let mut detail = web::resource(detail_path(prefix)).app_data(data);
    let mut collection_verbs = Vec::new();
    let mut detail_verbs = Vec::new();

    for action in V::ACTIONS {
        match action {
            Action::List => {
                collection = collection
                    .route(web::get().to(viewset_list::<V>))
                    .route(web::head().to(viewset_list::<V>));
            }
            Action::Create => collection = collection.route(web::post().to(viewset_create::<V>)),
            Action::Retrieve => {
                detail = detail
                    .route(web::get().to(viewset_retrieve::<V>))
                    .route(web::head().to(viewset_retrieve::<V>));
            }
            Action::Update => detail = detail.route(web::put().to(viewset_update::<V>)),
            Action::PartialUpdate => {
                detail = detail.route(web::patch().to(viewset_partial_update::<V>));
            }
            Action::Destroy => detail = detail.route(web::delete().to(viewset_destroy::<V>)),
        }
        if action.is_detail() {
            detail_verbs.push(action.verb());
        } else {
            collection_verbs.push(action.verb());
        }
    }

    cfg.service(collection.default_service(reject_unlisted(collection_verbs)))
        .service(detail.default_service(reject_unlisted(detail_verbs)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::App;
    use actix_web::test as actix_test;
    use rstest::rstest;

    struct GetOnly;

    #[async_trait(?Send)]
    impl ApiView for GetOnly {
        const ALLOWED: &'static [Verb] = &[Verb::Get];

        async fn get(&self) -> ApiResult<HttpResponse> {
            Ok(HttpResponse::Ok().finish())
        }
    }

    struct ListOnly;

    #[async_trait(?Send)]
    impl ViewSet for ListOnly {
        const ACTIONS: &'static [Action] = &[Action::List, Action::Retrieve];

        async fn list(&self) -> ApiResult<HttpResponse> {
            Ok(HttpResponse::Ok().body("list"))
        }

        async fn retrieve(&self, pk: String) -> ApiResult<HttpResponse> {
            Ok(HttpResponse::Ok().body(pk))
        }
    }

    #[rstest]
    #[case("/things/", "/things/")]
    #[case("things", "/things/")]
    #[case("/things", "/things/")]
    fn collection_path_normalises_slashes(#[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(collection_path(prefix), expected);
    }

    #[rstest]
    fn detail_path_appends_pk_segment() {
        assert_eq!(detail_path("things"), "/things/{pk}/");
    }

    #[rstest]
    #[case(Action::List, Verb::Get, false)]
    #[case(Action::Create, Verb::Post, false)]
    #[case(Action::Retrieve, Verb::Get, true)]
    #[case(Action::Update, Verb::Put, true)]
    #[case(Action::PartialUpdate, Verb::Patch, true)]
    #[case(Action::Destroy, Verb::Delete, true)]
    fn actions_bind_to_verbs(#[case] action: Action, #[case] verb: Verb, #[case] detail: bool) {
        assert_eq!(action.verb(), verb);
        assert_eq!(action.is_detail(), detail);
    }

    #[actix_web::test]
    async fn unlisted_verb_on_view_is_rejected_with_allow_header() {
        let app =
            actix_test::init_service(App::new().service(api_view_resource("/only/", GetOnly)))
                .await;

        let ok = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/only/").to_request(),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri("/only/").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            res.headers()
                .get(header::ALLOW)
                .and_then(|value| value.to_str().ok()),
            Some("GET, HEAD")
        );
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "method_not_allowed");
        assert_eq!(body["message"], "Method \"DELETE\" not allowed.");
    }

    #[actix_web::test]
    async fn head_is_answered_wherever_get_is() {
        let app = actix_test::init_service(
            App::new()
                .service(api_view_resource("/only/", GetOnly))
                .configure(|cfg| register_viewset(cfg, "things", ListOnly)),
        )
        .await;

        for uri in ["/only/", "/things/", "/things/42/"] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::default()
                    .method(Method::HEAD)
                    .uri(uri)
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK, "HEAD {uri}");
        }
    }

    #[rstest]
    #[case(Vec::new(), Vec::new())]
    #[case(vec![Verb::Get], vec!["GET", "HEAD"])]
    #[case(vec![Verb::Post, Verb::Get, Verb::Delete], vec!["POST", "GET", "HEAD", "DELETE"])]
    fn allow_lists_head_after_get(#[case] verbs: Vec<Verb>, #[case] expected: Vec<&str>) {
        assert_eq!(allowed_names(&verbs), expected);
    }

    struct EchoBody;

    #[async_trait(?Send)]
    impl ApiView for EchoBody {
        const ALLOWED: &'static [Verb] = &[Verb::Post];

        async fn post(&self, body: Value) -> ApiResult<HttpResponse> {
            Ok(HttpResponse::Ok().json(body))
        }
    }

    #[actix_web::test]
    async fn missing_body_reads_as_empty_object() {
        let app =
            actix_test::init_service(App::new().service(api_view_resource("/echo/", EchoBody)))
                .await;

        for req in [
            actix_test::TestRequest::post().uri("/echo/"),
            actix_test::TestRequest::post()
                .uri("/echo/")
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload(""),
        ] {
            let res = actix_test::call_service(&app, req.to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            let body: Value = actix_test::read_body_json(res).await;
            assert_eq!(body, json!({}));
        }
    }

    #[actix_web::test]
    async fn present_body_is_decoded_as_json() {
        let app =
            actix_test::init_service(App::new().service(api_view_resource("/echo/", EchoBody)))
                .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/echo/")
                .set_json(json!({ "name": "Sam" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, json!({ "name": "Sam" }));
    }

    #[actix_web::test]
    async fn viewset_router_derives_collection_and_item_routes() {
        let app = actix_test::init_service(
            App::new().configure(|cfg| register_viewset(cfg, "things", ListOnly)),
        )
        .await;

        let list = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/things/").to_request(),
        )
        .await;
        assert_eq!(actix_test::read_body(list).await, "list");

        let item = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/things/42/").to_request(),
        )
        .await;
        assert_eq!(actix_test::read_body(item).await, "42");

        let create = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/things/").to_request(),
        )
        .await;
        assert_eq!(create.status(), StatusCode::METHOD_NOT_ALLOWED);

        let destroy = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri("/things/42/").to_request(),
        )
        .await;
        assert_eq!(destroy.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
