//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] combines the macro-documented probes with operations derived
//! from the registered [`ApiView`] and [`ViewSet`] handlers, so the document
//! always lists exactly the verbs the router answers.
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::path::{
    HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder,
};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::response::ResponseBuilder;
use utoipa::openapi::schema::{ObjectBuilder, Schema, SchemaType, Type};
use utoipa::openapi::{ContentBuilder, Ref, RefOr, Required};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::inbound::http::API_SCOPE;
use crate::inbound::http::hello_view::{
    GreetingResponse, HELLO_VIEW_PATH, HelloApiView, HelloViewResponse, MethodEchoResponse,
};
use crate::inbound::http::hello_viewset::{
    HELLO_VIEWSET_PREFIX, HelloViewSet, HelloViewSetResponse, HttpMethodEchoResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, GreetingRequestSchema};
use crate::inbound::http::views::{Action, ApiView, Verb, ViewSet, collection_path, detail_path};

const JSON: &str = "application/json";

fn schema_ref<T: ToSchema>() -> RefOr<Schema> {
    RefOr::Ref(Ref::new(format!("#/components/schemas/{}", T::name())))
}

fn json_response(description: &str, schema: RefOr<Schema>) -> RefOr<utoipa::openapi::Response> {
    RefOr::T(
        ResponseBuilder::new()
            .description(description)
            .content(JSON, ContentBuilder::new().schema(Some(schema)).build())
            .build(),
    )
}

fn http_method(verb: Verb) -> HttpMethod {
    match verb {
        Verb::Get => HttpMethod::Get,
        Verb::Post => HttpMethod::Post,
        Verb::Put => HttpMethod::Put,
        Verb::Patch => HttpMethod::Patch,
        Verb::Delete => HttpMethod::Delete,
    }
}

/// Operation for one routed verb. `greets` marks handlers that validate a
/// greeting body.
fn operation(tag: &str, operation_id: String, success: RefOr<Schema>, greets: bool) -> Operation {
    let mut builder = OperationBuilder::new()
        .tag(tag)
        .operation_id(Some(operation_id))
        .response("200", json_response("Success", success))
        .response(
            "405",
            json_response("Verb not answered on this path", schema_ref::<ErrorSchema>()),
        );
    if greets {
        builder = builder
            .request_body(Some(
                RequestBodyBuilder::new()
                    .content(
                        JSON,
                        ContentBuilder::new()
                            .schema(Some(schema_ref::<GreetingRequestSchema>()))
                            .build(),
                    )
                    .required(Some(Required::True))
                    .build(),
            ))
            .response(
                "400",
                json_response("Greeting failed validation", schema_ref::<ErrorSchema>()),
            );
    }
    builder.build()
}

fn pk_parameter() -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name("pk")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(Schema::Object(
            ObjectBuilder::new()
                .schema_type(SchemaType::Type(Type::String))
                .build(),
        )))
        .build()
}

/// Adds the hello endpoints, derived from the handlers' routed verbs.
struct HelloPaths;

impl HelloPaths {
    fn view_operation(verb: Verb) -> Operation {
        let success = match verb {
            Verb::Get => schema_ref::<HelloViewResponse>(),
            Verb::Post => schema_ref::<GreetingResponse>(),
            Verb::Put | Verb::Patch | Verb::Delete => schema_ref::<MethodEchoResponse>(),
        };
        let id = format!("hello_view_{}", verb.as_str().to_lowercase());
        operation("hello-view", id, success, verb == Verb::Post)
    }

    fn viewset_operation(action: Action) -> Operation {
        let success = match action {
            Action::List => schema_ref::<HelloViewSetResponse>(),
            Action::Create => schema_ref::<GreetingResponse>(),
            Action::Retrieve | Action::Update | Action::PartialUpdate | Action::Destroy => {
                schema_ref::<HttpMethodEchoResponse>()
            }
        };
        let id = format!("hello_viewset_{}", action.name());
        let mut op = operation("hello-viewset", id, success, action == Action::Create);
        if action.is_detail() {
            op.parameters.get_or_insert_with(Vec::new).push(pk_parameter());
        }
        op
    }
}

impl Modify for HelloPaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut view = PathItemBuilder::new();
        for verb in HelloApiView::ALLOWED {
            view = view.operation(http_method(*verb), Self::view_operation(*verb));
        }
        openapi
            .paths
            .paths
            .insert(format!("{API_SCOPE}{HELLO_VIEW_PATH}"), view.build());

        let mut collection = PathItemBuilder::new();
        let mut detail = PathItemBuilder::new();
        for action in HelloViewSet::ACTIONS {
            let method = http_method(action.verb());
            let op = Self::viewset_operation(*action);
            if action.is_detail() {
                detail = detail.operation(method, op);
            } else {
                collection = collection.operation(method, op);
            }
        }
        let paths = &mut openapi.paths.paths;
        paths.insert(
            format!("{API_SCOPE}{}", collection_path(HELLO_VIEWSET_PREFIX)),
            collection.build(),
        );
        paths.insert(
            format!("{API_SCOPE}{}", detail_path(HELLO_VIEWSET_PREFIX)),
            detail.build(),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&HelloPaths),
    info(
        title = "Profiles API",
        description = "Greeting demonstration endpoints and health probes for the profiles service."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        GreetingRequestSchema,
        GreetingResponse,
        HelloViewResponse,
        MethodEchoResponse,
        HelloViewSetResponse,
        HttpMethodEchoResponse,
    )),
    tags(
        (name = "hello-view", description = "Verb-dispatch demonstration endpoint"),
        (name = "hello-viewset", description = "Resource-action demonstration endpoint"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
