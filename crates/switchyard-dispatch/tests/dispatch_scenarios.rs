//! End-to-end dispatch behaviour through the public façade.

use async_trait::async_trait;
use http::{Method, StatusCode};
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use switchyard_di::{RuleValidator, SerdeHydrator, ServiceContainer};
use switchyard_dispatch::arguments::DefaultValueResolver;
use switchyard_dispatch::responses::RawFallbackResolver;
use switchyard_dispatch::{ArgumentResolverChain, Dispatcher, ResponseResolverChain};
use switchyard_exception::{Error, Result};
use switchyard_http::{Request, Response};
use switchyard_types::{Arguments, Controller, HandlerRef, ParameterDescriptor, ReturnValue, RouteMetadata};

fn request(method: Method, uri: &str) -> Request {
	Request::builder().method(method).uri(uri).build().unwrap()
}

fn body_json(response: &Response) -> Value {
	serde_json::from_slice(response.body_bytes().unwrap()).unwrap()
}

async fn echo_id(args: Arguments) -> Result<Value> {
	Ok(json!({"id": args.text("id")?}))
}

async fn ping(_args: Arguments) -> Result<&'static str> {
	Ok("pong")
}

async fn which(args: Arguments) -> Result<Value> {
	Ok(args.value("route")?)
}

fn tagged(tag: &'static str) -> HandlerRef {
	HandlerRef::function(tag, which).with_parameters([ParameterDescriptor::scalar("route").with_default(tag)])
}

#[rstest]
#[tokio::test]
async fn test_users_scenario() {
	// Arrange
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.add_route(
			"GET",
			"/users/{id}",
			HandlerRef::function("show", echo_id).with_parameters([ParameterDescriptor::scalar("id")]),
			None,
		)
		.unwrap();
	dispatcher
		.add_route("POST", "/users/{id}", HandlerRef::function("update", echo_id), None)
		.unwrap();

	// Act
	let shown = dispatcher.dispatch(request(Method::GET, "/users/42")).await.unwrap();
	let deleted = dispatcher.dispatch(request(Method::DELETE, "/users/42")).await;

	// Assert
	assert_eq!(body_json(&shown), json!({"id": "42"}));
	match deleted {
		Err(Error::MethodNotAllowed { allowed, .. }) => assert_eq!(allowed, vec!["GET", "POST"]),
		other => panic!("expected MethodNotAllowed, got {:?}", other.map(|r| r.status)),
	}
}

#[rstest]
#[tokio::test]
async fn test_ping_returns_json_quoted_string() {
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.add_route("GET", "/ping", HandlerRef::function("ping", ping), None)
		.unwrap();

	let response = dispatcher.dispatch(request(Method::GET, "/ping")).await.unwrap();

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.content_type(), Some("application/json"));
	assert_eq!(response.body_bytes().unwrap().as_ref(), b"\"pong\"");
}

#[rstest]
#[tokio::test]
async fn test_overlapping_dynamic_routes_first_registered_wins() {
	// Arrange
	let mut dispatcher = Dispatcher::new();
	dispatcher.add_route("GET", "/a/{x}", tagged("any"), None).unwrap();
	dispatcher.add_route("GET", "/a/{y}", tagged("later"), None).unwrap();

	// Act
	let response = dispatcher.dispatch(request(Method::GET, "/a/fixed")).await.unwrap();

	// Assert
	assert_eq!(body_json(&response), json!("any"));
}

#[rstest]
#[tokio::test]
async fn test_static_route_checked_before_dynamic() {
	let mut dispatcher = Dispatcher::new();
	dispatcher.add_route("GET", "/a/{x}", tagged("dynamic"), None).unwrap();
	dispatcher.add_route("GET", "/a/fixed", tagged("static"), None).unwrap();

	let fixed = dispatcher.dispatch(request(Method::GET, "/a/fixed")).await.unwrap();
	let other = dispatcher.dispatch(request(Method::GET, "/a/other")).await.unwrap();

	assert_eq!(body_json(&fixed), json!("static"));
	assert_eq!(body_json(&other), json!("dynamic"));
}

#[rstest]
#[tokio::test]
async fn test_static_route_invoked_exactly_once() {
	// Arrange
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.add_route(
			"PUT",
			"/settings",
			HandlerRef::function("save", move |_args: Arguments| {
				let counter = Arc::clone(&counter);
				async move {
					counter.fetch_add(1, Ordering::SeqCst);
					Ok::<_, Error>(())
				}
			}),
			None,
		)
		.unwrap();

	// Act
	let response = dispatcher.dispatch(request(Method::PUT, "/settings")).await.unwrap();

	// Assert
	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(response.body_bytes().unwrap().as_ref(), b"null");
}

#[rstest]
#[tokio::test]
async fn test_params_keep_declaration_order() {
	async fn capture(args: Arguments) -> Result<Value> {
		let request = args.request("request")?;
		let names: Vec<&String> = request.attributes().keys().collect();
		Ok(json!({"names": names, "values": request.attributes()}))
	}
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.add_route(
			"GET",
			"/{zone}/posts/{year}/{slug}",
			HandlerRef::function("capture", capture).with_parameters([ParameterDescriptor::request("request")]),
			None,
		)
		.unwrap();

	let response = dispatcher
		.dispatch(request(Method::GET, "/eu/posts/2024/hello-world"))
		.await
		.unwrap();

	assert_eq!(
		body_json(&response),
		json!({
			"names": ["zone", "year", "slug"],
			"values": {"zone": "eu", "year": "2024", "slug": "hello-world"},
		})
	);
}

#[rstest]
#[case(Method::GET, "/nowhere")]
#[case(Method::POST, "/users")]
#[tokio::test]
async fn test_unregistered_path_is_not_found(#[case] method: Method, #[case] uri: &str) {
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.add_route("GET", "/users/{id}", HandlerRef::function("show", echo_id), None)
		.unwrap();

	let err = dispatcher.dispatch(request(method, uri)).await.unwrap_err();

	assert!(matches!(err, Error::RouteNotFound { .. }));
	assert_eq!(err.status_code(), 404);
}

#[rstest]
#[tokio::test]
async fn test_xml_route_renders_document() {
	async fn home(_args: Arguments) -> Result<Value> {
		Ok(json!({"greeting": "Olá Mundo", "count": 2}))
	}
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.add_route("GET", "/", HandlerRef::function("home", home), Some(RouteMetadata::xml()))
		.unwrap();

	let response = dispatcher.dispatch(request(Method::GET, "/")).await.unwrap();
	let body = String::from_utf8(response.body_bytes().unwrap().to_vec()).unwrap();

	assert_eq!(response.content_type(), Some("application/xml"));
	assert!(body.starts_with("<?xml"));
	assert!(body.contains("<root><greeting>Olá Mundo</greeting><count>2</count></root>"));
}

#[rstest]
#[tokio::test]
async fn test_xml_route_sanitizes_keys_that_are_not_element_names() {
	async fn contact(_args: Arguments) -> Result<Value> {
		Ok(json!({"first name": "Ada", "e-mail": "ada@example.com"}))
	}
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.add_route("GET", "/contact", HandlerRef::function("contact", contact), Some(RouteMetadata::xml()))
		.unwrap();

	let response = dispatcher.dispatch(request(Method::GET, "/contact")).await.unwrap();
	let body = String::from_utf8(response.body_bytes().unwrap().to_vec()).unwrap();

	assert_eq!(response.status, StatusCode::OK);
	assert!(body.contains("<root><first_name>Ada</first_name><e-mail>ada@example.com</e-mail></root>"), "{body}");
}

#[derive(Debug, Deserialize)]
struct NewTask {
	title: String,
}

struct TaskController {
	created: AtomicUsize,
}

#[async_trait]
impl Controller for TaskController {
	async fn call(&self, method: &str, mut args: Arguments) -> Result<ReturnValue> {
		match method {
			"create" => {
				let task: NewTask = args.take_payload("task")?;
				let id = self.created.fetch_add(1, Ordering::SeqCst) + 1;
				Ok(Response::created()
					.with_json(&json!({"id": id, "title": task.title}))?
					.into())
			}
			other => Err(Error::Server(format!("unknown method `{}`", other))),
		}
	}
}

fn task_dispatcher() -> Dispatcher {
	let validator = RuleValidator::new().with_rule(|task: &NewTask| {
		let mut errors = switchyard_exception::FieldErrors::new();
		if task.title.trim().is_empty() {
			errors.insert("title".to_string(), vec!["must not be blank".to_string()]);
		}
		errors
	});
	let mut dispatcher = Dispatcher::builder()
		.container(ServiceContainer::new().with(TaskController {
			created: AtomicUsize::new(0),
		}))
		.hydrator(SerdeHydrator::new().with::<NewTask>())
		.validator(validator)
		.build()
		.unwrap();
	dispatcher
		.add_route(
			"POST",
			"/tasks",
			HandlerRef::method::<TaskController>("create")
				.with_parameters([ParameterDescriptor::payload::<NewTask>("task")]),
			None,
		)
		.unwrap();
	dispatcher
}

fn post_tasks(body: &str) -> Request {
	Request::builder()
		.method(Method::POST)
		.uri("/tasks")
		.header("content-type", "application/json")
		.body(body.to_string())
		.build()
		.unwrap()
}

#[rstest]
#[tokio::test]
async fn test_payload_flows_into_controller() {
	let dispatcher = task_dispatcher();

	let response = dispatcher.dispatch(post_tasks(r#"{"title":"write docs"}"#)).await.unwrap();

	assert_eq!(response.status, StatusCode::CREATED);
	assert_eq!(response.content_type(), Some("application/json"));
	assert_eq!(body_json(&response), json!({"id": 1, "title": "write docs"}));
}

#[rstest]
#[case(r#"{"title":"   "}"#, 422)]
#[case(r#"{"title":"#, 400)]
#[case(r#"{"title":12}"#, 400)]
#[tokio::test]
async fn test_payload_failures(#[case] body: &str, #[case] expected: u16) {
	let dispatcher = task_dispatcher();

	let err = dispatcher.dispatch(post_tasks(body)).await.unwrap_err();

	assert_eq!(err.status_code(), expected);
}

#[rstest]
#[tokio::test]
async fn test_validation_error_renders_field_map() {
	let dispatcher = task_dispatcher();

	let err = dispatcher.dispatch(post_tasks(r#"{"title":""}"#)).await.unwrap_err();
	let response = Response::from(err);

	assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(
		body_json(&response),
		json!({
			"statusCode": 422,
			"code": "VALIDATION_FIELDS",
			"message": "Validation failed for 1 field(s)",
			"errors": {"title": ["must not be blank"]},
		})
	);
}

#[rstest]
#[tokio::test]
async fn test_missing_argument_is_server_error() {
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.add_route(
			"GET",
			"/report",
			HandlerRef::function("report", echo_id).with_parameters([ParameterDescriptor::scalar("id")]),
			None,
		)
		.unwrap();

	let err = dispatcher.dispatch(request(Method::GET, "/report")).await.unwrap_err();

	match err {
		Error::MissingArgument { parameter, handler } => {
			assert_eq!(parameter, "id");
			assert_eq!(handler, "report");
		}
		other => panic!("expected MissingArgument, got {:?}", other),
	}
}

#[rstest]
#[tokio::test]
async fn test_concurrent_dispatch_shares_compiled_table() {
	// Arrange
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.add_route(
			"GET",
			"/users/{id}",
			HandlerRef::function("show", echo_id).with_parameters([ParameterDescriptor::scalar("id")]),
			None,
		)
		.unwrap();
	let dispatcher = Arc::new(dispatcher);

	// Act
	let handles: Vec<_> = (0..32)
		.map(|i| {
			let dispatcher = Arc::clone(&dispatcher);
			tokio::spawn(async move {
				let response = dispatcher
					.dispatch(request(Method::GET, &format!("/users/{}", i)))
					.await
					.unwrap();
				(i, body_json(&response))
			})
		})
		.collect();

	// Assert
	for handle in handles {
		let (i, body) = handle.await.unwrap();
		assert_eq!(body, json!({"id": i.to_string()}));
	}
	assert!(dispatcher.is_compiled());
}

#[rstest]
#[tokio::test]
async fn test_installed_chains_drive_dispatch() {
	// Arrange
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.set_argument_resolver_chain(ArgumentResolverChain::builder().push(DefaultValueResolver).build())
		.unwrap();
	dispatcher
		.set_response_resolver_chain(ResponseResolverChain::builder().push(RawFallbackResolver).build())
		.unwrap();
	dispatcher
		.add_route(
			"GET",
			"/u/{id}",
			HandlerRef::function("show", echo_id)
				.with_parameters([ParameterDescriptor::scalar("id").with_default("dflt")]),
			None,
		)
		.unwrap();

	// Act
	let response = dispatcher.dispatch(request(Method::GET, "/u/42")).await.unwrap();

	// Assert
	// Path parameters are not consulted, and the raw resolver leaves content-type unset
	assert_eq!(body_json(&response), json!({"id": "dflt"}));
	assert_eq!(response.content_type(), None);
}

#[rstest]
#[tokio::test]
async fn test_unmatched_return_value_is_server_error() {
	// Arrange
	let mut dispatcher = Dispatcher::new();
	dispatcher
		.set_response_resolver_chain(ResponseResolverChain::from_names(&["xml"]).unwrap())
		.unwrap();
	dispatcher
		.add_route("GET", "/ping", HandlerRef::function("ping", ping), Some(RouteMetadata::json()))
		.unwrap();

	// Act
	let result = dispatcher.dispatch(request(Method::GET, "/ping")).await;

	// Assert
	match result {
		Err(Error::Server(message)) => {
			assert_eq!(message, "Unable to resolve response from controller return value")
		}
		other => panic!("expected Server error, got {:?}", other.map(|r| r.status)),
	}
}
