//! End-to-end binding of whole requests.

use std::cell::Cell;

use bytes::Bytes;
use http::{Method, Request, StatusCode};
use mgin_bind::{
    bind, bind_and_validate, bind_and_validate_with, BindConfig, BindError, BindOutcome,
    Bindable, PathParams, RequestContext, SourceKind, ValidationError,
};
use serde::Deserialize;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mgin_bind=trace")
        .with_test_writer()
        .try_init();
}

fn path(name: &str, value: &str) -> PathParams {
    let mut params = PathParams::new();
    params.push(name, value);
    params
}

#[derive(Debug, Default, Bindable)]
struct GetUser {
    #[bind(path = "id")]
    id: i64,
    #[bind(query = "active", optional)]
    active: bool,
}

#[derive(Debug, Default, Bindable)]
struct Authorized {
    #[bind(query = "token")]
    token: String,
}

#[derive(Debug, Default, Bindable)]
struct Plain {
    name: String,
    count: u32,
}

#[test]
fn test_binds_path_parameter_from_http_request() {
    init_tracing();
    let request = Request::builder()
        .uri("/users/42")
        .body(Bytes::new())
        .unwrap();
    let ctx = RequestContext::from_request(request, path("id", "42"));

    let mut user = GetUser::default();
    let outcome = BindOutcome::from(bind_and_validate(&ctx, &mut user));

    assert_eq!(outcome.status, StatusCode::OK);
    assert_eq!(user.id, 42);
    assert!(!user.active);
}

#[test]
fn test_malformed_path_parameter_names_field() {
    init_tracing();
    let ctx = RequestContext::builder()
        .uri("/users/abc")
        .path_param("id", "abc")
        .build();

    let err = bind_and_validate(&ctx, &mut GetUser::default()).unwrap_err();

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.field(), Some("id"));
    assert!(matches!(err, BindError::Conversion { .. }));
}

#[test]
fn test_missing_required_query_parameter_is_bad_request() {
    init_tracing();
    let ctx = RequestContext::builder().uri("/secret?other=1").build();

    let outcome = BindOutcome::from(bind_and_validate(&ctx, &mut Authorized::default()));

    assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
    let err = outcome.error.unwrap();
    assert_eq!(err.field(), Some("token"));
    assert!(err.to_string().contains("token"));
}

#[derive(Debug, Default, Bindable)]
struct MaybeAuthorized {
    #[bind(query = "token", optional)]
    token: String,
}

#[test]
fn test_removing_optional_makes_absent_value_an_error() {
    let ctx = RequestContext::builder().uri("/secret").build();

    let mut maybe = MaybeAuthorized::default();
    bind_and_validate(&ctx, &mut maybe).unwrap();
    assert!(maybe.token.is_empty());

    let err = bind_and_validate(&ctx, &mut Authorized::default()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(matches!(
        err,
        BindError::MissingValue {
            field: "token",
            origin: SourceKind::Query,
            key: "token",
        }
    ));
}

#[derive(Debug, Default, Bindable)]
struct OptionalTags {
    #[bind(query = "tags", optional)]
    tags: Vec<String>,
}

#[test]
fn test_absent_unsupported_field_follows_presence_policy() {
    let ctx = RequestContext::builder().uri("/items").build();

    bind_and_validate(&ctx, &mut OptionalTags::default()).unwrap();

    let err = bind_and_validate(&ctx, &mut Tagged::default()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.field(), Some("tags"));
}

#[test]
fn test_multipart_upload_leaves_text_fields_bindable() {
    #[derive(Debug, Default, Bindable)]
    struct Upload {
        #[bind(form = "title")]
        title: String,
    }

    let body = format!(
        "--B\r\n\
         Content-Disposition: form-data; name=\"title\"\r\n\r\n\
         hello\r\n\
         --B\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"a.bin\"\r\n\r\n\
         {}\r\n\
         --B--\r\n",
        "z".repeat(4096)
    );
    let ctx = RequestContext::builder()
        .method(Method::POST)
        .uri("/uploads")
        .header("content-type", "multipart/form-data; boundary=B")
        .body(body)
        .config(BindConfig::new().max_multipart_memory(1024))
        .build();

    let mut upload = Upload::default();
    bind_and_validate(&ctx, &mut upload).unwrap();
    assert_eq!(upload.title, "hello");
}

#[test]
fn test_missing_value_is_fine_in_read_only_mode() {
    let ctx = RequestContext::builder().uri("/secret").build();

    let mut auth = Authorized::default();
    bind(&ctx, &mut auth).unwrap();
    assert!(auth.token.is_empty());
}

#[test]
fn test_record_without_metadata_stays_zero() {
    let ctx = RequestContext::builder()
        .uri("/?name=ignored&count=3")
        .path_param("name", "also-ignored")
        .build();

    let mut plain = Plain::default();
    bind(&ctx, &mut plain).unwrap();
    bind_and_validate(&ctx, &mut plain).unwrap();

    assert!(plain.name.is_empty());
    assert_eq!(plain.count, 0);
}

#[test]
fn test_strict_metadata_rejects_record_without_metadata() {
    let ctx = RequestContext::builder()
        .uri("/")
        .config(BindConfig::new().strict_metadata(true))
        .build();

    let err = bind(&ctx, &mut Plain::default()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_adapter_error_text_is_passed_through() {
    init_tracing();
    let ctx = RequestContext::builder()
        .uri("/users/7")
        .path_param("id", "7")
        .build();
    let reject = |_: &GetUser| -> Result<(), ValidationError> {
        Err(ValidationError::message("user 7 is archived"))
    };

    let mut user = GetUser::default();
    let err = bind_and_validate_with(&ctx, &mut user, &reject).unwrap_err();

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "user 7 is archived");
    assert_eq!(user.id, 7);
}

#[test]
fn test_read_only_bind_never_invokes_adapter() {
    let ctx = RequestContext::builder()
        .uri("/users/7")
        .path_param("id", "7")
        .build();
    let calls = Cell::new(0);
    let counting = |_: &GetUser| -> Result<(), ValidationError> {
        calls.set(calls.get() + 1);
        Ok(())
    };

    let mut user = GetUser::default();
    bind(&ctx, &mut user).unwrap();
    assert_eq!(calls.get(), 0);

    bind_and_validate_with(&ctx, &mut user, &counting).unwrap();
    assert_eq!(calls.get(), 1);
}

#[derive(Debug, Default, Bindable)]
struct Listing {
    #[bind(query = "limit", ignore_error)]
    limit: u8,
}

#[test]
fn test_ignore_error_depends_on_mode() {
    let ctx = RequestContext::builder().uri("/items?limit=900").build();

    let mut listing = Listing::default();
    bind(&ctx, &mut listing).unwrap();
    assert_eq!(listing.limit, 0);

    let err = bind_and_validate(&ctx, &mut Listing::default()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

#[derive(Debug, Default, Bindable)]
struct Document {
    #[bind(path = "id", query = "id", form = "id")]
    id: u64,
}

#[test]
fn test_path_wins_over_query_and_form() {
    let ctx = RequestContext::builder()
        .method(Method::POST)
        .uri("/docs/5?id=6")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("id=7")
        .path_param("id", "5")
        .build();

    let mut doc = Document::default();
    bind_and_validate(&ctx, &mut doc).unwrap();
    assert_eq!(doc.id, 5);
}

#[derive(Debug, Default, Bindable)]
struct Signup {
    #[bind(form = "email", validate = "required,max=64")]
    email: String,
    #[bind(form = "age", validate = "gte=18")]
    age: u8,
    #[bind(header = "x-referrer", optional)]
    referrer: String,
    #[bind(cookie = "session", optional)]
    session: String,
}

#[test]
fn test_binds_form_header_and_cookie() {
    init_tracing();
    let ctx = RequestContext::builder()
        .method(Method::POST)
        .uri("/signup")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-referrer", "newsletter")
        .header("cookie", "theme=dark; session=\"s-123\"")
        .body("email=ada%40example.com&age=36")
        .build();

    let mut signup = Signup::default();
    bind_and_validate(&ctx, &mut signup).unwrap();

    assert_eq!(signup.email, "ada@example.com");
    assert_eq!(signup.age, 36);
    assert_eq!(signup.referrer, "newsletter");
    assert_eq!(signup.session, "s-123");
}

#[test]
fn test_rule_failures_are_reported_together() {
    let ctx = RequestContext::builder()
        .method(Method::POST)
        .uri("/signup")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(format!("email={}&age=12", "a".repeat(80)))
        .build();

    let err = bind_and_validate(&ctx, &mut Signup::default()).unwrap_err();

    let BindError::Validation(validation) = err else {
        panic!("expected validation error, got {err:?}");
    };
    let fields: Vec<&str> = validation.failures().iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, ["email", "age"]);
}

#[test]
fn test_malformed_form_body_is_source_error() {
    let ctx = RequestContext::builder()
        .method(Method::POST)
        .uri("/signup")
        .header("content-type", "multipart/form-data")
        .body("garbage")
        .build();

    let err = bind(&ctx, &mut Signup::default()).unwrap_err();

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(matches!(
        err,
        BindError::Source {
            origin: SourceKind::Form,
            ..
        }
    ));
}

#[derive(Debug, Default, Bindable)]
struct Tagged {
    #[bind(query = "tags")]
    tags: Vec<String>,
}

#[test]
fn test_unsupported_field_type_is_not_implemented() {
    let ctx = RequestContext::builder().uri("/?tags=a,b").build();

    let err = bind(&ctx, &mut Tagged::default()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_IMPLEMENTED);
}

#[derive(Debug, Deserialize, PartialEq)]
struct NewUser {
    name: String,
    age: u32,
}

#[test]
fn test_json_body_with_validator() {
    let ctx = RequestContext::builder()
        .method(Method::POST)
        .uri("/users")
        .header("content-type", "application/json")
        .body(r#"{"name":"ada","age":36}"#)
        .build();
    let named = |u: &NewUser| -> Result<(), ValidationError> {
        if u.name.is_empty() {
            Err(ValidationError::field("name", "required", "is required"))
        } else {
            Ok(())
        }
    };

    let user: NewUser = ctx.read_and_validate_json(&named).unwrap();
    assert_eq!(
        user,
        NewUser {
            name: "ada".into(),
            age: 36
        }
    );

    let bad = RequestContext::builder()
        .method(Method::POST)
        .uri("/users")
        .body(r#"{"name":"ada""#)
        .build();
    let err = bad.read_json::<NewUser>().unwrap_err();
    assert_eq!(err.error_code(), "INVALID_JSON");
}
