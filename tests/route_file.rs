mod common;

use stagecraft::{ConfigError, RouteFile, Router, ScriptRegistry};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_routes(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write routes");
    file
}

const ROUTES: &str = r#"
[stage]
animated = false
strict_routes = true

[[scripts]]
name = "category"
steps = [
    { op = "root", screen = "main" },
    { op = "push", screen = "categories" },
    { op = "push", screen = "category", capture = '\w+' },
]

[[scripts]]
name = "settings"
steps = [
    { op = "root", screen = "main" },
    { op = "prop", screen = "settings" },
    { op = "present", screen = "profile", kind = "Modal" },
]
"#;

/// Test that a route file loads, builds scripts and routes paths.
#[test]
fn test_route_file_round_trip_through_router() {
    let file = write_routes(ROUTES);
    let routes = RouteFile::load_from(file.path()).unwrap();

    assert!(!routes.stage.animated);
    assert!(routes.stage.strict_routes);

    let registry = ScriptRegistry::new();
    for script in routes.build_scripts().unwrap() {
        registry.register(script);
    }
    assert_eq!(registry.len(), 2);

    let router = Router::new(registry.clone()).strict(routes.stage.strict_routes);
    let story = router.route_path("/categories/books").unwrap().unwrap();
    assert_eq!(story.shorthand(), "/(main), >(categories), >(books)");

    let settings = router.route_path("/settings/profile").unwrap().unwrap();
    let modal = settings.last().unwrap().destination().unwrap();
    assert_eq!(modal.type_id(), "Modal");
    assert_eq!(settings.len(), 2);
}

/// Test that a file that is not valid TOML is a parse error.
#[test]
fn test_route_file_parse_error() {
    let file = write_routes("[[scripts]\nname = ");
    let err = RouteFile::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

/// Test that an invalid script is rejected when loading.
#[test]
fn test_route_file_validation_error() {
    let file = write_routes(
        r#"
[[scripts]]
name = "broken"
steps = [{ op = "push", screen = "item", capture = "(" }]
"#,
    );
    let err = RouteFile::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
}

/// Test that a missing file is a read error.
#[test]
fn test_route_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = RouteFile::load_from(&dir.path().join("routes.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
}

/// Test that the default route file lives under the stagecraft config dir.
#[test]
fn test_route_file_default_path() {
    let path = RouteFile::config_path();
    assert!(path.ends_with("stagecraft/routes.toml"));
}
