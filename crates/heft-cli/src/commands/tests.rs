//! Unit tests for CLI commands.

use super::*;
use heft_core::Resolution;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test command context in a temporary directory
fn create_test_context(temp_dir: &TempDir) -> CommandContext {
    CommandContext {
        cwd: Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap(),
        output: OutputHandler::plain(),
        env: HashMap::new(),
        global_dir: None,
    }
}

fn mock_overrides(registry: &MockServer, analysis: &MockServer) -> Overrides {
    Overrides {
        registry_url: Some(registry.uri()),
        analysis_url: Some(analysis.uri()),
        ..Overrides::default()
    }
}

async fn mount_registry(server: &MockServer, name: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[test]
fn test_resolver_config_mapping() {
    let config = HeftConfig {
        concurrency: 3,
        gzip_ratio: 0.25,
        registry_url: "http://localhost:4873".to_string(),
        ..HeftConfig::default()
    };

    let resolver = resolver_config(&config);
    assert_eq!(resolver.concurrency, 3);
    assert_eq!(resolver.gzip_ratio, 0.25);
    assert_eq!(resolver.fetch_timeout, config.fetch_timeout);
    assert_eq!(resolver.cache_ttl, config.cache_ttl);
    assert_eq!(resolver.registry_url, "http://localhost:4873");
    assert_eq!(resolver.analysis_url, config.analysis_url);
}

#[tokio::test]
async fn test_load_config_layers() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("heft.toml"), "[batch]\nsize = 2\n").unwrap();

    let mut ctx = create_test_context(&temp_dir);
    ctx.env.insert("HEFT_CONCURRENCY".to_string(), "7".to_string());

    let overrides = Overrides {
        batch_size: Some(3),
        ..Overrides::default()
    };
    let (config, sources) = ctx.load_config(&overrides).await.unwrap();

    assert_eq!(config.batch_size, 3);
    assert_eq!(config.concurrency, 7);
    assert_eq!(sources.first(), Some(&ConfigSource::Defaults));
    assert_eq!(sources.last(), Some(&ConfigSource::CommandLine));
}

#[tokio::test]
async fn test_invalid_override_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let overrides = Overrides {
        concurrency: Some(0),
        ..Overrides::default()
    };
    let result = config::execute(&overrides, &ctx).await;
    assert!(matches!(result, Err(HeftError::ConfigValidation { .. })));
}

#[test]
fn test_describe_source() {
    assert_eq!(config::describe_source(&ConfigSource::Defaults), "built-in defaults");
    assert_eq!(
        config::describe_source(&ConfigSource::Project(Utf8PathBuf::from("/work/heft.toml"))),
        "project config /work/heft.toml"
    );
    assert_eq!(
        config::describe_source(&ConfigSource::Environment("HEFT_GZIP_RATIO".to_string())),
        "environment variable HEFT_GZIP_RATIO"
    );
}

#[tokio::test]
async fn test_analyze_manifest() {
    let registry = MockServer::start().await;
    let analysis = MockServer::start().await;

    mount_registry(
        &registry,
        "left-pad",
        serde_json::json!({ "versions": { "1.3.0": { "dist": { "unpackedSize": 11000 } } } }),
    )
    .await;
    mount_registry(
        &registry,
        "lodash",
        serde_json::json!({ "versions": { "4.17.21": { "dist": { "unpackedSize": 1412410 } } } }),
    )
    .await;
    mount_registry(&registry, "mystery", serde_json::json!({ "versions": {} })).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&analysis)
        .await;

    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("package.json"),
        r#"{
  "dependencies": { "left-pad": "1.3.0", "mystery": "^0.1.0" },
  "devDependencies": { "lodash": "^4.17.21" }
}"#,
    )
    .unwrap();
    let ctx = create_test_context(&temp_dir);

    let report = analyze::run(
        None,
        &mock_overrides(&registry, &analysis),
        &CancellationToken::new(),
        &ctx,
    )
    .await
    .unwrap();

    assert!(!report.cancelled);
    let names: Vec<&str> = report.packages.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["left-pad", "mystery", "lodash"]);
    assert_eq!(report.packages["lodash"].requested_version, "^4.17.21");
    assert_eq!(report.packages["mystery"].stats, Resolution::Unresolved);

    assert_eq!(report.totals.size, 11000 + 1412410);
    assert_eq!(report.totals.gzip, 3300 + 423723);
    assert_eq!(report.totals.resolved, 2);
    assert_eq!(report.totals.unresolved, 1);
}

#[tokio::test]
async fn test_analyze_cancelled_before_start() {
    let registry = MockServer::start().await;
    let analysis = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&registry)
        .await;

    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("package.json"),
        r#"{ "dependencies": { "left-pad": "1.3.0" } }"#,
    )
    .unwrap();
    let ctx = create_test_context(&temp_dir);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = analyze::run(None, &mock_overrides(&registry, &analysis), &cancel, &ctx)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(report.packages.is_empty());
    assert_eq!(report.totals.resolved, 0);
}

#[tokio::test]
async fn test_analyze_empty_and_missing_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let missing = analyze::run(
        Some(Utf8PathBuf::from("nope/package.json")),
        &Overrides::default(),
        &CancellationToken::new(),
        &ctx,
    )
    .await;
    assert!(matches!(missing, Err(HeftError::ConfigValidation { .. })));

    std::fs::write(temp_dir.path().join("package.json"), r#"{ "name": "empty" }"#).unwrap();
    let report = analyze::run(None, &Overrides::default(), &CancellationToken::new(), &ctx)
        .await
        .unwrap();
    assert!(report.packages.is_empty());
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_stats_lookup_falls_back() {
    let registry = MockServer::start().await;
    let analysis = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&registry)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/size"))
        .and(query_param("package", "preact@10.19.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "size": 10000,
            "gzip": 4200,
            "hasJSModule": true,
            "hasSideEffects": false
        })))
        .expect(1)
        .mount(&analysis)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    let overrides = mock_overrides(&registry, &analysis);

    let resolution = stats::lookup("preact", "10.19.0", &overrides, &ctx).await.unwrap();
    let stats = resolution.into_stats().unwrap();
    assert_eq!(stats.size, 10000);
    assert_eq!(stats.gzip, 4200);
    assert_eq!(stats.is_tree_shakeable(), Some(true));
}
