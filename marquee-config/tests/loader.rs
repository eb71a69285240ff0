use assert_matches::assert_matches;
use marquee_config::{ConfigGuardRailError, ConfigLoadError, ConfigLoader};
use marquee_model::SortBy;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn no_env() -> Vec<(String, String)> {
    Vec::new()
}

#[test]
fn file_values_override_defaults() {
    let file = write_config(
        r#"
        log_filter = "debug"

        [catalog]
        api_key = "from-file"
        language = "de-DE"

        [carousel]
        rotation_secs = 8
        "#,
    );

    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env(no_env())
        .load()
        .expect("config loads");

    assert_eq!(load.config.catalog.api_key, "from-file");
    assert_eq!(load.config.catalog.language, "de-DE");
    assert_eq!(load.config.carousel.rotation_secs, 8);
    assert_eq!(load.config.carousel.window, 5);
    assert_eq!(load.config.log_filter, "debug");
    assert!(load.warnings.is_empty());
    assert_eq!(load.config_path.as_deref(), Some(file.path()));
}

#[test]
fn environment_overrides_file() {
    let file = write_config(
        r#"
        [catalog]
        api_key = "from-file"
        max_page = 100
        "#,
    );

    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env([
            ("MARQUEE__CATALOG__API_KEY", "from-env"),
            ("MARQUEE__BROWSE__PAGE_WINDOW", "7"),
        ])
        .load()
        .expect("config loads");

    assert_eq!(load.config.catalog.api_key, "from-env");
    assert_eq!(load.config.catalog.max_page, 100);
    assert_eq!(load.config.browse.page_window, 7);
}

#[test]
fn legacy_key_fills_missing_api_key_only() {
    let file = write_config("[catalog]\nlanguage = \"en-US\"\n");
    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env([("TMDB_API_KEY", "legacy")])
        .load()
        .expect("config loads");
    assert_eq!(load.config.catalog.api_key, "legacy");

    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env([
            ("TMDB_API_KEY", "legacy"),
            ("MARQUEE__CATALOG__API_KEY", "structured"),
        ])
        .load()
        .expect("config loads");
    assert_eq!(load.config.catalog.api_key, "structured");
}

#[test]
fn missing_api_key_is_a_warning() {
    let file = write_config("log_filter = \"info\"\n");
    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env(no_env())
        .load()
        .expect("config loads");

    assert_eq!(load.warnings.len(), 1);
    assert!(load.warnings.items[0].message.contains("API key"));
    assert!(load.warnings.items[0].hint.is_some());
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.toml");

    let err = ConfigLoader::new()
        .with_config_path(&missing)
        .with_env(no_env())
        .load()
        .unwrap_err();

    assert_matches!(err, ConfigLoadError::MissingConfig { path } if path == missing);
}

#[test]
fn invalid_base_url_is_rejected() {
    let file = write_config(
        "[catalog]\napi_key = \"k\"\nbase_url = \"ftp://example.com\"\n",
    );
    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env(no_env())
        .load()
        .unwrap_err();

    assert_matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::InvalidUrl {
            field: "catalog.base_url",
            ..
        })
    );
}

#[test]
fn zero_page_window_is_rejected() {
    let file = write_config("[browse]\npage_window = 0\n");
    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env([("TMDB_API_KEY", "k")])
        .load()
        .unwrap_err();

    assert_matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::Zero {
            field: "browse.page_window"
        })
    );
}

#[test]
fn unknown_default_sort_fails_to_deserialize() {
    let file = write_config("[browse]\ndefault_sort = \"chaos.asc\"\n");
    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env([("TMDB_API_KEY", "k")])
        .load()
        .unwrap_err();

    assert_matches!(err, ConfigLoadError::Build { .. });
}

#[test]
fn sort_order_is_read_from_wire_value() {
    let file = write_config("[browse]\ndefault_sort = \"title.asc\"\n");
    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env([("TMDB_API_KEY", "k")])
        .load()
        .expect("config loads");

    assert_eq!(load.config.browse.default_sort, SortBy::TitleAsc);
}

#[test]
fn oversized_carousel_window_is_rejected() {
    let err = ConfigLoader::new()
        .with_env([
            ("TMDB_API_KEY", "k"),
            ("MARQUEE__CAROUSEL__WINDOW", "8"),
        ])
        .load()
        .unwrap_err();

    assert_matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::TooLarge {
            field: "carousel.window",
            value: 8,
            max: 5,
        })
    );
}

#[test]
fn oversized_carousel_source_is_rejected() {
    let file = write_config("[carousel]\nsource_limit = 20\n");
    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env([("TMDB_API_KEY", "k")])
        .load()
        .unwrap_err();

    assert_matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::TooLarge {
            field: "carousel.source_limit",
            ..
        })
    );
}
