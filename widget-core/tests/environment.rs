use widget_core::{EnvironmentContext, LoaderConfig};

const LOADER_URL: &str = "https://cdn.example.org/static/widget-loader-combined.js";

#[test]
fn dev_flag_selects_dev_origin_for_everything() {
    let config = LoaderConfig::default();
    let env = EnvironmentContext::resolve(Some(&format!("{LOADER_URL}?dev=true")), &config);

    assert!(env.is_dev);
    assert_eq!(env.api_base_url, "http://localhost:3000");
    assert_eq!(env.script_base_url, "http://localhost:3000");
    assert_eq!(env.bundle_url(&config), "http://localhost:3000/widget-bundle.js");
}

#[test]
fn production_keeps_script_origin_separate_from_api() {
    let config = LoaderConfig::default();
    let env = EnvironmentContext::resolve(Some(LOADER_URL), &config);

    assert!(!env.is_dev);
    assert_eq!(env.api_base_url, "https://widget.eliteprospects.com");
    assert_eq!(env.script_base_url, "https://cdn.example.org");
    assert_eq!(env.bundle_url(&config), "https://cdn.example.org/widget-bundle.js");
}

#[test]
fn other_dev_values_are_production() {
    let config = LoaderConfig::default();
    for query in ["?dev=false", "?dev=1", "?development=true", "?x=dev"] {
        let env = EnvironmentContext::resolve(Some(&format!("{LOADER_URL}{query}")), &config);
        assert!(!env.is_dev, "{query}");
    }
    let env = EnvironmentContext::resolve(Some(&format!("{LOADER_URL}?v=3&dev=true")), &config);
    assert!(env.is_dev);
}

#[test]
fn unreadable_urls_fall_back_to_production() {
    let config = LoaderConfig::default();
    for src in [None, Some(""), Some("::not a url::"), Some("/relative/widget-loader.js?dev=true")] {
        let env = EnvironmentContext::resolve(src, &config);
        assert!(!env.is_dev, "{src:?}");
        assert_eq!(env.api_base_url, "https://widget.eliteprospects.com");
        assert_eq!(env.script_base_url, "https://widget.eliteprospects.com");
    }
}

#[test]
fn opaque_origins_use_production_scripts() {
    let env = EnvironmentContext::resolve(Some("data:text/javascript,void 0"), &LoaderConfig::default());
    assert!(!env.is_dev);
    assert_eq!(env.script_base_url, "https://widget.eliteprospects.com");
}

#[test]
fn loader_config_accepts_partial_overrides() {
    let config: LoaderConfig = serde_json::from_str(r#"{"devOrigin":"http://127.0.0.1:8080/","rendererGraceMs":50}"#)
        .expect("Không đọc được config");

    assert_eq!(config.renderer_grace_ms, 50);
    assert_eq!(config.marker_class, "ep-widget");

    let env = EnvironmentContext::resolve(Some("https://x.test/l.js?dev=true"), &config);
    assert_eq!(env.api_base_url, "http://127.0.0.1:8080");
}
