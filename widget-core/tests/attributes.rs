use widget_core::attributes::{
    camel_to_data_attribute, extract_config, kebab_to_camel, widget_id_for,
    WidgetContainerDescriptor,
};
use widget_core::{validate_config, ColorScheme, WidgetError, WidgetType};

fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn extracts_camel_case_without_coercion() {
    let config = extract_config(
        [
            ("class", "ep-widget"),
            ("data-foo-bar", "baz"),
            ("data-x", "1,2,3"),
        ],
        "data-",
    );

    assert_eq!(config.len(), 2);
    assert_eq!(config.get("fooBar").map(String::as_str), Some("baz"));
    assert_eq!(config.get("x").map(String::as_str), Some("1,2,3"));
}

#[test]
fn json_values_stay_strings() {
    let config = extract_config(
        [
            ("data-selected-teams", r#"[{"id":1}]"#),
            ("data-include-youth", "true"),
            ("data-game-limit", "5"),
        ],
        "data-",
    );

    assert_eq!(config["selectedTeams"], r#"[{"id":1}]"#);
    assert_eq!(config["includeYouth"], "true");
    assert_eq!(config["gameLimit"], "5");
}

#[test]
fn kebab_to_camel_follows_dataset_rules() {
    assert_eq!(kebab_to_camel("selected-teams"), "selectedTeams");
    assert_eq!(kebab_to_camel("selected-league-categories"), "selectedLeagueCategories");
    assert_eq!(kebab_to_camel("x"), "x");
    assert_eq!(kebab_to_camel("a-1"), "a-1");
    assert_eq!(kebab_to_camel("trailing-"), "trailing-");
}

#[test]
fn camel_back_to_attribute() {
    assert_eq!(camel_to_data_attribute("playerId"), "data-player-id");
    assert_eq!(camel_to_data_attribute("season"), "data-season");
}

#[test]
fn descriptor_ids_follow_scan_order_unless_keyed() {
    let first = WidgetContainerDescriptor::new(0, attrs(&[("data-widget-type", "team")]))
        .expect("descriptor");
    assert_eq!(first.widget_id, "widget-0");
    assert_eq!(first.widget_type, WidgetType::Team);

    let keyed = WidgetContainerDescriptor::new(
        3,
        attrs(&[("data-widget-type", "player"), ("data-widget-key", "home-player")]),
    )
    .expect("descriptor");
    assert_eq!(keyed.widget_id, "home-player");

    assert_eq!(widget_id_for(7, Some("  ")), "widget-7");
}

#[test]
fn descriptor_rejects_unknown_type() {
    let err = WidgetContainerDescriptor::new(0, attrs(&[("data-widget-type", "cricket")]))
        .expect_err("unknown type");
    assert_eq!(err, WidgetError::UnknownWidgetType("cricket".to_string()));

    let err = WidgetContainerDescriptor::new(0, attrs(&[("class", "ep-widget")]))
        .expect_err("missing type");
    assert!(matches!(err, WidgetError::UnknownWidgetType(_)));
}

#[test]
fn config_injects_id_and_api_base() {
    let descriptor = WidgetContainerDescriptor::new(
        1,
        attrs(&[
            ("data-widget-type", "player"),
            ("data-player-id", "5"),
            ("data-api-base-url", "https://spoofed.example"),
        ]),
    )
    .expect("descriptor");
    let config = descriptor.config("data-", "https://widget.eliteprospects.com");

    assert_eq!(config.widget_id, "widget-1");
    assert_eq!(config.api_base_url, "https://widget.eliteprospects.com");
    assert_eq!(config.get("playerId"), Some("5"));
    assert_eq!(config.get("widgetType"), Some("player"));
    assert_eq!(config.get("apiBaseUrl"), None);

    let json = serde_json::to_value(&config).expect("serialize config");
    assert_eq!(json["widgetId"], "widget-1");
    assert_eq!(json["playerId"], "5");
}

#[test]
fn validation_reports_first_missing_key() {
    let descriptor = WidgetContainerDescriptor::new(
        0,
        attrs(&[("data-widget-type", "scoring-leaders"), ("data-league-slug", "shl")]),
    )
    .expect("descriptor");
    let config = descriptor.config("data-", "");

    assert_eq!(
        validate_config(WidgetType::ScoringLeaders, &config),
        Err(WidgetError::MissingAttribute {
            widget: WidgetType::ScoringLeaders,
            attribute: "data-season".to_string(),
        })
    );
    assert_eq!(validate_config(WidgetType::League, &config), Ok(()));
}

#[test]
fn color_scheme_overlays_config() {
    let descriptor = WidgetContainerDescriptor::new(
        0,
        attrs(&[
            ("data-widget-type", "league"),
            ("data-background-color", "#112233"),
            ("data-text-color", ""),
        ]),
    )
    .expect("descriptor");
    let scheme = ColorScheme::from_config(&descriptor.config("data-", ""));

    assert_eq!(scheme.background_color, "#112233");
    assert_eq!(scheme.text_color, "#000000");
    assert_eq!(scheme.name_text_color, "#0D73A6");
}

#[test]
fn widget_type_round_trips_through_names() {
    for kind in WidgetType::ALL {
        assert_eq!(kind.as_str().parse::<WidgetType>(), Ok(kind));
    }
}

#[test]
fn loader_markers_stay_out_of_config() {
    let descriptor = WidgetContainerDescriptor::new(
        0,
        attrs(&[
            ("class", "ep-widget"),
            ("data-widget-type", "player"),
            ("data-player-id", "5"),
            ("data-widget-id", "widget-0"),
            ("data-widget-error", "true"),
            ("data-widget-ready", "true"),
        ]),
    )
    .expect("Không tạo được descriptor");

    let config = descriptor.config("data-", "https://widget.eliteprospects.com");
    assert_eq!(config.get("widgetError"), None);
    assert_eq!(config.get("widgetReady"), None);
    assert_eq!(config.api_path(WidgetType::Player), "/api/player?playerId=5");
}
