use widget_core::embed::{
    iframe_snippet, parse_query, script_snippet, widget_type_from_path, EmbedConfig, EmbedRequest,
};
use widget_core::{WidgetError, WidgetType};

#[test]
fn player_iframe_url() {
    let request = EmbedRequest::from_attributes([
        ("src", "https://widget.eliteprospects.com/widget-embed.js"),
        ("data-widget-type", "player"),
        ("data-player-id", "77237"),
        ("data-background-color", "#052D41"),
    ])
    .expect("Không tạo được embed request");

    assert_eq!(
        request.iframe_src(&EmbedConfig::default()),
        "https://widget.eliteprospects.com/embed/player?backgroundColor=%23052D41&playerId=77237"
    );
}

#[test]
fn missing_required_param_aborts() {
    let err = EmbedRequest::from_attributes([
        ("data-widget-type", "alumni"),
        ("data-team-ids", "[1,2]"),
    ])
    .expect_err("leagues missing");

    assert_eq!(
        err,
        WidgetError::MissingAttribute {
            widget: WidgetType::Alumni,
            attribute: "data-leagues".to_string(),
        }
    );
}

#[test]
fn blank_required_param_counts_as_missing() {
    let err = EmbedRequest::from_attributes([("data-widget-type", "team"), ("data-team-id", " ")])
        .expect_err("blank team id");
    assert!(matches!(err, WidgetError::MissingAttribute { .. }));
}

#[test]
fn unknown_or_absent_type_aborts() {
    assert!(matches!(
        EmbedRequest::from_attributes([("data-widget-type", "golf")]),
        Err(WidgetError::UnknownWidgetType(_))
    ));
    assert!(matches!(
        EmbedRequest::from_attributes([("data-player-id", "1")]),
        Err(WidgetError::UnknownWidgetType(_))
    ));
}

#[test]
fn query_round_trips_through_embed_page() {
    let request = EmbedRequest::from_attributes([
        ("data-widget-type", "alumni"),
        ("data-team-ids", "[1,2]"),
        ("data-leagues", r#"["shl","nhl"]"#),
        ("data-include-youth", "true"),
    ])
    .expect("request");
    let src = request.iframe_src(&EmbedConfig::default());
    let (path, query) = src
        .trim_start_matches("https://widget.eliteprospects.com")
        .split_once('?')
        .expect("query");

    assert_eq!(
        widget_type_from_path(path, &EmbedConfig::default()),
        Ok(WidgetType::Alumni)
    );
    assert_eq!(parse_query(query), request.params);
}

#[test]
fn embed_paths() {
    let config = EmbedConfig::default();
    assert_eq!(widget_type_from_path("/embed/goalie-leaders", &config), Ok(WidgetType::GoalieLeaders));
    assert_eq!(widget_type_from_path("/embed/team/", &config), Ok(WidgetType::Team));
    assert!(widget_type_from_path("/embed/", &config).is_err());
    assert!(widget_type_from_path("/embed/team/extra", &config).is_err());
    assert!(widget_type_from_path("/player", &config).is_err());
}

#[test]
fn snippets_escape_attributes() {
    let request = EmbedRequest::from_attributes([
        ("data-widget-type", "tournament"),
        ("data-tournaments", r#"["u18-wc"]"#),
        ("data-leagues", r#"["iihf"]"#),
    ])
    .expect("request");
    let config = EmbedConfig::default();

    let iframe = iframe_snippet(&request, &config);
    assert!(iframe.starts_with(r#"<iframe src="https://widget.eliteprospects.com/embed/tournament?"#));
    assert!(iframe.contains(r#"height="400""#));

    let script = script_snippet(&request, &config);
    assert!(script.contains(r#"data-widget-type="tournament""#));
    assert!(script.contains(r#"data-tournaments="[&quot;u18-wc&quot;]""#));
    assert!(script.ends_with("></script>"));
}

#[test]
fn embed_base_follows_script_origin() {
    let config = EmbedConfig::default().for_script("http://localhost:3000/widget-embed.js?v=2");
    assert_eq!(config.base_url, "http://localhost:3000");

    let fallback = EmbedConfig::default().for_script("widget-embed.js");
    assert_eq!(fallback.base_url, "https://widget.eliteprospects.com");
}

#[test]
fn processed_marker_is_not_forwarded() {
    let request = EmbedRequest::from_attributes([
        ("src", "https://widget.eliteprospects.com/widget-embed.js"),
        ("data-widget-type", "player"),
        ("data-player-id", "5"),
        ("data-ep-embedded", "true"),
    ])
    .expect("Không tạo được embed request");

    assert_eq!(
        request.iframe_src(&EmbedConfig::default()),
        "https://widget.eliteprospects.com/embed/player?playerId=5"
    );
}
