use widget_core::attributes::{WidgetConfig, WidgetContainerDescriptor};
use widget_core::bootstrap::{inline_error_text, mount_all, MountOutcome, WidgetMount};
use widget_core::{validate_config, EnvironmentContext, LoaderConfig, WidgetError};

#[derive(Default)]
struct RecordingMount {
    mounted: Vec<(usize, String, WidgetConfig)>,
}

impl WidgetMount for RecordingMount {
    fn mount(
        &mut self,
        index: usize,
        descriptor: &WidgetContainerDescriptor,
        config: &WidgetConfig,
    ) -> Result<(), WidgetError> {
        validate_config(descriptor.widget_type, config)?;
        self.mounted
            .push((index, descriptor.widget_id.clone(), config.clone()));
        Ok(())
    }
}

fn container(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn failing_widget_does_not_block_siblings() {
    let env = EnvironmentContext::resolve(None, &LoaderConfig::default());
    let mut mounter = RecordingMount::default();

    let outcomes = mount_all(
        vec![
            container(&[("class", "ep-widget"), ("data-widget-type", "player")]),
            container(&[
                ("class", "ep-widget"),
                ("data-widget-type", "team"),
                ("data-team-id", "64"),
            ]),
        ],
        0,
        &env,
        &LoaderConfig::default(),
        &mut mounter,
    );

    assert_eq!(outcomes.len(), 2);
    assert!(matches!(
        &outcomes[0],
        MountOutcome::Failed { index: 0, error: WidgetError::MissingAttribute { .. } }
    ));
    assert_eq!(
        outcomes[1],
        MountOutcome::Mounted {
            widget_id: "widget-1".to_string()
        }
    );

    let (index, widget_id, config) = &mounter.mounted[0];
    assert_eq!(*index, 1);
    assert_eq!(widget_id, "widget-1");
    assert_eq!(config.api_base_url, "https://widget.eliteprospects.com");
    assert_eq!(config.get("teamId"), Some("64"));
}

#[test]
fn unknown_type_is_reported_per_container() {
    let env = EnvironmentContext::resolve(None, &LoaderConfig::default());
    let mut mounter = RecordingMount::default();

    let outcomes = mount_all(
        vec![
            container(&[("data-widget-type", "curling")]),
            container(&[("data-widget-type", "league"), ("data-league-slug", "shl")]),
            container(&[("data-widget-type", "league"), ("data-league-slug", "nhl")]),
        ],
        0,
        &env,
        &LoaderConfig::default(),
        &mut mounter,
    );

    let mounted: Vec<bool> = outcomes.iter().map(MountOutcome::is_mounted).collect();
    assert_eq!(mounted, vec![false, true, true]);
    assert_eq!(mounter.mounted.len(), 2);
}

#[test]
fn inline_error_mentions_attribute() {
    let text = inline_error_text(&WidgetError::MissingAttribute {
        widget: widget_core::WidgetType::Player,
        attribute: "data-player-id".to_string(),
    });
    assert_eq!(
        text,
        "Error loading widget: player widget requires the data-player-id attribute"
    );
}

#[test]
fn later_scans_continue_the_ordinals() {
    let env = EnvironmentContext::resolve(None, &LoaderConfig::default());
    let config = LoaderConfig::default();
    let mut mounter = RecordingMount::default();

    let first = mount_all(
        vec![container(&[("data-widget-type", "team"), ("data-team-id", "64")])],
        0,
        &env,
        &config,
        &mut mounter,
    );
    let second = mount_all(
        vec![container(&[("data-widget-type", "team"), ("data-team-id", "12")])],
        first.len(),
        &env,
        &config,
        &mut mounter,
    );

    assert_eq!(first[0], MountOutcome::Mounted { widget_id: "widget-0".to_string() });
    assert_eq!(second[0], MountOutcome::Mounted { widget_id: "widget-1".to_string() });
    let ids: Vec<&str> = mounter.mounted.iter().map(|(_, id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["widget-0", "widget-1"]);
}
