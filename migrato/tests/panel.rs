mod common;

use migrato::{
    ConfigBuilder, MemoryCatalog, MemoryHistory, Panel, RebuildReason, SortOrder, Status,
    UpdateOutcome,
};
use tracing_test::traced_test;

use crate::common::{fixtures, leaf_names, t1, FailingHistory, Rendered, APP};

#[tokio::test]
#[traced_test]
async fn first_activation_forces_rebuild() {
    let (catalog, history) = fixtures();
    let mut panel = Panel::new(catalog, history);

    assert_eq!(
        panel.activate().await,
        UpdateOutcome::Rebuilt {
            reason: RebuildReason::Forced,
            locations: 1,
            leaves: 2,
        }
    );
    assert!(panel.is_activated());
    assert!(logs_contain("tree rebuilt (forced)"));

    panel.tree_mut().set_checked(APP, "m_002_add_email", true);
    panel.tree_mut().set_expanded(APP, true);
    let before = panel.tree().clone();

    assert_eq!(panel.activate().await, UpdateOutcome::Unchanged);
    assert_eq!(panel.tree(), &before);
}

#[tokio::test]
async fn refresh_before_activation_is_initial() {
    let (catalog, history) = fixtures();
    let mut panel = Panel::new(catalog, history);

    assert!(matches!(
        panel.refresh().await,
        UpdateOutcome::Rebuilt {
            reason: RebuildReason::Initial,
            ..
        }
    ));

    let users = panel.tree().leaf(APP, "m_001_create_users").unwrap();
    assert_eq!(users.status, Status::Applied);
    assert_eq!(users.applied_at, Some(t1()));
    assert_eq!(
        panel.tree().leaf(APP, "m_002_add_email").unwrap().status,
        Status::NotApplied
    );
}

#[tokio::test]
async fn identical_refreshes_keep_the_tree() {
    let (catalog, history) = fixtures();
    let rendered = Rendered::default();
    let mut panel = Panel::new(catalog, history).renderer(rendered.renderer());

    panel.activate().await;
    assert!(panel.set_checked(APP, "m_001_create_users", true));
    panel.tree_mut().select(APP, "m_002_add_email");

    for _ in 0..3 {
        assert_eq!(panel.refresh().await, UpdateOutcome::Unchanged);
    }

    assert_eq!(panel.tree().revision(), 1);
    assert_eq!(panel.tree().checked().len(), 1);
    assert_eq!(panel.tree().selected().unwrap().name, "m_002_add_email");
    assert_eq!(rendered.count(), 2);
}

#[tokio::test]
async fn checking_a_leaf_renders() {
    let (catalog, history) = fixtures();
    let rendered = Rendered::default();
    let mut panel = Panel::new(catalog, history).renderer(rendered.renderer());

    panel.activate().await;
    assert_eq!(rendered.count(), 1);

    assert!(panel.set_checked(APP, "m_002_add_email", true));
    assert_eq!(rendered.count(), 2);
    assert!(rendered.last().unwrap().leaf(APP, "m_002_add_email").unwrap().checked);

    assert!(!panel.set_checked(APP, "m_404_missing", true));
    assert_eq!(rendered.count(), 2);
}

#[tokio::test]
async fn applied_migration_rebuilds() {
    let (catalog, history) = fixtures();
    let mut panel = Panel::new(catalog, history.clone());

    panel.activate().await;
    panel.set_checked(APP, "m_002_add_email", true);

    history.apply("m_002_add_email", t1());

    assert!(matches!(
        panel.trigger(migrato::Trigger::Executed).await,
        UpdateOutcome::Rebuilt {
            reason: RebuildReason::Changed,
            ..
        }
    ));
    assert!(panel.tree().checked().is_empty());
    assert!(panel.tree().leaves().all(|leaf| leaf.status == Status::Applied));
}

#[tokio::test]
#[traced_test]
async fn unavailable_history_keeps_statuses() {
    let (catalog, history) = fixtures();
    let mut panel = Panel::new(catalog.clone(), history.clone());
    panel.activate().await;

    history.unavailable();
    assert_eq!(panel.refresh().await, UpdateOutcome::Unchanged);
    assert!(logs_contain("history unavailable, keeping previous statuses"));

    catalog.insert(APP, "m_003_add_phone");
    assert!(panel.refresh().await.is_rebuilt());

    let tree = panel.tree();
    assert_eq!(
        tree.leaf(APP, "m_001_create_users").unwrap().status,
        Status::Applied
    );
    assert_eq!(
        tree.leaf(APP, "m_003_add_phone").unwrap().status,
        Status::NotApplied
    );
}

#[tokio::test]
#[traced_test]
async fn history_errors_are_not_fatal() {
    let (catalog, _) = fixtures();
    let mut panel = Panel::new(catalog, FailingHistory);

    assert!(panel.activate().await.is_rebuilt());
    assert_eq!(panel.tree().leaves().count(), 2);
    assert!(panel
        .tree()
        .leaves()
        .all(|leaf| leaf.status == Status::NotApplied));
    assert!(logs_contain("connection refused"));
}

#[tokio::test]
async fn newest_first_config_and_order_toggle() {
    let (catalog, history) = fixtures();
    let config = ConfigBuilder::new().newest_first(true).build();
    let mut panel = Panel::new(catalog, history).config(config);

    assert_eq!(panel.order(), SortOrder::NewestFirst);

    panel.activate().await;
    assert_eq!(
        leaf_names(panel.tree()),
        ["m_002_add_email", "m_001_create_users"]
    );

    assert_eq!(
        panel.set_order(SortOrder::NewestFirst).await,
        UpdateOutcome::Unchanged
    );

    let toggled = panel.order().toggle();
    assert!(matches!(
        panel.set_order(toggled).await,
        UpdateOutcome::Rebuilt {
            reason: RebuildReason::Forced,
            ..
        }
    ));
    assert_eq!(
        leaf_names(panel.tree()),
        ["m_001_create_users", "m_002_add_email"]
    );
}

#[tokio::test]
#[traced_test]
async fn execution_failure_is_shown_until_next_pass() {
    let (catalog, history) = fixtures();
    let rendered = Rendered::default();
    let mut panel = Panel::new(catalog, history).renderer(rendered.renderer());

    panel.activate().await;
    panel.set_checked(APP, "m_002_add_email", true);

    assert!(panel.mark_failed(APP, "m_002_add_email"));
    assert!(!panel.mark_failed(APP, "m_404_missing"));
    assert!(logs_contain("not in the tree"));

    let last = rendered.last().unwrap();
    let leaf = last.leaf(APP, "m_002_add_email").unwrap();
    assert_eq!(leaf.status, Status::Failed);
    assert!(leaf.checked);
    assert_eq!(rendered.count(), 3);

    assert!(panel.refresh().await.is_rebuilt());
    assert_eq!(
        panel.tree().leaf(APP, "m_002_add_email").unwrap().status,
        Status::NotApplied
    );
}

#[tokio::test]
async fn removed_location_disappears() {
    let catalog = MemoryCatalog::new();
    catalog.insert("app", "m_001_a");
    catalog.insert("blog", "m_001_b");

    let history = MemoryHistory::new();
    history.ready();

    let mut panel = Panel::new(catalog.clone(), history);
    panel.activate().await;
    assert_eq!(panel.tree().len(), 2);

    catalog.remove_location("blog");
    assert!(panel.refresh().await.is_rebuilt());
    assert_eq!(panel.tree().len(), 1);
    assert!(panel.tree().location("blog").is_none());
    assert_eq!(panel.data_set().map(|data| data.len()), Some(1));
}

#[test]
fn config_defaults_and_serde() -> anyhow::Result<()> {
    let config: migrato::Config = serde_json::from_str(r#"{ "newest_first": true }"#)?;

    assert!(config.newest_first);
    assert_eq!(config.poll_interval, None);
    assert_eq!(config.channel_capacity, migrato::DEFAULT_CHANNEL_CAPACITY);
    assert_eq!(config.sort_order(), SortOrder::NewestFirst);

    let config = ConfigBuilder::new().channel_capacity(0).build();
    assert_eq!(config.channel_capacity, 1);
    assert_eq!(config, migrato::Config { channel_capacity: 1, ..Default::default() });

    Ok(())
}
