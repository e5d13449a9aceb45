use std::sync::Arc;

use logger::{ALL_GROUP, GLOBAL_GROUP, Group, LogLevels, Logger, LoggerOptions};

use crate::support::Recorder;

#[tokio::test]
async fn named_group_and_global_each_fire_once() {
    let mut logger = Logger::default();
    let custom = Recorder::new("custom", LogLevels::ALL);
    let global = Recorder::new("global", LogLevels::ALL);
    let all = Recorder::new("all", LogLevels::ALL);
    logger.add_group_transport(Some("custom"), Arc::clone(&custom.transport));
    logger.add_global_transport(Arc::clone(&global.transport));
    logger.add_transport(Arc::clone(&all.transport));

    logger.info_group("custom", ["x"]);
    logger.flush().await;

    assert_eq!(custom.seen(), ["x"]);
    assert_eq!(global.seen(), ["x"]);
    assert_eq!(all.count(), 0);
}

#[tokio::test]
async fn every_verb_routes_with_its_level() {
    let mut logger = Logger::new(LoggerOptions::default().with_global_level(LogLevels::NONE));
    let errors = Recorder::new("errors", LogLevels::ERROR);
    let traces = Recorder::new("traces", LogLevels::TRACE);
    logger.make_group("svc", LogLevels::NONE);
    logger.get_group(ALL_GROUP).set_log_level(LogLevels::NONE);
    logger.add_group_transport(Some("svc"), Arc::clone(&errors.transport));
    logger.add_group_transport(Some("svc"), Arc::clone(&traces.transport));

    logger
        .error_group("svc", ["e"])
        .warn_group("svc", ["w"])
        .info_group("svc", ["i"])
        .debug_group("svc", ["d"])
        .trace_group("svc", ["t"]);
    logger.error(["unrouted"]);
    logger.flush().await;

    assert_eq!(errors.seen(), ["e"]);
    assert_eq!(traces.seen(), ["t"]);
}

#[tokio::test]
async fn disabled_group_is_silent_but_global_still_fires() {
    let mut logger = Logger::default();
    let custom = Recorder::new("custom", LogLevels::ALL);
    let global = Recorder::new("global", LogLevels::ALL);
    logger.add_group_transport(Some("custom"), Arc::clone(&custom.transport));
    logger.add_global_transport(Arc::clone(&global.transport));
    logger.disable_group("custom");

    logger.dispatch(Some("custom"), LogLevels::ERROR, ["muted"]).await;

    assert_eq!(custom.count(), 0);
    assert_eq!(global.seen(), ["muted"]);
}

#[test]
fn same_transport_in_two_groups_is_tracked_independently() {
    let recorder = Recorder::new("shared", LogLevels::ALL);
    let mut first = Group::new("first", LogLevels::NONE, true);
    let mut second = Group::new("second", LogLevels::NONE, true);

    assert!(first.add_transport(Arc::clone(&recorder.transport)));
    assert!(!first.add_transport(Arc::clone(&recorder.transport)));
    assert_eq!(first.len(), 1);
    assert!(second.add_transport(Arc::clone(&recorder.transport)));

    assert!(first.remove_transport(&recorder.transport));
    assert!(second.contains(&recorder.transport));
}

#[test]
fn clear_all_forgets_named_groups() {
    let mut logger = Logger::default();
    logger.get_group("custom");
    assert_eq!(logger.group_keys(), [ALL_GROUP, GLOBAL_GROUP, "custom"]);

    logger.clear_all();

    assert_eq!(logger.group_keys(), [ALL_GROUP, GLOBAL_GROUP]);
    assert!(logger.group("custom").is_none());
    assert_eq!(logger.get_group("custom").len(), 0);
    assert_eq!(logger.group_keys(), [ALL_GROUP, GLOBAL_GROUP, "custom"]);
}

#[test]
fn lazily_created_groups_follow_start_policy() {
    let mut logger = Logger::new(LoggerOptions::default().with_groups_start_enabled(false));
    assert!(!logger.get_group("late").is_enabled());
    assert!(logger.group(ALL_GROUP).unwrap().is_enabled());
}
