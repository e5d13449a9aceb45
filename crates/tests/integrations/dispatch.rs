use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use logger::{ALL_GROUP, DispatchReport, Group, LogLevels, Logger, LoggerOptions, Message};

use crate::support::{Recorder, failing, panicking};

#[tokio::test]
async fn failing_transport_is_isolated_from_siblings() {
    let mut group = Group::new("jobs", LogLevels::ALL, true);
    let healthy = Recorder::new("healthy", LogLevels::NONE);
    group.add_transport(failing("broken", LogLevels::NONE));
    group.add_transport(Arc::clone(&healthy.transport));

    let message = Arc::new(Message::create("t", LogLevels::ERROR, ["still", "delivered"]));
    let report = group.log(LogLevels::NONE, message).await;

    assert_eq!(healthy.seen(), ["still delivered"]);
    assert_eq!(report, DispatchReport { considered: 2, executed: 2, delivered: 1, failed: 1 });
}

#[tokio::test]
async fn panicking_transport_does_not_reach_caller() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut logger = Logger::default();
    let after = Recorder::new("after", LogLevels::ALL);
    logger.add_transport(panicking("crashy", LogLevels::ALL, &calls));
    logger.add_transport(Arc::clone(&after.transport));

    let report = logger.dispatch(None, LogLevels::WARN, ["careful"]).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(after.seen(), ["careful"]);
    assert_eq!(report.failed, 1);
    assert_eq!(report.delivered, 1);
}

#[tokio::test]
async fn end_to_end_or_of_masks() {
    let mut logger = Logger::new(
        LoggerOptions::default().with_global_level(LogLevels::NONE | LogLevels::ERROR),
    );
    let recorder = Recorder::new("t", LogLevels::ALL);
    assert!(logger.add_transport(Arc::clone(&recorder.transport)));

    logger.error(["x"]);
    logger.flush().await;
    assert_eq!(recorder.seen(), ["x"]);

    // INFO is absent from the global and group masks but present in the
    // transport mask, which is enough on its own.
    logger.info(["y"]);
    logger.flush().await;
    assert_eq!(recorder.seen(), ["x", "y"]);
}

#[tokio::test]
async fn restrictive_masks_filter_messages() {
    let mut logger = Logger::new(LoggerOptions::default().with_global_level(LogLevels::ERROR));
    let recorder = Recorder::new("quiet", LogLevels::NONE);
    logger.add_transport(Arc::clone(&recorder.transport));

    let report = logger.dispatch(None, LogLevels::INFO, ["dropped"]).await;
    assert_eq!(report.executed, 0);
    assert_eq!(report.considered, 1);

    logger.get_group(ALL_GROUP).enable_level(LogLevels::INFO);
    logger.dispatch(None, LogLevels::INFO, ["kept"]).await;
    assert_eq!(recorder.seen(), ["kept"]);
}

#[tokio::test]
async fn levelless_message_fires_nothing() {
    let mut logger = Logger::new(LoggerOptions::default().with_global_level(LogLevels::ALL));
    let recorder = Recorder::new("t", LogLevels::ALL);
    logger.add_transport(Arc::clone(&recorder.transport));
    logger.add_global_transport(Arc::clone(&recorder.transport));

    let report = logger.dispatch(None, LogLevels::NONE, ["nothing"]).await;

    assert_eq!(report.executed, 0);
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn slow_transport_delays_later_ones_in_same_group() {
    use std::sync::Mutex;

    let order = Arc::new(Mutex::new(Vec::new()));
    let mut logger = Logger::default();
    for (id, delay_ms) in [("slow", 20u64), ("fast", 0)] {
        let order = Arc::clone(&order);
        let transport = logger::Transport::builder()
            .id(id)
            .levels(LogLevels::ALL)
            .async_action(move |_| {
                let order = Arc::clone(&order);
                async move {
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                    order.lock().unwrap().push(id);
                    Ok::<_, transport::BoxError>(true)
                }
            })
            .build()
            .unwrap();
        logger.add_transport(Arc::new(transport));
    }

    logger.info(["go"]);
    logger.flush().await;

    assert_eq!(*order.lock().unwrap(), ["slow", "fast"]);
}
