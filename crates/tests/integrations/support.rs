use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use logger::Transport;
use transport::ActionResult;

/// Transport recording the body of every message it receives.
pub struct Recorder {
    pub transport: Arc<Transport>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new(id: &str, level: u64) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let transport = Transport::builder()
            .id(id)
            .levels(level)
            .sync_action(move |message| {
                sink.lock().unwrap().push(message.message().to_owned());
                Ok(true)
            })
            .build()
            .unwrap();
        Self { transport: Arc::new(transport), seen }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

/// Transport whose action always fails.
pub fn failing(id: &str, level: u64) -> Arc<Transport> {
    fn fail(_: &logger::Message) -> ActionResult {
        Err("sink rejected message".into())
    }
    Arc::new(Transport::builder().id(id).levels(level).sync_action(fail).build().unwrap())
}

/// Transport whose action panics.
pub fn panicking(id: &str, level: u64, calls: &Arc<AtomicUsize>) -> Arc<Transport> {
    let calls = Arc::clone(calls);
    Arc::new(
        Transport::builder()
            .id(id)
            .levels(level)
            .sync_action(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                panic!("transport crashed")
            })
            .build()
            .unwrap(),
    )
}
