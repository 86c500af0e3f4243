//! Completion notifications through weak callbacks.
//!
//! A handler sends messages on background threads and reports completion
//! through a `sync::WeakFn`. The first caller's callback is dropped before
//! its message finishes sending, so its notification silently disappears;
//! the second caller is still around and hears back.
//!
//! Run with `RUST_LOG=debug` to see the allocator's own log lines.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Sender};
use tether::sync;
use tracing_subscriber::EnvFilter;

/// Sends messages on worker threads and notifies on completion.
#[derive(Default)]
struct MessageHandler {
    workers: Vec<JoinHandle<()>>,
}

impl MessageHandler {
    fn send_message(&mut self, message: String, on_sent: sync::WeakFn) {
        self.workers.push(thread::spawn(move || {
            tracing::info!(%message, "sending");
            thread::sleep(Duration::from_millis(200));
            on_sent.call(());
        }));
    }
}

impl Drop for MessageHandler {
    fn drop(&mut self) {
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn notifier(label: &'static str, events: &Sender<&'static str>) -> sync::StrongFn {
    let events = events.clone();
    sync::StrongFn::new(move || {
        let _ = events.send(label);
    })
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let (events_tx, events_rx) = unbounded();
    let mut handler = MessageHandler::default();

    {
        let on_sent = notifier("First message sent", &events_tx);
        handler.send_message("Hello".into(), on_sent.downgrade());
    }

    let on_sent = notifier("Second message sent", &events_tx);
    handler.send_message("Hello, world".into(), on_sent.downgrade());

    drop(handler);
    drop(events_tx);
    drop(on_sent);

    for event in events_rx.iter() {
        println!("{event}");
    }
    println!("{:?}", sync::stats());
}
