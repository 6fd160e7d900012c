use std::sync::Arc;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};

use crate::system::snapshot::ChartSnapshot;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Snapshot(Arc<ChartSnapshot>),
    /// The sampler worker has exited and will publish nothing more.
    WorkerStopped,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(mut snapshots: watch::Receiver<Arc<ChartSnapshot>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut worker_alive = true;

            loop {
                tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                let mapped = match evt {
                                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                                    _ => None,
                                };
                                if let Some(e) = mapped
                                    && tx.send(e).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                    changed = snapshots.changed(), if worker_alive => {
                        let event = match changed {
                            Ok(()) => Event::Snapshot(snapshots.borrow_and_update().clone()),
                            Err(_) => {
                                worker_alive = false;
                                Event::WorkerStopped
                            }
                        };
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
