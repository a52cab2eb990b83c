use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::system::snapshot::Frame;

const HOUSEKEEPING: Duration = Duration::from_millis(250);

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Sample(Box<Frame>),
    /// Periodic wakeup used to expire status messages.
    Tick,
}

/// Merges terminal input and sampler frames into one stream for the UI loop.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(mut frames: mpsc::UnboundedReceiver<Frame>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut tick_interval = tokio::time::interval(HOUSEKEEPING);

            loop {
                let next = tokio::select! {
                    maybe_event = reader.next() => match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        Some(Ok(CrosstermEvent::Resize(_, _))) => Some(Event::Resize),
                        Some(Ok(_)) => None,
                        Some(Err(err)) => {
                            tracing::error!("terminal input failed: {err}");
                            break;
                        }
                        None => break,
                    },
                    frame = frames.recv() => match frame {
                        Some(frame) => Some(Event::Sample(Box::new(frame))),
                        None => {
                            tracing::warn!("sampler channel closed");
                            break;
                        }
                    },
                    _ = tick_interval.tick() => Some(Event::Tick),
                };
                if let Some(e) = next
                    && tx.send(e).is_err()
                {
                    break;
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
