use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Event handler that polls for terminal events
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            tick_rate,
        }
    }

    /// Spawn a task to poll for events
    pub fn start(&self) {
        let sender = self.sender.clone();
        let tick_rate = self.tick_rate;
        tokio::spawn(async move {
            loop {
                // Ticks keep the UI loop draining finished operations
                let event = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        // Windows reports releases too
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                        Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                        _ => continue,
                    },
                    _ => Event::Tick,
                };
                if sender.send(event).is_err() {
                    break;
                }
            }
        });
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
