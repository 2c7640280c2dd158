//! Async driver for the booking form
//!
//! The session owns the current `BookingState`, runs the commands each transition
//! emits and feeds their results back in as events. Every task it spawns lives in
//! a `JoinSet` owned by the session, so shutting down or dropping the session
//! aborts pending bookings and banner timers before they can report back.

use super::backend::BookingBackend;
use super::error::BookingError;
use super::machine::{BookingState, Command, FormEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

pub struct BookingSession {
    state: BookingState,
    backend: Arc<dyn BookingBackend>,
    banner_timeout: Duration,
    sender: mpsc::UnboundedSender<FormEvent>,
    receiver: mpsc::UnboundedReceiver<FormEvent>,
    tasks: JoinSet<()>,
}

impl BookingSession {
    pub fn new(state: BookingState, backend: Arc<dyn BookingBackend>, banner_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        info!(backend = backend.name(), "Booking session started");
        Self {
            state,
            backend,
            banner_timeout,
            sender,
            receiver,
            tasks: JoinSet::new(),
        }
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    /// Apply an event and start whatever work it asks for
    pub fn dispatch(&mut self, event: FormEvent) {
        let (next, commands) = self.state.clone().apply(event);
        self.state = next;
        for command in commands {
            self.execute(command);
        }
        self.reap();
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Book(request) => {
                let backend = Arc::clone(&self.backend);
                let sender = self.sender.clone();
                debug!(ticket = %request.ticket, "Starting booking");
                self.tasks.spawn(async move {
                    let outcome = backend.book(&request).await;
                    let _ = sender.send(FormEvent::Resolved {
                        ticket: request.ticket,
                        outcome,
                    });
                });
            }
            Command::DismissBannerAfter(id) => {
                let sender = self.sender.clone();
                let timeout = self.banner_timeout;
                self.tasks.spawn(async move {
                    tokio::time::sleep(timeout).await;
                    let _ = sender.send(FormEvent::BannerExpired(id));
                });
            }
        }
    }

    /// Drop bookkeeping for tasks that already finished
    fn reap(&mut self) {
        while self.tasks.try_join_next().is_some() {}
    }

    /// Wait for the next event produced by a background task
    pub async fn next_event(&mut self) -> Option<FormEvent> {
        self.receiver.recv().await
    }

    /// Process background events until no booking is pending
    pub async fn settle(&mut self) {
        while self.state.is_loading() {
            match self.next_event().await {
                Some(event) => self.dispatch(event),
                None => break,
            }
        }
    }

    /// Number of background tasks still running
    #[cfg(test)]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Cancel everything in flight. A pending booking resolves as cancelled so
    /// the form leaves the loading state without reporting an outcome.
    pub fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            info!(tasks = self.tasks.len(), "Cancelling pending booking work");
        }
        self.tasks.abort_all();

        if let Some(ticket) = self.state.pending_ticket() {
            self.dispatch(FormEvent::Resolved {
                ticket,
                outcome: Err(BookingError::Cancelled),
            });
        }
    }
}

impl Drop for BookingSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
