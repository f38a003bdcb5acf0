use crate::core::session::{DrawOutcome, Session};
use crate::domain::model::Range;
use crate::domain::ports::{Clock, ConfigProvider, RandomSource, Storage};
use crate::utils::error::{RandomizerError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawEvent {
    /// A draw was requested; show the placeholder.
    Pending { range: Range },
    Revealed(DrawOutcome),
    Failed { message: String },
    /// The result message timed out.
    MessageCleared,
    /// A newer trigger superseded the pending chain.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub reveal_delay: Duration,
    pub message_clear_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(500),
            message_clear_delay: Duration::from_millis(3000),
        }
    }
}

impl Timing {
    pub fn from_config<P: ConfigProvider>(config: &P) -> Self {
        Self {
            reveal_delay: config.reveal_delay(),
            message_clear_delay: config.message_clear_delay(),
        }
    }

    pub fn immediate() -> Self {
        Self {
            reveal_delay: Duration::ZERO,
            message_clear_delay: Duration::ZERO,
        }
    }
}

pub type SharedSession<S, R, C> = Arc<Mutex<Session<S, R, C>>>;

/// Runs the delayed reveal / message-clear chain for each draw. At most one
/// chain is live: triggering again cancels the previous one.
pub struct DrawScheduler<S, R, C>
where
    S: Storage + 'static,
    R: RandomSource + 'static,
    C: Clock + 'static,
{
    session: SharedSession<S, R, C>,
    timing: Timing,
    events: mpsc::UnboundedSender<DrawEvent>,
    pending: Option<JoinHandle<()>>,
}

impl<S, R, C> DrawScheduler<S, R, C>
where
    S: Storage + 'static,
    R: RandomSource + 'static,
    C: Clock + 'static,
{
    pub fn new(
        session: SharedSession<S, R, C>,
        timing: Timing,
    ) -> (Self, mpsc::UnboundedReceiver<DrawEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                session,
                timing,
                events,
                pending: None,
            },
            receiver,
        )
    }

    pub fn session(&self) -> SharedSession<S, R, C> {
        Arc::clone(&self.session)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Aborts the live chain, if any. Returns whether something was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                let _ = self.events.send(DrawEvent::Cancelled);
                true
            }
            _ => false,
        }
    }

    /// Starts a draw chain for the currently active range.
    pub async fn trigger(&mut self) -> Result<Range> {
        let range = self
            .session
            .lock()
            .await
            .active_range()
            .ok_or(RandomizerError::NoActiveRange)?;

        if self.cancel() {
            tracing::debug!("Superseded a pending draw");
        }
        let _ = self.events.send(DrawEvent::Pending { range });

        let session = Arc::clone(&self.session);
        let events = self.events.clone();
        let timing = self.timing;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(timing.reveal_delay).await;

            // detached: aborting the chain must not interrupt a draw halfway through recording
            let draw = tokio::spawn(async move {
                let mut guard = session.lock().await;
                let outcome = guard.draw().await;
                drop(guard);
                outcome
            });

            let event = match draw.await {
                Ok(Ok(outcome)) => DrawEvent::Revealed(outcome),
                Ok(Err(e)) => DrawEvent::Failed {
                    message: e.user_friendly_message(),
                },
                Err(e) => DrawEvent::Failed {
                    message: e.to_string(),
                },
            };
            let _ = events.send(event);

            tokio::time::sleep(timing.message_clear_delay).await;
            let _ = events.send(DrawEvent::MessageCleared);
        }));

        Ok(range)
    }

    /// Waits for the live chain to run to completion.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!("Draw task failed: {}", e);
                }
            }
        }
    }
}
