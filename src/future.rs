//! Completable futures shared between a producer of a result and any number
//! of waiters.

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll, Waker};

use futures::future::FusedFuture;
use parking_lot::Mutex;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FutureError {
    #[error("Future was cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

pub type Outcome<T> = Result<T, FutureError>;

type Callback<T> = Box<dyn FnOnce(&Outcome<T>) + Send>;

struct State<T> {
    outcome: Option<Outcome<T>>,
    wakers: Vec<Waker>,
    callbacks: Vec<Callback<T>>,
}

/// A future that is completed explicitly.
///
/// Clones share the same result. Only the first call to
/// [`complete`](Self::complete), [`complete_exceptionally`](Self::complete_exceptionally)
/// or [`cancel`](Self::cancel) has an effect.
pub struct KafkaFuture<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for KafkaFuture<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for KafkaFuture<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                outcome: None,
                wakers: vec![],
                callbacks: vec![],
            })),
        }
    }
}

impl<T> Debug for KafkaFuture<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        let status = match &state.outcome {
            None => "pending",
            Some(Ok(_)) => "completed",
            Some(Err(FutureError::Cancelled)) => "cancelled",
            Some(Err(FutureError::Failed(_))) => "failed",
        };
        f.debug_struct("KafkaFuture")
            .field("status", &status)
            .finish_non_exhaustive()
    }
}

impl<T> KafkaFuture<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// A future that is already completed with `value`.
    pub fn completed(value: T) -> Self {
        let f = Self::new();
        f.complete(value);
        f
    }

    pub fn complete(&self, value: T) -> bool {
        self.finish(Ok(value))
    }

    pub fn complete_exceptionally(
        &self,
        error: Arc<dyn std::error::Error + Send + Sync>,
    ) -> bool {
        self.finish(Err(FutureError::Failed(error)))
    }

    pub fn cancel(&self) -> bool {
        self.finish(Err(FutureError::Cancelled))
    }

    fn finish(&self, outcome: Outcome<T>) -> bool {
        let (wakers, callbacks) = {
            let mut state = self.state.lock();
            if state.outcome.is_some() {
                return false;
            }
            state.outcome = Some(outcome.clone());
            (
                std::mem::take(&mut state.wakers),
                std::mem::take(&mut state.callbacks),
            )
        };

        for callback in callbacks {
            callback(&outcome);
        }
        for waker in wakers {
            waker.wake();
        }
        true
    }

    pub fn is_done(&self) -> bool {
        self.state.lock().outcome.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.state.lock().outcome, Some(Err(FutureError::Cancelled)))
    }

    /// Completed with an error, including cancellation.
    pub fn is_completed_exceptionally(&self) -> bool {
        matches!(self.state.lock().outcome, Some(Err(_)))
    }

    /// The result if done, otherwise `value_if_absent`.
    pub fn now(&self, value_if_absent: T) -> Outcome<T> {
        self.state
            .lock()
            .outcome
            .clone()
            .unwrap_or(Ok(value_if_absent))
    }

    /// Run `callback` once the future is done, immediately if it already is.
    pub fn when_complete<F>(&self, callback: F)
    where
        F: FnOnce(&Outcome<T>) + Send + 'static,
    {
        let outcome = {
            let mut state = self.state.lock();
            match state.outcome.clone() {
                Some(outcome) => outcome,
                None => {
                    state.callbacks.push(Box::new(callback));
                    return;
                }
            }
        };
        callback(&outcome);
    }

    /// A future completed with `f` applied to this one's value. Errors pass
    /// through unchanged.
    pub fn then_apply<U, F>(&self, f: F) -> KafkaFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let next = KafkaFuture::new();
        let target = next.clone();
        self.when_complete(move |outcome| {
            target.finish(outcome.clone().map(f));
        });
        next
    }
}

impl<T> Future for KafkaFuture<T>
where
    T: Clone,
{
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.lock();
        if let Some(outcome) = &state.outcome {
            return Poll::Ready(outcome.clone());
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

impl<T> FusedFuture for KafkaFuture<T>
where
    T: Clone,
{
    fn is_terminated(&self) -> bool {
        self.state.lock().outcome.is_some()
    }
}

/// A future that completes once all `futures` have, failing with the first
/// error that occurs.
pub fn all_of<T>(futures: &[KafkaFuture<T>]) -> KafkaFuture<()>
where
    T: Clone + Send + 'static,
{
    let all = KafkaFuture::new();
    if futures.is_empty() {
        all.complete(());
        return all;
    }

    let remaining = Arc::new(AtomicUsize::new(futures.len()));
    for f in futures {
        let all = all.clone();
        let remaining = Arc::clone(&remaining);
        f.when_complete(move |outcome| match outcome {
            Ok(_) => {
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    all.complete(());
                }
            }
            Err(e) => {
                all.finish(Err(e.clone()));
            }
        });
    }
    all
}
