//! Out-of-band delivery of per-record parse failures
use std::fmt;

use crate::error::ParseFailure;

type Observer<'a> = Box<dyn Fn(&ParseFailure) + 'a>;

/// Observers for parse failures, passed explicitly into an enumeration.
///
/// Each registered observer sees every failure of an enumeration exactly
/// once. With no observers failures are dropped.
#[derive(Default)]
pub struct ErrorChannel<'a> {
    observers: Vec<Observer<'a>>,
}

impl<'a> ErrorChannel<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel nobody listens to
    pub fn silent() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn subscribe<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&ParseFailure) + 'a,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Builder form of [`ErrorChannel::subscribe`]
    pub fn with<F>(mut self, observer: F) -> Self
    where
        F: Fn(&ParseFailure) + 'a,
    {
        self.subscribe(observer);
        self
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver one failure to every observer
    pub fn report(&self, failure: &ParseFailure) {
        tracing::debug!("{}", failure);
        for observer in &self.observers {
            observer(failure);
        }
    }
}

impl fmt::Debug for ErrorChannel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorChannel")
            .field("observers", &self.observers.len())
            .finish()
    }
}
