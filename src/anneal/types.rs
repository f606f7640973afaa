//! Progress reporting for the anneal loop.

/// State of the search after one proposal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressEvent {
    /// 1-based anneal pass within the solver's retry loop.
    pub attempt: usize,
    /// 0-based proposal index within the pass.
    pub iteration: usize,
    /// Temperature at which the proposal was judged.
    pub temperature: f64,
    /// Energy of the live grid after accept/revert.
    pub energy: f64,
    /// Lowest energy seen so far in this pass.
    pub best_energy: f64,
    /// Whether the proposed flip was kept.
    pub accepted: bool,
}

/// Receives a [`ProgressEvent`] after every proposal.
///
/// The search never depends on what the observer does with it. Closures
/// taking `&ProgressEvent` implement this trait.
///
/// ```
/// use boltzmann_tsp::anneal::{AnnealObserver, ProgressEvent};
///
/// let mut best = Vec::new();
/// let mut observer = |e: &ProgressEvent| best.push(e.best_energy);
/// observer.on_progress(&ProgressEvent {
///     attempt: 1,
///     iteration: 0,
///     temperature: 10.0,
///     energy: -1.0,
///     best_energy: -1.0,
///     accepted: true,
/// });
/// assert_eq!(best, vec![-1.0]);
/// ```
pub trait AnnealObserver {
    fn on_progress(&mut self, event: &ProgressEvent);
}

impl<F: FnMut(&ProgressEvent)> AnnealObserver for F {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AnnealObserver for NoopObserver {
    fn on_progress(&mut self, _event: &ProgressEvent) {}
}
