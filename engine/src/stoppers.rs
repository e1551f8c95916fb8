use std::time::Duration;

/// Running counters a search reports to its stoppers.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    pub visits: u64,
    pub playouts: u64,
    pub elapsed: Duration,
}

/// An independent stop condition for an in-progress search. Stoppers are
/// stateless and monotonic: once one reports true for some stats it reports
/// true for every later stats as well.
pub trait SearchStopper: Send {
    fn should_stop(&self, stats: &SearchStats) -> bool;
}

pub struct VisitsStopper {
    limit: u64,
}

impl VisitsStopper {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl SearchStopper for VisitsStopper {
    fn should_stop(&self, stats: &SearchStats) -> bool {
        stats.visits >= self.limit
    }
}

pub struct PlayoutsStopper {
    limit: u64,
}

impl PlayoutsStopper {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl SearchStopper for PlayoutsStopper {
    fn should_stop(&self, stats: &SearchStats) -> bool {
        stats.playouts >= self.limit
    }
}

pub struct TimeLimitStopper {
    limit: Duration,
}

impl TimeLimitStopper {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

impl SearchStopper for TimeLimitStopper {
    fn should_stop(&self, stats: &SearchStats) -> bool {
        stats.elapsed >= self.limit
    }
}

/// Composite of independent stoppers; fires as soon as any member fires.
/// Since members are one-shot monotonic triggers, composition order is
/// irrelevant. An empty chain never stops the search.
#[derive(Default)]
pub struct StopperChain {
    stoppers: Vec<Box<dyn SearchStopper>>,
}

impl StopperChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stopper: Box<dyn SearchStopper>) {
        self.stoppers.push(stopper);
    }

    pub fn is_empty(&self) -> bool {
        self.stoppers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stoppers.len()
    }
}

impl SearchStopper for StopperChain {
    fn should_stop(&self, stats: &SearchStats) -> bool {
        self.stoppers.iter().any(|s| s.should_stop(stats))
    }
}
