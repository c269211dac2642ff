//! Ranked fallback chains of extraction strategies.

use std::fmt;

use crate::html::Page;

/// Strategy name reported when a field fell back to its sentinel.
pub const SENTINEL_STRATEGY: &str = "sentinel";

type StrategyFn<T> = Box<dyn Fn(&Page<'_>) -> Option<T> + Send + Sync>;

/// One named heuristic for a field.
pub struct Strategy<T> {
    name: &'static str,
    run: StrategyFn<T>,
}

impl<T> Strategy<T> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> fmt::Debug for Strategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name).finish()
    }
}

/// A committed field value and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
    pub value: T,
    pub strategy: &'static str,
}

/// Ordered strategies for one field plus the predicate a candidate must pass.
///
/// Strategies are pure functions of the page, so a chain is deterministic for
/// identical markup.
pub struct Chain<T> {
    field: &'static str,
    strategies: Vec<Strategy<T>>,
    accept: fn(&T) -> bool,
}

impl<T> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("field", &self.field)
            .field("strategies", &self.strategies)
            .finish()
    }
}

impl<T> Chain<T> {
    #[must_use]
    pub fn new(field: &'static str, accept: fn(&T) -> bool) -> Self {
        Self {
            field,
            strategies: Vec::new(),
            accept,
        }
    }

    /// Append a strategy; it runs after every strategy added before it.
    #[must_use]
    pub fn with<F>(mut self, name: &'static str, run: F) -> Self
    where
        F: Fn(&Page<'_>) -> Option<T> + Send + Sync + 'static,
    {
        self.strategies.push(Strategy {
            name,
            run: Box::new(run),
        });
        self
    }

    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Strategy names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(Strategy::name)
    }

    /// Evaluate strategies in order and commit to the first accepted candidate.
    pub fn run(&self, page: &Page<'_>) -> Option<Extraction<T>> {
        for strategy in &self.strategies {
            match (strategy.run)(page) {
                Some(value) if (self.accept)(&value) => {
                    tracing::debug!(
                        id = %page.id(),
                        field = self.field,
                        strategy = strategy.name,
                        "Field extracted"
                    );
                    return Some(Extraction {
                        value,
                        strategy: strategy.name,
                    });
                }
                Some(_) => tracing::trace!(
                    id = %page.id(),
                    field = self.field,
                    strategy = strategy.name,
                    "Candidate rejected"
                ),
                None => tracing::trace!(
                    id = %page.id(),
                    field = self.field,
                    strategy = strategy.name,
                    "No match"
                ),
            }
        }
        None
    }

    /// Like [`Chain::run`], falling back to `sentinel` when nothing matched.
    pub fn run_or(&self, page: &Page<'_>, sentinel: impl FnOnce() -> T) -> Extraction<T> {
        self.run(page).unwrap_or_else(|| {
            tracing::debug!(id = %page.id(), field = self.field, "Falling back to sentinel");
            Extraction {
                value: sentinel(),
                strategy: SENTINEL_STRATEGY,
            }
        })
    }
}
