//! Weighted variant assignment
//!
//! A visitor keeps the first variant drawn for an experiment. The draw is
//! weighted, persisted under `ab_test_{experiment}` and reported once with an
//! `ab_test_assignment` event; later reads return the stored variant silently.

use std::sync::Arc;

use beacon_core::{Emitter, Event, EventKind};
use tracing::{debug, warn};

use crate::experiment::{Experiment, Variant};
use crate::random::{RandomSource, ThreadRandom};
use crate::store::AssignmentStore;

/// Pick a variant for a uniform draw `unit` in `[0, 1)`.
///
/// Walks the variants subtracting weights from `unit * total` and selects the
/// first one that brings the remainder to zero or below. A total that is not
/// a positive finite number selects the first variant, as does an empty
/// remainder at the very start.
pub fn select_weighted<P>(variants: &[Variant<P>], unit: f64) -> Option<&Variant<P>> {
    let first = variants.first()?;
    let total: f64 = variants.iter().map(|v| v.weight).sum();
    if !total.is_finite() || total <= 0.0 {
        return Some(first);
    }

    let mut remaining = unit.clamp(0.0, 1.0) * total;
    for variant in variants {
        remaining -= variant.weight;
        if remaining <= 0.0 {
            return Some(variant);
        }
    }
    // Floating residue past the last weight.
    variants.last()
}

/// Result of an assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment<'a, P> {
    pub experiment: &'a str,
    pub variant: &'a Variant<P>,
    /// Whether the variant was drawn on this call rather than read back.
    pub fresh: bool,
}

/// Assigns visitors to experiment variants.
pub struct Assigner {
    store: Arc<dyn AssignmentStore>,
    emitter: Arc<Emitter>,
    random: Arc<dyn RandomSource>,
}

impl Assigner {
    /// Assigner drawing from the thread-local generator.
    pub fn new(store: Arc<dyn AssignmentStore>, emitter: Arc<Emitter>) -> Self {
        Self {
            store,
            emitter,
            random: Arc::new(ThreadRandom),
        }
    }

    #[must_use]
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// The variant this visitor sees for `experiment`.
    pub fn assign<'a, P>(&self, experiment: &'a Experiment<P>) -> &'a Variant<P> {
        self.assign_with_outcome(experiment).variant
    }

    /// Like [`Assigner::assign`], also reporting whether the draw was fresh.
    ///
    /// Read-then-write is not atomic: concurrent first-time callers for the
    /// same experiment may each draw, and the last write wins.
    pub fn assign_with_outcome<'a, P>(&self, experiment: &'a Experiment<P>) -> Assignment<'a, P> {
        let key = experiment.storage_key();

        if let Some(stored) = self.read(&key) {
            let variant = experiment.find(&stored).unwrap_or_else(|| {
                debug!(
                    experiment = experiment.name(),
                    stored = %stored,
                    "Stored variant no longer exists, using first"
                );
                experiment.first()
            });
            return Assignment {
                experiment: experiment.name(),
                variant,
                fresh: false,
            };
        }

        let unit = self.random.next_unit();
        let variant = select_weighted(experiment.variants(), unit).unwrap_or(experiment.first());

        if let Err(e) = self.store.set(&key, &variant.name) {
            warn!(key = %key, error = %e, "Failed to persist assignment");
        }
        debug!(
            experiment = experiment.name(),
            variant = %variant.name,
            "Assigned variant"
        );
        self.emitter.emit(Event::new(EventKind::AbTestAssignment {
            test_name: experiment.name().to_string(),
            variant: variant.name.clone(),
        }));

        Assignment {
            experiment: experiment.name(),
            variant,
            fresh: true,
        }
    }

    /// Stored variant name; read errors and empty values count as absent.
    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(Some(name)) if !name.is_empty() => Some(name),
            Ok(_) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read assignment");
                None
            }
        }
    }
}
