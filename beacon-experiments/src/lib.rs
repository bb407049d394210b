//! beacon-experiments: client-side A/B assignment
//!
//! An [`Experiment`] holds weighted [`Variant`]s. The [`Assigner`] draws one
//! per visitor, keeps it in an [`AssignmentStore`] and reports the first
//! assignment through the [`beacon_core::Emitter`].

pub mod assigner;
pub mod error;
pub mod experiment;
pub mod random;
pub mod store;

pub use assigner::{Assigner, Assignment, select_weighted};
pub use error::{ExperimentError, StoreError};
pub use experiment::{Experiment, Variant, storage_key};
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use store::{AssignmentStore, FileStore, MemoryStore};
