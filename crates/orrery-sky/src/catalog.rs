//! The set of tracked objects built from one element-text load.

use tracing::{info, warn};

use crate::elements::{OrbitalElementSet, parse_element_sets};
use crate::error::PropagationError;
use crate::instant::SimInstant;
use crate::propagator::{InertialPosition, OrbitalState};

/// Index of an element set in the loaded text, in source order.
pub type ObjectId = usize;

/// An element set whose orbital state was built successfully.
#[derive(Clone, Debug)]
pub struct TrackedObject {
    /// Source-order index.
    pub id: ObjectId,
    /// Cached propagator state.
    pub state: OrbitalState,
}

/// An element set that could not be turned into an orbital state.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedElementSet {
    /// Source-order index.
    pub id: ObjectId,
    /// Display name from the text.
    pub name: String,
    /// Why it was rejected.
    pub error: PropagationError,
}

/// Per-object propagation outcome for one instant.
pub type PropagationOutcome = (ObjectId, Result<InertialPosition, PropagationError>);

/// Immutable collection of orbital states, built once per data load.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    objects: Vec<TrackedObject>,
    rejected: Vec<RejectedElementSet>,
}

impl Catalog {
    /// Build states for every element set. Failures are recorded, not fatal.
    pub fn from_element_sets(sets: &[OrbitalElementSet]) -> Self {
        let mut objects = Vec::with_capacity(sets.len());
        let mut rejected = Vec::new();

        for (id, set) in sets.iter().enumerate() {
            match OrbitalState::build(set) {
                Ok(state) => objects.push(TrackedObject { id, state }),
                Err(error) => {
                    warn!(id, name = %set.name, %error, "Rejected element set");
                    rejected.push(RejectedElementSet {
                        id,
                        name: set.name.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            tracked = objects.len(),
            rejected = rejected.len(),
            "Built orbital catalog"
        );

        Self { objects, rejected }
    }

    /// Parse raw element text and build the catalog.
    pub fn from_text(raw: &str) -> Self {
        Self::from_element_sets(&parse_element_sets(raw))
    }

    /// Objects with a valid state, in source order.
    pub fn objects(&self) -> &[TrackedObject] {
        &self.objects
    }

    /// Element sets that failed to build, in source order.
    pub fn rejected(&self) -> &[RejectedElementSet] {
        &self.rejected
    }

    /// Number of tracked objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no object could be tracked.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of element sets the catalog was built from.
    pub fn total_element_sets(&self) -> usize {
        self.objects.len() + self.rejected.len()
    }

    /// Look up a tracked object by its source index.
    pub fn get(&self, id: ObjectId) -> Option<&TrackedObject> {
        self.objects
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|i| &self.objects[i])
    }

    /// Propagate every tracked object to the same instant.
    ///
    /// Outcomes are returned in catalog order regardless of how the work is
    /// scheduled.
    #[cfg(not(feature = "parallel"))]
    pub fn propagate_all(&self, instant: SimInstant) -> Vec<PropagationOutcome> {
        self.objects
            .iter()
            .map(|o| (o.id, o.state.propagate(instant)))
            .collect()
    }

    /// Propagate every tracked object to the same instant.
    ///
    /// Outcomes are returned in catalog order regardless of how the work is
    /// scheduled.
    #[cfg(feature = "parallel")]
    pub fn propagate_all(&self, instant: SimInstant) -> Vec<PropagationOutcome> {
        use rayon::prelude::*;

        self.objects
            .par_iter()
            .map(|o| (o.id, o.state.propagate(instant)))
            .collect()
    }
}
