//! Experiments and their weighted variants

use serde::{Deserialize, Serialize};

use crate::error::ExperimentError;

/// One arm of an experiment.
///
/// The payload is whatever the page renders for this arm: copy, a color,
/// or `()` when only the name matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant<P = ()> {
    pub name: String,
    pub weight: f64,
    pub payload: P,
}

impl<P> Variant<P> {
    pub fn new(name: impl Into<String>, weight: f64, payload: P) -> Self {
        Self {
            name: name.into(),
            weight,
            payload,
        }
    }
}

impl Variant<()> {
    /// A variant with no payload.
    pub fn named(name: impl Into<String>, weight: f64) -> Self {
        Self::new(name, weight, ())
    }
}

/// A named experiment with an ordered, non-empty list of variants.
///
/// Order matters: the first variant is the fallback whenever a draw cannot
/// be made or a stored assignment no longer matches.
///
/// Weights must be finite and non-negative. A zero weight is never drawn
/// unless every weight is zero, in which case the first variant wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment<P = ()> {
    name: String,
    variants: Vec<Variant<P>>,
}

impl<P> Experiment<P> {
    pub fn new(name: impl Into<String>, variants: Vec<Variant<P>>) -> Result<Self, ExperimentError> {
        let name = name.into();
        if variants.is_empty() {
            return Err(ExperimentError::NoVariants(name));
        }
        for (i, variant) in variants.iter().enumerate() {
            if !variant.weight.is_finite() || variant.weight < 0.0 {
                return Err(ExperimentError::InvalidWeight {
                    experiment: name,
                    variant: variant.name.clone(),
                    weight: variant.weight,
                });
            }
            if variants[..i].iter().any(|v| v.name == variant.name) {
                return Err(ExperimentError::DuplicateVariant {
                    experiment: name,
                    variant: variant.name.clone(),
                });
            }
        }
        Ok(Self { name, variants })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[Variant<P>] {
        &self.variants
    }

    /// The fallback variant.
    pub fn first(&self) -> &Variant<P> {
        // Non-empty by construction.
        &self.variants[0]
    }

    pub fn find(&self, name: &str) -> Option<&Variant<P>> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Sum of all variant weights.
    pub fn total_weight(&self) -> f64 {
        self.variants.iter().map(|v| v.weight).sum()
    }

    /// Key the assignment is stored under.
    pub fn storage_key(&self) -> String {
        storage_key(&self.name)
    }
}

/// Key an experiment's assignment is stored under.
pub fn storage_key(experiment: &str) -> String {
    format!("ab_test_{experiment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_variant_list_is_rejected() {
        let err = Experiment::<()>::new("hero_cta", vec![]).unwrap_err();
        assert_eq!(err, ExperimentError::NoVariants("hero_cta".into()));
    }

    #[test]
    fn duplicate_variant_names_are_rejected() {
        let err = Experiment::new(
            "hero_cta",
            vec![Variant::named("control", 1.0), Variant::named("control", 2.0)],
        )
        .unwrap_err();
        assert!(matches!(err, ExperimentError::DuplicateVariant { .. }));
    }

    #[test]
    fn negative_or_non_finite_weights_are_rejected() {
        let err = Experiment::new(
            "hero_cta",
            vec![
                Variant::named("a", 2.0),
                Variant::named("b", -1.0),
                Variant::named("c", 1.0),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExperimentError::InvalidWeight {
                experiment: "hero_cta".into(),
                variant: "b".into(),
                weight: -1.0,
            }
        );

        for weight in [f64::NAN, f64::INFINITY] {
            let result = Experiment::new("hero_cta", vec![Variant::named("a", weight)]);
            assert!(matches!(result, Err(ExperimentError::InvalidWeight { .. })));
        }
    }

    #[test]
    fn all_zero_weights_are_accepted() {
        let experiment = Experiment::new(
            "paused",
            vec![Variant::named("control", 0.0), Variant::named("bold", 0.0)],
        )
        .unwrap();
        assert_eq!(experiment.total_weight(), 0.0);
    }

    #[test]
    fn storage_key_is_prefixed() {
        let experiment = Experiment::new("hero_cta", vec![Variant::named("control", 1.0)]).unwrap();
        assert_eq!(experiment.storage_key(), "ab_test_hero_cta");
        assert_eq!(experiment.first().name, "control");
    }

    #[test]
    fn payload_travels_with_the_variant() {
        let experiment = Experiment::new(
            "headline",
            vec![
                Variant::new("control", 1.0, "Grow faster"),
                Variant::new("bold", 1.0, "GROW FASTER NOW"),
            ],
        )
        .unwrap();
        assert_eq!(experiment.find("bold").map(|v| v.payload), Some("GROW FASTER NOW"));
        assert_eq!(experiment.total_weight(), 2.0);
    }
}
