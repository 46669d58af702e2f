//! Gene model - named scalar traits and the templates they are stamped from.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{EvolutionError, Result};
use crate::id::GeneId;

/// Trait family a gene belongs to. Determines its fitness weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneCategory {
    /// Throughput and latency traits
    Performance,
    /// Correctness and recovery traits
    Reliability,
    /// Resource usage traits
    Efficiency,
    /// Traits for coping with changing inputs
    Adaptability,
    /// Novelty of generated output
    Creativity,
}

impl GeneCategory {
    /// All categories, in weight order.
    pub const ALL: [GeneCategory; 5] = [
        GeneCategory::Performance,
        GeneCategory::Reliability,
        GeneCategory::Efficiency,
        GeneCategory::Adaptability,
        GeneCategory::Creativity,
    ];

    /// Weight of this category in the fitness sum.
    pub fn weight(self) -> f64 {
        match self {
            GeneCategory::Performance => 0.30,
            GeneCategory::Reliability => 0.25,
            GeneCategory::Efficiency => 0.20,
            GeneCategory::Adaptability => 0.15,
            GeneCategory::Creativity => 0.10,
        }
    }
}

impl std::fmt::Display for GeneCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneCategory::Performance => write!(f, "performance"),
            GeneCategory::Reliability => write!(f, "reliability"),
            GeneCategory::Efficiency => write!(f, "efficiency"),
            GeneCategory::Adaptability => write!(f, "adaptability"),
            GeneCategory::Creativity => write!(f, "creativity"),
        }
    }
}

/// Which performance metric a gene feeds, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneRole {
    /// Feeds the speed metric
    Speed,
    /// Feeds the accuracy metric
    Accuracy,
    /// Feeds the efficiency metric
    Efficiency,
    /// Feeds the adaptability metric
    Adaptability,
    /// Feeds the innovation metric
    Innovation,
}

impl GeneRole {
    /// Every role, one per metric slot.
    pub const ALL: [GeneRole; 5] = [
        GeneRole::Speed,
        GeneRole::Accuracy,
        GeneRole::Efficiency,
        GeneRole::Adaptability,
        GeneRole::Innovation,
    ];

    /// Name of the metric this role maps to.
    pub fn metric_name(self) -> &'static str {
        match self {
            GeneRole::Speed => "speed",
            GeneRole::Accuracy => "accuracy",
            GeneRole::Efficiency => "efficiency",
            GeneRole::Adaptability => "adaptability",
            GeneRole::Innovation => "innovation",
        }
    }
}

/// A named scalar trait inside a genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    /// Slot identifier, shared with the template
    pub id: GeneId,

    /// Human-readable name
    pub name: String,

    /// Category (drives the fitness weight)
    pub category: GeneCategory,

    /// Metric role, copied from the template
    pub role: Option<GeneRole>,

    /// Trait value in [0, 1]
    pub value: f64,

    /// Dominance in [0, 1]
    pub dominance: f64,

    /// Per-gene mutation rate in [0, 1]
    pub mutation_rate: f64,

    /// Expression level in [0, 1]
    pub expression_level: f64,

    /// Gene slots this gene interacts with
    pub interactions: Vec<GeneId>,
}

impl Gene {
    /// Contribution to the weighted fitness sum, before weighting.
    pub fn expressed_value(&self) -> f64 {
        self.value * self.expression_level
    }
}

/// Blueprint for one gene slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneTemplate {
    /// Slot identifier
    pub id: GeneId,

    /// Gene name
    pub name: String,

    /// Category
    pub category: GeneCategory,

    /// Metric role
    pub role: Option<GeneRole>,

    /// Interacting slots
    pub interacts_with: Vec<GeneId>,

    /// Description
    pub description: String,
}

impl GeneTemplate {
    /// Create a template with a fresh slot id.
    pub fn new(name: impl Into<String>, category: GeneCategory, role: Option<GeneRole>) -> Self {
        Self {
            id: GeneId::new(),
            name: name.into(),
            category,
            role,
            interacts_with: Vec::new(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The ordered, fixed set of gene templates every genome is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSet {
    templates: Vec<GeneTemplate>,
}

impl TemplateSet {
    /// Start building a template set.
    pub fn builder() -> TemplateSetBuilder {
        TemplateSetBuilder::default()
    }

    /// The standard workflow gene set.
    pub fn standard() -> Self {
        let built = Self::builder()
            .gene(
                GeneTemplate::new("speed", GeneCategory::Performance, Some(GeneRole::Speed))
                    .with_description("Throughput of workflow steps"),
            )
            .gene(
                GeneTemplate::new("accuracy", GeneCategory::Reliability, Some(GeneRole::Accuracy))
                    .with_description("Correctness of agent outputs"),
            )
            .gene(
                GeneTemplate::new("efficiency", GeneCategory::Efficiency, Some(GeneRole::Efficiency))
                    .with_description("Token and tool-call economy"),
            )
            .gene(
                GeneTemplate::new(
                    "adaptability",
                    GeneCategory::Adaptability,
                    Some(GeneRole::Adaptability),
                )
                .with_description("Tolerance to changing inputs"),
            )
            .gene(
                GeneTemplate::new("creativity", GeneCategory::Creativity, Some(GeneRole::Innovation))
                    .with_description("Willingness to explore new strategies"),
            )
            .gene(
                GeneTemplate::new("error_recovery", GeneCategory::Reliability, None)
                    .with_description("Retry and fallback behaviour"),
            )
            .gene(
                GeneTemplate::new("context_window", GeneCategory::Efficiency, None)
                    .with_description("Share of context budget used"),
            )
            .interaction("speed", "accuracy")
            .interaction("speed", "efficiency")
            .interaction("adaptability", "creativity")
            .interaction("accuracy", "error_recovery")
            .build();

        match built {
            Ok(set) => set,
            Err(e) => unreachable!("standard template set is well-formed: {e}"),
        }
    }

    /// Templates in slot order.
    pub fn templates(&self) -> &[GeneTemplate] {
        &self.templates
    }

    /// Number of gene slots.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the set is empty (never true for a built set).
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Find a template by name.
    pub fn find(&self, name: &str) -> Option<&GeneTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for [`TemplateSet`].
#[derive(Debug, Default)]
pub struct TemplateSetBuilder {
    templates: Vec<GeneTemplate>,
    interactions: Vec<(String, String)>,
}

impl TemplateSetBuilder {
    /// Add a gene slot.
    pub fn gene(mut self, template: GeneTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// Declare a symmetric interaction between two genes, by name.
    pub fn interaction(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.interactions.push((a.into(), b.into()));
        self
    }

    /// Validate and build the set.
    pub fn build(mut self) -> Result<TemplateSet> {
        if self.templates.is_empty() {
            return Err(EvolutionError::Configuration(
                "template set must contain at least one gene".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for template in &self.templates {
            if !names.insert(template.name.as_str()) {
                return Err(EvolutionError::Configuration(format!(
                    "duplicate gene template '{}'",
                    template.name
                )));
            }
        }

        for (a, b) in &self.interactions {
            let ia = position(&self.templates, a)?;
            let ib = position(&self.templates, b)?;
            if ia == ib {
                return Err(EvolutionError::Configuration(format!(
                    "gene '{}' cannot interact with itself",
                    a
                )));
            }
            let (id_a, id_b) = (self.templates[ia].id, self.templates[ib].id);
            if !self.templates[ia].interacts_with.contains(&id_b) {
                self.templates[ia].interacts_with.push(id_b);
            }
            if !self.templates[ib].interacts_with.contains(&id_a) {
                self.templates[ib].interacts_with.push(id_a);
            }
        }

        Ok(TemplateSet {
            templates: self.templates,
        })
    }
}

fn position(templates: &[GeneTemplate], name: &str) -> Result<usize> {
    templates
        .iter()
        .position(|t| t.name == name)
        .ok_or_else(|| {
            EvolutionError::Configuration(format!("interaction names unknown gene '{}'", name))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_weights_sum_to_one() {
        let total: f64 = GeneCategory::ALL.iter().map(|c| c.weight()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_set_links_interactions_both_ways() {
        let set = TemplateSet::standard();
        let speed = set.find("speed").unwrap();
        let accuracy = set.find("accuracy").unwrap();

        assert!(speed.interacts_with.contains(&accuracy.id));
        assert!(accuracy.interacts_with.contains(&speed.id));
        assert_eq!(set.len(), 7);
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let result = TemplateSet::builder()
            .gene(GeneTemplate::new("speed", GeneCategory::Performance, None))
            .gene(GeneTemplate::new("speed", GeneCategory::Efficiency, None))
            .build();
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_unknown_interaction() {
        let result = TemplateSet::builder()
            .gene(GeneTemplate::new("speed", GeneCategory::Performance, None))
            .interaction("speed", "latency")
            .build();
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_empty_set() {
        assert!(TemplateSet::builder().build().is_err());
    }
}
