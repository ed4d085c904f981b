// src/compose/fusion.rs
use serde::{Deserialize, Serialize};

use crate::compose::rotation::pick_stable;
use crate::scout::FusionPotential;
use crate::side_data::PersonalExample;

/// How tightly a trending idea ties into a personal example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionStrength {
    Strong,
    Moderate,
    Weak,
    Standalone,
}

impl FusionStrength {
    /// Total over every (potential, has_example) pair.
    pub fn classify(potential: FusionPotential, has_example: bool) -> Self {
        if !has_example {
            return FusionStrength::Standalone;
        }
        match potential {
            FusionPotential::High => FusionStrength::Strong,
            FusionPotential::Medium => FusionStrength::Moderate,
            FusionPotential::Low => FusionStrength::Weak,
        }
    }

    /// Contribution to the content quality score.
    pub fn points(self) -> f64 {
        match self {
            FusionStrength::Strong => 30.0,
            FusionStrength::Moderate => 20.0,
            FusionStrength::Weak => 10.0,
            FusionStrength::Standalone => 5.0,
        }
    }
}

/// First example whose title shares a match keyword with the idea title; otherwise a
/// stable hash pick over the lower-cased idea title. `None` only for an empty library.
pub fn find_related_example<'a>(
    idea_title: &str,
    examples: &'a [PersonalExample],
    keywords: &[String],
) -> Option<&'a PersonalExample> {
    let title = idea_title.to_lowercase();
    let shared = |ex: &PersonalExample| {
        let ex_title = ex.title.to_lowercase();
        keywords
            .iter()
            .any(|k| title.contains(k.as_str()) && ex_title.contains(k.as_str()))
    };

    examples
        .iter()
        .find(|&ex| shared(ex))
        .or_else(|| pick_stable(examples, &title))
}
