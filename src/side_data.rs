// src/side_data.rs
//! Supporting material for composition: angle sets, statistics and personal examples.
//!
//! The snapshot implementation reads the JSON files the research and angle generators
//! write:
//! - angles:   `{"angles":  [{"idea_id": 1, "professional": {"angles": [..]}, "spicy": .., "balanced": ..}]}`
//! - research: `{"results": [{"idea_id": 1, "research": {"statistics": [..]}}]}`
//! - examples: `{"pillars": [{"idea": {"title": .., "category": ..}, "real_data": {"examples": [..]}}]}`
//!
//! A missing file means "no data"; a malformed one is an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::compose::Mode;
use crate::config::SideDataPaths;

/// A short persuasive framing. Generator-specific fields (bridge, promise, cta, ...)
/// are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub hook: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Angle {
    pub fn new(kind: impl Into<String>, hook: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            hook: hook.into(),
            extra: Map::new(),
        }
    }
}

fn default_credibility() -> f64 {
    5.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    #[serde(default)]
    pub stat: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_credibility")]
    pub credibility: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Statistic {
    pub fn with_credibility(stat: impl Into<String>, credibility: f64) -> Self {
        Self {
            stat: stat.into(),
            detail: String::new(),
            source: String::new(),
            credibility,
            extra: Map::new(),
        }
    }
}

/// A personal/project example library entry. `examples` are free-form records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonalExample {
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub examples: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleSets {
    #[serde(default)]
    pub professional: Vec<Angle>,
    #[serde(default)]
    pub spicy: Vec<Angle>,
    #[serde(default)]
    pub balanced: Vec<Angle>,
}

impl AngleSets {
    pub fn for_mode(&self, mode: Mode) -> &[Angle] {
        match mode {
            Mode::Professional => &self.professional,
            Mode::Spicy => &self.spicy,
            Mode::Balanced => &self.balanced,
        }
    }
}

pub trait SideData: Send + Sync {
    fn angles_for(&self, idea_id: u64, mode: Mode) -> Vec<Angle>;
    fn statistics_for(&self, idea_id: u64) -> Vec<Statistic>;
    fn personal_examples(&self) -> &[PersonalExample];
}

/// In-memory side data, loaded once from JSON files or built directly.
#[derive(Debug, Clone, Default)]
pub struct SideDataSnapshot {
    angles: HashMap<u64, AngleSets>,
    statistics: HashMap<u64, Vec<Statistic>>,
    examples: Vec<PersonalExample>,
}

// --- on-disk shapes ---

#[derive(Deserialize)]
struct AnglesFile {
    #[serde(default)]
    angles: Vec<AngleEntry>,
}

#[derive(Deserialize)]
struct AngleEntry {
    idea_id: u64,
    #[serde(default)]
    professional: AngleList,
    #[serde(default)]
    spicy: AngleList,
    #[serde(default)]
    balanced: AngleList,
}

#[derive(Deserialize, Default)]
struct AngleList {
    #[serde(default)]
    angles: Vec<Angle>,
}

#[derive(Deserialize)]
struct ResearchFile {
    #[serde(default)]
    results: Vec<ResearchEntry>,
}

#[derive(Deserialize)]
struct ResearchEntry {
    idea_id: u64,
    #[serde(default)]
    research: Research,
}

#[derive(Deserialize, Default)]
struct Research {
    #[serde(default)]
    statistics: Vec<Statistic>,
}

#[derive(Deserialize)]
struct ExamplesFile {
    #[serde(default)]
    pillars: Vec<PillarEntry>,
}

#[derive(Deserialize)]
struct PillarEntry {
    #[serde(default)]
    idea: PillarIdea,
    #[serde(default)]
    real_data: RealData,
}

#[derive(Deserialize, Default)]
struct PillarIdea {
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
}

#[derive(Deserialize, Default)]
struct RealData {
    #[serde(default)]
    examples: Vec<Value>,
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "side data file missing");
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("reading side data {}", path.display())),
    }
}

impl SideDataSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_angles(mut self, idea_id: u64, sets: AngleSets) -> Self {
        self.angles.insert(idea_id, sets);
        self
    }

    pub fn with_statistics(mut self, idea_id: u64, stats: Vec<Statistic>) -> Self {
        self.statistics.insert(idea_id, stats);
        self
    }

    pub fn with_example(mut self, example: PersonalExample) -> Self {
        self.examples.push(example);
        self
    }

    pub fn load(paths: &SideDataPaths) -> Result<Self> {
        let mut snap = Self::default();

        if let Some(s) = read_optional(&paths.angles)? {
            snap.absorb_angles(&s)
                .with_context(|| format!("parsing angles {}", paths.angles.display()))?;
        }
        if let Some(s) = read_optional(&paths.research)? {
            snap.absorb_research(&s)
                .with_context(|| format!("parsing research {}", paths.research.display()))?;
        }
        if let Some(s) = read_optional(&paths.examples)? {
            snap.absorb_examples(&s)
                .with_context(|| format!("parsing examples {}", paths.examples.display()))?;
        }

        tracing::info!(
            target: "compose",
            angle_sets = snap.angles.len(),
            researched = snap.statistics.len(),
            examples = snap.examples.len(),
            "side data loaded"
        );
        Ok(snap)
    }

    // First entry per idea id wins, matching a linear lookup over the file.
    pub fn absorb_angles(&mut self, json: &str) -> Result<()> {
        let file: AnglesFile = serde_json::from_str(json)?;
        for e in file.angles {
            self.angles.entry(e.idea_id).or_insert(AngleSets {
                professional: e.professional.angles,
                spicy: e.spicy.angles,
                balanced: e.balanced.angles,
            });
        }
        Ok(())
    }

    pub fn absorb_research(&mut self, json: &str) -> Result<()> {
        let file: ResearchFile = serde_json::from_str(json)?;
        for e in file.results {
            self.statistics
                .entry(e.idea_id)
                .or_insert(e.research.statistics);
        }
        Ok(())
    }

    pub fn absorb_examples(&mut self, json: &str) -> Result<()> {
        let file: ExamplesFile = serde_json::from_str(json)?;
        self.examples
            .extend(file.pillars.into_iter().map(|p| PersonalExample {
                title: p.idea.title,
                category: p.idea.category,
                examples: p.real_data.examples,
            }));
        Ok(())
    }
}

impl SideData for SideDataSnapshot {
    fn angles_for(&self, idea_id: u64, mode: Mode) -> Vec<Angle> {
        self.angles
            .get(&idea_id)
            .map(|sets| sets.for_mode(mode).to_vec())
            .unwrap_or_default()
    }

    fn statistics_for(&self, idea_id: u64) -> Vec<Statistic> {
        self.statistics.get(&idea_id).cloned().unwrap_or_default()
    }

    fn personal_examples(&self) -> &[PersonalExample] {
        &self.examples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ANGLES: &str = r#"{"angles":[
        {"idea_id": 7, "idea_title": "x",
         "professional": {"angles": [{"type": "industry_expert", "hook": "After analyzing...", "bridge": "b"}]},
         "spicy": {"angles": [{"type": "inversion", "hook": "Everyone is wrong."}]}},
        {"idea_id": 7, "balanced": {"angles": [{"type": "late", "hook": "ignored"}]}}
    ]}"#;

    #[test]
    fn angles_are_keyed_by_idea_and_mode() {
        let mut snap = SideDataSnapshot::new();
        snap.absorb_angles(ANGLES).unwrap();

        let pro = snap.angles_for(7, Mode::Professional);
        assert_eq!(pro.len(), 1);
        assert_eq!(pro[0].kind, "industry_expert");
        assert_eq!(pro[0].extra["bridge"], "b");
        assert_eq!(snap.angles_for(7, Mode::Spicy)[0].hook, "Everyone is wrong.");
        // the duplicate entry for id 7 is ignored
        assert!(snap.angles_for(7, Mode::Balanced).is_empty());
        assert!(snap.angles_for(8, Mode::Spicy).is_empty());
    }

    #[test]
    fn statistics_default_credibility_to_five() {
        let mut snap = SideDataSnapshot::new();
        snap.absorb_research(
            r#"{"results":[{"idea_id": 3, "research": {"statistics": [
                {"stat": "64% of businesses", "source": "Gartner", "credibility": 9},
                {"stat": "unknown"}
            ]}}]}"#,
        )
        .unwrap();
        let stats = snap.statistics_for(3);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].credibility, 9.0);
        assert_eq!(stats[1].credibility, 5.0);
    }

    #[test]
    fn examples_flatten_pillar_records() {
        let mut snap = SideDataSnapshot::new();
        snap.absorb_examples(
            r#"{"pillars":[{"id":"pillar_1","idea":{"title":"Workflow automation with Claude","category":"ai"},
               "real_data":{"examples":[{"name":"invoice bot"},{"name":"crm sync"}]}}]}"#,
        )
        .unwrap();
        let ex = snap.personal_examples();
        assert_eq!(ex.len(), 1);
        assert_eq!(ex[0].title, "Workflow automation with Claude");
        assert_eq!(ex[0].examples.len(), 2);
    }

    #[test]
    fn pillar_without_idea_keeps_its_examples() {
        let mut snap = SideDataSnapshot::new();
        snap.absorb_examples(
            r#"{"pillars":[
                {"id":"pillar_1","real_data":{"examples":[{"name":"orphan"}]}},
                {"idea":{"title":"Claude for sales"}}
            ]}"#,
        )
        .unwrap();
        let ex = snap.personal_examples();
        assert_eq!(ex.len(), 2);
        assert_eq!(ex[0].title, "");
        assert_eq!(ex[0].examples.len(), 1);
        assert_eq!(ex[1].title, "Claude for sales");
        assert!(ex[1].examples.is_empty());
    }

    #[test]
    fn missing_files_load_as_empty_and_bad_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SideDataPaths {
            angles: dir.path().join("nope.json"),
            research: dir.path().join("nope2.json"),
            examples: dir.path().join("nope3.json"),
        };
        let snap = SideDataSnapshot::load(&paths).unwrap();
        assert!(snap.personal_examples().is_empty());

        let bad = dir.path().join("angles.json");
        let mut f = std::fs::File::create(&bad).unwrap();
        f.write_all(b"{not json").unwrap();
        let paths = SideDataPaths {
            angles: bad,
            ..paths
        };
        assert!(SideDataSnapshot::load(&paths).is_err());
    }
}
