//! Ranked correction suggestions for unknown names.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;
use smol_str::SmolStr;

use super::similarity::{SequenceRatio, SimilarityMetric};
use crate::config::GuardConfig;
use crate::schema::SchemaGraph;

/// Substrings that mark a name as belonging to a naming family. `date` and
/// `time` form one family.
const PATTERN_TOKENS: [&[&str]; 4] = [&["name"], &["type"], &["id"], &["date", "time"]];

/// A candidate together with its similarity to the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored {
    pub name: SmolStr,
    pub similarity: f64,
}

/// What a field candidate is on its entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateKind {
    Field,
    Relationship { target: SmolStr },
}

/// A scored field candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub name: SmolStr,
    pub similarity: f64,
    #[serde(flatten)]
    pub kind: CandidateKind,
}

/// Everything known about correcting one `entity.field` selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSuggestions {
    pub entity: SmolStr,
    pub field: SmolStr,
    pub entity_exists: bool,
    /// Similar entity names, only filled when the entity does not exist.
    pub entity_suggestions: Vec<Scored>,
    pub suggestions: Vec<ScoredCandidate>,
    pub pattern_suggestions: Vec<SmolStr>,
    /// Number of selectable names on the entity.
    pub total_valid_fields: usize,
}

/// Ranks candidate names by similarity to a target name.
///
/// Plain suggestions keep candidates whose ratio is at least the threshold,
/// ordered by descending ratio with ties broken by name, and return at most
/// `limit` of them. Identical inputs always produce identical output.
#[derive(Debug, Clone)]
pub struct Suggester<M = SequenceRatio> {
    metric: M,
    threshold: f64,
    limit: usize,
    field_threshold: f64,
    field_limit: usize,
    pattern_limit: usize,
}

impl Default for Suggester {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

impl Suggester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            metric: SequenceRatio,
            threshold: config.suggestion_threshold,
            limit: config.suggestion_limit,
            field_threshold: config.field_suggestion_threshold,
            field_limit: config.field_suggestion_limit,
            pattern_limit: config.pattern_suggestion_limit,
        }
    }
}

impl<M: SimilarityMetric> Suggester<M> {
    /// Swaps the similarity metric, keeping thresholds and limits.
    pub fn with_metric<N: SimilarityMetric>(self, metric: N) -> Suggester<N> {
        Suggester {
            metric,
            threshold: self.threshold,
            limit: self.limit,
            field_threshold: self.field_threshold,
            field_limit: self.field_limit,
            pattern_limit: self.pattern_limit,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Names most similar to `target`.
    pub fn suggest<'c, I>(&self, target: &str, candidates: I) -> Vec<SmolStr>
    where
        I: IntoIterator<Item = &'c SmolStr>,
    {
        self.suggest_scored(target, candidates)
            .into_iter()
            .map(|scored| scored.name)
            .collect()
    }

    /// Like [`suggest`](Self::suggest), with the ratio of every name.
    pub fn suggest_scored<'c, I>(&self, target: &str, candidates: I) -> Vec<Scored>
    where
        I: IntoIterator<Item = &'c SmolStr>,
    {
        self.rank(target, candidates, self.threshold, self.limit)
    }

    fn rank<'c, I>(&self, target: &str, candidates: I, threshold: f64, limit: usize) -> Vec<Scored>
    where
        I: IntoIterator<Item = &'c SmolStr>,
    {
        let unique: BTreeSet<&SmolStr> = candidates.into_iter().collect();
        let mut scored: Vec<Scored> = unique
            .into_iter()
            .map(|name| Scored {
                name: name.clone(),
                similarity: self.metric.ratio(target, name),
            })
            .filter(|scored| scored.similarity >= threshold)
            .collect();
        scored.sort_by(by_similarity_then_name);
        scored.truncate(limit);
        scored
    }

    /// Candidates sharing a naming family with `target`.
    ///
    /// A family applies when `target` contains one of its tokens (`name`,
    /// `type`, `id`, `date`/`time`); every candidate containing a token of
    /// that family is returned, sorted by name, at most the configured
    /// pattern limit.
    pub fn pattern_suggestions<'c, I>(&self, target: &str, candidates: I) -> Vec<SmolStr>
    where
        I: IntoIterator<Item = &'c SmolStr>,
    {
        let target = target.to_lowercase();
        let families: Vec<&[&str]> = PATTERN_TOKENS
            .into_iter()
            .filter(|tokens| tokens.iter().any(|token| target.contains(token)))
            .collect();
        if families.is_empty() {
            return Vec::new();
        }

        let matches: BTreeSet<&SmolStr> = candidates
            .into_iter()
            .filter(|candidate| {
                let candidate = candidate.to_lowercase();
                families
                    .iter()
                    .flat_map(|tokens| tokens.iter())
                    .any(|token| candidate.contains(token))
            })
            .collect();

        matches
            .into_iter()
            .take(self.pattern_limit)
            .cloned()
            .collect()
    }

    /// Scored suggestions for `field` on `entity`, annotated with what each
    /// candidate is.
    pub fn suggest_fields(&self, graph: &SchemaGraph, entity: &str, field: &str) -> FieldSuggestions {
        let Some(schema) = graph.entity(entity) else {
            return FieldSuggestions {
                entity: entity.into(),
                field: field.into(),
                entity_exists: false,
                entity_suggestions: self.suggest_scored(entity, graph.entity_names()),
                suggestions: Vec::new(),
                pattern_suggestions: Vec::new(),
                total_valid_fields: 0,
            };
        };

        let suggestions = self
            .rank(field, schema.selectable_names(), self.field_threshold, self.field_limit)
            .into_iter()
            .map(|scored| {
                let kind = match schema.relationship(&scored.name) {
                    Some(relationship) => CandidateKind::Relationship {
                        target: relationship.target_type.clone(),
                    },
                    None => CandidateKind::Field,
                };
                ScoredCandidate {
                    name: scored.name,
                    similarity: scored.similarity,
                    kind,
                }
            })
            .collect();

        FieldSuggestions {
            entity: entity.into(),
            field: field.into(),
            entity_exists: true,
            entity_suggestions: Vec::new(),
            suggestions,
            pattern_suggestions: self.pattern_suggestions(field, schema.selectable_names()),
            total_valid_fields: schema.fields.len() + schema.relationships.len(),
        }
    }
}

fn by_similarity_then_name(a: &Scored, b: &Scored) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.name.cmp(&b.name))
}
