//! Caller-facing answers about drugs.
//!
//! Wraps the resolver and the segment ranker and turns their results into
//! the plain-text replies users see. Nothing here fails: unknown drugs and
//! missing data produce a "could not find / not available" message.

use crate::config::EngineConfig;
use regex::Regex;
use rxlink_core::Embedder;
use rxlink_similarity::{is_missing, mentions_any_token, EntityResolver, SegmentRanker};
use rxlink_storage::{Catalog, CatalogRecord, CatalogStore};
use std::sync::{Arc, LazyLock};

/// Separates a related drug's name from its link in the source data
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\s*https?://").unwrap());

#[derive(Debug)]
pub struct DrugAnswerer {
    resolver: EntityResolver,
    ranker: SegmentRanker,
    excerpt_chars: usize,
}

impl DrugAnswerer {
    pub fn new(catalog: Arc<Catalog>, embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self::with_config(catalog, embedder, &EngineConfig::default())
    }

    pub fn with_config(
        catalog: Arc<Catalog>,
        embedder: Option<Arc<dyn Embedder>>,
        config: &EngineConfig,
    ) -> Self {
        Self::assemble(catalog, embedder.clone(), embedder, config)
    }

    /// Load the catalog through a [`CatalogStore`] and build the oracle the
    /// config asks for.
    ///
    /// The configured oracle always backs the resolver. Segment ranking uses
    /// it only when `semantic_segments` is set, otherwise ranking is lexical.
    pub fn from_config(config: &EngineConfig) -> Self {
        let store = CatalogStore::new(&config.source_path, &config.cache_path);
        let catalog = Arc::new(store.load());
        let embedder = config.build_embedder();
        let ranker_embedder = embedder.clone().filter(|_| config.semantic_segments);
        Self::assemble(catalog, embedder, ranker_embedder, config)
    }

    fn assemble(
        catalog: Arc<Catalog>,
        resolver_embedder: Option<Arc<dyn Embedder>>,
        ranker_embedder: Option<Arc<dyn Embedder>>,
        config: &EngineConfig,
    ) -> Self {
        let resolver = EntityResolver::new(catalog, resolver_embedder)
            .with_threshold(config.entity_threshold);
        let ranker = SegmentRanker::new(ranker_embedder).with_threshold(config.segment_threshold);
        Self {
            resolver,
            ranker,
            excerpt_chars: config.excerpt_chars,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.resolver.catalog()
    }

    pub fn resolver(&self) -> &EntityResolver {
        &self.resolver
    }

    pub fn ranker(&self) -> &SegmentRanker {
        &self.ranker
    }

    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) {
        self.resolver.replace_catalog(catalog);
    }

    /// The drug a free-text query refers to
    pub fn resolve(&self, query: &str) -> Option<String> {
        self.resolver.resolve(query)
    }

    /// Segments of `drug`'s side effects relevant to `symptom`
    pub fn relevant_segments(&self, drug: &str, symptom: &str) -> Vec<String> {
        self.catalog()
            .get(drug)
            .map(|record| self.ranker.rank(&record.side_effects, symptom))
            .unwrap_or_default()
    }

    pub fn drug_info(&self, drug: &str) -> String {
        let Some(info) = self.catalog().get(drug) else {
            return not_found(drug);
        };
        let mut response = format!(
            "{} is a generic drug belonging to {}. It has {}% activity and is an {} drug.",
            capitalize(&info.generic_name),
            info.drug_classes,
            info.activity,
            info.rx_otc
        );
        if !is_missing(&info.pregnancy_category) {
            response.push_str(&format!(
                " It is categorized as Pregnancy Category {}.",
                info.pregnancy_category
            ));
        }
        response
    }

    pub fn side_effects(&self, drug: &str) -> String {
        let Some(info) = self.catalog().get(drug) else {
            return not_found(drug);
        };
        if is_missing(&info.side_effects) {
            return side_effects_unavailable(drug);
        }
        let side_effects = info.side_effects.trim().trim_matches('"');
        format!(
            "Common side effects of {} may include: {}.",
            capitalize(drug),
            side_effects
        )
    }

    pub fn related_drugs(&self, drug: &str) -> String {
        let Some(info) = self.catalog().get(drug) else {
            return not_found(drug);
        };
        let related = related_drug_names(info);
        if related.is_empty() {
            return format!("No related drugs information available for {}.", drug);
        }
        format!(
            "Yes, some drugs related to {} include: {}.",
            capitalize(drug),
            related.join(", ")
        )
    }

    /// Side effects of `drug` that relate to `symptom`.
    ///
    /// With no relevant segment, the reply falls back to an excerpt of the
    /// full text, worded by whether the text mentions the symptom at all.
    pub fn side_effects_for_symptom(&self, drug: &str, symptom: &str) -> String {
        let Some(info) = self.catalog().get(drug) else {
            return not_found(drug);
        };
        let full_text = &info.side_effects;
        if is_missing(full_text) {
            return side_effects_unavailable(drug);
        }

        let relevant = self.ranker.rank(full_text, symptom);
        if !relevant.is_empty() {
            return format!(
                "For {} regarding '{}'-like issues, you might experience: {}.",
                capitalize(drug),
                symptom,
                relevant.join("; ")
            );
        }

        let excerpt = truncate_chars(full_text, self.excerpt_chars);
        if mentions_any_token(full_text, symptom) {
            format!(
                "For {}, some side effects are mentioned that might relate to '{}'. \
                 The full side effects are: {}...",
                capitalize(drug),
                symptom,
                excerpt
            )
        } else {
            format!(
                "I did not find specific side effects related to '{}' for {}. \
                 The full side effects are: {}...",
                symptom,
                capitalize(drug),
                excerpt
            )
        }
    }

    /// Resolve the drug in a free-text question and answer about it: side
    /// effects relevant to `symptom` when given, general information
    /// otherwise.
    pub fn answer(&self, query: &str, symptom: Option<&str>) -> String {
        let Some(drug) = self.resolve(query) else {
            return "I could not find a known drug in your question.".to_string();
        };
        match symptom {
            Some(symptom) => self.side_effects_for_symptom(&drug, symptom),
            None => self.drug_info(&drug),
        }
    }
}

fn not_found(drug: &str) -> String {
    format!(
        "I could not find information for {}. Please check the spelling.",
        drug
    )
}

fn side_effects_unavailable(drug: &str) -> String {
    format!("Side effects information not available for {}.", drug)
}

/// Names from a `name: url | name: url` list
fn related_drug_names(info: &CatalogRecord) -> Vec<&str> {
    if is_missing(&info.related_drugs) {
        return Vec::new();
    }
    info.related_drugs
        .split('|')
        .filter_map(|item| LINK_RE.split(item).next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

/// First character upper-cased, the rest lower-cased
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// At most `max` characters of `s`
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
