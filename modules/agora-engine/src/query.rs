//! Read-only lookups over the catalog.

use typed_builder::TypedBuilder;

use agora_common::{normalized_key, Academic, TaxonomyCategory};
use agora_store::CatalogStore;

/// Multi-criteria search configuration. Every supplied criterion must
/// match (logical AND); within a taxonomy field any one value matching
/// the substring is enough.
#[derive(Debug, Clone, Default, TypedBuilder)]
#[builder(field_defaults(default, setter(strip_option, into)))]
pub struct SearchCriteria {
    pub name: Option<String>,
    pub discipline: Option<String>,
    pub tradition: Option<String>,
    pub era: Option<String>,
    pub methodology: Option<String>,
    pub theme: Option<String>,
}

impl SearchCriteria {
    fn taxonomy_filters(&self) -> [(TaxonomyCategory, Option<&String>); 5] {
        [
            (TaxonomyCategory::Discipline, self.discipline.as_ref()),
            (TaxonomyCategory::Tradition, self.tradition.as_ref()),
            (TaxonomyCategory::Era, self.era.as_ref()),
            (TaxonomyCategory::Methodology, self.methodology.as_ref()),
            (TaxonomyCategory::Theme, self.theme.as_ref()),
        ]
    }
}

/// Three-tier name resolution: exact normalized key, then exact display
/// name (case-insensitive), then substring in either direction.
pub fn get_academic<'s>(store: &'s CatalogStore, name: &str) -> Option<&'s Academic> {
    if let Some(academic) = store.get(&normalized_key(name)) {
        return Some(academic);
    }

    let query = name.trim().to_lowercase();
    if let Some(academic) = store
        .academics()
        .values()
        .find(|a| a.name.to_lowercase() == query)
    {
        return Some(academic);
    }

    store.academics().values().find(|a| {
        let candidate = a.name.to_lowercase();
        candidate.contains(&query) || query.contains(&candidate)
    })
}

/// Filtered, ranked search. With a name criterion the ordering is: exact
/// name matches, then ascending match position within the name, then
/// alphabetical.
pub fn search<'s>(store: &'s CatalogStore, criteria: &SearchCriteria) -> Vec<&'s Academic> {
    let name_query = criteria.name.as_ref().map(|n| n.trim().to_lowercase());

    let mut hits: Vec<&Academic> = store
        .academics()
        .values()
        .filter(|academic| matches(academic, &name_query, criteria))
        .collect();

    if let Some(query) = &name_query {
        hits.sort_by_cached_key(|academic| {
            let lowered = academic.name.to_lowercase();
            let inexact = lowered != *query;
            let position = lowered.find(query.as_str()).unwrap_or(usize::MAX);
            (inexact, position, academic.name.clone())
        });
    }
    hits
}

fn matches(academic: &Academic, name_query: &Option<String>, criteria: &SearchCriteria) -> bool {
    if let Some(query) = name_query {
        if !academic.name.to_lowercase().contains(query.as_str()) {
            return false;
        }
    }
    for (category, filter) in criteria.taxonomy_filters() {
        let Some(filter) = filter else { continue };
        let needle = filter.trim().to_lowercase();
        let matched = academic
            .taxonomies
            .get(&category)
            .is_some_and(|values| values.iter().any(|v| v.to_lowercase().contains(&needle)));
        if !matched {
            return false;
        }
    }
    true
}

/// Every record whose connection list contains `name` verbatim.
pub fn academics_by_connection<'s>(store: &'s CatalogStore, name: &str) -> Vec<&'s Academic> {
    store
        .academics()
        .values()
        .filter(|academic| academic.connections.iter().any(|c| c == name))
        .collect()
}
