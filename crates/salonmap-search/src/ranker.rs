//! Token scoring for salons and substring filtering for services.
//!
//! Per query token a salon earns 3 points when its name starts with the
//! token, 2 when the name merely contains it, and 1 when only the
//! name+address haystack contains it. Token scores add up; salons scoring 0
//! are dropped and the rest are stably sorted by descending score, so ties
//! keep fetch order.

use salonmap_core::{Salon, Service};
use serde::Serialize;

use crate::index::ServiceIndex;
use crate::normalize::{normalize, tokenize};

const NAME_PREFIX_SCORE: u32 = 3;
const NAME_CONTAINS_SCORE: u32 = 2;
const HAYSTACK_CONTAINS_SCORE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSalon {
    pub salon: Salon,
    pub score: u32,
}

/// Two independently ranked lists. Callers decide how to interleave them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub salons: Vec<RankedSalon>,
    pub services: Vec<Service>,
}

struct SalonEntry<'a> {
    salon: &'a Salon,
    name: String,
    haystack: String,
}

struct ServiceEntry<'a> {
    service: &'a Service,
    name: String,
}

/// Pre-normalized search corpus over one loaded salon list and its service
/// index. Build once per load, query many times.
pub struct SearchRanker<'a> {
    salons: Vec<SalonEntry<'a>>,
    services: Vec<ServiceEntry<'a>>,
}

impl<'a> SearchRanker<'a> {
    #[must_use]
    pub fn new(salons: &'a [Salon], services: &'a ServiceIndex) -> Self {
        let salons = salons
            .iter()
            .map(|salon| {
                let name = normalize(&salon.name);
                let haystack = match salon.address.as_deref().map(normalize) {
                    Some(address) if !address.is_empty() => format!("{name} {address}"),
                    _ => name.clone(),
                };
                SalonEntry {
                    salon,
                    name,
                    haystack,
                }
            })
            .collect();

        let services = services
            .iter()
            .map(|service| ServiceEntry {
                service,
                name: normalize(&service.name),
            })
            .collect();

        Self { salons, services }
    }

    /// Runs `query` against the corpus.
    ///
    /// An empty (or all-whitespace) query returns every service as a
    /// browse-all default and no salons.
    #[must_use]
    pub fn search(&self, query: &str) -> SearchResults {
        let query = normalize(query);
        if query.is_empty() {
            return SearchResults {
                salons: Vec::new(),
                services: self.services.iter().map(|e| e.service.clone()).collect(),
            };
        }

        let services: Vec<Service> = self
            .services
            .iter()
            .filter(|e| e.name.contains(query.as_str()))
            .map(|e| e.service.clone())
            .collect();

        let mut salons: Vec<RankedSalon> = self
            .salons
            .iter()
            .filter_map(|entry| {
                let score: u32 = tokenize(&query).map(|t| score_token(entry, t)).sum();
                (score > 0).then(|| RankedSalon {
                    salon: entry.salon.clone(),
                    score,
                })
            })
            .collect();
        // Stable: equal scores keep fetch order.
        salons.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            query = query.as_str(),
            salons = salons.len(),
            services = services.len(),
            "search evaluated"
        );

        SearchResults { salons, services }
    }
}

fn score_token(entry: &SalonEntry<'_>, token: &str) -> u32 {
    if entry.name.starts_with(token) {
        NAME_PREFIX_SCORE
    } else if entry.name.contains(token) {
        NAME_CONTAINS_SCORE
    } else if entry.haystack.contains(token) {
        HAYSTACK_CONTAINS_SCORE
    } else {
        0
    }
}

/// One-shot search over `salons` and `services`.
#[must_use]
pub fn search(query: &str, salons: &[Salon], services: &ServiceIndex) -> SearchResults {
    SearchRanker::new(salons, services).search(query)
}

#[cfg(test)]
#[path = "ranker_test.rs"]
mod tests;
