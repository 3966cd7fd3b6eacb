//! Catalog filtering and preference ranking

use std::cmp::Ordering;

use advisor_config::{Catalog, ScoringWeights};
use advisor_core::{Budget, Category, Product};

/// Product with its preference score
#[derive(Debug, Clone)]
pub struct ScoredProduct<'a> {
    pub product: &'a Product,
    pub score: u32,
}

/// Search criteria collected by the dialogue
#[derive(Debug, Clone, Copy)]
pub struct Criteria<'a> {
    pub category: Category,
    pub budget: Option<Budget>,
    pub preferences: &'a [String],
}

/// Score one product against preference tags
///
/// Each tag adds `weights.feature` when any feature contains it and
/// `weights.ideal_for` when any ideal-for entry contains it.
pub fn score(product: &Product, preferences: &[String], weights: ScoringWeights) -> u32 {
    preferences.iter().fold(0, |acc, tag| {
        let mut points = 0;
        if product.has_feature(tag) {
            points += weights.feature;
        }
        if product.suits(tag) {
            points += weights.ideal_for;
        }
        acc + points
    })
}

/// Filter and rank the catalog
///
/// Candidates keep catalog order unless preferences were given, in which
/// case they are sorted by score then rating, both descending. The sort is
/// stable, so exact ties stay in catalog order.
pub fn recommend(
    catalog: &Catalog,
    criteria: Criteria<'_>,
    weights: ScoringWeights,
    max_results: usize,
) -> Vec<Product> {
    let mut candidates: Vec<ScoredProduct<'_>> = catalog
        .in_category(criteria.category)
        .filter(|p| criteria.budget.map_or(true, |b| b.admits(p.price)))
        .map(|product| ScoredProduct {
            product,
            score: score(product, criteria.preferences, weights),
        })
        .collect();

    if !criteria.preferences.is_empty() {
        candidates.sort_by(|a, b| {
            b.score.cmp(&a.score).then_with(|| {
                b.product
                    .rating
                    .partial_cmp(&a.product.rating)
                    .unwrap_or(Ordering::Equal)
            })
        });
    }

    candidates.truncate(max_results);

    tracing::debug!(
        category = %criteria.category,
        budget = ?criteria.budget,
        preferences = ?criteria.preferences,
        results = candidates.len(),
        "Ranked catalog"
    );

    candidates.into_iter().map(|c| c.product.clone()).collect()
}
