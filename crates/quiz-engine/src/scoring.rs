//! Score tally and tie-aware category matching.
//!
//! Integers only. Both functions are total: malformed input degrades to a
//! zero contribution or an empty match list, never an error.
use serde::Serialize;
use tracing::trace;

use crate::catalog::{self, Registry};
use crate::model::{Answer, Category, Totals};

/// Sum option weights per category over the static registry.
pub fn tally_scores(answers: &[Answer]) -> Totals {
    tally_scores_with(catalog::categories(), answers)
}

/// Sum option weights per category.
///
/// Every registered category is present in the output, zero if nothing
/// scored it. Category ids outside the registry are accumulated too and
/// appended after the registered ones.
pub fn tally_scores_with(registry: &Registry, answers: &[Answer]) -> Totals {
    let mut totals: Totals = registry.keys().map(|id| (id.as_str(), 0u64)).collect();

    for answer in answers {
        let Some(scores) = &answer.scores else {
            trace!(answer = ?answer.id, "answer has no scores, skipping");
            continue;
        };
        for (category, weight) in scores.iter() {
            totals.add(category, u64::from(weight));
        }
    }

    totals
}

/// Categories tied at the highest total, resolved against the static registry.
pub fn top_categories(totals: &Totals) -> Vec<&'static Category> {
    top_categories_with(catalog::categories(), totals)
}

/// Every category whose total equals the maximum, in totals order.
///
/// An all-zero tally returns every category. Ids missing from `registry`
/// are dropped, so the result can be empty even when `totals` is not.
pub fn top_categories_with<'a>(registry: &'a Registry, totals: &Totals) -> Vec<&'a Category> {
    let Some(highest) = totals.highest() else {
        return Vec::new();
    };

    totals
        .iter()
        .filter(|&(_, score)| score == highest)
        .filter_map(|(id, _)| registry.get(id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCategory<'a> {
    pub category: &'a Category,
    pub score: u64,
}

pub fn ranked_totals(totals: &Totals) -> Vec<RankedCategory<'static>> {
    ranked_totals_with(catalog::categories(), totals)
}

/// Registered categories with their totals, highest first.
///
/// Equal scores keep their totals order.
pub fn ranked_totals_with<'a>(registry: &'a Registry, totals: &Totals) -> Vec<RankedCategory<'a>> {
    let mut ranked: Vec<RankedCategory<'a>> = totals
        .iter()
        .filter_map(|(id, score)| registry.get(id).map(|category| RankedCategory { category, score }))
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScoreMap;

    fn answer(scores: &[(&str, u32)]) -> Answer {
        Answer::from_scores(scores.iter().copied().collect::<ScoreMap>())
    }

    fn ids(categories: &[&Category]) -> Vec<String> {
        categories.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn empty_answers_yield_every_category_at_zero() {
        let totals = tally_scores(&[]);
        assert_eq!(totals.len(), catalog::categories().len());
        for id in catalog::categories().keys() {
            assert_eq!(totals.get(id), Some(0));
        }
    }

    #[test]
    fn five_active_answers_pick_active_dog() {
        let answers = [
            answer(&[("activeDog", 3)]),
            answer(&[("activeDog", 1), ("playfulFriend", 2)]),
            answer(&[("activeDog", 3)]),
            answer(&[("activeDog", 2)]),
            answer(&[("activeDog", 3)]),
        ];
        let totals = tally_scores(&answers);
        assert_eq!(totals.get("activeDog"), Some(12));
        assert_eq!(totals.get("playfulFriend"), Some(2));
        assert_eq!(totals.get("calmCat"), Some(0));

        let top = top_categories(&totals);
        assert_eq!(ids(&top), ["activeDog"]);
    }

    #[test]
    fn missing_scores_contribute_nothing() {
        let answers = [
            Answer {
                id: Some("q1".to_string()),
                ..Answer::default()
            },
            answer(&[("calmCat", 2)]),
        ];
        let totals = tally_scores(&answers);
        assert_eq!(totals.get("calmCat"), Some(2));
        assert_eq!(totals.iter().map(|(_, v)| v).sum::<u64>(), 2);
    }

    #[test]
    fn unknown_categories_are_accumulated() {
        let totals = tally_scores(&[answer(&[("dragon", 4)]), answer(&[("dragon", 1)])]);
        assert_eq!(totals.get("dragon"), Some(5));
        assert_eq!(totals.len(), catalog::categories().len() + 1);
        assert_eq!(totals.iter().last().map(|(k, _)| k), Some("dragon"));
    }

    #[test]
    fn ties_return_all_leaders_in_order() {
        let totals: Totals = [("activeDog", 5u64), ("calmCat", 5), ("pocketPal", 3)]
            .into_iter()
            .collect();
        assert_eq!(ids(&top_categories(&totals)), ["activeDog", "calmCat"]);
    }

    #[test]
    fn all_zero_returns_every_category() {
        let totals = tally_scores(&[]);
        let top = top_categories(&totals);
        assert_eq!(top.len(), catalog::categories().len());
        assert_eq!(
            ids(&top),
            catalog::categories().keys().cloned().collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_totals_return_nothing() {
        assert!(top_categories(&Totals::new()).is_empty());
    }

    #[test]
    fn unregistered_leader_is_dropped() {
        let totals: Totals = [("activeDog", 2u64), ("dragon", 9)].into_iter().collect();
        assert!(top_categories(&totals).is_empty());

        let totals: Totals = [("dragon", 9u64), ("calmCat", 9)].into_iter().collect();
        assert_eq!(ids(&top_categories(&totals)), ["calmCat"]);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let totals: Totals = [
            ("activeDog", 1u64),
            ("calmCat", 4),
            ("dragon", 10),
            ("playfulFriend", 4),
            ("gentleSenior", 0),
        ]
        .into_iter()
        .collect();
        let ranking = ranked_totals(&totals);
        let ranked: Vec<(&str, u64)> = ranking
            .iter()
            .map(|r| (r.category.id.as_str(), r.score))
            .collect();
        assert_eq!(
            ranked,
            [("calmCat", 4), ("playfulFriend", 4), ("activeDog", 1), ("gentleSenior", 0)]
        );
    }

    #[test]
    fn custom_registry() {
        let mut registry = Registry::new();
        let calm = catalog::categories()["calmCat"].clone();
        registry.insert("calmCat".to_string(), calm);

        let totals = tally_scores_with(&registry, &[answer(&[("activeDog", 1)])]);
        let keys: Vec<&str> = totals.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["calmCat", "activeDog"]);
        assert!(top_categories_with(&registry, &totals).is_empty());
    }
}
