//! Static quiz configuration: the category registry and the question list.
//!
//! Both tables are built on first access and never mutated afterwards.
use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::model::{Category, CategoryId, Question, QuizOption, ScoreMap};

pub type Registry = IndexMap<CategoryId, Category>;

static CATEGORIES: LazyLock<Registry> = LazyLock::new(build_categories);
static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(build_questions);

/// Every known category, keyed by id, in display order.
pub fn categories() -> &'static Registry {
    &CATEGORIES
}

pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.get(id)
}

pub fn question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

fn make_category(
    id: &str,
    title: &str,
    description: &str,
    highlights: &[&str],
    filters: &[(&str, &str)],
) -> Category {
    Category {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        highlights: highlights.iter().map(|h| h.to_string()).collect(),
        suggested_filters: filters
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

fn make_option(value: &str, label: &str, scores: &[(&str, u32)]) -> QuizOption {
    QuizOption {
        value: value.to_string(),
        label: label.to_string(),
        scores: scores.iter().copied().collect::<ScoreMap>(),
    }
}

fn make_question(id: &str, prompt: &str, options: Vec<QuizOption>) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        options,
    }
}

fn build_categories() -> Registry {
    [
        make_category(
            "activeDog",
            "Adventure Buddy (Active Dog)",
            "You thrive on movement and outdoor fun and have time for structured care. \
             Athletic dogs that enjoy hikes, beach runs, training games, and consistent \
             routines will keep up with your energy.",
            &[
                "Enjoys daily exercise and outdoor adventures",
                "Great for active households that love the outdoors",
                "Needs daily training touchpoints, grooming, and downtime care",
            ],
            &[("species", "Dog"), ("size", "large"), ("temperament", "Active")],
        ),
        make_category(
            "calmCat",
            "Cozy Companion (Calm Cat)",
            "Peaceful evenings and quiet company are your style. Relaxed cats who love \
             window watching, gentle affection, and cozy spaces will fit right in.",
            &[
                "Independent but enjoys gentle companionship",
                "Prefers calm environments and predictable routines",
                "Low-maintenance grooming and exercise needs",
            ],
            &[("species", "Cat"), ("temperament", "Calm")],
        ),
        make_category(
            "playfulFriend",
            "Playmate Pro (Social Buddy)",
            "Your home is the heart of the party. Sociable pets who adore playdates, \
             squeaky toys, and interactive games will love your energy.",
            &[
                "Great for families with kids or multiple caretakers",
                "Responds well to enrichment puzzles and playtime",
                "Eager to learn tricks and join in daily activities",
            ],
            &[("species", "Dog"), ("size", "medium"), ("temperament", "Friendly")],
        ),
        make_category(
            "gentleSenior",
            "Heartful Guardian (Senior Sweetheart)",
            "You value patience, presence, and a nurturing home. Mature pets who appreciate \
             slow walks, comfy beds, and lots of love will flourish with you.",
            &[
                "Ideal for adopters who enjoy quiet routines",
                "Typically house-trained and manners-ready",
                "Appreciates short strolls and soft bedding",
            ],
            &[("minAgeLabel", "7"), ("temperament", "Gentle")],
        ),
        make_category(
            "pocketPal",
            "Pocket Pal (Small & Special)",
            "You cherish mindful care and can dedicate generous space for habitats. Small \
             pets (rabbits, guinea pigs, or special species) need roomy exercise pens, daily \
             enclosure cleaning, and gentle handling to thrive with you.",
            &[
                "Requires a roomy enclosure or supervised free-roam zone",
                "Needs daily enclosure refreshes and enrichment setups",
                "Responds to gentle handling and quiet routines",
            ],
            &[("size", "small")],
        ),
    ]
    .into_iter()
    .map(|c| (c.id.clone(), c))
    .collect()
}

fn build_questions() -> Vec<Question> {
    vec![
        make_question(
            "q1",
            "How would you describe your typical weekend?",
            vec![
                make_option(
                    "hike",
                    "Out early for hikes, markets, and meet-ups",
                    &[("activeDog", 3), ("playfulFriend", 1)],
                ),
                make_option(
                    "home",
                    "Cozy at home with a book or series marathon",
                    &[("calmCat", 3), ("gentleSenior", 1)],
                ),
                make_option(
                    "family",
                    "Hosting friends or playing with kids",
                    &[("playfulFriend", 3)],
                ),
                make_option(
                    "craft",
                    "Enjoying quiet hobbies or caring projects indoors",
                    &[("pocketPal", 2), ("gentleSenior", 1)],
                ),
            ],
        ),
        make_question(
            "q2",
            "How much daily time can you dedicate to exercise or play?",
            vec![
                make_option(
                    "90",
                    "90 minutes or more – bring on the adventure!",
                    &[("activeDog", 3)],
                ),
                make_option(
                    "60",
                    "About an hour – consistent and active",
                    &[("playfulFriend", 2), ("activeDog", 1)],
                ),
                make_option(
                    "30",
                    "30 minutes – a calm stroll or gentle play",
                    &[("calmCat", 2), ("gentleSenior", 1)],
                ),
                make_option(
                    "short",
                    "Short sessions sprinkled throughout the day",
                    &[("pocketPal", 2), ("gentleSenior", 1)],
                ),
            ],
        ),
        make_question(
            "q3",
            "What kind of space can you offer for a pet to safely explore?",
            vec![
                make_option(
                    "yard",
                    "Detached home with a fenced yard or large outdoor zone",
                    &[("activeDog", 3), ("playfulFriend", 1)],
                ),
                make_option(
                    "dedicatedRoom",
                    "Indoor home with a dedicated pet-safe room or exercise pen",
                    &[("pocketPal", 3), ("calmCat", 1)],
                ),
                make_option(
                    "shared",
                    "Apartment or condo with nearby parks and enrichment corners",
                    &[("calmCat", 2), ("playfulFriend", 1)],
                ),
                make_option(
                    "cozyShared",
                    "Cozy shared space or studio set up for quiet living",
                    &[("gentleSenior", 2), ("pocketPal", 1)],
                ),
            ],
        ),
        make_question(
            "q4",
            "How comfortable are you with daily care routines (feeding, cleaning, training)?",
            vec![
                make_option(
                    "structuredCare",
                    "Daily training, exercise, and detailed care fit easily into my schedule.",
                    &[("activeDog", 2), ("playfulFriend", 1), ("pocketPal", 1)],
                ),
                make_option(
                    "consistentCare",
                    "I can commit to daily feeding, litter/yard tidy-ups, and regular grooming.",
                    &[("calmCat", 2), ("gentleSenior", 1), ("pocketPal", 1)],
                ),
                make_option(
                    "supportCare",
                    "Light daily tasks are fine, with deeper cleans scheduled weekly.",
                    &[("gentleSenior", 2), ("calmCat", 1)],
                ),
                make_option(
                    "minimalCare",
                    "I need a very low-maintenance companion.",
                    &[("calmCat", 1)],
                ),
            ],
        ),
        make_question(
            "q5",
            "What best describes your ideal pet’s energy?",
            vec![
                make_option("high", "High energy – let’s go, go, go!", &[("activeDog", 3)]),
                make_option(
                    "medium",
                    "Medium – playful bursts with cuddle breaks",
                    &[("playfulFriend", 2), ("activeDog", 1)],
                ),
                make_option(
                    "low",
                    "Low – calm company and gentle strolls",
                    &[("calmCat", 1), ("gentleSenior", 2)],
                ),
                make_option(
                    "varied",
                    "Varied – happy with short, engaging sessions",
                    &[("pocketPal", 2)],
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn registry_order_is_stable() {
        let ids: Vec<&str> = categories().keys().map(|k| k.as_str()).collect();
        assert_eq!(
            ids,
            ["activeDog", "calmCat", "playfulFriend", "gentleSenior", "pocketPal"]
        );
        for (key, category) in categories() {
            assert_eq!(key, &category.id);
        }
    }

    #[test]
    fn every_option_scores_known_categories() {
        for q in questions() {
            for option in &q.options {
                for (category_id, _) in option.scores.iter() {
                    assert!(
                        category(category_id).is_some(),
                        "{}:{} scores unknown category {category_id}",
                        q.id,
                        option.value
                    );
                }
            }
        }
    }

    #[test]
    fn ids_and_values_are_unique() {
        let ids: HashSet<&str> = questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), questions().len());

        for q in questions() {
            let values: HashSet<&str> = q.options.iter().map(|o| o.value.as_str()).collect();
            assert_eq!(values.len(), q.options.len(), "duplicate option in {}", q.id);
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(questions().len(), 5);
        let q3 = question("q3").expect("q3 exists");
        let yard = q3.option("yard").expect("yard option");
        assert_eq!(yard.scores.get("activeDog"), 3);
        assert_eq!(yard.scores.get("calmCat"), 0);
        assert!(question("q9").is_none());
        assert_eq!(
            category("gentleSenior").map(|c| c.suggested_filters["minAgeLabel"].as_str()),
            Some("7")
        );
    }
}
