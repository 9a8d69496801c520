//! Dinosaur facts shown to a child after finishing a chore.

use rand::seq::SliceRandom;
use rand::Rng;
use shared::DinoFact;

struct FactEntry {
    id: &'static str,
    fact: &'static str,
    category: &'static str,
}

const FACTS: [FactEntry; 8] = [
    FactEntry {
        id: "1",
        fact: "Les dinosaures faisaient leur nid avec des feuilles et des branches !",
        category: "home",
    },
    FactEntry {
        id: "2",
        fact: "Le T-Rex avait des dents aussi longues qu'une banane !",
        category: "fun",
    },
    FactEntry {
        id: "3",
        fact: "Les bébés dinosaures éclosaient de gros œufs, comme les oiseaux !",
        category: "eggs",
    },
    FactEntry {
        id: "4",
        fact: "Les dinosaures herbivores mangeaient des plantes toute la journée !",
        category: "food",
    },
    FactEntry {
        id: "5",
        fact: "Certains dinosaures étaient aussi petits qu'une poule !",
        category: "size",
    },
    FactEntry {
        id: "6",
        fact: "Les dinosaures vivaient il y a 65 millions d'années !",
        category: "history",
    },
    FactEntry {
        id: "7",
        fact: "Le Stégosaure avait des plaques sur le dos pour se protéger !",
        category: "defense",
    },
    FactEntry {
        id: "8",
        fact: "Les dinosaures communiquaient avec des sons et des mouvements !",
        category: "communication",
    },
];

/// The full fact catalog
pub fn all_facts() -> Vec<DinoFact> {
    FACTS
        .iter()
        .map(|entry| DinoFact {
            id: entry.id.to_string(),
            fact: entry.fact.to_string(),
            category: entry.category.to_string(),
        })
        .collect()
}

/// Pick a fact uniformly at random
pub fn random_fact() -> &'static str {
    random_fact_with(&mut rand::thread_rng())
}

pub fn random_fact_with<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FACTS
        .choose(rng)
        .map(|entry| entry.fact)
        .unwrap_or(FACTS[0].fact)
}
