use shared::Badge;

fn badge(id: &str, name: &str, description: &str, icon: &str, points_required: u32, tasks_required: u32) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        points_required,
        tasks_required,
        unlocked_at: None,
    }
}

/// The badge catalog written on first read
pub fn default_badges() -> Vec<Badge> {
    vec![
        badge("badge-1", "Premier Pas", "Complète ta première tâche", "Star", 0, 1),
        badge("badge-2", "Débutant", "Atteins 20 points", "Sparkles", 20, 0),
        badge("badge-3", "Travailleur", "Atteins 40 points", "Zap", 40, 0),
        badge("badge-4", "Champion", "Atteins 60 points", "Trophy", 60, 0),
        badge("badge-5", "Super-Héros", "Atteins 100 points", "Award", 100, 0),
        badge("badge-6", "Légende", "Atteins 150 points", "Crown", 150, 0),
    ]
}
