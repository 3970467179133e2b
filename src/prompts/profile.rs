//! User profile facts gleaned from the conversation history.

use serde::Serialize;

const SPORTS: &[&str] = &[
    "fútbol", "football", "soccer", "tenis", "tennis", "baloncesto", "basketball", "natación",
    "swimming", "ciclismo", "cycling", "running", "correr", "voleibol", "volleyball", "béisbol",
    "baseball",
];

const TEAMS: &[&str] = &[
    "real madrid", "barcelona", "manchester", "liverpool", "juventus", "psg", "bayern", "chelsea",
    "lakers", "warriors", "patriots", "cowboys",
];

const HOBBIES: &[&str] = &[
    "leer", "reading", "viajar", "travel", "música", "music", "películas", "movies", "videojuegos",
    "gaming", "cocinar", "cooking", "arte", "art", "fotografía", "photography",
];

const MOTIVATIONS: &[&str] = &[
    "familia", "family", "carrera", "career", "salud", "health", "aprendizaje", "learning",
    "creatividad", "creativity", "éxito", "success", "felicidad", "happiness",
];

/// Known facts about the user, rendered into the user-context section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: Option<String>,
    pub favorite_sport: Option<String>,
    pub favorite_team: Option<String>,
    pub hobbies: Vec<String>,
    pub motivations: Vec<String>,
    pub conversation_count: usize,
}

impl UserProfile {
    /// Whether any renderable fact is present.
    pub fn has_facts(&self) -> bool {
        self.name.is_some()
            || self.favorite_sport.is_some()
            || self.favorite_team.is_some()
            || !self.hobbies.is_empty()
            || !self.motivations.is_empty()
    }
}

/// Keyword scan over every history message (user and assistant alike).
pub fn extract_user_profile<'a, I>(history: I) -> UserProfile
where
    I: IntoIterator<Item = &'a str>,
{
    let messages: Vec<&str> = history.into_iter().collect();
    let text = messages.join(" ").to_lowercase();

    UserProfile {
        name: None,
        favorite_sport: first_mentioned(&text, SPORTS),
        favorite_team: first_mentioned(&text, TEAMS),
        hobbies: all_mentioned(&text, HOBBIES),
        motivations: all_mentioned(&text, MOTIVATIONS),
        conversation_count: messages.len(),
    }
}

fn first_mentioned(text: &str, table: &[&str]) -> Option<String> {
    table.iter().find(|k| text.contains(**k)).map(|k| k.to_string())
}

fn all_mentioned(text: &str, table: &[&str]) -> Vec<String> {
    table
        .iter()
        .filter(|k| text.contains(**k))
        .map(|k| k.to_string())
        .collect()
}
