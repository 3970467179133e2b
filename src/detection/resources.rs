//! Emergency contact table shown alongside a positive crisis detection.

use serde::Serialize;

use super::crisis::CrisisCategory;

/// One contact line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    pub name: &'static str,
    pub number: &'static str,
    pub description: &'static str,
}

/// Title, lead message and contacts for a crisis category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyResources {
    pub title: &'static str,
    pub message: &'static str,
    pub resources: Vec<EmergencyContact>,
}

const CONTACTS: [EmergencyContact; 3] = [
    EmergencyContact {
        name: "Línea Nacional de Prevención del Suicidio",
        number: "01 800 113 113",
        description: "Atención 24/7, confidencial y gratuita",
    },
    EmergencyContact {
        name: "Línea 106 (Línea de la Vida - Bogotá)",
        number: "106",
        description: "Apoyo emocional y prevención del suicidio",
    },
    EmergencyContact {
        name: "Línea 123 (Emergencias)",
        number: "123",
        description: "Emergencias generales",
    },
];

/// Resources for a category. `None` and `SevereDistress` use the default entry.
pub fn get_emergency_resources(category: Option<CrisisCategory>) -> EmergencyResources {
    let (title, message) = match category {
        Some(CrisisCategory::Suicide) => (
            "Ayuda Inmediata Disponible",
            "Tu vida es valiosa. Por favor, contacta a estos recursos de ayuda profesional ahora:",
        ),
        Some(CrisisCategory::SelfHarm) => (
            "Apoyo Profesional Disponible",
            "Lastimarte no es la solución. Por favor, habla con un profesional que puede ayudarte:",
        ),
        Some(CrisisCategory::Violence) => (
            "Ayuda para Controlar Impulsos",
            "Si sientes impulsos violentos, es importante hablar con un profesional:",
        ),
        Some(CrisisCategory::SevereDistress) | None => (
            "Recursos de Ayuda Profesional",
            "Detectamos que podrías estar pasando por un momento muy difícil. Por favor, considera contactar a estos recursos de ayuda profesional:",
        ),
    };

    EmergencyResources {
        title,
        message,
        resources: CONTACTS.to_vec(),
    }
}

/// Resources by wire name (`suicide`, `self_harm`, `violence`, anything else).
pub fn get_emergency_resources_by_name(category: &str) -> EmergencyResources {
    get_emergency_resources(category.parse().ok())
}
