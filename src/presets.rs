//! Curated configuration for the Israel-Palestine study: the two community
//! lists and the topic catalogue. Callers can build their own `CommunitySets`
//! and `Topic`s instead; nothing in the pipeline depends on these.

use crate::communities::CommunitySets;
use crate::error::ConfigError;
use crate::keywords::Topic;

pub const SUPPORTING_ISRAEL: &[&str] = &[
    "Jewish",
    "Judaism",
    "IsraelUnderAttack",
    "IsraelPalestine",
    "IsraelICYMI",
    "IsraelWar",
    "Israel",
    "IsraelVsHamas",
];

// "IsraelPalestine" is in both lists; classification treats it as supporting.
pub const OPPOSING_ISRAEL: &[&str] = &[
    "Palestine",
    "IsraelPalestine",
    "AskMiddleEast",
    "IsraelHamasWar",
    "islam",
    "israelexposed",
    "exmuslim",
    "IsraelCrimes",
    "PalestinianViolence",
    "AntiSemitismInRedditIsraelWarVideoReport",
    "MuslimLounge",
    "Muslim",
    "Gaza",
    "MuslimCorner",
    "PalestinianvsIsrael",
];

pub const ATTACK_KEYWORDS: &[&str] = &[
    "attack", "hospital", "bomb", "kill", "injure", "violence", "war", "conflict", "fight",
    "combat", "battle", "assault", "strike", "clash", "offensive", "onslaught", "bombard",
    "besiege", "invade", "raid", "beset", "pound", "blitz", "shell", "strafe", "blow up",
    "destroy", "demolish", "flatten", "level", "raze", "wreck", "ruin", "annihilate",
    "exterminate", "eradicate", "eliminate", "extinguish", "obliterate", "decimate",
    "massacre", "butcher", "slaughter",
];

/// Event topics and their vocabularies, in reporting order.
pub const EVENT_TOPICS: &[(&str, &[&str])] = &[
    ("Israeli Incursions in Tulkarm (August 2023)", &[
        "IDF", "Israeli Defense Forces", "Tulkarm incursions", "Military operations",
        "West Bank", "Nour Shams refugee camp",
    ]),
    ("General Military Action Against Palestinian Civilians (August 2023)", &[
        "IDF", "Palestinian civilians", "West Bank", "Military operations",
        "Palestinian Health Ministry", "UNRWA",
    ]),
    ("Palestinian Militant Bomb Detonations", &[
        "Hamas militants", "Islamic Jihad", "Terrorism", "Military installations", "Border communities",
    ]),
    ("Israeli Settler Violence (First Half 2023)", &[
        "West Bank settler violence", "OCHA", "Border communities", "Occupation",
        "Self-determination", "UN aid workers",
    ]),
    ("Journalist Killed", &[
        "Shireen Abu Akleh", "Press freedom", "Al Jazeera", "International Criminal Court",
    ]),
    ("October 7th Events", &[
        "Hamas-led Attack on Israel", "October 7 attacks", "Hamas militants", "Islamic Jihad",
        "Terrorism", "Border communities", "Yahya Sinwar", "Mohammed Deif",
    ]),
    ("Nova Music Festival Massacre", &[
        "Nova Music Festival massacre", "Hamas militants", "Terrorism", "Hostage crisis",
        "Border communities", "Civilian casualties",
    ]),
    ("Mid-October Events", &[
        "Church of Saint Porphyrius Airstrike (October 19)", "Church of Saint Porphyrius",
        "Gaza civilians", "Palestinian Health Ministry", "IDF", "Civilian casualties",
    ]),
    ("Biden Condemns Settler Violence (October 25)", &[
        "Joe Biden", "West Bank settler violence", "International response", "Occupation",
    ]),
    ("Communications Blackout (October 28)", &[
        "Gaza communications blackout", "Water cutoff", "electricity cutoff",
        "Humanitarian crisis", "Palestinian civilians",
    ]),
    ("Jabalia Refugee Camp Airstrike (October 31)", &[
        "Jabalia refugee camp", "Gaza civilians", "Palestinian Health Ministry",
        "Military operations", "Civilian casualties",
    ]),
    ("Al-Shifa Ambulance Airstrike", &[
        "Al-Shifa Hospital", "Gaza medical staff", "Palestinian Red Crescent",
        "Medical infrastructure", "WHO", "Civilian casualties",
    ]),
    ("School Attacks During Gaza Invasion", &[
        "UNRWA schools", "Gaza civilians", "Displaced Palestinians", "Military operations", "UN aid workers",
    ]),
    ("UN Casualty Report (November 3)", &[
        "Palestinian Health Ministry", "Gaza Health Ministry", "OCHA", "UN aid workers", "Civilian casualties",
    ]),
    ("Al-Quds Hospital Incident (November 10)", &[
        "Al-Quds Hospital", "Gaza medical staff", "Palestinian Red Crescent",
        "Military operations", "Civilian casualties",
    ]),
    ("Hospital Closures (November 12)", &[
        "Al-Shifa Hospital", "Al-Quds Hospital", "Gaza medical staff", "WHO",
        "Medical infrastructure", "Palestinian Health Ministry",
    ]),
    ("North Gaza Hospital Evacuations (November 21)", &[
        "WHO", "Gaza medical staff", "Mass evacuation orders", "Medical infrastructure",
        "Palestinian Health Ministry",
    ]),
    ("Qatar-Brokered Agreement (November 22)", &[
        "Hostage deal negotiations", "Qatar mediation", "Ceasefire", "Hostage families",
        "Joe Biden", "Humanitarian aid", "Palestinian prisoners",
    ]),
    ("Ongoing Humanitarian Issues", &[
        "Gaza Strip Infrastructure Crisis", "Water/electricity cutoff", "Blackout", "Gaza civilians",
        "Humanitarian aid", "UNRWA", "Palestinian Red Crescent", "WHO",
    ]),
    ("Hospital System Crisis", &[
        "WHO", "Gaza medical staff", "Medical infrastructure", "Palestinian Health Ministry",
        "MSF", "Palestinian Red Crescent",
    ]),
];

pub fn israel_palestine_communities() -> Result<CommunitySets, ConfigError> {
    CommunitySets::new(SUPPORTING_ISRAEL, OPPOSING_ISRAEL)
}

/// The single broad "attacks" topic.
pub fn attack_topics() -> Result<Vec<Topic>, ConfigError> {
    Ok(vec![Topic::new("attacks", ATTACK_KEYWORDS)?])
}

pub fn event_topics() -> Result<Vec<Topic>, ConfigError> {
    EVENT_TOPICS.iter().map(|(name, kws)| Topic::new(*name, kws.iter())).collect()
}
