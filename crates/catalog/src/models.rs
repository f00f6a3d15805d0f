use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Assessment domain, the closed catalog taxonomy. Each domain has a
/// one-letter code and a display name; both forms parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    Ability,
    Biodata,
    Competencies,
    Development,
    Exercises,
    Knowledge,
    Personality,
    Simulations,
}

impl Domain {
    pub const ALL: [Domain; 8] = [
        Domain::Ability,
        Domain::Biodata,
        Domain::Competencies,
        Domain::Development,
        Domain::Exercises,
        Domain::Knowledge,
        Domain::Personality,
        Domain::Simulations,
    ];

    pub fn code(self) -> char {
        match self {
            Domain::Ability => 'A',
            Domain::Biodata => 'B',
            Domain::Competencies => 'C',
            Domain::Development => 'D',
            Domain::Exercises => 'E',
            Domain::Knowledge => 'K',
            Domain::Personality => 'P',
            Domain::Simulations => 'S',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Domain::Ability => "Ability & Aptitude",
            Domain::Biodata => "Biodata & Situational Judgement",
            Domain::Competencies => "Competencies",
            Domain::Development => "Development & 360",
            Domain::Exercises => "Assessment Exercises",
            Domain::Knowledge => "Knowledge & Skills",
            Domain::Personality => "Personality & Behavior",
            Domain::Simulations => "Simulations",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == 1 {
            let code = trimmed.chars().next().unwrap().to_ascii_uppercase();
            for d in Domain::ALL {
                if d.code() == code {
                    return Ok(d);
                }
            }
            return Err(format!("unknown domain code: {trimmed}"));
        }
        let lower = trimmed.to_lowercase();
        for d in Domain::ALL {
            if d.name().to_lowercase() == lower {
                return Ok(d);
            }
        }
        Err(format!("unknown domain: {trimmed}"))
    }
}

impl Serialize for Domain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Domain::from_str(&s).map_err(DeError::custom)
    }
}

/// One catalog record. Immutable from the engine's perspective; the
/// crawler owns creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Stable identifier; falls back to `url` when the crawled JSON
    /// carries none.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    /// Duration in minutes; the crawler writes -1 or null when unknown.
    #[serde(default, deserialize_with = "de_duration", serialize_with = "ser_duration")]
    pub duration: Option<u32>,
    /// One or more domain codes; the first is the primary domain.
    pub test_type: Vec<Domain>,
    #[serde(default, with = "yes_no")]
    pub remote_support: bool,
    #[serde(default, with = "yes_no")]
    pub adaptive_support: bool,
}

impl Assessment {
    /// The domain used for balance partitioning.
    pub fn primary_domain(&self) -> Option<Domain> {
        self.test_type.first().copied()
    }
}

fn de_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| u32::try_from(n).ok()))
}

fn ser_duration<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    // Unknown durations serialize as -1, matching the crawled format.
    match value {
        Some(n) => serializer.serialize_i64(i64::from(*n)),
        None => serializer.serialize_i64(-1),
    }
}

/// Serde helpers for the catalog's "Yes"/"No" flags.
mod yes_no {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(false),
            Some(Raw::Flag(b)) => Ok(b),
            Some(Raw::Text(s)) => match s.trim().to_lowercase().as_str() {
                "yes" | "true" => Ok(true),
                "no" | "false" | "" => Ok(false),
                other => Err(DeError::custom(format!("expected Yes/No, got {other}"))),
            },
        }
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "Yes" } else { "No" })
    }
}
