use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mock first-responder record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Responder {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: String,
    /// Distance from the traveller in meters.
    pub distance: u32,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub profile_image: String,
}

impl Responder {
    /// Available and within `max_distance` meters.
    #[must_use]
    pub const fn is_nearby(&self, max_distance: u32) -> bool {
        self.is_available && self.distance <= max_distance
    }
}

/// Fixed refuge location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeHaven {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {collection} id {id}")]
    DuplicateId { collection: &'static str, id: u32 },
}

/// In-memory collections served by the stub backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub responders: Vec<Responder>,
    #[serde(default)]
    pub safe_havens: Vec<SafeHaven>,
}

impl Dataset {
    /// Create an empty dataset (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a dataset from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or ids repeat within a
    /// collection.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let dataset: Self = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<(), DatasetError> {
        let mut seen = std::collections::HashSet::new();
        for responder in &self.responders {
            if !seen.insert(responder.id) {
                return Err(DatasetError::DuplicateId {
                    collection: "responder",
                    id: responder.id,
                });
            }
        }
        seen.clear();
        for haven in &self.safe_havens {
            if !seen.insert(haven.id) {
                return Err(DatasetError::DuplicateId {
                    collection: "safe haven",
                    id: haven.id,
                });
            }
        }
        Ok(())
    }

    /// The fixed demo dataset: three responders, five safe havens.
    #[must_use]
    pub fn seed() -> Self {
        let responder = |id, name: &str, skills: [&str; 2], location: &str, distance, image: &str| {
            Responder {
                id,
                name: name.to_string(),
                skills: skills.iter().map(ToString::to_string).collect(),
                location: location.to_string(),
                distance,
                is_available: true,
                profile_image: format!("https://images.unsplash.com/{image}"),
            }
        };
        let haven = |id, name: &str, kind: &str, location: &str| SafeHaven {
            id,
            name: name.to_string(),
            kind: kind.to_string(),
            location: location.to_string(),
            is_active: true,
        };
        Self {
            responders: vec![
                responder(
                    1,
                    "Rahul Mehta",
                    ["First Aid", "Security"],
                    "Near ITPL Main Road",
                    120,
                    "photo-1568602471122-7832951cc4c5",
                ),
                responder(
                    2,
                    "Ananya Patel",
                    ["First Aid", "Medical"],
                    "Whitefield",
                    250,
                    "photo-1573497019940-1c28c88b4f3e",
                ),
                responder(
                    3,
                    "Suresh Kumar",
                    ["Security", "Driver"],
                    "Hoodi Circle",
                    350,
                    "photo-1500048993953-d23a436266cf",
                ),
            ],
            safe_havens: vec![
                haven(1, "Sapphire Mall", "Shopping Mall", "Whitefield"),
                haven(2, "24x7 Medical Store", "Pharmacy", "Hoodi Circle"),
                haven(
                    3,
                    "Baiyappanahalli Metro Station",
                    "Public Transport",
                    "Baiyappanahalli",
                ),
                haven(4, "Brigade Gateway", "Apartment Complex", "Malleswaram"),
                haven(5, "Hope Farm Signal", "Police Outpost", "Hope Farm"),
            ],
        }
    }

    /// Responders that are available within `max_distance` meters.
    pub fn responders_within(&self, max_distance: u32) -> impl Iterator<Item = &Responder> {
        self.responders
            .iter()
            .filter(move |responder| responder.is_nearby(max_distance))
    }

    pub fn active_safe_havens(&self) -> impl Iterator<Item = &SafeHaven> {
        self.safe_havens.iter().filter(|haven| haven.is_active)
    }
}
