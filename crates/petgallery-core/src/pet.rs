// Pet domain types
//
// Pet is the persisted record. PetRequest is what clients send: it may be
// missing fields and only becomes a Pet after validation.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A pet record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Surrogate key, 0 until the pet is first saved
    pub pet_id: i32,
    pub name: String,
    pub image_url: String,
}

impl Pet {
    pub fn new(pet_id: i32, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            pet_id,
            name: name.into(),
            image_url: image_url.into(),
        }
    }

    /// True when the pet has never been persisted
    pub fn is_new(&self) -> bool {
        self.pet_id == 0
    }
}

/// Pet payload as submitted by a client, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PetRequest {
    pub pet_id: i32,
    #[cfg_attr(feature = "openapi", schema(example = "Fritzy"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "https://example.com/i.png"))]
    pub image_url: Option<String>,
}

impl PetRequest {
    pub fn new(pet_id: i32, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            pet_id,
            name: Some(name.into()),
            image_url: Some(image_url.into()),
        }
    }
}

impl From<Pet> for PetRequest {
    fn from(pet: Pet) -> Self {
        Self {
            pet_id: pet.pet_id,
            name: Some(pet.name),
            image_url: Some(pet.image_url),
        }
    }
}
