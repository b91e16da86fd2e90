// Pet validation rules
//
// Rules are evaluated in order and every violation is reported; nothing
// short-circuits except a missing pet, which yields a single message.

use url::Url;

use crate::pet::{Pet, PetRequest};

pub const PET_REQUIRED: &str = "Pet cannot be null.";
pub const NAME_REQUIRED: &str = "Pet name is required.";
pub const IMAGE_URL_REQUIRED: &str = "Pet image URL is required.";
pub const IMAGE_URL_INVALID: &str = "Pet image URL must be a URL.";

/// A predicate that is true when the value breaks the rule, plus the message to report
pub struct ValidationRule<T> {
    pub violated: fn(&T) -> bool,
    pub message: &'static str,
}

impl<T> ValidationRule<T> {
    pub fn check(&self, value: &T) -> Option<&'static str> {
        (self.violated)(value).then_some(self.message)
    }
}

pub const PET_RULES: &[ValidationRule<PetRequest>] = &[
    ValidationRule {
        violated: name_missing,
        message: NAME_REQUIRED,
    },
    ValidationRule {
        violated: image_url_missing,
        message: IMAGE_URL_REQUIRED,
    },
    ValidationRule {
        violated: image_url_malformed,
        message: IMAGE_URL_INVALID,
    },
];

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn name_missing(pet: &PetRequest) -> bool {
    is_blank(pet.name.as_deref())
}

fn image_url_missing(pet: &PetRequest) -> bool {
    is_blank(pet.image_url.as_deref())
}

// Blank URLs are reported by image_url_missing only.
fn image_url_malformed(pet: &PetRequest) -> bool {
    match pet.image_url.as_deref() {
        Some(url) if !url.trim().is_empty() => !is_url(url),
        _ => false,
    }
}

/// Absolute URL with a host, e.g. `https://example.com/pet.png`
pub fn is_url(value: &str) -> bool {
    Url::parse(value.trim()).map_or(false, |url| url.has_host())
}

/// Validate a client payload, returning the pet or every violation message
pub fn validate_pet(pet: Option<&PetRequest>) -> Result<Pet, Vec<String>> {
    let Some(pet) = pet else {
        return Err(vec![PET_REQUIRED.to_string()]);
    };

    let violations: Vec<String> = PET_RULES
        .iter()
        .filter_map(|rule| rule.check(pet))
        .map(str::to_string)
        .collect();

    match (&pet.name, &pet.image_url) {
        (Some(name), Some(image_url)) if violations.is_empty() => {
            Ok(Pet::new(pet.pet_id, name.clone(), image_url.clone()))
        }
        _ => Err(violations),
    }
}
