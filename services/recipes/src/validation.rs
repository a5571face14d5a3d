//! Recipe form validation
//!
//! `validate_recipe` turns a raw [`RecipeSubmission`] into a typed
//! [`RecipeInput`] or the full set of field errors.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use crate::{
    forms::{RecipeSubmission, UploadedImage},
    models::{NewRecipe, RecipeUpdate},
};

/// Error messages keyed by form field name
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

const MAX_NAME_LENGTH: usize = 100;
const MAX_CATEGORY_LENGTH: usize = 50;
const MAX_SERVINGS: i32 = 1000;
/// One week
const MAX_MINUTES: i32 = 7 * 24 * 60;
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Validated recipe submission
#[derive(Debug, Clone)]
pub struct RecipeInput {
    pub name: String,
    pub servings: i32,
    pub prep_time: i32,
    pub cook_time: i32,
    /// Trimmed, de-duplicated category names in submission order
    pub categories: Vec<String>,
    pub image: Option<UploadedImage>,
    pub ingredients: String,
    pub steps: String,
}

impl RecipeInput {
    /// Preparation plus cooking time, in minutes
    pub fn total_time(&self) -> i32 {
        self.prep_time + self.cook_time
    }

    pub fn into_new_recipe(self, image: Option<String>, author_id: i64) -> NewRecipe {
        NewRecipe {
            total_time: self.total_time(),
            name: self.name,
            servings: self.servings,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            image,
            ingredients: self.ingredients,
            steps: self.steps,
            author_id,
        }
    }

    pub fn into_update(self, image: Option<String>) -> RecipeUpdate {
        RecipeUpdate {
            total_time: self.total_time(),
            name: self.name,
            servings: self.servings,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            image,
            ingredients: self.ingredients,
            steps: self.steps,
        }
    }
}

/// Validate every field of a submission
pub fn validate_recipe(submission: &RecipeSubmission) -> Result<RecipeInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = check(&mut errors, "name", validate_name(&submission.name));
    let servings = check(&mut errors, "servings", validate_servings(&submission.servings));
    let prep_time = check(&mut errors, "prep_time", parse_minutes(&submission.prep_time));
    let cook_time = check(&mut errors, "cook_time", parse_minutes(&submission.cook_time));
    let categories = check(
        &mut errors,
        "categories",
        validate_categories(&submission.categories),
    );
    let ingredients = check(
        &mut errors,
        "ingredients",
        validate_text(&submission.ingredients),
    );
    let steps = check(&mut errors, "steps", validate_text(&submission.steps));
    let image = check(
        &mut errors,
        "image",
        submission
            .image
            .as_ref()
            .map(validate_image)
            .transpose()
            .map(|image| image.cloned()),
    );

    match (
        name,
        servings,
        prep_time,
        cook_time,
        categories,
        ingredients,
        steps,
        image,
    ) {
        (
            Some(name),
            Some(servings),
            Some(prep_time),
            Some(cook_time),
            Some(categories),
            Some(ingredients),
            Some(steps),
            Some(image),
        ) if errors.is_empty() => Ok(RecipeInput {
            name,
            servings,
            prep_time,
            cook_time,
            categories,
            image,
            ingredients,
            steps,
        }),
        _ => Err(errors),
    }
}

fn check<T>(errors: &mut FieldErrors, field: &'static str, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.entry(field).or_default().push(message);
            None
        }
    }
}

/// Validate recipe name
pub fn validate_name(name: &str) -> Result<String, String> {
    let name = name.trim();

    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must be at most {} characters long",
            MAX_NAME_LENGTH
        ));
    }

    Ok(name.to_string())
}

/// Validate servings
pub fn validate_servings(servings: &str) -> Result<i32, String> {
    let servings = servings.trim();

    if servings.is_empty() {
        return Err("Servings is required".to_string());
    }

    let servings: i32 = servings
        .parse()
        .map_err(|_| "Servings must be a whole number".to_string())?;

    if !(1..=MAX_SERVINGS).contains(&servings) {
        return Err(format!("Servings must be between 1 and {}", MAX_SERVINGS));
    }

    Ok(servings)
}

/// Parse a duration into whole minutes
///
/// Accepts plain minutes (`"25"`) or hours and minutes (`"1:30"`).
pub fn parse_minutes(value: &str) -> Result<i32, String> {
    let value = value.trim();

    if value.is_empty() {
        return Err("Duration is required".to_string());
    }

    const FORMAT_HINT: &str = "Enter minutes (e.g. 25) or hours:minutes (e.g. 1:30)";

    // `\d` would also match non-ASCII digits, which `str::parse` rejects.
    static DURATION_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DURATION_REGEX.get_or_init(|| {
        Regex::new(r"^(?:([0-9]{1,3}):([0-5][0-9])|([0-9]{1,5}))$")
            .expect("Failed to compile duration regex")
    });

    let captures = regex
        .captures(value)
        .ok_or_else(|| FORMAT_HINT.to_string())?;

    let number = |index: usize| -> Result<i32, String> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().map_err(|_| FORMAT_HINT.to_string()),
            None => Err(FORMAT_HINT.to_string()),
        }
    };

    let minutes = if captures.get(3).is_some() {
        number(3)?
    } else {
        number(1)? * 60 + number(2)?
    };

    if minutes > MAX_MINUTES {
        return Err(format!("Duration must be at most {} minutes", MAX_MINUTES));
    }

    Ok(minutes)
}

/// Split a comma separated category list
///
/// Names are trimmed, empty names dropped and duplicates removed keeping the
/// first occurrence.
pub fn split_categories(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// Validate the category list
pub fn validate_categories(raw: &str) -> Result<Vec<String>, String> {
    let names = split_categories(raw);

    if names.is_empty() {
        return Err("At least one category is required".to_string());
    }

    static CATEGORY_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = CATEGORY_REGEX.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} '&-]*$").expect("Failed to compile category regex")
    });

    for name in &names {
        if name.chars().count() > MAX_CATEGORY_LENGTH {
            return Err(format!(
                "Category '{}' must be at most {} characters long",
                name, MAX_CATEGORY_LENGTH
            ));
        }

        if !regex.is_match(name) {
            return Err(format!(
                "Category '{}' can only contain letters, numbers, spaces, hyphens, apostrophes and ampersands",
                name
            ));
        }
    }

    Ok(names)
}

/// Validate a required free-text field
pub fn validate_text(value: &str) -> Result<String, String> {
    let value = value.trim();

    if value.is_empty() {
        return Err("This field is required".to_string());
    }

    Ok(value.to_string())
}

/// Validate an uploaded image
pub fn validate_image(image: &UploadedImage) -> Result<&UploadedImage, String> {
    if image.bytes.is_empty() {
        return Err("The submitted file is empty".to_string());
    }

    if let Some(content_type) = &image.content_type {
        if !content_type.starts_with("image/") {
            return Err("Upload a valid image".to_string());
        }
    }

    match image_extension(&image.file_name) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(image),
        _ => Err(format!(
            "Image must have one of the extensions: {}",
            IMAGE_EXTENSIONS.join(", ")
        )),
    }
}

/// Lower-cased file extension, if any
pub fn image_extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn pancakes() -> RecipeSubmission {
        RecipeSubmission {
            name: "Pancakes".to_string(),
            servings: "4".to_string(),
            prep_time: "10".to_string(),
            cook_time: "15".to_string(),
            categories: "breakfast,easy".to_string(),
            ingredients: "flour, milk, eggs".to_string(),
            steps: "mix, fry".to_string(),
            image: None,
        }
    }

    fn png(file_name: &str) -> UploadedImage {
        UploadedImage {
            file_name: file_name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[test]
    fn test_valid_submission_computes_total_time() {
        let input = validate_recipe(&pancakes()).unwrap();
        assert_eq!(input.name, "Pancakes");
        assert_eq!(input.servings, 4);
        assert_eq!(input.total_time(), 25);
        assert_eq!(input.categories, vec!["breakfast", "easy"]);

        let new_recipe = input.into_new_recipe(None, 7);
        assert_eq!(new_recipe.total_time, 25);
        assert_eq!(new_recipe.author_id, 7);
    }

    #[test]
    fn test_total_time_for_hour_durations() {
        let mut submission = pancakes();
        submission.prep_time = "1:30".to_string();
        submission.cook_time = "0:45".to_string();

        let input = validate_recipe(&submission).unwrap();
        assert_eq!(input.prep_time, 90);
        assert_eq!(input.cook_time, 45);
        assert_eq!(input.into_update(None).total_time, 135);
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let submission = RecipeSubmission {
            servings: "lots".to_string(),
            ..Default::default()
        };

        let errors = validate_recipe(&submission).unwrap_err();
        for field in [
            "name",
            "servings",
            "prep_time",
            "cook_time",
            "categories",
            "ingredients",
            "steps",
        ] {
            assert!(errors.contains_key(field), "missing error for {}", field);
        }
        assert!(!errors.contains_key("image"));
        assert_eq!(errors["servings"], vec!["Servings must be a whole number"]);
    }

    #[test]
    fn test_servings_bounds() {
        assert!(validate_servings("0").is_err());
        assert!(validate_servings("-2").is_err());
        assert_eq!(validate_servings(" 12 "), Ok(12));
        assert!(validate_servings("1001").is_err());
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("0"), Ok(0));
        assert_eq!(parse_minutes("25"), Ok(25));
        assert_eq!(parse_minutes("2:05"), Ok(125));
        assert!(parse_minutes("1:75").is_err());
        assert!(parse_minutes("-5").is_err());
        assert!(parse_minutes("ten").is_err());
        assert!(parse_minutes("20000").is_err());
        assert!(parse_minutes("٢٥").is_err());
        assert!(parse_minutes("1:٣٠").is_err());
    }

    #[test]
    fn test_split_categories_normalizes() {
        assert_eq!(
            split_categories(" breakfast, easy,,breakfast ,easy "),
            vec!["breakfast", "easy"]
        );
        assert!(split_categories(" , ,").is_empty());
    }

    #[test]
    fn test_validate_categories() {
        assert!(validate_categories("").is_err());
        assert!(validate_categories("quick & easy, kid-friendly").is_ok());
        assert!(validate_categories("<script>").is_err());
        assert!(validate_categories(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_image() {
        assert!(validate_image(&png("pancakes.PNG")).is_ok());
        assert!(validate_image(&png("pancakes.exe")).is_err());
        assert!(validate_image(&png("pancakes")).is_err());

        let mut not_an_image = png("pancakes.png");
        not_an_image.content_type = Some("text/plain".to_string());
        assert!(validate_image(&not_an_image).is_err());

        let mut empty = png("pancakes.png");
        empty.bytes = Bytes::new();
        assert!(validate_image(&empty).is_err());
    }

    #[test]
    fn test_invalid_image_is_a_field_error() {
        let mut submission = pancakes();
        submission.image = Some(png("pancakes.txt"));

        let errors = validate_recipe(&submission).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("image"));
    }
}
