use serde::Deserialize;
use time::Date;

/// Partial profile fields for POST /api/profile. Absent fields keep their
/// stored value on update.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpsert {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// Body for PUT /api/profile/experience. `from` is validated as required in
/// the handler so missing fields produce a field-error array, not a 422.
#[derive(Debug, Deserialize)]
pub struct ExperienceInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub location: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Body for PUT /api/profile/education.
#[derive(Debug, Deserialize)]
pub struct EducationInput {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field_of_study: String,
    pub from: Option<Date>,
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}
