use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, FieldError},
    state::AppState,
};

use super::dto::{EducationInput, ExperienceInput, ProfileUpsert};
use super::repo::{
    prepend_entry, remove_entry, Education, Experience, Profile, ProfileWithOwner,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(list_profiles).post(upsert_profile).delete(delete_account))
        .route("/profile/me", get(my_profile))
        .route("/profile/experience", put(add_experience))
        .route("/profile/experience/:id", delete(remove_experience))
        .route("/profile/education", put(add_education))
        .route("/profile/education/:id", delete(remove_education))
}

const NO_PROFILE: &str = "there is no profile for this user";

#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileWithOwner>>, ApiError> {
    let profiles = Profile::list_with_owner(&state.db).await?;
    Ok(Json(profiles))
}

#[instrument(skip(state))]
pub async fn my_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::bad_request(NO_PROFILE))?;
    Ok(Json(profile))
}

#[instrument(skip(state, payload))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileUpsert>,
) -> Result<Json<Profile>, ApiError> {
    let profile = Profile::upsert(&state.db, user_id, &payload).await?;
    info!(user_id = %user_id, profile_id = %profile.id, "profile upserted");
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    Profile::delete_account(&state.db, user_id).await?;
    info!(user_id = %user_id, "account deleted");
    Ok(Json(serde_json::json!({ "msg": "user deleted" })))
}

/// Checks required fields and yields the start date, so a validated payload
/// cannot be used without one.
fn validate_experience(payload: &ExperienceInput) -> Result<time::Date, Vec<FieldError>> {
    let mut errors = Vec::new();
    if payload.title.trim().is_empty() {
        errors.push(FieldError::new("title", "title is required"));
    }
    if payload.company.trim().is_empty() {
        errors.push(FieldError::new("company", "company is required"));
    }
    if payload.from.is_none() {
        errors.push(FieldError::new("from", "from date is required"));
    }
    match payload.from {
        Some(from) if errors.is_empty() => Ok(from),
        _ => Err(errors),
    }
}

fn validate_education(payload: &EducationInput) -> Result<time::Date, Vec<FieldError>> {
    let mut errors = Vec::new();
    if payload.school.trim().is_empty() {
        errors.push(FieldError::new("school", "school is required"));
    }
    if payload.degree.trim().is_empty() {
        errors.push(FieldError::new("degree", "degree is required"));
    }
    if payload.field_of_study.trim().is_empty() {
        errors.push(FieldError::new("field_of_study", "field of study is required"));
    }
    if payload.from.is_none() {
        errors.push(FieldError::new("from", "from date is required"));
    }
    match payload.from {
        Some(from) if errors.is_empty() => Ok(from),
        _ => Err(errors),
    }
}

#[instrument(skip(state, payload))]
pub async fn add_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ExperienceInput>,
) -> Result<Json<Profile>, ApiError> {
    let from = validate_experience(&payload).map_err(|errors| {
        warn!(user_id = %user_id, "experience validation failed");
        ApiError::Validation(errors)
    })?;

    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::bad_request(NO_PROFILE))?;

    let entry = Experience {
        id: Uuid::new_v4(),
        title: payload.title,
        company: payload.company,
        location: payload.location,
        from,
        to: payload.to,
        current: payload.current,
        description: payload.description,
    };

    let mut entries = profile.experience.0;
    prepend_entry(&mut entries, entry);
    let profile = Profile::save_experience(&state.db, user_id, &entries).await?;
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn remove_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::bad_request(NO_PROFILE))?;

    let mut entries = profile.experience.0;
    if !remove_entry(&mut entries, id) {
        warn!(user_id = %user_id, entry_id = %id, "experience entry not found");
        return Err(ApiError::bad_request("experience not found"));
    }

    let profile = Profile::save_experience(&state.db, user_id, &entries).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, payload))]
pub async fn add_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<EducationInput>,
) -> Result<Json<Profile>, ApiError> {
    let from = validate_education(&payload).map_err(|errors| {
        warn!(user_id = %user_id, "education validation failed");
        ApiError::Validation(errors)
    })?;

    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::bad_request(NO_PROFILE))?;

    let entry = Education {
        id: Uuid::new_v4(),
        school: payload.school,
        degree: payload.degree,
        field_of_study: payload.field_of_study,
        from,
        to: payload.to,
        current: payload.current,
        description: payload.description,
    };

    let mut entries = profile.education.0;
    prepend_entry(&mut entries, entry);
    let profile = Profile::save_education(&state.db, user_id, &entries).await?;
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn remove_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::bad_request(NO_PROFILE))?;

    let mut entries = profile.education.0;
    if !remove_entry(&mut entries, id) {
        warn!(user_id = %user_id, entry_id = %id, "education entry not found");
        return Err(ApiError::bad_request("education not found"));
    }

    let profile = Profile::save_education(&state.db, user_id, &entries).await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn experience_validation_reports_missing_fields() {
        let payload = ExperienceInput {
            title: String::new(),
            company: "Acme".into(),
            location: None,
            from: None,
            to: None,
            current: false,
            description: None,
        };
        let errors = validate_experience(&payload).unwrap_err();
        let params: Vec<&str> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, vec!["title", "from"]);
    }

    #[test]
    fn experience_validation_accepts_complete_input() {
        let payload = ExperienceInput {
            title: "Developer".into(),
            company: "Acme".into(),
            location: Some("Remote".into()),
            from: Some(date!(2021 - 06 - 01)),
            to: None,
            current: true,
            description: None,
        };
        assert_eq!(validate_experience(&payload).unwrap(), date!(2021 - 06 - 01));
    }

    #[test]
    fn education_validation_reports_every_missing_field() {
        let payload = EducationInput {
            school: String::new(),
            degree: String::new(),
            field_of_study: String::new(),
            from: None,
            to: None,
            current: false,
            description: None,
        };
        assert_eq!(validate_education(&payload).unwrap_err().len(), 4);
    }
}
