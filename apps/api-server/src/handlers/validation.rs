//! Request validation: wire DTOs in, domain input or field errors out.
//!
//! Messages follow one shape per rule so clients can show them verbatim.
//! Checks that need the store (platform existence, email uniqueness, the
//! daily quota) happen further in.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use postly_core::FieldErrors;
use postly_core::domain::{MAX_PAGE, NewPost, PlatformType, PostChanges, PostFilter, PostStatus};
use postly_shared::dto::{
    CreatePostRequest, LoginRequest, PageQuery, PostQuery, RegisterUserRequest,
    TogglePlatformsRequest, UpdatePlatformRequest, UpdatePostRequest,
};

const MAX_STRING: usize = 255;
const MIN_PASSWORD: usize = 8;

fn label(field: &str) -> String {
    field.replace('_', " ")
}

fn required(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.add(field, format!("The {} field is required.", label(field)));
            None
        }
    }
}

fn max_len(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.chars().count() > MAX_STRING {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {} characters.",
                label(field),
                MAX_STRING
            ),
        );
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

fn check_url(errors: &mut FieldErrors, field: &str, value: &str) {
    let valid = url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false);
    if !valid {
        errors.add(field, format!("The {} field must be a valid URL.", label(field)));
    }
}

/// RFC 3339, or `YYYY-MM-DD HH:MM:SS` read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|t| t.and_utc())
        })
}

fn timestamp(errors: &mut FieldErrors, field: &str, value: &str) -> Option<DateTime<Utc>> {
    let parsed = parse_timestamp(value);
    if parsed.is_none() {
        errors.add(field, format!("The {} field must be a valid date.", label(field)));
    }
    parsed
}

fn status(errors: &mut FieldErrors, value: &str) -> Option<PostStatus> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        errors.add("status", "The selected status is invalid.");
    }
    parsed
}

/// Parse platform ids, reporting malformed entries by index.
fn platform_ids(errors: &mut FieldErrors, raw: Vec<String>) -> Vec<Uuid> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, id)| {
            let parsed = Uuid::parse_str(id.trim()).ok();
            if parsed.is_none() {
                let field = format!("platforms.{}", index);
                errors.add(field.clone(), format!("The selected {} is invalid.", field));
            }
            parsed
        })
        .collect()
}

fn page_number(errors: &mut FieldErrors, page: Option<u64>) -> u64 {
    match page.unwrap_or(1) {
        page if page > MAX_PAGE => {
            errors.add(
                "page",
                format!("The page field must not be greater than {MAX_PAGE}."),
            );
            1
        }
        page => page,
    }
}

/// Validated registration input.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn registration(req: RegisterUserRequest) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required(&mut errors, "name", req.name);
    if let Some(name) = &name {
        max_len(&mut errors, "name", name);
    }

    let email = required(&mut errors, "email", req.email).map(|e| e.to_lowercase());
    if let Some(email) = &email {
        if !is_email(email) {
            errors.add("email", "The email field must be a valid email address.");
        }
        max_len(&mut errors, "email", email);
    }

    let password = match req.password.filter(|p| !p.is_empty()) {
        Some(password) => {
            if password.chars().count() < MIN_PASSWORD {
                errors.add(
                    "password",
                    format!("The password field must be at least {} characters.", MIN_PASSWORD),
                );
            }
            if req.password_confirmation.as_deref() != Some(password.as_str()) {
                errors.add("password", "The password field confirmation does not match.");
            }
            Some(password)
        }
        None => {
            errors.add("password", "The password field is required.");
            None
        }
    };

    finish(errors)?;
    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Ok(Registration {
            name,
            email,
            password,
        }),
        _ => Err(FieldErrors::single("body", "The request is incomplete.")),
    }
}

/// Validated login input: `(email, password)`.
pub fn login(req: LoginRequest) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = required(&mut errors, "email", req.email).map(|e| e.to_lowercase());
    if let Some(email) = &email {
        if !is_email(email) {
            errors.add("email", "The email field must be a valid email address.");
        }
    }

    let password = req.password.filter(|p| !p.is_empty());
    match &password {
        Some(p) if p.chars().count() < MIN_PASSWORD => errors.add(
            "password",
            format!("The password field must be at least {} characters.", MIN_PASSWORD),
        ),
        Some(_) => {}
        None => errors.add("password", "The password field is required."),
    }

    finish(errors)?;
    email
        .zip(password)
        .ok_or_else(|| FieldErrors::single("body", "The request is incomplete."))
}

pub fn new_post(req: CreatePostRequest) -> Result<NewPost, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = required(&mut errors, "title", req.title);
    if let Some(title) = &title {
        max_len(&mut errors, "title", title);
    }
    let content = required(&mut errors, "content", req.content);

    let image_url = req.image_url.filter(|u| !u.trim().is_empty());
    if let Some(url) = &image_url {
        check_url(&mut errors, "image_url", url);
    }

    let scheduled_time = req
        .scheduled_time
        .filter(|t| !t.trim().is_empty())
        .and_then(|t| timestamp(&mut errors, "scheduled_time", &t));

    let status = required(&mut errors, "status", req.status).and_then(|s| status(&mut errors, &s));

    let platform_ids = platform_ids(&mut errors, req.platforms.unwrap_or_default());

    finish(errors)?;
    match (title, content, status) {
        (Some(title), Some(content), Some(status)) => Ok(NewPost {
            title,
            content,
            image_url,
            scheduled_time,
            status,
            platform_ids,
        }),
        _ => Err(FieldErrors::single("body", "The request is incomplete.")),
    }
}

pub fn post_changes(req: UpdatePostRequest) -> Result<PostChanges, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = req.title.map(|t| t.trim().to_string());
    if let Some(title) = &title {
        if title.is_empty() {
            errors.add("title", "The title field must not be empty.");
        }
        max_len(&mut errors, "title", title);
    }

    let content = req.content.map(|c| c.trim().to_string());
    if content.as_deref().is_some_and(str::is_empty) {
        errors.add("content", "The content field must not be empty.");
    }

    let image_url = req
        .image_url
        .map(|u| u.filter(|u| !u.trim().is_empty()));
    if let Some(Some(url)) = &image_url {
        check_url(&mut errors, "image_url", url);
    }

    let scheduled_time = req.scheduled_time.map(|t| {
        t.filter(|t| !t.trim().is_empty())
            .and_then(|t| timestamp(&mut errors, "scheduled_time", &t))
    });

    let status = req.status.and_then(|s| status(&mut errors, &s));

    let platform_ids = req.platforms.map(|ids| platform_ids(&mut errors, ids));

    finish(errors)?;
    Ok(PostChanges {
        title,
        content,
        image_url,
        scheduled_time,
        status,
        platform_ids,
    })
}

/// Listing filters plus the requested page.
pub fn post_query(query: &PostQuery) -> Result<(PostFilter, u64), FieldErrors> {
    let mut errors = FieldErrors::new();

    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| status(&mut errors, s));

    let scheduled_on = query.date.as_deref().filter(|d| !d.is_empty()).and_then(|d| {
        let parsed = NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok();
        if parsed.is_none() {
            errors.add("date", "The date field must match the format Y-m-d.");
        }
        parsed
    });

    let page = page_number(&mut errors, query.page);

    finish(errors)?;
    Ok((
        PostFilter {
            status,
            scheduled_on,
        },
        page,
    ))
}

pub fn page_query(query: &PageQuery) -> Result<u64, FieldErrors> {
    let mut errors = FieldErrors::new();
    let page = page_number(&mut errors, query.page);
    finish(errors)?;
    Ok(page)
}

pub fn toggle_platforms(req: TogglePlatformsRequest) -> Result<Vec<Uuid>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let Some(raw) = req.platforms else {
        return Err(FieldErrors::single("platforms", "The platforms field is required."));
    };
    let ids = platform_ids(&mut errors, raw);
    finish(errors)?;
    Ok(ids)
}

pub fn platform_update(req: UpdatePlatformRequest) -> Result<(String, PlatformType), FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required(&mut errors, "name", req.name);
    if let Some(name) = &name {
        max_len(&mut errors, "name", name);
    }

    let platform_type = required(&mut errors, "type", req.platform_type).and_then(|t| {
        let parsed = t.parse::<PlatformType>().ok();
        if parsed.is_none() {
            errors.add("type", "The selected type is invalid.");
        }
        parsed
    });

    finish(errors)?;
    name.zip(platform_type)
        .ok_or_else(|| FieldErrors::single("body", "The request is incomplete."))
}

fn finish(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
