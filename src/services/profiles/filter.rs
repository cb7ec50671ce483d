//! Compiles raw caregiver search parameters into a predicate set.
//!
//! Absent or blank parameters add no constraint. All predicates are combined
//! with AND, and the role predicate is always present. `available` defaults to
//! `true`, so a plain search only returns active caregivers.

use crate::error::{AppError, AppResult};
use crate::models::{Profile, UserRole};

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Search parameters exactly as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub province: Option<String>,
    pub languages: Option<String>,
    pub services: Option<String>,
    pub specializations: Option<String>,
    pub min_experience: Option<i32>,
    pub available: Option<bool>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

/// One conjunct of a compiled search. Needles of the `*Contain` variants are
/// stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Role(UserRole),
    Province(String),
    LanguagesContain(String),
    ServicesContain(String),
    SpecializationsContain(String),
    MinExperience(i32),
    Active(bool),
    AgeAtLeast(i32),
    AgeAtMost(i32),
}

fn contains_ci(haystack: &Option<String>, needle: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|h| h.to_lowercase().contains(needle))
}

impl Predicate {
    pub fn matches(&self, profile: &Profile) -> bool {
        match self {
            Predicate::Role(role) => profile.role == *role,
            Predicate::Province(province) => profile.province.as_deref() == Some(province.as_str()),
            Predicate::LanguagesContain(needle) => contains_ci(&profile.languages, needle),
            Predicate::ServicesContain(needle) => contains_ci(&profile.services_offered, needle),
            Predicate::SpecializationsContain(needle) => {
                contains_ci(&profile.specializations, needle)
            }
            Predicate::MinExperience(min) => profile.years_of_experience.is_some_and(|y| y >= *min),
            Predicate::Active(active) => profile.is_active == *active,
            Predicate::AgeAtLeast(min) => profile.age.is_some_and(|a| a >= *min),
            Predicate::AgeAtMost(max) => profile.age.is_some_and(|a| a <= *max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Age,
    YearsOfExperience,
    Completeness,
    Rating,
    ReviewCount,
    HourlyRate,
    DisplayName,
    CreatedAt,
    LastActiveAt,
}

impl SortField {
    fn parse(name: &str) -> Option<Self> {
        let field = match name.to_ascii_lowercase().as_str() {
            "id" => SortField::Id,
            "age" => SortField::Age,
            "yearsofexperience" => SortField::YearsOfExperience,
            "completenesspercent" | "profilecompletionpercentage" => SortField::Completeness,
            "rating" | "totalrating" => SortField::Rating,
            "reviewcount" | "totalreviews" => SortField::ReviewCount,
            "hourlyrate" => SortField::HourlyRate,
            "displayname" => SortField::DisplayName,
            "createdat" => SortField::CreatedAt,
            "lastactiveat" => SortField::LastActiveAt,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Featured and active first, then completeness descending, then id.
    Relevance,
    Field(SortField, SortDirection),
}

impl SortOrder {
    /// Parses `relevance`, `<field>`, `<field>,asc` or `<field>,desc`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("relevance") {
            return Ok(SortOrder::Relevance);
        }

        let invalid = || AppError::InvalidSort {
            sort: raw.to_string(),
        };
        let (name, direction) = match raw.split_once(',') {
            Some((name, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    _ => return Err(invalid()),
                };
                (name.trim(), direction)
            }
            None => (raw, SortDirection::Asc),
        };

        let field = SortField::parse(name).ok_or_else(invalid)?;
        Ok(SortOrder::Field(field, direction))
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// Validated search ready to be run against a candidate population.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSearch {
    pub predicates: Vec<Predicate>,
    pub sort: SortOrder,
    pub page: PageRequest,
}

impl CompiledSearch {
    pub fn matches(&self, profile: &Profile) -> bool {
        self.predicates.iter().all(|p| p.matches(profile))
    }
}

fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates `query` and turns it into predicates, a sort order and a page.
pub fn compile(query: &SearchQuery) -> AppResult<CompiledSearch> {
    let page = query.page.unwrap_or(0);
    if page < 0 {
        return Err(AppError::Validation {
            field: "page".to_string(),
            reason: "Page must be zero or greater".to_string(),
        });
    }
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if size <= 0 {
        return Err(AppError::Validation {
            field: "size".to_string(),
            reason: "Size must be greater than zero".to_string(),
        });
    }
    if let Some(min) = query.min_experience
        && min < 0
    {
        return Err(AppError::Validation {
            field: "minExperience".to_string(),
            reason: "Minimum experience cannot be negative".to_string(),
        });
    }

    let sort = SortOrder::parse(query.sort.as_deref().unwrap_or("relevance"))?;

    let mut predicates = vec![
        Predicate::Role(UserRole::Caregiver),
        Predicate::Active(query.available.unwrap_or(true)),
    ];
    if let Some(province) = normalized(&query.province) {
        predicates.push(Predicate::Province(province));
    }
    if let Some(languages) = normalized(&query.languages) {
        predicates.push(Predicate::LanguagesContain(languages.to_lowercase()));
    }
    if let Some(services) = normalized(&query.services) {
        predicates.push(Predicate::ServicesContain(services.to_lowercase()));
    }
    if let Some(specializations) = normalized(&query.specializations) {
        predicates.push(Predicate::SpecializationsContain(specializations.to_lowercase()));
    }
    if let Some(min) = query.min_experience {
        predicates.push(Predicate::MinExperience(min));
    }
    if let Some(min) = query.age_min {
        predicates.push(Predicate::AgeAtLeast(min));
    }
    if let Some(max) = query.age_max {
        predicates.push(Predicate::AgeAtMost(max));
    }

    Ok(CompiledSearch {
        predicates,
        sort,
        page: PageRequest {
            page: page as u64,
            size: size as u64,
        },
    })
}
