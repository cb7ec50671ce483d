//! Profile completeness scoring.
//!
//! The score is the share of a role-dependent checklist that is filled in,
//! scaled to 0..=100 and rounded half up. Non-caregivers are scored on 11
//! items, caregivers on 17.

use bigdecimal::BigDecimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Profile;

/// Outcome of scoring one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    /// 0..=100
    pub percentage: i32,
    /// Checklist items not yet filled in, in checklist order.
    pub missing_fields: Vec<String>,
}

/// Running tally over the checklist.
#[derive(Default)]
struct Checklist {
    total: u32,
    completed: u32,
    missing: Vec<&'static str>,
}

impl Checklist {
    fn check(&mut self, name: &'static str, present: bool) {
        self.total += 1;
        if present {
            self.completed += 1;
        } else {
            self.missing.push(name);
        }
    }

    fn text(&mut self, name: &'static str, value: &Option<String>) {
        self.check(name, has_text(value));
    }

    fn percentage(&self) -> i32 {
        if self.total == 0 {
            return 0;
        }
        // f64::round rounds halves away from zero, which is half-up for positives.
        (f64::from(self.completed) / f64::from(self.total) * 100.0).round() as i32
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn has_decimal(value: &Option<BigDecimal>) -> bool {
    value.is_some()
}

/// Scores `profile` and lists what is missing.
pub fn evaluate(profile: &Profile) -> CompletenessReport {
    let mut list = Checklist::default();

    // identity
    list.check("email", !profile.email.trim().is_empty());
    list.check("role", true);
    list.check("externalAuthId", !profile.external_auth_id.trim().is_empty());

    // basic
    list.text("fullName", &profile.full_name);
    list.text("displayName", &profile.display_name);
    list.check("age", profile.age.is_some());
    list.text("profilePhotoUrl", &profile.profile_photo_url);

    // contact
    list.text("primaryPhone", &profile.primary_phone);
    list.text("wechatId", &profile.wechat_id);

    // location
    list.text("city", &profile.city);
    list.text("province", &profile.province);

    if profile.is_caregiver() {
        list.check("yearsOfExperience", profile.years_of_experience.is_some());
        list.text("languages", &profile.languages);
        list.text("specializations", &profile.specializations);
        list.text("aboutMe", &profile.about_me);
        list.text("servicesOffered", &profile.services_offered);
        list.check("hourlyRate", has_decimal(&profile.hourly_rate));
    }

    CompletenessReport {
        percentage: list.percentage(),
        missing_fields: list.missing.into_iter().map(String::from).collect(),
    }
}

/// Completeness percentage of `profile`, 0..=100.
pub fn score(profile: &Profile) -> i32 {
    evaluate(profile).percentage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use jiff::Timestamp;
    use proptest::prelude::*;

    fn bare(role: UserRole) -> Profile {
        Profile::new("auth-1", "a@example.com", role, Timestamp::UNIX_EPOCH)
    }

    fn filled_caregiver() -> Profile {
        let mut p = bare(UserRole::Caregiver);
        p.full_name = Some("Li Mei".to_string());
        p.display_name = Some("Auntie Li".to_string());
        p.age = Some(42);
        p.profile_photo_url = Some("https://cdn.example.com/li.jpg".to_string());
        p.primary_phone = Some("+8613800000000".to_string());
        p.wechat_id = Some("limei88".to_string());
        p.city = Some("Hangzhou".to_string());
        p.province = Some("Zhejiang".to_string());
        p.years_of_experience = Some(12);
        p.languages = Some("Mandarin,Cantonese".to_string());
        p.specializations = Some("newborn care".to_string());
        p.about_me = Some("Experienced yuesao".to_string());
        p.services_offered = Some("night care,cooking".to_string());
        p.hourly_rate = Some(BigDecimal::from(80));
        p
    }

    #[test]
    fn test_fully_filled_caregiver_scores_100() {
        let report = evaluate(&filled_caregiver());
        assert_eq!(report.percentage, 100);
        assert!(report.missing_fields.is_empty());
    }

    #[test]
    fn test_identity_only_caregiver_scores_18() {
        let report = evaluate(&bare(UserRole::Caregiver));
        // 3 of 17
        assert_eq!(report.percentage, 18);
        assert_eq!(report.missing_fields.len(), 14);
        assert_eq!(report.missing_fields[0], "fullName");
        assert_eq!(report.missing_fields[13], "hourlyRate");
    }

    #[test]
    fn test_non_caregiver_is_scored_on_eleven_items() {
        let report = evaluate(&bare(UserRole::Client));
        // 3 of 11
        assert_eq!(report.percentage, 27);
        assert_eq!(report.missing_fields.len(), 8);

        let mut filled = filled_caregiver();
        filled.role = UserRole::Admin;
        filled.years_of_experience = None;
        filled.hourly_rate = None;
        assert_eq!(score(&filled), 100);
    }

    #[test]
    fn test_blank_strings_are_not_present() {
        let mut p = filled_caregiver();
        p.about_me = Some("   ".to_string());
        p.city = Some(String::new());

        let report = evaluate(&p);
        assert_eq!(report.missing_fields, vec!["city", "aboutMe"]);
        // 15 of 17 = 88.2
        assert_eq!(report.percentage, 88);
    }

    #[test]
    fn test_rounds_half_up() {
        // Totals of 11 and 17 never land on .5
        let list = Checklist {
            total: 8,
            completed: 1,
            missing: vec![],
        };
        // 12.5
        assert_eq!(list.percentage(), 13);
    }

    prop_compose! {
        fn arb_text()(s in proptest::option::of("[ a-z]{0,6}")) -> Option<String> { s }
    }

    prop_compose! {
        fn arb_profile()(
            role in prop_oneof![
                Just(UserRole::Caregiver),
                Just(UserRole::Client),
                Just(UserRole::Admin)
            ],
            email in "[a-z ]{0,5}",
            full_name in arb_text(),
            age in proptest::option::of(18..100i32),
            wechat in arb_text(),
            city in arb_text(),
            years in proptest::option::of(0..50i32),
            languages in arb_text(),
            about in arb_text(),
            rate in proptest::option::of(0..1000i64),
        ) -> Profile {
            let mut p = Profile::new("auth", email, role, Timestamp::UNIX_EPOCH);
            p.full_name = full_name;
            p.age = age;
            p.wechat_id = wechat;
            p.city = city;
            p.years_of_experience = years;
            p.languages = languages;
            p.about_me = about;
            p.hourly_rate = rate.map(BigDecimal::from);
            p
        }
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded_and_idempotent(p in arb_profile()) {
            let first = evaluate(&p);
            prop_assert!((0..=100).contains(&first.percentage));
            prop_assert_eq!(evaluate(&p), first);
        }

        #[test]
        fn prop_missing_count_matches_checklist(p in arb_profile()) {
            let report = evaluate(&p);
            let total = if p.is_caregiver() { 17 } else { 11 };
            prop_assert!(report.missing_fields.len() <= total);
            if report.missing_fields.is_empty() {
                prop_assert_eq!(report.percentage, 100);
            }
        }
    }
}
