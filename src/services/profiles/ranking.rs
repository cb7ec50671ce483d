//! Ordering and pagination of search matches.

use std::cmp::Ordering;

use crate::models::Profile;
use crate::services::profiles::filter::{CompiledSearch, SortDirection, SortField, SortOrder};

/// One page of a ranked result set.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<T> {
    pub items: Vec<T>,
    /// Matches before slicing.
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> SearchPage<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchPage<U> {
        SearchPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}

/// Present values first in the requested direction, missing values last.
fn present_first<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp(&b),
            SortDirection::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_relevance(a: &Profile, b: &Profile) -> Ordering {
    let top = |p: &Profile| p.is_featured && p.is_active;
    top(b)
        .cmp(&top(a))
        .then_with(|| b.profile_completion_percentage.cmp(&a.profile_completion_percentage))
        .then_with(|| a.id.cmp(&b.id))
}

fn by_field(a: &Profile, b: &Profile, field: SortField, direction: SortDirection) -> Ordering {
    let primary = match field {
        SortField::Id => present_first(Some(a.id), Some(b.id), direction),
        SortField::Age => present_first(a.age, b.age, direction),
        SortField::YearsOfExperience => {
            present_first(a.years_of_experience, b.years_of_experience, direction)
        }
        SortField::Completeness => present_first(
            Some(a.profile_completion_percentage),
            Some(b.profile_completion_percentage),
            direction,
        ),
        SortField::Rating => present_first(Some(&a.total_rating), Some(&b.total_rating), direction),
        SortField::ReviewCount => {
            present_first(Some(a.total_reviews), Some(b.total_reviews), direction)
        }
        SortField::HourlyRate => {
            present_first(a.hourly_rate.as_ref(), b.hourly_rate.as_ref(), direction)
        }
        SortField::DisplayName => present_first(
            a.display_name.as_deref(),
            b.display_name.as_deref(),
            direction,
        ),
        SortField::CreatedAt => present_first(Some(a.created_at), Some(b.created_at), direction),
        SortField::LastActiveAt => {
            present_first(Some(a.last_active_at), Some(b.last_active_at), direction)
        }
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// Sorts in place. Every order ends with id ascending, so the result is total
/// and deterministic.
pub fn sort_profiles(profiles: &mut [Profile], order: &SortOrder) {
    match *order {
        SortOrder::Relevance => profiles.sort_by(by_relevance),
        SortOrder::Field(field, direction) => {
            profiles.sort_by(|a, b| by_field(a, b, field, direction))
        }
    }
}

/// Filters `candidates`, orders the matches and cuts out the requested page.
pub fn rank(candidates: Vec<Profile>, search: &CompiledSearch) -> SearchPage<Profile> {
    let mut matches: Vec<Profile> = candidates
        .into_iter()
        .filter(|p| search.matches(p))
        .collect();
    sort_profiles(&mut matches, &search.sort);

    let total = matches.len() as u64;
    let offset = usize::try_from(search.page.offset()).unwrap_or(usize::MAX);
    let size = usize::try_from(search.page.size).unwrap_or(usize::MAX);
    let items = matches.into_iter().skip(offset).take(size).collect();

    SearchPage {
        items,
        total,
        page: search.page.page,
        size: search.page.size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::services::profiles::filter::{SearchQuery, compile};
    use jiff::Timestamp;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn caregiver(id: i64, completeness: i32) -> Profile {
        let mut p = Profile::new(
            format!("auth-{id}"),
            format!("c{id}@example.com"),
            UserRole::Caregiver,
            Timestamp::UNIX_EPOCH,
        );
        p.id = id;
        p.profile_completion_percentage = completeness;
        p
    }

    fn ids(page: &SearchPage<Profile>) -> Vec<i64> {
        page.items.iter().map(|p| p.id).collect()
    }

    fn search(query: SearchQuery) -> CompiledSearch {
        compile(&query).unwrap()
    }

    #[test]
    fn test_relevance_order() {
        let mut featured = caregiver(5, 10);
        featured.is_featured = true;
        let candidates = vec![caregiver(3, 50), caregiver(1, 50), featured, caregiver(2, 90)];

        let page = rank(candidates, &search(SearchQuery::default()));
        assert_eq!(ids(&page), vec![5, 2, 1, 3]);
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_named_sort_breaks_ties_by_id_and_puts_missing_last() {
        let mut a = caregiver(4, 0);
        a.years_of_experience = Some(3);
        let mut b = caregiver(2, 0);
        b.years_of_experience = Some(3);
        let mut c = caregiver(3, 0);
        c.years_of_experience = Some(10);
        let d = caregiver(1, 0);

        let asc = rank(
            vec![a.clone(), b.clone(), c.clone(), d.clone()],
            &search(SearchQuery {
                sort: Some("yearsOfExperience".to_string()),
                ..Default::default()
            }),
        );
        assert_eq!(ids(&asc), vec![2, 4, 3, 1]);

        let desc = rank(
            vec![a, b, c, d],
            &search(SearchQuery {
                sort: Some("yearsOfExperience,desc".to_string()),
                ..Default::default()
            }),
        );
        assert_eq!(ids(&desc), vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_page_past_the_end_is_empty_but_keeps_total() {
        let candidates = (1..=3).map(|id| caregiver(id, 0)).collect();
        let page = rank(
            candidates,
            &search(SearchQuery {
                page: Some(5),
                size: Some(2),
                ..Default::default()
            }),
        );
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!((page.page, page.size), (5, 2));
    }

    #[test]
    fn test_inverted_age_range_yields_empty_page() {
        let mut p = caregiver(1, 0);
        p.age = Some(40);
        let page = rank(
            vec![p],
            &search(SearchQuery {
                age_min: Some(50),
                age_max: Some(30),
                ..Default::default()
            }),
        );
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let page = rank(
            vec![caregiver(1, 0)],
            &search(SearchQuery {
                page: Some(i64::MAX),
                size: Some(i64::MAX),
                ..Default::default()
            }),
        );
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
    }

    prop_compose! {
        fn arb_population()(
            specs in proptest::collection::vec((0..100i32, any::<bool>(), any::<bool>(), any::<bool>()), 0..40)
        ) -> Vec<Profile> {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (completeness, featured, active, caregiver_role))| {
                    let mut p = caregiver(i as i64 + 1, completeness);
                    p.is_featured = featured;
                    p.is_active = active;
                    if !caregiver_role {
                        p.role = UserRole::Client;
                    }
                    p
                })
                .collect()
        }
    }

    proptest! {
        #[test]
        fn prop_pages_partition_active_caregivers(population in arb_population(), size in 1..7i64) {
            let expected: HashSet<i64> = population
                .iter()
                .filter(|p| p.is_caregiver() && p.is_active)
                .map(|p| p.id)
                .collect();

            let mut seen = Vec::new();
            let mut page_no = 0;
            loop {
                let page = rank(
                    population.clone(),
                    &search(SearchQuery { page: Some(page_no), size: Some(size), ..Default::default() }),
                );
                prop_assert_eq!(page.total as usize, expected.len());
                prop_assert!(page.items.len() as i64 <= size);
                if page.items.is_empty() {
                    break;
                }
                seen.extend(ids(&page));
                page_no += 1;
            }

            let unique: HashSet<i64> = seen.iter().copied().collect();
            prop_assert_eq!(unique.len(), seen.len());
            prop_assert_eq!(unique, expected);
        }

        #[test]
        fn prop_ranking_is_deterministic(population in arb_population()) {
            let first = rank(population.clone(), &search(SearchQuery::default()));
            let mut reversed = population;
            reversed.reverse();
            let second = rank(reversed, &search(SearchQuery::default()));
            prop_assert_eq!(ids(&first), ids(&second));
        }
    }
}
