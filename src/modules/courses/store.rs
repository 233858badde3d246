//! In-memory course collection.
//!
//! The collection is an ordered sequence behind a single `RwLock`: every
//! mutation holds the write lock for its whole read-modify-write, and readers
//! get owned snapshots, so no caller ever observes a half-applied change.

use std::collections::BTreeSet;

use catalog_kernel::settings::{CourseSettings, IdStrategy};
use rand::Rng;
use thiserror::Error;
use tokio::sync::RwLock;

use super::models::{seed_courses, Course, CourseInput};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("course name must not be empty")]
    EmptyName,

    #[error("every course id below {upper_bound} is taken")]
    IdSpaceExhausted { upper_bound: u32 },
}

struct Inner {
    courses: Vec<Course>,
    next_id: u64,
}

pub struct CourseStore {
    inner: RwLock<Inner>,
    id_strategy: IdStrategy,
    id_upper_bound: u32,
}

impl CourseStore {
    /// Build a store holding `courses` in the given order.
    pub fn with_courses(courses: Vec<Course>, id_strategy: IdStrategy, id_upper_bound: u32) -> Self {
        let next_id = courses
            .iter()
            .filter_map(|course| course.id.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);

        Self {
            inner: RwLock::new(Inner { courses, next_id }),
            id_strategy,
            id_upper_bound,
        }
    }

    pub fn from_settings(settings: &CourseSettings) -> Self {
        let courses = if settings.seed {
            seed_courses()
        } else {
            Vec::new()
        };
        Self::with_courses(courses, settings.id_strategy, settings.id_upper_bound)
    }

    /// All courses in collection order.
    pub async fn list(&self) -> Vec<Course> {
        self.inner.read().await.courses.clone()
    }

    /// The first course whose id equals `id`.
    pub async fn get(&self, id: &str) -> Option<Course> {
        let inner = self.inner.read().await;
        inner.courses.iter().find(|course| course.id == id).cloned()
    }

    /// Append a new course with a freshly assigned id.
    pub async fn create(&self, input: CourseInput) -> Result<Course, StoreError> {
        if input.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let mut inner = self.inner.write().await;
        let id = match self.id_strategy {
            IdStrategy::Sequential => next_sequential_id(&mut inner),
            IdStrategy::Random => random_free_id(&inner.courses, self.id_upper_bound)?,
        };

        let course = input.into_course(id);
        inner.courses.push(course.clone());
        Ok(course)
    }

    /// Replace the first course matching `id`: the old entry is removed and
    /// the replacement, keeping `id`, is appended at the end.
    pub async fn update(&self, id: &str, input: CourseInput) -> Option<Course> {
        let mut inner = self.inner.write().await;
        let index = inner.courses.iter().position(|course| course.id == id)?;
        inner.courses.remove(index);

        let course = input.into_course(id.to_string());
        inner.courses.push(course.clone());
        Some(course)
    }

    /// Remove the first course matching `id`. Returns whether one was removed.
    pub async fn delete(&self, id: &str) -> bool {
        let mut inner = self.inner.write().await;
        match inner.courses.iter().position(|course| course.id == id) {
            Some(index) => {
                inner.courses.remove(index);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.courses.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.courses.is_empty()
    }
}

// Updates keep their id and creates only ever draw from the counter, so a
// counter that starts past every numeric id present cannot collide.
fn next_sequential_id(inner: &mut Inner) -> String {
    let id = inner.next_id;
    inner.next_id += 1;
    id.to_string()
}

/// Pick uniformly among the ids in `[0, upper_bound)` no course holds.
///
/// Draws a rank among the free ids and walks the sorted taken ids to find
/// it, so the cost follows the collection size rather than the bound.
fn random_free_id(courses: &[Course], upper_bound: u32) -> Result<String, StoreError> {
    let taken: BTreeSet<u32> = courses
        .iter()
        .filter_map(|course| {
            let n = course.id.parse::<u32>().ok()?;
            (n < upper_bound && n.to_string() == course.id).then_some(n)
        })
        .collect();

    let free = upper_bound - taken.len() as u32;
    if free == 0 {
        return Err(StoreError::IdSpaceExhausted { upper_bound });
    }

    let mut id = rand::thread_rng().gen_range(0..free);
    for &n in &taken {
        if n > id {
            break;
        }
        id += 1;
    }
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn input(name: &str) -> CourseInput {
        CourseInput {
            name: name.to_string(),
            price: 10,
            author: None,
        }
    }

    fn seeded() -> CourseStore {
        CourseStore::from_settings(&CourseSettings::default())
    }

    async fn ids(store: &CourseStore) -> Vec<String> {
        store.list().await.into_iter().map(|c| c.id).collect()
    }

    #[tokio::test]
    async fn seeded_store_holds_demo_courses() {
        let store = seeded();
        assert_eq!(ids(&store).await, vec!["1", "2"]);
        assert_eq!(store.get("2").await.unwrap().name, "Frontend with react");
    }

    #[tokio::test]
    async fn unseeded_store_starts_empty() {
        let settings = CourseSettings {
            seed: false,
            ..CourseSettings::default()
        };
        let store = CourseStore::from_settings(&settings);
        assert!(store.is_empty().await);
        assert_eq!(store.create(input("First")).await.unwrap().id, "1");
    }

    #[tokio::test]
    async fn creates_keep_insertion_order() {
        let store = seeded();
        let a = store.create(input("A")).await.unwrap();
        let b = store.create(input("B")).await.unwrap();
        assert_eq!(a.id, "3");
        assert_eq!(b.id, "4");
        assert_eq!(ids(&store).await, vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn empty_name_is_rejected_without_mutation() {
        let store = seeded();
        let before = store.list().await;
        assert_eq!(
            store.create(CourseInput::default()).await,
            Err(StoreError::EmptyName)
        );
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn sequential_ids_continue_after_highest_numeric_id() {
        let courses = vec![
            input("one").into_course("1".to_string()),
            input("five").into_course("5".to_string()),
            input("named").into_course("six".to_string()),
        ];
        let store = CourseStore::with_courses(courses, IdStrategy::Sequential, 100);
        assert_eq!(store.create(input("x")).await.unwrap().id, "6");
    }

    #[tokio::test]
    async fn get_missing_leaves_collection_unchanged() {
        let store = seeded();
        assert!(store.get("99").await.is_none());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn update_moves_record_to_the_end_with_path_id() {
        let store = seeded();
        let updated = store.update("1", input("C++ Advanced")).await.unwrap();
        assert_eq!(updated.id, "1");
        assert_eq!(updated.name, "C++ Advanced");
        assert_eq!(ids(&store).await, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn update_missing_is_a_no_op() {
        let store = seeded();
        let before = store.list().await;
        assert!(store.update("77", input("ghost")).await.is_none());
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn delete_removes_only_the_first_match() {
        let courses = vec![
            input("first").into_course("9".to_string()),
            input("second").into_course("9".to_string()),
        ];
        let store = CourseStore::with_courses(courses, IdStrategy::Sequential, 100);

        assert!(store.delete("9").await);
        let remaining = store.list().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "second");
    }

    #[tokio::test]
    async fn delete_missing_returns_false() {
        let store = seeded();
        assert!(!store.delete("42").await);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn random_ids_stay_in_range_and_unique() {
        let store = CourseStore::with_courses(seed_courses(), IdStrategy::Random, 10);
        for n in 0..8 {
            let course = store.create(input(&format!("c{n}"))).await.unwrap();
            let id: u32 = course.id.parse().unwrap();
            assert!(id < 10);
        }

        let ids: HashSet<String> = ids(&store).await.into_iter().collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(
            store.create(input("overflow")).await,
            Err(StoreError::IdSpaceExhausted { upper_bound: 10 })
        );
        assert_eq!(store.len().await, 10);
    }

    #[tokio::test]
    async fn random_ids_with_huge_bound_do_not_scan_the_range() {
        let store = CourseStore::with_courses(seed_courses(), IdStrategy::Random, u32::MAX);
        for n in 0..16 {
            let course = store.create(input(&format!("c{n}"))).await.unwrap();
            assert!(course.id.parse::<u32>().is_ok());
        }
        let ids: HashSet<String> = ids(&store).await.into_iter().collect();
        assert_eq!(ids.len(), 18);
    }

    #[test]
    fn random_free_id_skips_every_taken_id() {
        // "03" and "x" occupy nothing in range; "9" is out of range.
        let courses: Vec<Course> = ["0", "1", "1", "3", "03", "x", "9"]
            .into_iter()
            .map(|id| input("c").into_course(id.to_string()))
            .collect();
        for _ in 0..50 {
            let id = random_free_id(&courses, 5).unwrap();
            assert!(id == "2" || id == "4", "unexpected id {id}");
        }
        assert_eq!(
            random_free_id(&courses, 2),
            Err(StoreError::IdSpaceExhausted { upper_bound: 2 })
        );
        assert_eq!(
            random_free_id(&[], 0),
            Err(StoreError::IdSpaceExhausted { upper_bound: 0 })
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_never_share_an_id() {
        let store = Arc::new(seeded());
        let mut tasks = Vec::new();
        for n in 0..64 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.create(input(&format!("course {n}"))).await.unwrap()
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let ids: HashSet<String> = ids(&store).await.into_iter().collect();
        assert_eq!(ids.len(), 66);
    }
}
