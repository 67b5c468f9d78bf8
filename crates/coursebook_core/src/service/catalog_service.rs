//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide stable course entry points for callers: create, rename,
//!   review, list, page, delete.
//! - Delegate persistence to the course repository.
//!
//! # Invariants
//! - Review writes always route through the owning course's cascade save.
//! - Service layer remains storage-agnostic.

use crate::model::course::{Course, CourseId};
use crate::model::review::{Review, ReviewRating};
use crate::repo::course_repo::{CourseRepository, RepoError, RepoResult};
use crate::repo::page::{CourseSort, Page, PageRequest};

/// Use-case service wrapper for course catalog operations.
pub struct CatalogService<R: CourseRepository> {
    repo: R,
}

impl<R: CourseRepository> CatalogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and persists a new course with the given name.
    pub fn create_course(&mut self, name: impl Into<String>) -> RepoResult<Course> {
        self.repo.save(Course::new(name))
    }

    /// Renames an existing course, advancing its update stamp.
    pub fn rename_course(&mut self, id: CourseId, name: impl Into<String>) -> RepoResult<Course> {
        let Some(mut course) = self.repo.find_by_id(id)? else {
            return Err(RepoError::NotFound {
                entity: "course",
                id,
            });
        };
        course.name = name.into();
        self.repo.save(course)
    }

    /// Attaches a review to a course and persists it through cascade save.
    pub fn add_review(
        &mut self,
        course_id: CourseId,
        content: Option<String>,
        rating: ReviewRating,
    ) -> RepoResult<Course> {
        let Some(mut course) = self.repo.find_by_id(course_id)? else {
            return Err(RepoError::NotFound {
                entity: "course",
                id: course_id,
            });
        };
        course.add_review(Review::new(content, rating));
        self.repo.save(course)
    }

    /// Gets one course by id with its reviews.
    pub fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        self.repo.find_by_id(id)
    }

    /// Lists all courses with an optional sort.
    pub fn list_courses(&self, sort: Option<CourseSort>) -> RepoResult<Vec<Course>> {
        self.repo.find_all(sort)
    }

    /// Returns one page of courses.
    pub fn page_courses(&self, request: PageRequest) -> RepoResult<Page<Course>> {
        self.repo.find_page(request)
    }

    /// Exact-name lookup.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Vec<Course>> {
        self.repo.find_by_name(name)
    }

    /// Case-insensitive LIKE lookup.
    pub fn search_by_name(&self, pattern: &str) -> RepoResult<Vec<Course>> {
        self.repo.find_by_name_like_ignore_case(pattern)
    }

    /// The fun-courses query in its derived-finder form.
    pub fn fun_courses(&self) -> RepoResult<Vec<Course>> {
        self.repo.find_fun_courses()
    }

    /// Deletes one course; `false` when no such row existed.
    pub fn delete_course(&mut self, id: CourseId) -> RepoResult<bool> {
        self.repo.delete_by_id(id)
    }

    /// Deletes matching courses and returns the removed rows.
    pub fn purge_courses_matching(&mut self, pattern: &str) -> RepoResult<Vec<Course>> {
        self.repo.delete_by_name_like_ignore_case(pattern)
    }
}
