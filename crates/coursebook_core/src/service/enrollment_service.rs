//! Enrollment use-case service.
//!
//! # Responsibility
//! - Provide stable student entry points: registration, passport issuance,
//!   course enrollment, withdrawal.
//! - Delegate persistence to the student repository.

use crate::model::course::Course;
use crate::model::student::{Passport, Student, StudentId};
use crate::repo::course_repo::RepoResult;
use crate::repo::student_repo::StudentRepository;

/// Use-case service wrapper for student and enrollment operations.
pub struct EnrollmentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> EnrollmentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a student without a passport.
    pub fn register_student(
        &mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> RepoResult<Student> {
        self.repo.save(Student::new(first_name, last_name))
    }

    /// Registers a student together with a freshly issued passport.
    ///
    /// # Contract
    /// - The passport is persisted before the student references it.
    pub fn register_with_passport(
        &mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        passport_number: impl Into<String>,
    ) -> RepoResult<Student> {
        self.repo.save_with_passport(
            Student::new(first_name, last_name),
            Passport::new(passport_number),
        )
    }

    /// Enrolls a student in a course, persisting both sides and the link.
    pub fn enroll(&mut self, student: Student, course: Course) -> RepoResult<(Student, Course)> {
        self.repo.save_enrollment(student, course)
    }

    /// Gets one student by id.
    pub fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.find_by_id(id)
    }

    /// Returns the student's passport, if one is linked.
    pub fn passport_of(&self, student_id: StudentId) -> RepoResult<Option<Passport>> {
        self.repo.find_passport(student_id)
    }

    /// Course ids the student is enrolled in.
    pub fn courses_of(&self, student_id: StudentId) -> RepoResult<Vec<i64>> {
        self.repo.course_ids_for_student(student_id)
    }

    /// Students whose passport number matches a LIKE pattern.
    pub fn find_by_passport_number_like(&self, pattern: &str) -> RepoResult<Vec<Student>> {
        self.repo.find_by_passport_number_like(pattern)
    }

    /// Removes a student; `false` when no such row existed.
    pub fn withdraw(&mut self, student_id: StudentId) -> RepoResult<bool> {
        self.repo.delete_by_id(student_id)
    }
}
