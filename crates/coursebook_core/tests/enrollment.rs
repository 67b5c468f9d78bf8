use coursebook_core::db::fixture::{apply_fixture, SECOND_COURSE_ID};
use coursebook_core::db::open_db_in_memory;
use coursebook_core::{
    CourseRepository, EnrollmentService, Passport, RepoError, SqliteCourseRepository,
    SqliteStudentRepository, Student, StudentRepository,
};
use rusqlite::Connection;

const JANE_ID: i64 = 20001;

fn seeded_conn() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    apply_fixture(&mut conn).unwrap();
    conn
}

#[test]
fn find_by_id_returns_seeded_student() {
    let mut conn = seeded_conn();
    let repo = SqliteStudentRepository::try_new(&mut conn).unwrap();

    let student = repo.find_by_id(JANE_ID).unwrap().unwrap();
    assert_eq!(student.first_name, "Jane");
    assert_eq!(student.last_name, "Doe");
    assert_eq!(student.full_name(), "Jane Doe");
    assert!(student.passport_id.is_some());
}

#[test]
fn save_with_passport_persists_the_passport_first() {
    let mut conn = seeded_conn();
    let mut repo = SqliteStudentRepository::try_new(&mut conn).unwrap();

    let student = repo
        .save_with_passport(Student::new("Ada", "Lovelace"), Passport::new("L5550001"))
        .unwrap();

    assert!(student.id.is_some());
    assert!(student.passport_id.is_some());

    let passport = repo.find_passport(student.id.unwrap()).unwrap().unwrap();
    assert_eq!(passport.passport_number, "L5550001");
    assert_eq!(passport.id, student.passport_id);
}

#[test]
fn duplicate_passport_number_is_a_db_error() {
    let mut conn = seeded_conn();
    let mut repo = SqliteStudentRepository::try_new(&mut conn).unwrap();

    // N1234567 is already issued in the fixture.
    let err = repo
        .save_with_passport(Student::new("Eve", "Clone"), Passport::new("N1234567"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn save_enrollment_links_student_and_course() {
    let mut conn = seeded_conn();

    let course = {
        let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
        repo.find_by_id(SECOND_COURSE_ID).unwrap().unwrap()
    };

    let mut repo = SqliteStudentRepository::try_new(&mut conn).unwrap();
    let (student, course) = repo
        .save_enrollment(Student::new("Grace", "Hopper"), course)
        .unwrap();

    assert!(student.id.is_some());
    assert_eq!(course.id, Some(SECOND_COURSE_ID));

    let enrolled = repo.course_ids_for_student(student.id.unwrap()).unwrap();
    assert_eq!(enrolled, vec![SECOND_COURSE_ID]);
}

#[test]
fn re_enrolling_the_same_pair_is_idempotent() {
    let mut conn = seeded_conn();

    let course = {
        let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
        repo.find_by_id(SECOND_COURSE_ID).unwrap().unwrap()
    };

    let mut repo = SqliteStudentRepository::try_new(&mut conn).unwrap();
    let (student, course) = repo
        .save_enrollment(Student::new("Grace", "Hopper"), course)
        .unwrap();
    let (student, _) = repo.save_enrollment(student, course).unwrap();

    let enrolled = repo.course_ids_for_student(student.id.unwrap()).unwrap();
    assert_eq!(enrolled.len(), 1);
}

#[test]
fn blank_first_name_is_a_validation_error() {
    let mut conn = seeded_conn();
    let mut repo = SqliteStudentRepository::try_new(&mut conn).unwrap();

    let err = repo.save(Student::new("", "Nameless")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn deleting_a_student_removes_enrollment_links() {
    let mut conn = seeded_conn();
    {
        let mut repo = SqliteStudentRepository::try_new(&mut conn).unwrap();
        assert!(repo.delete_by_id(JANE_ID).unwrap());
        assert!(repo.find_by_id(JANE_ID).unwrap().is_none());
    }

    let remaining: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM course_students WHERE student_id = ?1;",
            [JANE_ID],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn delete_by_id_with_unknown_id_returns_false() {
    let mut conn = seeded_conn();
    let mut repo = SqliteStudentRepository::try_new(&mut conn).unwrap();

    assert!(!repo.delete_by_id(404_404).unwrap());
}

#[test]
fn find_by_passport_number_like_matches_seeded_passport() {
    let mut conn = seeded_conn();
    let repo = SqliteStudentRepository::try_new(&mut conn).unwrap();

    let students = repo.find_by_passport_number_like("%1234%").unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].first_name, "Jane");
}

#[test]
fn enrollment_service_wraps_repository_calls() {
    let mut conn = seeded_conn();

    let course = {
        let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
        repo.find_by_id(SECOND_COURSE_ID).unwrap().unwrap()
    };

    let repo = SqliteStudentRepository::try_new(&mut conn).unwrap();
    let mut service = EnrollmentService::new(repo);

    let walk_in = service.register_student("Walk", "In").unwrap();
    assert!(walk_in.passport_id.is_none());
    assert!(service.passport_of(walk_in.id.unwrap()).unwrap().is_none());

    let student = service
        .register_with_passport("Alan", "Turing", "T1912001")
        .unwrap();
    let student_id = student.id.unwrap();

    let passport = service.passport_of(student_id).unwrap().unwrap();
    assert_eq!(passport.passport_number, "T1912001");

    let (student, _) = service.enroll(student, course).unwrap();
    assert_eq!(
        service.courses_of(student.id.unwrap()).unwrap(),
        vec![SECOND_COURSE_ID]
    );

    assert!(service.withdraw(student_id).unwrap());
    assert!(service.get_student(student_id).unwrap().is_none());
}
