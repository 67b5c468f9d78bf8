use coursebook_core::db::fixture::{apply_fixture, DOOMED_COURSE_ID, FUN_COURSE_ID};
use coursebook_core::db::open_db_in_memory;
use coursebook_core::{
    named_query, CatalogService, Course, CourseRepository, CourseSort, CourseSortField,
    PageRequest, SqliteCourseRepository,
};
use rusqlite::Connection;

fn seeded_conn() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    apply_fixture(&mut conn).unwrap();
    conn
}

#[test]
fn find_all_returns_every_seeded_course() {
    let mut conn = seeded_conn();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let courses = repo.find_all(None).unwrap();
    assert_eq!(courses.len(), 4);
}

#[test]
fn find_all_sorted_descending_by_name() {
    let mut conn = seeded_conn();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let courses = repo
        .find_all(Some(CourseSort::descending(CourseSortField::Name)))
        .unwrap();

    assert_eq!(courses.len(), 4);
    assert!(courses
        .windows(2)
        .all(|pair| pair[0].name >= pair[1].name));
}

#[test]
fn paging_fifteen_courses_by_five_yields_three_full_pages() {
    let mut conn = seeded_conn();
    let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    // The fixture seeds 4 courses; top up to 15 total.
    for i in 0..11 {
        repo.save(Course::new(format!("course {i} for pagination")))
            .unwrap();
    }

    let first = repo.find_page(PageRequest::of(0, 5)).unwrap();
    assert_eq!(first.size(), 5);
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.total_items(), 15);

    let second = repo.find_page(first.next_page_request().unwrap()).unwrap();
    assert_eq!(second.size(), 5);
    assert_eq!(second.items.len(), 5);

    let third = repo.find_page(second.next_page_request().unwrap()).unwrap();
    assert_eq!(third.size(), 5);
    assert_eq!(third.items.len(), 5);

    assert!(third.next_page_request().is_none());
}

#[test]
fn pages_do_not_overlap() {
    let mut conn = seeded_conn();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let first = repo.find_page(PageRequest::of(0, 3)).unwrap();
    let second = repo.find_page(PageRequest::of(1, 3)).unwrap();

    assert_eq!(first.items.len(), 3);
    assert_eq!(second.items.len(), 1);
    for course in &second.items {
        assert!(!first.items.iter().any(|other| other.id == course.id));
    }
}

#[test]
fn find_by_name_matches_exactly_one_course() {
    let mut conn = seeded_conn();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let courses = repo.find_by_name("second course").unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name, "second course");
}

#[test]
fn find_by_name_like_is_case_insensitive() {
    let mut conn = seeded_conn();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let courses = repo.find_by_name_like_ignore_case("%FUN%").unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].id, Some(FUN_COURSE_ID));
}

#[test]
fn delete_by_name_like_returns_the_deleted_rows() {
    let mut conn = seeded_conn();
    let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let deleted = repo.delete_by_name_like_ignore_case("%DELETE%").unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].id, Some(DOOMED_COURSE_ID));

    assert!(repo.find_by_id(DOOMED_COURSE_ID).unwrap().is_none());
}

#[test]
fn fun_course_query_variants_agree() {
    let mut conn = seeded_conn();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let derived = repo.find_fun_courses().unwrap();
    let raw = repo.find_fun_courses_raw().unwrap();
    let named = repo.find_fun_courses_named().unwrap();

    assert_eq!(derived.len(), 1);
    assert_eq!(raw.len(), 1);
    assert_eq!(named.len(), 1);

    assert_eq!(derived[0].id, Some(FUN_COURSE_ID));
    assert_eq!(derived[0].id, raw[0].id);
    assert_eq!(derived[0].id, named[0].id);
}

#[test]
fn named_query_registry_only_knows_registered_names() {
    assert!(named_query("courses.find_fun").is_some());
    assert!(named_query("courses.no_such_query").is_none());
}

#[test]
fn catalog_service_wraps_repository_calls() {
    let mut conn = seeded_conn();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
    let mut service = CatalogService::new(repo);

    let created = service.create_course("service course").unwrap();
    let id = created.id.unwrap();

    let fetched = service.get_course(id).unwrap().unwrap();
    assert_eq!(fetched.name, "service course");

    let renamed = service.rename_course(id, "renamed course").unwrap();
    assert_eq!(renamed.name, "renamed course");

    assert_eq!(service.fun_courses().unwrap().len(), 1);
    assert_eq!(service.find_by_name("renamed course").unwrap().len(), 1);
    assert_eq!(service.search_by_name("%RENAMED%").unwrap().len(), 1);
    assert_eq!(service.list_courses(None).unwrap().len(), 5);
    assert_eq!(
        service.page_courses(PageRequest::of(0, 3)).unwrap().items.len(),
        3
    );

    let purged = service.purge_courses_matching("%renamed%").unwrap();
    assert_eq!(purged.len(), 1);
    assert!(service.get_course(id).unwrap().is_none());

    assert!(!service.delete_course(id).unwrap());
}
