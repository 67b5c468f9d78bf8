use coursebook_core::db::fixture::{apply_fixture, FIRST_COURSE_ID, FUN_COURSE_ID};
use coursebook_core::db::open_db_in_memory;
use coursebook_core::{
    CatalogService, CourseRepository, Review, ReviewRating, SqliteCourseRepository,
};
use rusqlite::Connection;

fn seeded_conn() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    apply_fixture(&mut conn).unwrap();
    conn
}

#[test]
fn saving_a_course_cascades_its_new_review() {
    let mut conn = seeded_conn();
    let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let mut course = repo.find_by_id(FUN_COURSE_ID).unwrap().unwrap();
    assert!(course.reviews.is_empty());

    course.add_review(Review::new(
        Some("test review one".to_string()),
        ReviewRating::Three,
    ));
    repo.save(course).unwrap();

    let reloaded = repo.find_by_id(FUN_COURSE_ID).unwrap().unwrap();
    assert_eq!(reloaded.reviews.len(), 1);

    let review = &reloaded.reviews[0];
    assert!(review.id.is_some());
    assert_eq!(review.course_id, Some(FUN_COURSE_ID));
    assert_eq!(review.content.as_deref(), Some("test review one"));
    assert_eq!(review.rating, ReviewRating::Three);
}

#[test]
fn seeded_course_loads_reviews_including_optional_content() {
    let mut conn = seeded_conn();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let course = repo.find_by_id(FIRST_COURSE_ID).unwrap().unwrap();
    assert_eq!(course.reviews.len(), 2);
    assert_eq!(course.reviews[0].rating, ReviewRating::Five);
    assert_eq!(
        course.reviews[0].content.as_deref(),
        Some("clear and well paced")
    );
    assert_eq!(course.reviews[1].content, None);
}

#[test]
fn cascade_save_updates_existing_reviews() {
    let mut conn = seeded_conn();
    let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();

    let mut course = repo.find_by_id(FIRST_COURSE_ID).unwrap().unwrap();
    course.reviews[1].content = Some("added text later".to_string());
    course.reviews[1].rating = ReviewRating::Two;
    repo.save(course).unwrap();

    let reloaded = repo.find_by_id(FIRST_COURSE_ID).unwrap().unwrap();
    assert_eq!(reloaded.reviews.len(), 2);
    assert_eq!(
        reloaded.reviews[1].content.as_deref(),
        Some("added text later")
    );
    assert_eq!(reloaded.reviews[1].rating, ReviewRating::Two);
}

#[test]
fn deleting_a_course_removes_its_reviews() {
    let mut conn = seeded_conn();
    {
        let mut repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
        assert!(repo.delete_by_id(FIRST_COURSE_ID).unwrap());
    }

    let orphaned: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM reviews WHERE course_id = ?1;",
            [FIRST_COURSE_ID],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphaned, 0);
}

#[test]
fn add_review_through_the_catalog_service() {
    let mut conn = seeded_conn();
    let repo = SqliteCourseRepository::try_new(&mut conn).unwrap();
    let mut service = CatalogService::new(repo);

    let course = service
        .add_review(FUN_COURSE_ID, None, ReviewRating::Four)
        .unwrap();
    assert_eq!(course.reviews.len(), 1);
    assert_eq!(course.reviews[0].rating, ReviewRating::Four);
    assert_eq!(course.reviews[0].content, None);

    let reloaded = service.get_course(FUN_COURSE_ID).unwrap().unwrap();
    assert_eq!(reloaded.reviews.len(), 1);
}
