//! Integration tests for the feedback channel and aggregator snapshot.

mod common;

use pulsehub::auth::password;
use pulsehub::models::feedback::{self, FeedbackSnapshot, SortOrder};
use pulsehub::models::member::{self, NewMember};

use common::setup_test_db;

async fn create_test_member(pool: &sqlx::PgPool, suffix: &str) -> i64 {
    member::create(
        pool,
        &NewMember {
            username: format!("fbtest_{}", suffix),
            password: password::hash_password("pass").unwrap(),
            email: format!("fbtest_{}@test.com", suffix),
            display_name: String::new(),
            is_admin: false,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_create_and_read_back() {
    let Some(db) = setup_test_db().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let pool = db.pool();

    let member_id = create_test_member(pool, "create").await;
    let id = feedback::create(pool, "More socials please", "Ideas", "suggestion", Some(member_id), false)
        .await
        .unwrap();
    assert!(id > 0);

    let items = feedback::find_all(pool).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content, "More socials please");
    assert_eq!(items[0].category, "Ideas");
    assert_eq!(items[0].kind, "suggestion");
    assert_eq!(items[0].member_id, Some(member_id));
    assert!(!items[0].is_anonymous);
}

#[tokio::test]
async fn test_blank_category_and_kind_fall_back_to_defaults() {
    let Some(db) = setup_test_db().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let pool = db.pool();

    let member_id = create_test_member(pool, "defaults").await;
    feedback::create(pool, "Just a thought", "  ", "", Some(member_id), false)
        .await
        .unwrap();

    let items = feedback::find_all(pool).await.unwrap();
    assert_eq!(items[0].category, "General");
    assert_eq!(items[0].kind, "suggestion");
}

#[tokio::test]
async fn test_anonymous_feedback_stores_no_member_reference() {
    let Some(db) = setup_test_db().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let pool = db.pool();

    let member_id = create_test_member(pool, "anon").await;
    feedback::create(pool, "The parking situation is dire", "Grievances", "complaint", Some(member_id), true)
        .await
        .unwrap();

    // The member reference is absent from storage, not just hidden.
    let items = feedback::find_all(pool).await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].is_anonymous);
    assert_eq!(items[0].member_id, None);
    assert_eq!(items[0].member_ref(), "anonymous");
}

#[tokio::test]
async fn test_snapshot_filter_and_sort_scenario() {
    let Some(db) = setup_test_db().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let pool = db.pool();

    let member_id = create_test_member(pool, "scenario").await;
    // Inserted in order, so created_at T1 < T2 < T3.
    let t1 = feedback::create(pool, "first idea", "Ideas", "suggestion", Some(member_id), false)
        .await
        .unwrap();
    let t2 = feedback::create(pool, "a grievance", "Grievances", "complaint", Some(member_id), false)
        .await
        .unwrap();
    let t3 = feedback::create(pool, "second idea", "Ideas", "suggestion", Some(member_id), false)
        .await
        .unwrap();

    let snapshot = FeedbackSnapshot::new(feedback::find_all(pool).await.unwrap());

    // Filtering by "Ideas" ascending returns the T1 item then the T3 item,
    // excluding the "Grievances" item.
    let ideas: Vec<i64> = snapshot
        .view("Ideas", SortOrder::Asc)
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ideas, vec![t1, t3]);

    // "All" bypasses the filter entirely.
    let all_desc: Vec<i64> = snapshot
        .view("All", SortOrder::Desc)
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(all_desc, vec![t3, t2, t1]);

    let all_asc: Vec<i64> = snapshot
        .view("All", SortOrder::Asc)
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(all_asc, vec![t1, t2, t3]);

    assert_eq!(snapshot.categories(), vec!["All", "Ideas", "Grievances"]);
}
