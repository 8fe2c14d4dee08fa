//! Integration tests for the project save (reconciliation) operation.
//!
//! Exercises `ProjectRepo::save` against a real database to verify that:
//! - Descriptors with an id overwrite that scene; without an id they insert
//! - A scene's index becomes its position in the descriptor list
//! - description/voice_over/image_url are full overwrites (absent -> "")
//!   while original_prompt is tri-state (absent -> keep)
//! - Stored scenes missing from the list are left untouched
//! - A save against a missing project writes nothing and returns `None`
//! - Any failed write aborts the whole save (no partial state)
//! - Replaying the same payload is idempotent

use sqlx::PgPool;
use uuid::Uuid;

use drawstory_db::models::project::{CreateProject, ProjectWithScenes, SaveProject};
use drawstory_db::models::scene::{CreateScene, SceneDescriptor};
use drawstory_db::models::user::CreateUser;
use drawstory_db::repositories::{ProjectRepo, SceneRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_author(pool: &PgPool) -> Uuid {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$fake".to_string(),
        },
    )
    .await
    .unwrap();
    user.id
}

/// Create a project with `n` scenes ("scene 0".."scene n-1", prompts set).
async fn seed_project(pool: &PgPool, n: usize) -> ProjectWithScenes {
    let author_id = new_author(pool).await;
    let scenes = (0..n)
        .map(|i| CreateScene {
            image_url: format!("https://cdn.test/{i}.png"),
            description: Some(format!("scene {i}")),
            original_prompt: Some(format!("prompt {i}")),
        })
        .collect();

    ProjectRepo::create_with_scenes(
        pool,
        &CreateProject {
            id: None,
            title: "Reconcile Me".to_string(),
            author_id,
            scenes,
        },
    )
    .await
    .unwrap()
}

fn update_of(id: Uuid, description: &str) -> SceneDescriptor {
    SceneDescriptor {
        id: Some(id),
        description: Some(description.to_string()),
        voice_over: None,
        image_url: None,
        is_deleted: None,
        original_prompt: None,
    }
}

// ---------------------------------------------------------------------------
// Test: update branch fully overwrites, insert branch creates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_updates_and_inserts(pool: PgPool) {
    let created = seed_project(&pool, 2).await;
    let first = &created.scenes[0];
    let second = &created.scenes[1];

    let saved = ProjectRepo::save(
        &pool,
        &SaveProject {
            id: created.project.id,
            title: Some("Renamed".to_string()),
            image_url: None,
            scenes: vec![
                update_of(first.id, "rewritten first"),
                update_of(second.id, "rewritten second"),
                SceneDescriptor {
                    id: None,
                    description: Some("brand new".to_string()),
                    image_url: Some("https://cdn.test/new.png".to_string()),
                    ..Default::default()
                },
            ],
        },
    )
    .await
    .unwrap()
    .expect("save should return the project");

    assert_eq!(saved.project.title, "Renamed");
    assert_eq!(saved.scenes.len(), 3);
    assert_eq!(saved.scenes[0].id, first.id);
    assert_eq!(saved.scenes[0].description, "rewritten first");
    assert_eq!(saved.scenes[2].description, "brand new");
    assert_eq!(saved.scenes[2].index_in_project, 2);
}

// ---------------------------------------------------------------------------
// Test: list position dictates the stored index
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_reorders_by_list_position(pool: PgPool) {
    let created = seed_project(&pool, 3).await;
    let ids: Vec<Uuid> = created.scenes.iter().map(|s| s.id).collect();

    // Reverse the order.
    let saved = ProjectRepo::save(
        &pool,
        &SaveProject {
            id: created.project.id,
            title: None,
            image_url: None,
            scenes: vec![
                update_of(ids[2], "now first"),
                update_of(ids[1], "still middle"),
                update_of(ids[0], "now last"),
            ],
        },
    )
    .await
    .unwrap()
    .expect("save should return the project");

    let returned: Vec<Uuid> = saved.scenes.iter().map(|s| s.id).collect();
    assert_eq!(returned, vec![ids[2], ids[1], ids[0]]);
    assert_eq!(saved.scenes[0].index_in_project, 0);
    assert_eq!(saved.scenes[2].index_in_project, 2);
}

// ---------------------------------------------------------------------------
// Test: overwrite vs tri-state field semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_field_semantics(pool: PgPool) {
    let created = seed_project(&pool, 1).await;
    let scene = &created.scenes[0];

    // Absent description/voice_over/image_url blank out; absent
    // original_prompt keeps the stored value.
    let saved = ProjectRepo::save(
        &pool,
        &SaveProject {
            id: created.project.id,
            title: None,
            image_url: None,
            scenes: vec![SceneDescriptor {
                id: Some(scene.id),
                ..Default::default()
            }],
        },
    )
    .await
    .unwrap()
    .expect("save should return the project");

    assert_eq!(saved.scenes[0].description, "");
    assert_eq!(saved.scenes[0].voice_over, "");
    assert_eq!(saved.scenes[0].image_url, "");
    assert_eq!(
        saved.scenes[0].original_prompt.as_deref(),
        Some("prompt 0"),
        "absent original_prompt must keep the stored value"
    );

    // A present original_prompt overwrites.
    let saved = ProjectRepo::save(
        &pool,
        &SaveProject {
            id: created.project.id,
            title: None,
            image_url: None,
            scenes: vec![SceneDescriptor {
                id: Some(scene.id),
                original_prompt: Some("new prompt".to_string()),
                ..Default::default()
            }],
        },
    )
    .await
    .unwrap()
    .expect("save should return the project");

    assert_eq!(saved.scenes[0].original_prompt.as_deref(), Some("new prompt"));
}

// ---------------------------------------------------------------------------
// Test: unlisted scenes are left untouched
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_leaves_unlisted_scenes_untouched(pool: PgPool) {
    let created = seed_project(&pool, 3).await;
    let untouched = created.scenes[2].clone();

    let saved = ProjectRepo::save(
        &pool,
        &SaveProject {
            id: created.project.id,
            title: None,
            image_url: None,
            scenes: vec![update_of(created.scenes[0].id, "changed")],
        },
    )
    .await
    .unwrap()
    .expect("save should return the project");

    // The unlisted scene is still active, with all fields intact.
    let still_there = saved
        .scenes
        .iter()
        .find(|s| s.id == untouched.id)
        .expect("unlisted scene must stay active");
    assert_eq!(still_there.description, untouched.description);
    assert_eq!(still_there.index_in_project, untouched.index_in_project);
    assert_eq!(still_there.image_url, untouched.image_url);
}

// ---------------------------------------------------------------------------
// Test: explicit is_deleted descriptor soft-deletes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_deletes_only_via_explicit_flag(pool: PgPool) {
    let created = seed_project(&pool, 2).await;
    let doomed = created.scenes[1].id;

    let saved = ProjectRepo::save(
        &pool,
        &SaveProject {
            id: created.project.id,
            title: None,
            image_url: None,
            scenes: vec![
                update_of(created.scenes[0].id, "keep"),
                SceneDescriptor {
                    id: Some(doomed),
                    is_deleted: Some(true),
                    ..Default::default()
                },
            ],
        },
    )
    .await
    .unwrap()
    .expect("save should return the project");

    assert!(
        !saved.scenes.iter().any(|s| s.id == doomed),
        "flagged scene must disappear from the active list"
    );

    let row = SceneRepo::find_by_id_include_deleted(&pool, doomed)
        .await
        .unwrap()
        .expect("row must still exist");
    assert!(row.is_deleted);
}

// ---------------------------------------------------------------------------
// Test: missing project writes nothing and returns None
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_missing_project_is_noop(pool: PgPool) {
    let result = ProjectRepo::save(
        &pool,
        &SaveProject {
            id: Uuid::new_v4(),
            title: Some("ghost".to_string()),
            image_url: None,
            scenes: vec![SceneDescriptor {
                description: Some("never inserted".to_string()),
                ..Default::default()
            }],
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scenes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "no scene may be written for a missing project");
}

// ---------------------------------------------------------------------------
// Test: a failed write aborts the whole save
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_is_atomic(pool: PgPool) {
    let created = seed_project(&pool, 2).await;

    // The second descriptor violates the image_url length constraint, so the
    // first descriptor's write must be rolled back too.
    let oversized = "x".repeat(3000);
    let result = ProjectRepo::save(
        &pool,
        &SaveProject {
            id: created.project.id,
            title: Some("should not stick".to_string()),
            image_url: None,
            scenes: vec![
                update_of(created.scenes[0].id, "should not stick either"),
                SceneDescriptor {
                    id: Some(created.scenes[1].id),
                    image_url: Some(oversized),
                    ..Default::default()
                },
            ],
        },
    )
    .await;
    assert!(result.is_err(), "constraint violation must fail the save");

    let after = ProjectRepo::find_by_id(&pool, created.project.id)
        .await
        .unwrap()
        .expect("project should still be found");
    assert_eq!(after.project.title, "Reconcile Me");
    assert_eq!(after.scenes[0].description, "scene 0");
}

// ---------------------------------------------------------------------------
// Test: an unknown scene id aborts the whole save
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_unknown_scene_id_aborts(pool: PgPool) {
    let created = seed_project(&pool, 1).await;

    let result = ProjectRepo::save(
        &pool,
        &SaveProject {
            id: created.project.id,
            title: Some("should not stick".to_string()),
            image_url: None,
            scenes: vec![update_of(Uuid::new_v4(), "no such scene")],
        },
    )
    .await;
    assert!(result.is_err(), "unknown scene id must fail the save");

    let after = ProjectRepo::find_by_id(&pool, created.project.id)
        .await
        .unwrap()
        .expect("project should still be found");
    assert_eq!(after.project.title, "Reconcile Me");
}

// ---------------------------------------------------------------------------
// Test: replaying the same payload is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_replay_is_idempotent(pool: PgPool) {
    let created = seed_project(&pool, 2).await;

    let payload = SaveProject {
        id: created.project.id,
        title: Some("Stable".to_string()),
        image_url: None,
        scenes: vec![
            update_of(created.scenes[0].id, "one"),
            update_of(created.scenes[1].id, "two"),
        ],
    };

    let first = ProjectRepo::save(&pool, &payload).await.unwrap().unwrap();
    let second = ProjectRepo::save(&pool, &payload).await.unwrap().unwrap();

    assert_eq!(first.project.title, second.project.title);
    assert_eq!(first.scenes.len(), second.scenes.len());
    for (a, b) in first.scenes.iter().zip(second.scenes.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.description, b.description);
        assert_eq!(a.index_in_project, b.index_in_project);
    }
}
