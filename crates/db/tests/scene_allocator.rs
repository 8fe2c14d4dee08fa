//! Integration tests for count-based scene index allocation.
//!
//! Appended scenes take `index_in_project = count of active scenes`, which
//! means soft-deleted scenes free their count slot but not their index --
//! appending after a delete can produce a duplicate index, which readers
//! tolerate by sorting.

use sqlx::PgPool;
use uuid::Uuid;

use drawstory_db::models::project::{CreateProject, ProjectWithScenes};
use drawstory_db::models::scene::{AddScene, CreateScene};
use drawstory_db::repositories::{ProjectRepo, SceneRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_project(pool: &PgPool, n: usize) -> ProjectWithScenes {
    let user = UserRepo::create(
        pool,
        &drawstory_db::models::user::CreateUser {
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$fake".to_string(),
        },
    )
    .await
    .unwrap();

    let scenes = (0..n)
        .map(|i| CreateScene {
            image_url: format!("https://cdn.test/{i}.png"),
            description: None,
            original_prompt: None,
        })
        .collect();

    ProjectRepo::create_with_scenes(
        pool,
        &CreateProject {
            id: None,
            title: "Allocator".to_string(),
            author_id: user.id,
            scenes,
        },
    )
    .await
    .unwrap()
}

fn appended(image_url: &str) -> AddScene {
    AddScene {
        image_url: image_url.to_string(),
        description: None,
        voice_over: None,
        original_prompt: None,
    }
}

// ---------------------------------------------------------------------------
// Test: append allocates index = active count
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_append_takes_next_index(pool: PgPool) {
    let created = seed_project(&pool, 3).await;

    let scene = SceneRepo::add(
        &pool,
        created.project.id,
        &appended("https://cdn.test/next.png"),
        None,
    )
    .await
    .unwrap();

    assert_eq!(scene.index_in_project, 3);
}

// ---------------------------------------------------------------------------
// Test: soft-deleted scenes do not count
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_scenes_free_their_count_slot(pool: PgPool) {
    let created = seed_project(&pool, 4).await;

    // Delete the scene at index 1: 3 active remain at indices 0, 2, 3.
    SceneRepo::soft_delete(&pool, created.scenes[1].id)
        .await
        .unwrap()
        .expect("scene should be deleted");

    assert_eq!(
        SceneRepo::count_active(&pool, created.project.id)
            .await
            .unwrap(),
        3
    );

    // The next append counts 3 actives and lands on index 3 -- a duplicate
    // of the surviving scene at index 3. That is the documented behavior.
    let scene = SceneRepo::add(
        &pool,
        created.project.id,
        &appended("https://cdn.test/dup.png"),
        None,
    )
    .await
    .unwrap();
    assert_eq!(scene.index_in_project, 3);

    // Readers still return every active scene, sorted by index.
    let listed = SceneRepo::list_for_project(&pool, created.project.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 4);
    let mut indices: Vec<i32> = listed.iter().map(|s| s.index_in_project).collect();
    let sorted = {
        let mut s = indices.clone();
        s.sort_unstable();
        s
    };
    assert_eq!(indices, sorted, "list must come back sorted by index");
    indices.dedup();
    assert_eq!(indices, vec![0, 2, 3], "duplicate index 3 is tolerated");
}

// ---------------------------------------------------------------------------
// Test: explicit index overrides the allocator
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_explicit_index_skips_allocation(pool: PgPool) {
    let created = seed_project(&pool, 2).await;

    let scene = SceneRepo::add(
        &pool,
        created.project.id,
        &appended("https://cdn.test/pinned.png"),
        Some(7),
    )
    .await
    .unwrap();

    assert_eq!(scene.index_in_project, 7);
}

// ---------------------------------------------------------------------------
// Test: batch append allocates a contiguous run
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_append_is_contiguous(pool: PgPool) {
    let created = seed_project(&pool, 3).await;

    let batch = vec![
        CreateScene {
            image_url: "https://cdn.test/b1.png".to_string(),
            description: Some("batch one".to_string()),
            original_prompt: None,
        },
        CreateScene {
            image_url: "https://cdn.test/b2.png".to_string(),
            description: Some("batch two".to_string()),
            original_prompt: None,
        },
    ];

    let scenes = SceneRepo::add_batch(&pool, created.project.id, &batch)
        .await
        .unwrap();

    let indices: Vec<i32> = scenes.iter().map(|s| s.index_in_project).collect();
    assert_eq!(indices, vec![3, 4], "batch counts once, then assigns offsets");
}
