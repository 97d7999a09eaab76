//! HTTP-level tests exercising the full router: identity header resolution,
//! access control, the property lifecycle, location trees, and signatures.

use axum_test::TestServer;
use quarters::{build_router, AppState, Config};
use serde_json::{json, Value};
use sqlx::PgPool;

const IDENTITY_HEADER: &str = "x-quarters-user";

const OWNER: &str = "owner@example.com";
const OTHER: &str = "other@example.com";

fn test_server(pool: PgPool) -> TestServer {
    let state = AppState::builder().db(pool).config(Config::default()).build();
    let router = build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

async fn create_property(server: &TestServer, owner: &str, name: &str) -> Value {
    let response = server
        .post("/api/v1/properties")
        .add_header(IDENTITY_HEADER, owner)
        .json(&json!({"name": name, "property_type": "BUILDING"}))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

/// Make sure a user row exists for the given email (the identity layer
/// auto-creates on first contact).
async fn touch_user(server: &TestServer, email: &str) {
    server
        .get("/api/v1/properties")
        .add_header(IDENTITY_HEADER, email)
        .await
        .assert_status_ok();
}

#[sqlx::test]
#[test_log::test]
async fn test_missing_identity_header_is_unauthorized(pool: PgPool) {
    let server = test_server(pool);

    let response = server.get("/api/v1/properties").await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
#[test_log::test]
async fn test_share_viewer_denied_write_then_editor_succeeds(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();

    touch_user(&server, OTHER).await;

    // Share as viewer
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/collaborators"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"email": OTHER, "role": "VIEWER"}))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let collaborator = response.json::<Value>();
    assert_eq!(collaborator["role"], "VIEWER");
    assert_eq!(collaborator["user_email"], OTHER);
    let other_user_id = collaborator["user_id"].as_str().unwrap().to_string();

    // Viewer resolves as VIEWER
    let response = server
        .get(&format!("/api/v1/properties/{property_id}/access"))
        .add_header(IDENTITY_HEADER, OTHER)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["access_level"], "VIEWER");

    // Viewer can read but not write
    server
        .get(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OTHER)
        .await
        .assert_status_ok();
    let response = server
        .patch(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OTHER)
        .json(&json!({"name": "Hijacked"}))
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);

    // Upgrade to editor
    let response = server
        .patch(&format!("/api/v1/properties/{property_id}/collaborators/{other_user_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"role": "EDITOR"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["role"], "EDITOR");

    // Write now succeeds
    let response = server
        .patch(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OTHER)
        .json(&json!({"name": "Elm Street 5b"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "Elm Street 5b");

    // Sharing is still owner-only
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/collaborators"))
        .add_header(IDENTITY_HEADER, OTHER)
        .json(&json!({"email": "third@example.com", "role": "VIEWER"}))
        .await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[sqlx::test]
#[test_log::test]
async fn test_share_edge_cases(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();

    // Unknown target email
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/collaborators"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"email": "nobody@example.com", "role": "VIEWER"}))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    // Sharing with the owner themselves
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/collaborators"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"email": OWNER, "role": "EDITOR"}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    // Sharing twice is a conflict
    touch_user(&server, OTHER).await;
    server
        .post(&format!("/api/v1/properties/{property_id}/collaborators"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"email": OTHER, "role": "VIEWER"}))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/collaborators"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"email": OTHER, "role": "EDITOR"}))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    // Unshare, then the viewer loses the property entirely
    let collaborators = server
        .get(&format!("/api/v1/properties/{property_id}/collaborators"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .json::<Value>();
    let other_user_id = collaborators[0]["user_id"].as_str().unwrap().to_string();
    server
        .delete(&format!("/api/v1/properties/{property_id}/collaborators/{other_user_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OTHER)
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[test_log::test]
async fn test_unrelated_user_sees_not_found(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();

    // No relationship at all: 404, not 403, so ids cannot be probed
    for path in [
        format!("/api/v1/properties/{property_id}"),
        format!("/api/v1/properties/{property_id}/access"),
        format!("/api/v1/properties/{property_id}/units"),
        format!("/api/v1/properties/{property_id}/nodes/tree"),
    ] {
        let response = server.get(&path).add_header(IDENTITY_HEADER, OTHER).await;
        response.assert_status(axum::http::StatusCode::NOT_FOUND);
    }
}

#[sqlx::test]
#[test_log::test]
async fn test_soft_delete_lifecycle(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();

    // Soft delete hides the property from the default listing
    server
        .delete(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    let listed = server
        .get("/api/v1/properties")
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .json::<Value>();
    assert_eq!(listed.as_array().unwrap().len(), 0);
    let deleted = server
        .get("/api/v1/properties/deleted")
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .json::<Value>();
    assert_eq!(deleted.as_array().unwrap().len(), 1);
    assert_eq!(deleted[0]["id"].as_str().unwrap(), property_id);

    // Deleting again is a conflict
    let response = server
        .delete(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    // Restore brings it back exactly once
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/restore"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["is_deleted"], false);
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/restore"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    // Purge requires a prior soft delete, then removes the row for good
    let response = server
        .delete(&format!("/api/v1/properties/{property_id}/purge"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    server
        .delete(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    server
        .delete(&format!("/api/v1/properties/{property_id}/purge"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[test_log::test]
async fn test_units_require_active_property(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();

    let response = server
        .post(&format!("/api/v1/properties/{property_id}/units"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"name": "Flat 1A", "floor": 1}))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let unit = response.json::<Value>();
    assert_eq!(unit["status"], "VACANT");
    let unit_id = unit["id"].as_str().unwrap().to_string();

    // Status transition
    let response = server
        .patch(&format!("/api/v1/units/{unit_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"status": "OCCUPIED"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "OCCUPIED");

    // Writes against a soft-deleted property are rejected
    server
        .delete(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    let response = server
        .patch(&format!("/api/v1/units/{unit_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"status": "VACANT"}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/units"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"name": "Flat 1B"}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

async fn create_node(server: &TestServer, property_id: &str, body: Value) -> Value {
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/nodes"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&body)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

#[sqlx::test]
#[test_log::test]
async fn test_node_tree_ordering_and_moves(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();

    let tower = create_node(&server, &property_id, json!({"label": "Tower", "node_type": "BUILDING"})).await;
    let tower_id = tower["id"].as_str().unwrap().to_string();
    let floor1 = create_node(
        &server,
        &property_id,
        json!({"label": "Floor 1", "node_type": "FLOOR", "parent_id": tower_id}),
    )
    .await;
    let floor1_id = floor1["id"].as_str().unwrap().to_string();
    let floor2 = create_node(
        &server,
        &property_id,
        json!({"label": "Floor 2", "node_type": "FLOOR", "parent_id": tower_id}),
    )
    .await;
    let floor2_id = floor2["id"].as_str().unwrap().to_string();

    // Sibling sort orders are assigned sequentially
    assert_eq!(floor1["sort_order"], 0);
    assert_eq!(floor2["sort_order"], 1);

    let tree = server
        .get(&format!("/api/v1/properties/{property_id}/nodes/tree"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .json::<Value>();
    assert_eq!(tree.as_array().unwrap().len(), 1);
    assert_eq!(tree[0]["label"], "Tower");
    assert_eq!(tree[0]["children"][0]["label"], "Floor 1");
    assert_eq!(tree[0]["children"][1]["label"], "Floor 2");

    // Moving the root under its own descendant is a cycle
    let response = server
        .post(&format!("/api/v1/nodes/{tower_id}/move"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"new_parent_id": floor1_id}))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    // So is moving a node under itself
    let response = server
        .post(&format!("/api/v1/nodes/{floor1_id}/move"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"new_parent_id": floor1_id}))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    // Reparenting into another property is rejected
    let other_property = create_property(&server, OWNER, "Annex").await;
    let other_property_id = other_property["id"].as_str().unwrap().to_string();
    let other_root = create_node(&server, &other_property_id, json!({"label": "Shed", "node_type": "CUSTOM"})).await;
    let other_root_id = other_root["id"].as_str().unwrap().to_string();
    let response = server
        .post(&format!("/api/v1/nodes/{floor2_id}/move"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"new_parent_id": other_root_id}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    // A legal move: make Floor 2 a root
    let response = server
        .post(&format!("/api/v1/nodes/{floor2_id}/move"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"new_parent_id": null}))
        .await;
    response.assert_status_ok();
    let moved = response.json::<Value>();
    assert!(moved["parent_id"].is_null());

    // Deleting the tower takes Floor 1 with it
    server
        .delete(&format!("/api/v1/nodes/{tower_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    let tree = server
        .get(&format!("/api/v1/properties/{property_id}/nodes/tree"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .json::<Value>();
    let roots = tree.as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["label"], "Floor 2");
    server
        .patch(&format!("/api/v1/nodes/{floor1_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"label": "Ghost"}))
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[test_log::test]
async fn test_node_and_signature_writes_require_active_property(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();
    let tower = create_node(&server, &property_id, json!({"label": "Tower", "node_type": "BUILDING"})).await;
    let tower_id = tower["id"].as_str().unwrap().to_string();
    let floor = create_node(
        &server,
        &property_id,
        json!({"label": "Floor 1", "node_type": "FLOOR", "parent_id": tower_id}),
    )
    .await;
    let floor_id = floor["id"].as_str().unwrap().to_string();

    server
        .delete(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    // Node mutations are all rejected while the property is soft-deleted
    let response = server
        .patch(&format!("/api/v1/nodes/{floor_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"label": "Ground Floor"}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let response = server
        .post(&format!("/api/v1/nodes/{floor_id}/move"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"new_parent_id": null}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let response = server
        .delete(&format!("/api/v1/nodes/{floor_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    // So are signature writes, submission and clearing alike
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/signatures"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"strokes": [[{"x": 10.0, "y": 10.0}]]}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let response = server
        .delete(&format!("/api/v1/properties/{property_id}/signatures"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    // Restoring the property makes the tree writable again
    server
        .post(&format!("/api/v1/properties/{property_id}/restore"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status_ok();
    server
        .patch(&format!("/api/v1/nodes/{floor_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"label": "Ground Floor"}))
        .await
        .assert_status_ok();
}

#[sqlx::test]
#[test_log::test]
async fn test_concurrent_reciprocal_moves_cannot_corrupt_the_tree(pool: PgPool) {
    use std::collections::{HashMap, HashSet};

    let server = test_server(pool.clone());

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();
    let a = create_node(&server, &property_id, json!({"label": "A", "node_type": "SECTION"})).await;
    let a_id = a["id"].as_str().unwrap().to_string();
    let b = create_node(&server, &property_id, json!({"label": "B", "node_type": "SECTION"})).await;
    let b_id = b["id"].as_str().unwrap().to_string();

    // Race A-under-B against B-under-A. Row locks serialize the two
    // transactions, so the loser revalidates against the winner's commit.
    let (first, second) = tokio::join!(
        async {
            server
                .post(&format!("/api/v1/nodes/{a_id}/move"))
                .add_header(IDENTITY_HEADER, OWNER)
                .json(&json!({"new_parent_id": b_id}))
                .await
        },
        async {
            server
                .post(&format!("/api/v1/nodes/{b_id}/move"))
                .add_header(IDENTITY_HEADER, OWNER)
                .json(&json!({"new_parent_id": a_id}))
                .await
        },
    );
    let mut statuses = [first.status_code(), second.status_code()];
    statuses.sort();
    assert_eq!(
        statuses,
        [axum::http::StatusCode::OK, axum::http::StatusCode::CONFLICT]
    );

    // Parent links must still terminate without revisiting a node
    let rows: Vec<(uuid::Uuid, Option<uuid::Uuid>)> =
        sqlx::query_as("SELECT id, parent_id FROM property_nodes WHERE property_id = $1")
            .bind(uuid::Uuid::parse_str(&property_id).unwrap())
            .fetch_all(&pool)
            .await
            .unwrap();
    let parents: HashMap<_, _> = rows.into_iter().collect();
    for start in parents.keys() {
        let mut seen = HashSet::new();
        let mut cursor = Some(*start);
        while let Some(id) = cursor {
            assert!(seen.insert(id), "parent links revisit node {id}");
            cursor = parents.get(&id).copied().flatten();
        }
    }
}

#[sqlx::test]
#[test_log::test]
async fn test_node_validation(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();

    // Empty label
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/nodes"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"label": "  ", "node_type": "ROOM"}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    // Unknown parent
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/nodes"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"label": "Room 1", "node_type": "ROOM", "parent_id": uuid::Uuid::new_v4()}))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[test_log::test]
async fn test_signature_capture(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();

    // Empty submissions never persist anything
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/signatures"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"strokes": []}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let response = server
        .post(&format!("/api/v1/properties/{property_id}/signatures"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({
            "strokes": [
                [{"x": 20.0, "y": 120.0}, {"x": 200.0, "y": 80.0}, {"x": 400.0, "y": 140.0}],
                [{"x": 100.0, "y": 60.0}, {"x": 120.0, "y": 180.0}]
            ]
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let signature = response.json::<Value>();
    let data_url = signature["data_url"].as_str().unwrap();
    assert!(data_url.starts_with("data:image/png;base64,"));
    assert_eq!(signature["width"], 480);
    assert_eq!(signature["height"], 240);

    // The blob lands on the property row
    let fetched = server
        .get(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .json::<Value>();
    assert_eq!(fetched["signature_data"].as_str().unwrap(), data_url);

    // Clearing removes it
    server
        .delete(&format!("/api/v1/properties/{property_id}/signatures"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    let fetched = server
        .get(&format!("/api/v1/properties/{property_id}"))
        .add_header(IDENTITY_HEADER, OWNER)
        .await
        .json::<Value>();
    assert!(fetched["signature_data"].is_null());
}

#[sqlx::test]
#[test_log::test]
async fn test_signature_submission_limits(pool: PgPool) {
    let server = test_server(pool);

    let property = create_property(&server, OWNER, "Elm Street 5").await;
    let property_id = property["id"].as_str().unwrap().to_string();

    // Coordinates far off the surface are clamped, not rendered literally
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/signatures"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"strokes": [[{"x": 0.0, "y": 120.0}, {"x": 5.0e7, "y": 120.0}]]}))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    // Submissions above the point budget are rejected outright
    let long_stroke: Vec<Value> = (0..2_001)
        .map(|i| json!({"x": (i % 480) as f32, "y": 120.0}))
        .collect();
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/signatures"))
        .add_header(IDENTITY_HEADER, OWNER)
        .json(&json!({"strokes": [long_stroke]}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    // Access is checked before any rendering happens
    let response = server
        .post(&format!("/api/v1/properties/{property_id}/signatures"))
        .add_header(IDENTITY_HEADER, OTHER)
        .json(&json!({"strokes": [[{"x": 10.0, "y": 10.0}]]}))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}
