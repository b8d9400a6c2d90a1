/// End-to-end tests for the Teamboard HTTP API
///
/// Every test drives the real router over an in-memory store:
/// - authentication and the response envelope
/// - access control per role across projects, members, tasks and comments
/// - cascading deletes
/// - listing, filtering and pagination

mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use common::{test_config, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();

    let response = ctx.send("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "healthy");
    assert_eq!(response.body["data"]["store"], "connected");
    assert_eq!(response.headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(response.headers.get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_hsts_in_production() {
    let ctx = TestContext::with_config(test_config(true));

    let response = ctx.send("GET", "/health", None, None).await;
    assert!(response.headers.get("strict-transport-security").is_some());
}

#[tokio::test]
async fn test_register_login_refresh_flow() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;

    let duplicate = ctx
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "username": "someone",
                "email": "ALICE@example.com",
                "password": "password123",
            })),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["success"], false);
    assert_eq!(duplicate.body["message"], "User with this email already exists");

    let login = ctx
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["data"]["user"]["username"], "alice");
    assert!(login.body["data"]["user"].get("passwordHash").is_none());

    let wrong = ctx
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "nope-nope" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["message"], "Invalid credentials");

    let refreshed = ctx
        .send(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({ "refreshToken": alice.refresh_token })),
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let access = refreshed.body["data"]["accessToken"].as_str().unwrap();

    let me = ctx.send("GET", "/api/auth/me", Some(access), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["id"], alice.id.to_string());

    let misuse = ctx
        .send(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({ "refreshToken": alice.token })),
        )
        .await;
    assert_eq!(misuse.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "username": "ab", "email": "not-an-email", "password": "123" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Validation failed");

    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password", "username"]);
}

#[tokio::test]
async fn test_protected_routes_require_access_token() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;

    let missing = ctx.send("GET", "/api/projects", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["success"], false);

    let garbage = ctx.send("GET", "/api/projects", Some("not.a.jwt"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let refresh_as_access = ctx
        .send("GET", "/api/projects", Some(&alice.refresh_token), None)
        .await;
    assert_eq!(refresh_as_access.status, StatusCode::UNAUTHORIZED);

    let ok = ctx.get("/api/projects", &alice).await;
    assert_eq!(ok.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_profile() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    ctx.register("bob").await;

    let response = ctx
        .put(
            "/api/auth/me",
            &alice,
            json!({ "firstName": "Alice", "lastName": "Liddell" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["firstName"], "Alice");

    let cleared = ctx.put("/api/auth/me", &alice, json!({ "lastName": null })).await;
    assert_eq!(cleared.body["data"]["firstName"], "Alice");
    assert!(cleared.body["data"]["lastName"].is_null());

    let taken = ctx
        .put("/api/auth/me", &alice, json!({ "email": "bob@example.com" }))
        .await;
    assert_eq!(taken.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owner_controls_project_outsider_denied() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let y = ctx.register("yvonne").await;

    let alpha = ctx.create_project(&x, "Alpha").await;
    let uri = format!("/api/projects/{alpha}");

    let members = ctx.get(&format!("{uri}/members"), &x).await;
    assert_eq!(members.body["data"][0]["role"], "owner");
    assert_eq!(members.body["data"][0]["user"]["username"], "xavier");

    let outsider = ctx.get(&uri, &y).await;
    assert_eq!(outsider.status, StatusCode::FORBIDDEN);

    let updated = ctx
        .put(&uri, &x, json!({ "status": "on-hold", "description": "Paused" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["status"], "on-hold");
    assert_eq!(updated.body["data"]["name"], "Alpha");

    let deleted = ctx.delete(&uri, &x).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(deleted.body.get("data").is_none());

    let gone = ctx.get(&uri, &x).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["message"], "Project not found");
}

#[tokio::test]
async fn test_member_contributes_but_cannot_manage() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let y = ctx.register("yvonne").await;
    let z = ctx.register("zack").await;

    let alpha = ctx.create_project(&x, "Alpha").await;
    ctx.add_member(&x, &alpha, &y, "member").await;

    let task = ctx.create_task(&y, &alpha, "Write docs").await;
    let comment = ctx
        .post(
            &format!("/api/tasks/{task}/comments"),
            &y,
            json!({ "content": "Started" }),
        )
        .await;
    assert_eq!(comment.status, StatusCode::CREATED);
    assert_eq!(comment.body["data"]["authorId"], y.id.to_string());

    let add = ctx
        .post(
            &format!("/api/projects/{alpha}/members"),
            &y,
            json!({ "userId": z.id }),
        )
        .await;
    assert_eq!(add.status, StatusCode::FORBIDDEN);

    let delete = ctx.delete(&format!("/api/projects/{alpha}"), &y).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_removed_member_loses_access_content_remains() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let admin = ctx.register("adele").await;
    let y = ctx.register("yvonne").await;

    let alpha = ctx.create_project(&x, "Alpha").await;
    ctx.add_member(&x, &alpha, &admin, "admin").await;
    let y_membership = ctx.add_member(&x, &alpha, &y, "member").await;

    let task = ctx.create_task(&y, &alpha, "Y's task").await;
    ctx.post(
        &format!("/api/tasks/{task}/comments"),
        &y,
        json!({ "content": "Y's note" }),
    )
    .await;

    let removed = ctx
        .delete(&format!("/api/projects/{alpha}/members/{y_membership}"), &admin)
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let read = ctx.get(&format!("/api/tasks/{task}"), &y).await;
    assert_eq!(read.status, StatusCode::FORBIDDEN);
    let list = ctx.get(&format!("/api/projects/{alpha}/tasks"), &y).await;
    assert_eq!(list.status, StatusCode::FORBIDDEN);

    let still_there = ctx.get(&format!("/api/tasks/{task}"), &x).await;
    assert_eq!(still_there.status, StatusCode::OK);
    let comments = ctx.get(&format!("/api/tasks/{task}/comments"), &x).await;
    assert_eq!(comments.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_membership_and_owner_role_rejected() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let y = ctx.register("yvonne").await;

    let alpha = ctx.create_project(&x, "Alpha").await;
    let members_uri = format!("/api/projects/{alpha}/members");
    ctx.add_member(&x, &alpha, &y, "member").await;

    let again = ctx.post(&members_uri, &x, json!({ "userId": y.id })).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.body["message"], "User is already a member of this project");

    let owner = ctx
        .post(&members_uri, &x, json!({ "userId": y.id, "role": "owner" }))
        .await;
    assert_eq!(owner.status, StatusCode::BAD_REQUEST);
    assert_eq!(owner.body["errors"][0]["field"], "role");

    let bogus = ctx
        .post(&members_uri, &x, json!({ "userId": y.id, "role": "superuser" }))
        .await;
    assert_eq!(bogus.status, StatusCode::BAD_REQUEST);

    let members = ctx.get(&members_uri, &x).await;
    assert_eq!(members.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_owner_membership_cannot_be_removed() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let admin = ctx.register("adele").await;

    let alpha = ctx.create_project(&x, "Alpha").await;
    ctx.add_member(&x, &alpha, &admin, "admin").await;

    let members = ctx.get(&format!("/api/projects/{alpha}/members"), &x).await;
    let owner_row = members.body["data"][0]["id"].as_str().unwrap().to_string();

    let response = ctx
        .delete(&format!("/api/projects/{alpha}/members/{owner_row}"), &admin)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deletes_cascade_to_comments() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let y = ctx.register("yvonne").await;

    let alpha = ctx.create_project(&x, "Alpha").await;
    ctx.add_member(&x, &alpha, &y, "member").await;

    let t1 = ctx.create_task(&x, &alpha, "T1").await;
    let t2 = ctx.create_task(&x, &alpha, "T2").await;
    let c1 = ctx
        .post(&format!("/api/tasks/{t1}/comments"), &y, json!({ "content": "a" }))
        .await;
    let c1 = c1.body["data"]["id"].as_str().unwrap().to_string();
    ctx.post(&format!("/api/tasks/{t2}/comments"), &y, json!({ "content": "b" }))
        .await;

    assert_eq!(ctx.delete(&format!("/api/tasks/{t1}"), &x).await.status, StatusCode::OK);
    let edit = ctx
        .put(&format!("/api/comments/{c1}"), &y, json!({ "content": "edit" }))
        .await;
    assert_eq!(edit.status, StatusCode::NOT_FOUND);

    assert_eq!(ctx.delete(&format!("/api/projects/{alpha}"), &x).await.status, StatusCode::OK);
    let task = ctx.get(&format!("/api/tasks/{t2}"), &x).await;
    assert_eq!(task.status, StatusCode::NOT_FOUND);
    let comments = ctx.get(&format!("/api/tasks/{t2}/comments"), &y).await;
    assert_eq!(comments.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_update_and_assignee_rules() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let y = ctx.register("yvonne").await;
    let outsider = ctx.register("olga").await;

    let alpha = ctx.create_project(&x, "Alpha").await;
    ctx.add_member(&x, &alpha, &y, "member").await;

    let create = ctx
        .post(
            &format!("/api/projects/{alpha}/tasks"),
            &x,
            json!({
                "title": "Ship it",
                "priority": "high",
                "assigneeId": y.id,
                "dueDate": "2030-01-01T00:00:00Z",
            }),
        )
        .await;
    assert_eq!(create.status, StatusCode::CREATED);
    let task = &create.body["data"];
    assert_eq!(task["status"], "todo");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["assigneeId"], y.id.to_string());
    assert_eq!(task["createdBy"], x.id.to_string());
    let task_uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let bad_assignee = ctx
        .put(&task_uri, &x, json!({ "assigneeId": outsider.id }))
        .await;
    assert_eq!(bad_assignee.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_assignee.body["errors"][0]["field"], "assigneeId");

    let updated = ctx
        .put(
            &task_uri,
            &y,
            json!({ "status": "in-progress", "assigneeId": null, "dueDate": null }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["status"], "in-progress");
    assert!(updated.body["data"]["assigneeId"].is_null());
    assert!(updated.body["data"]["dueDate"].is_null());
    assert_eq!(updated.body["data"]["title"], "Ship it");

    let bad_status = ctx.put(&task_uri, &x, json!({ "status": "done" })).await;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);

    // Y is no longer assignee and never created it
    let delete = ctx.delete(&task_uri, &y).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_comment_permissions() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let y = ctx.register("yvonne").await;
    let w = ctx.register("walter").await;

    let alpha = ctx.create_project(&x, "Alpha").await;
    ctx.add_member(&x, &alpha, &y, "member").await;
    ctx.add_member(&x, &alpha, &w, "member").await;
    let task = ctx.create_task(&x, &alpha, "T").await;

    let created = ctx
        .post(&format!("/api/tasks/{task}/comments"), &y, json!({ "content": "Mine" }))
        .await;
    let comment_uri = format!("/api/comments/{}", created.body["data"]["id"].as_str().unwrap());

    let empty = ctx
        .post(&format!("/api/tasks/{task}/comments"), &y, json!({ "content": "   " }))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let by_other = ctx.put(&comment_uri, &w, json!({ "content": "Hijack" })).await;
    assert_eq!(by_other.status, StatusCode::FORBIDDEN);

    let by_author = ctx.put(&comment_uri, &y, json!({ "content": "Edited" })).await;
    assert_eq!(by_author.status, StatusCode::OK);
    assert_eq!(by_author.body["data"]["content"], "Edited");

    assert_eq!(ctx.delete(&comment_uri, &w).await.status, StatusCode::FORBIDDEN);
    assert_eq!(ctx.delete(&comment_uri, &x).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_task_listing_pagination_and_filters() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let alpha = ctx.create_project(&x, "Alpha").await;
    let tasks_uri = format!("/api/projects/{alpha}/tasks");

    for i in 0..12 {
        let status = if i % 3 == 0 { "completed" } else { "todo" };
        let response = ctx
            .post(
                &tasks_uri,
                &x,
                json!({ "title": format!("Task {i:02}"), "status": status }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let mut seen = HashSet::new();
    for page in 1..=3 {
        let response = ctx
            .get(
                &format!("{tasks_uri}?page={page}&limit=5&sortBy=title&sortOrder=asc"),
                &x,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);

        let pagination = &response.body["pagination"];
        assert_eq!(pagination["currentPage"], page);
        assert_eq!(pagination["totalPages"], 3);
        assert_eq!(pagination["totalItems"], 12);
        assert_eq!(pagination["pageSize"], 5);

        for task in response.body["data"].as_array().unwrap() {
            assert!(seen.insert(task["id"].as_str().unwrap().to_string()));
        }
    }
    assert_eq!(seen.len(), 12);

    let first = ctx
        .get(&format!("{tasks_uri}?sortBy=title&sortOrder=asc&limit=1"), &x)
        .await;
    assert_eq!(first.body["data"][0]["title"], "Task 00");

    let completed = ctx.get(&format!("{tasks_uri}?status=completed"), &x).await;
    assert_eq!(completed.body["pagination"]["totalItems"], 4);

    let search = ctx.get(&format!("{tasks_uri}?search=COMPLETED"), &x).await;
    assert_eq!(search.body["pagination"]["totalItems"], 4);

    let by_title = ctx.get(&format!("{tasks_uri}?search=task%2011"), &x).await;
    assert_eq!(by_title.body["pagination"]["totalItems"], 1);
}

#[tokio::test]
async fn test_project_listing_is_scoped_to_caller() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let y = ctx.register("yvonne").await;

    ctx.create_project(&x, "Website").await;
    ctx.create_project(&x, "Backend").await;
    let shared = ctx.create_project(&y, "Web shop").await;
    ctx.create_project(&y, "Private").await;
    ctx.add_member(&y, &shared, &x, "member").await;

    let all = ctx.get("/api/projects", &x).await;
    assert_eq!(all.body["pagination"]["totalItems"], 3);

    let web = ctx.get("/api/projects?search=web&sortBy=name&sortOrder=asc", &x).await;
    let names: Vec<&str> = web.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Web shop", "Website"]);
}

#[tokio::test]
async fn test_malformed_requests_are_bad_requests() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;

    let bad_limit = ctx.get("/api/projects?limit=0", &x).await;
    assert_eq!(bad_limit.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_limit.body["errors"][0]["field"], "limit");

    let too_big = ctx.get("/api/projects?limit=101", &x).await;
    assert_eq!(too_big.status, StatusCode::BAD_REQUEST);

    let bad_page = ctx.get("/api/projects?page=0", &x).await;
    assert_eq!(bad_page.body["errors"][0]["field"], "page");

    let bad_sort = ctx.get("/api/projects?sortBy=owner", &x).await;
    assert_eq!(bad_sort.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_sort.body["success"], false);

    let bad_id = ctx.get("/api/projects/not-a-uuid", &x).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);

    let bad_json = ctx.send_raw("POST", "/api/projects", &x.token, "{ name: ").await;
    assert_eq!(bad_json.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_json.body["success"], false);

    let blank_name = ctx.post("/api/projects", &x, json!({ "name": "" })).await;
    assert_eq!(blank_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank_name.body["errors"][0]["field"], "name");
}

#[tokio::test]
async fn test_missing_resources_are_not_found() {
    let ctx = TestContext::new();
    let x = ctx.register("xavier").await;
    let missing = uuid::Uuid::new_v4();

    for uri in [
        format!("/api/projects/{missing}"),
        format!("/api/projects/{missing}/members"),
        format!("/api/projects/{missing}/tasks"),
        format!("/api/tasks/{missing}"),
        format!("/api/tasks/{missing}/comments"),
    ] {
        let response = ctx.get(&uri, &x).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.body["success"], false);
    }

    let alpha = ctx.create_project(&x, "Alpha").await;
    let add = ctx
        .post(
            &format!("/api/projects/{alpha}/members"),
            &x,
            json!({ "userId": missing }),
        )
        .await;
    assert_eq!(add.status, StatusCode::NOT_FOUND);
    assert_eq!(add.body["message"], "User not found");
}
