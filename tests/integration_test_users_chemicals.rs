mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_user_listing_is_admin_only() {
    let app = TestApp::new().await;
    app.seed_admin("boss", "bosspass").await;
    app.seed_employee("emp", "pass1234").await;

    let emp_token = app.login("emp", "pass1234").await;
    let res = app.get("/api/v1/users", &emp_token).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin_token = app.login("boss", "bosspass").await;
    let res = app.get("/api/v1/users", &admin_token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    // Hashes never leave the API.
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn test_users_can_only_touch_their_own_profile() {
    let app = TestApp::new().await;
    let emp_id = app.seed_employee("emp", "pass1234").await;
    let other_id = app.seed_employee("other", "pass1234").await;
    let emp_token = app.login("emp", "pass1234").await;

    let res = app.get(&format!("/api/v1/users/{}", other_id), &emp_token).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .put(
            &format!("/api/v1/users/{}", other_id),
            &emp_token,
            json!({"first_name": "Hacked"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.get(&format!("/api/v1/users/{}", emp_id), &emp_token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["username"], "emp");
}

#[tokio::test]
async fn test_update_without_password_keeps_the_old_one() {
    let app = TestApp::new().await;
    let emp_id = app.seed_employee("emp", "pass1234").await;
    let token = app.login("emp", "pass1234").await;

    let res = app
        .put(
            &format!("/api/v1/users/{}", emp_id),
            &token,
            json!({"first_name": "Renamed", "password": ""}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["first_name"], "Renamed");

    // Old password still works.
    let token = app.login("emp", "pass1234").await;

    // An actual password change takes effect.
    let res = app
        .put(
            &format!("/api/v1/users/{}", emp_id),
            &token,
            json!({"password": "newpass99"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    app.login("emp", "newpass99").await;
}

#[tokio::test]
async fn test_admin_cannot_delete_themselves() {
    let app = TestApp::new().await;
    let admin_id = app.seed_admin("boss", "bosspass").await;
    let emp_id = app.seed_employee("emp", "pass1234").await;
    let admin_token = app.login("boss", "bosspass").await;

    let res = app
        .delete(&format!("/api/v1/users/{}", admin_id), &admin_token)
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .delete(&format!("/api/v1/users/{}", emp_id), &admin_token)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/users/{}", emp_id), &admin_token).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_user_removes_their_forms() {
    let app = TestApp::new().await;
    app.seed_admin("boss", "bosspass").await;
    let emp_id = app.seed_employee("emp", "pass1234").await;
    let emp_token = app.login("emp", "pass1234").await;

    let res = app
        .post(
            "/api/v1/forms/shrub",
            &emp_token,
            json!({
                "first_name": "Sam",
                "last_name": "Klein",
                "phone": "555-0100",
                "address": "12 Elm St",
                "city": "Monsey",
                "state": "NY",
                "zip_code": "10952",
                "shrub_count": 3
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let form_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    // Deleting an employee who has submitted forms must succeed, taking the
    // forms (and their subtype rows) with it.
    let admin_token = app.login("boss", "bosspass").await;
    let res = app
        .delete(&format!("/api/v1/users/{}", emp_id), &admin_token)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let form_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM forms WHERE id = ?")
        .bind(&form_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(form_count, 0);
    let shrub_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shrubs WHERE form_id = ?")
        .bind(&form_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(shrub_count, 0);
}

fn chemical_payload(brand: &str, name: &str, category: &str) -> serde_json::Value {
    json!({
        "category": category,
        "brand": brand,
        "chemical_name": name,
        "epa_registration": "EPA-432-1551",
        "recipe": "0.5oz per gallon",
        "unit": "oz"
    })
}

#[tokio::test]
async fn test_chemical_catalog_crud() {
    let app = TestApp::new().await;
    app.seed_admin("boss", "bosspass").await;
    let admin_token = app.login("boss", "bosspass").await;

    let res = app
        .post(
            "/api/v1/admin/chemicals",
            &admin_token,
            chemical_payload("BugOff", "permethrin", "insecticide"),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = parse_body(res).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["brand"], "BugOff");

    let res = app
        .put(
            &format!("/api/v1/admin/chemicals/{}", id),
            &admin_token,
            json!({"recipe": "1oz per gallon"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["recipe"], "1oz per gallon");
    assert_eq!(updated["chemical_name"], "permethrin");

    let res = app
        .get(&format!("/api/v1/chemicals/{}", id), &admin_token)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .delete(&format!("/api/v1/admin/chemicals/{}", id), &admin_token)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .get(&format!("/api/v1/chemicals/{}", id), &admin_token)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chemicals_readable_by_employees_but_admin_managed() {
    let app = TestApp::new().await;
    app.seed_admin("boss", "bosspass").await;
    app.seed_employee("emp", "pass1234").await;
    let admin_token = app.login("boss", "bosspass").await;
    let emp_token = app.login("emp", "pass1234").await;

    app.post(
        "/api/v1/admin/chemicals",
        &admin_token,
        chemical_payload("BugOff", "permethrin", "insecticide"),
    )
    .await;
    app.post(
        "/api/v1/admin/chemicals",
        &admin_token,
        chemical_payload("GreenGone", "glyphosate", "herbicide"),
    )
    .await;

    // Employees can browse the catalog.
    let res = app.get("/api/v1/chemicals", &emp_token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let res = app
        .get("/api/v1/chemicals/category/herbicide", &emp_token)
        .await;
    let body = parse_body(res).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["chemical_name"], "glyphosate");

    // But cannot modify it.
    let res = app
        .post(
            "/api/v1/admin/chemicals",
            &emp_token,
            chemical_payload("Rogue", "diy-mix", "other"),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
