mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use landscaping_backend::domain::models::chemical::{Chemical, NewChemicalParams};
use serde_json::json;

async fn seed_chemical(app: &TestApp, name: &str) -> String {
    let chemical = Chemical::new(NewChemicalParams {
        category: "herbicide".to_string(),
        brand: "GreenGone".to_string(),
        chemical_name: name.to_string(),
        epa_registration: "EPA-100-200".to_string(),
        recipe: "1oz per gallon".to_string(),
        unit: "oz".to_string(),
    });
    let created = app.state.chemical_repo.create(&chemical).await.unwrap();
    created.id
}

fn shrub_payload(first: &str, last: &str) -> serde_json::Value {
    json!({
        "first_name": first,
        "last_name": last,
        "phone": "555-0100",
        "address": "12 Elm St",
        "city": "Monsey",
        "state": "NY",
        "zip_code": "10952",
        "shrub_count": 14
    })
}

#[tokio::test]
async fn test_shrub_form_crud_round_trip() {
    let app = TestApp::new().await;
    app.seed_employee("emp1", "pass1234").await;
    let token = app.login("emp1", "pass1234").await;

    let res = app
        .post("/api/v1/forms/shrub", &token, shrub_payload("Sam", "Klein"))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    let id = body["id"].as_str().unwrap().to_string();

    // Read it back, flattened base fields plus the subtype payload.
    let res = app.get(&format!("/api/v1/forms/{}", id), &token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let form = parse_body(res).await;
    assert_eq!(form["form_type"], "shrub");
    assert_eq!(form["first_name"], "Sam");
    assert_eq!(form["details"]["shrub_count"], 14);
    assert_eq!(form["applications"].as_array().unwrap().len(), 0);

    // Typed fetch succeeds for the right type, 404s for the wrong one.
    let res = app.get(&format!("/api/v1/forms/shrub/{}", id), &token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.get(&format!("/api/v1/forms/lawn/{}", id), &token).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Same discriminator rule applies to the typed update route.
    let res = app
        .put(
            &format!("/api/v1/forms/lawn/{}", id),
            &token,
            json!({"area_sq_ft": 100.0}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = app
        .put(
            &format!("/api/v1/forms/shrub/{}", id),
            &token,
            json!({"shrub_count": 16}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let typed = parse_body(res).await;
    assert_eq!(typed["details"]["shrub_count"], 16);

    // Partial update touches only what was sent.
    let res = app
        .put(
            &format!("/api/v1/forms/{}", id),
            &token,
            json!({"shrub_count": 20, "city": "Airmont"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["details"]["shrub_count"], 20);
    assert_eq!(updated["city"], "Airmont");
    assert_eq!(updated["first_name"], "Sam");

    // Delete.
    let res = app.delete(&format!("/api/v1/forms/{}", id), &token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.get(&format!("/api/v1/forms/{}", id), &token).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lawn_form_with_applications_and_cascade_delete() {
    let app = TestApp::new().await;
    app.seed_employee("emp2", "pass1234").await;
    let token = app.login("emp2", "pass1234").await;
    let chem_id = seed_chemical(&app, "glyphosate").await;

    let res = app
        .post(
            "/api/v1/forms/lawn",
            &token,
            json!({
                "first_name": "Rivka",
                "last_name": "Stern",
                "phone": "555-0101",
                "address": "8 Maple Ave",
                "city": "Monsey",
                "state": "NY",
                "zip_code": "10952",
                "jewish_holiday": true,
                "area_sq_ft": 2500.5,
                "applications": [{
                    "chemical_id": chem_id,
                    "applied_at": "2026-05-10T09:00:00Z",
                    "rate": 1.5,
                    "amount": 3.0,
                    "location_code": "front-lawn"
                }]
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.get(&format!("/api/v1/forms/{}", id), &token).await;
    let form = parse_body(res).await;
    assert_eq!(form["jewish_holiday"], true);
    assert_eq!(form["details"]["area_sq_ft"], 2500.5);
    let apps = form["applications"].as_array().unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0]["chemical_id"], chem_id);
    assert_eq!(apps[0]["location_code"], "front-lawn");

    // Deleting the form removes its subtype row and applications.
    let res = app.delete(&format!("/api/v1/forms/{}", id), &token).await;
    assert_eq!(res.status(), StatusCode::OK);

    let app_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pest_apps WHERE form_id = ?")
        .bind(&id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(app_count, 0);
    let lawn_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lawn_forms WHERE form_id = ?")
        .bind(&id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(lawn_count, 0);
}

#[tokio::test]
async fn test_pesticide_form_requires_chemical_name() {
    let app = TestApp::new().await;
    app.seed_employee("emp3", "pass1234").await;
    let token = app.login("emp3", "pass1234").await;

    let res = app
        .post(
            "/api/v1/forms/pesticide",
            &token,
            json!({
                "first_name": "Moshe",
                "last_name": "Gold",
                "phone": "555-0102",
                "address": "3 Oak Dr",
                "city": "Spring Valley",
                "state": "NY",
                "zip_code": "10977",
                "chemical_name": "   "
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .post(
            "/api/v1/forms/pesticide",
            &token,
            json!({
                "first_name": "Moshe",
                "last_name": "Gold",
                "phone": "555-0102",
                "address": "3 Oak Dr",
                "city": "Spring Valley",
                "state": "NY",
                "zip_code": "10977",
                "chemical_name": "bifenthrin"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app
        .get(&format!("/api/v1/forms/pesticide/{}", id), &token)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let form = parse_body(res).await;
    assert_eq!(form["details"]["chemical_name"], "bifenthrin");
}

#[tokio::test]
async fn test_forms_are_scoped_to_their_owner() {
    let app = TestApp::new().await;
    app.seed_employee("owner", "pass1234").await;
    app.seed_employee("intruder", "pass1234").await;
    let owner_token = app.login("owner", "pass1234").await;
    let intruder_token = app.login("intruder", "pass1234").await;

    let res = app
        .post("/api/v1/forms/shrub", &owner_token, shrub_payload("A", "B"))
        .await;
    let id = parse_body(res).await["id"].as_str().unwrap().to_string();

    // Another employee sees someone else's form as missing, through every verb.
    let res = app.get(&format!("/api/v1/forms/{}", id), &intruder_token).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = app
        .put(
            &format!("/api/v1/forms/{}", id),
            &intruder_token,
            json!({"city": "Hijacked"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = app
        .delete(&format!("/api/v1/forms/{}", id), &intruder_token)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // List only returns the caller's own rows.
    let res = app.get("/api/v1/forms", &intruder_token).await;
    let body = parse_body(res).await;
    assert_eq!(body["count"], 0);

    // An admin sees and can touch everything.
    app.seed_admin("boss", "bosspass").await;
    let admin_token = app.login("boss", "bosspass").await;
    let res = app.get(&format!("/api/v1/forms/{}", id), &admin_token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.get("/api/v1/admin/forms", &admin_token).await;
    let body = parse_body(res).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_admin_list_is_forbidden_for_employees() {
    let app = TestApp::new().await;
    app.seed_employee("plain", "pass1234").await;
    let token = app.login("plain", "pass1234").await;

    let res = app.get("/api/v1/admin/forms", &token).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_negative_quantities_are_rejected() {
    let app = TestApp::new().await;
    app.seed_employee("emp4", "pass1234").await;
    let token = app.login("emp4", "pass1234").await;

    let mut payload = shrub_payload("Neg", "Count");
    payload["shrub_count"] = json!(-5);
    let res = app.post("/api/v1/forms/shrub", &token, payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
