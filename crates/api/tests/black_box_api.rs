use chrono::{Duration as ChronoDuration, Utc};
use gatepass_auth::{JwtClaims, PrincipalId, Role};
use gatepass_core::OrganizationId;
use gatepass_infra::GatepassConfig;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let config = GatepassConfig::from_lookup(|var| match var {
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            "GATEPASS_CREDENTIAL_SECRET" => Some("test-credential-secret".to_string()),
            _ => None,
        })
        .expect("valid test config");

        // Same router as prod, bound to an ephemeral port.
        let app = gatepass_api::app::build_app(&config).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(sub: &str, org: &str, roles: Vec<Role>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::parse(sub).unwrap(),
        organization_id: OrganizationId::parse(org).unwrap(),
        name: format!("{sub} display"),
        roles,
        issued_at: now - ChronoDuration::seconds(5),
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Register `org` and one member `member_id` through the admin endpoints.
async fn seed(client: &reqwest::Client, base_url: &str, org: &str, member_id: &str) {
    let admin = mint_jwt("admin", org, vec![Role::ADMIN]);

    let res = client
        .put(format!("{base_url}/organization"))
        .bearer_auth(&admin)
        .json(&json!({ "name": format!("{org} estates"), "community_type": "house-based" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{base_url}/directory/members"))
        .bearer_auth(&admin)
        .json(&json!({
            "member_id": member_id,
            "name": "Member One",
            "email": "M1@X.com",
            "profile": { "home_address": "12 Palm St", "vehicle_info": "ABC-123" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

async fn scan(client: &reqwest::Client, base_url: &str, token: &str, credential: &str) -> serde_json::Value {
    let res = client
        .post(format!("{base_url}/scans"))
        .bearer_auth(token)
        .json(&json!({ "credential": credential }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client.get(format!("{}/health", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn organization_is_derived_from_token() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("guard-7", "org-1", vec![Role::GUARD]);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["organization_id"], "org-1");
    assert_eq!(body["principal_id"], "guard-7");
    assert!(body["roles"].as_array().unwrap().iter().any(|r| r == "guard"));
}

#[tokio::test]
async fn member_credential_grants_at_home_and_mismatches_elsewhere() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed(&client, &srv.base_url, "org-1", "m1").await;
    seed(&client, &srv.base_url, "org-2", "m2").await;

    let member = mint_jwt("m1", "org-1", vec![Role::MEMBER]);
    let res = client
        .post(format!("{}/members/m1/credential", srv.base_url))
        .bearer_auth(&member)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cred: serde_json::Value = res.json().await.unwrap();
    let hash = cred["hash"].as_str().unwrap().to_string();
    assert_eq!(cred["owner_type"], "member");
    assert_eq!(cred["owner_id"], "m1");

    // Re-issue keeps the same hash.
    let res = client
        .post(format!("{}/members/m1/credential", srv.base_url))
        .bearer_auth(&member)
        .send()
        .await
        .unwrap();
    let again: serde_json::Value = res.json().await.unwrap();
    assert_eq!(again["hash"].as_str().unwrap(), hash);

    let guard1 = mint_jwt("g1", "org-1", vec![Role::GUARD]);
    let body = scan(&client, &srv.base_url, &guard1, &hash).await;
    assert_eq!(body["granted"], true);
    assert_eq!(body["decision"]["payload"]["name"], "Member One");
    assert_eq!(body["decision"]["payload"]["home_address"], "12 Palm St");

    let guard2 = mint_jwt("g2", "org-2", vec![Role::GUARD]);
    let body = scan(&client, &srv.base_url, &guard2, &hash).await;
    assert_eq!(body["granted"], false);
    assert_eq!(body["decision"]["reason"], "cross_tenant_mismatch");

    let body = scan(&client, &srv.base_url, &guard1, "not-a-real-credential").await;
    assert_eq!(body["decision"]["reason"], "not_found");

    let res = client
        .get(format!("{}/access-logs?stream=member", srv.base_url))
        .bearer_auth(&guard1)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let logs: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["granted"], true);
    assert_eq!(logs[0]["guard_id"], "g1");
    assert_eq!(logs[1]["denial_reason"], "not_found");
}

#[tokio::test]
async fn issuing_for_another_member_is_forbidden() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed(&client, &srv.base_url, "org-1", "m1").await;

    let other = mint_jwt("m9", "org-1", vec![Role::MEMBER]);
    let res = client
        .post(format!("{}/members/m1/credential", srv.base_url))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin = mint_jwt("admin", "org-1", vec![Role::ADMIN]);
    let res = client
        .post(format!("{}/members/nobody/credential", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn guest_pass_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed(&client, &srv.base_url, "org-1", "m1").await;

    let host = mint_jwt("m1", "org-1", vec![Role::MEMBER]);
    let now = Utc::now();

    // Inverted window.
    let res = client
        .post(format!("{}/guest-passes", srv.base_url))
        .bearer_auth(&host)
        .json(&json!({
            "host_member_id": "m1",
            "guest": { "kind": "new", "name": "Ana" },
            "start": now + ChronoDuration::hours(2),
            "end": now,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = client
        .post(format!("{}/guest-passes", srv.base_url))
        .bearer_auth(&host)
        .json(&json!({
            "host_member_id": "m1",
            "guest": { "kind": "new", "name": "Ana" },
            "start": now - ChronoDuration::minutes(5),
            "end": now + ChronoDuration::hours(2),
            "purpose": "dinner",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let issued: serde_json::Value = res.json().await.unwrap();
    let guest_id = issued["guest_id"].as_str().unwrap().to_string();
    let hash = issued["credential"]["hash"].as_str().unwrap().to_string();
    assert!(hash.starts_with("gst_"));

    let guard = mint_jwt("g1", "org-1", vec![Role::GUARD]);
    let body = scan(&client, &srv.base_url, &guard, &hash).await;
    assert_eq!(body["granted"], true);
    assert_eq!(body["decision"]["payload"]["subject_type"], "guest");
    assert_eq!(body["decision"]["payload"]["purpose"], "dinner");

    let res = client
        .get(format!("{}/guests/{}/passes", srv.base_url, guest_id))
        .bearer_auth(&guard)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let passes: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(passes.len(), 1);

    let res = client
        .post(format!("{}/guests/{}/passes/{}/revoke", srv.base_url, guest_id, hash))
        .bearer_auth(&host)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body = scan(&client, &srv.base_url, &guard, &hash).await;
    assert_eq!(body["decision"]["reason"], "inactive");

    let res = client
        .get(format!("{}/access-logs?stream=guest&subject={}", srv.base_url, guest_id))
        .bearer_auth(&guard)
        .send()
        .await
        .unwrap();
    let logs: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(logs.len(), 2);

    let res = client
        .get(format!("{}/members/m1/guests", srv.base_url))
        .bearer_auth(&host)
        .send()
        .await
        .unwrap();
    let guests: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(guests.len(), 1);
}

#[tokio::test]
async fn members_cannot_scan() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let member = mint_jwt("m1", "org-1", vec![Role::MEMBER]);

    let res = client
        .post(format!("{}/scans", srv.base_url))
        .bearer_auth(&member)
        .json(&json!({ "credential": "anything" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deactivation_keeps_the_credential_and_activation_restores_entry() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed(&client, &srv.base_url, "org-1", "m1").await;

    let member = mint_jwt("m1", "org-1", vec![Role::MEMBER]);
    let res = client
        .post(format!("{}/members/m1/credential", srv.base_url))
        .bearer_auth(&member)
        .send()
        .await
        .unwrap();
    let cred: serde_json::Value = res.json().await.unwrap();
    let hash = cred["hash"].as_str().unwrap().to_string();

    let admin = mint_jwt("admin", "org-1", vec![Role::ADMIN]);
    let res = client
        .post(format!("{}/directory/members/m1/deactivate", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let view: serde_json::Value = res.json().await.unwrap();
    assert_eq!(view["is_active"], false);

    let guard = mint_jwt("g1", "org-1", vec![Role::GUARD]);
    let body = scan(&client, &srv.base_url, &guard, &hash).await;
    assert_eq!(body["decision"]["reason"], "inactive");

    let res = client
        .post(format!("{}/directory/members/m1/activate", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = scan(&client, &srv.base_url, &guard, &hash).await;
    assert_eq!(body["granted"], true);

    let other_admin = mint_jwt("admin", "org-2", vec![Role::ADMIN]);
    let res = client
        .post(format!("{}/directory/members/m1/deactivate", srv.base_url))
        .bearer_auth(&other_admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
