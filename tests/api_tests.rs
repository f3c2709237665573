use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bus_fleet_status::{
    config::EnvironmentConfig,
    create_app,
    repositories::{MemoryFleetStore, SharedStore},
    AppState,
};

const ADMIN_KEY: &str = "chave-de-teste";

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(EnvironmentConfig {
            admin_key: Some(ADMIN_KEY.to_string()),
            ..EnvironmentConfig::default()
        })
    }

    fn with_config(config: EnvironmentConfig) -> Self {
        let store: SharedStore = Arc::new(MemoryFleetStore::new());
        Self {
            router: create_app(AppState::new(store, config)),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Body sin serializar, para JSON mal formado
    async fn put_raw(&self, uri: &str, token: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// GET con la dirección de la conexión TCP (y opcionalmente `x-forwarded-for`)
    async fn get_from(&self, uri: &str, peer: &str, forwarded_for: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().uri(uri);
        if let Some(forwarded_for) = forwarded_for {
            builder = builder.header("x-forwarded-for", forwarded_for);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        let addr: SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));

        self.send(request).await.0
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Registrar un usuario y devolver (id, token)
    async fn register(&self, email: &str, admin_key: Option<&str>) -> (String, String) {
        let mut body = json!({
            "name": "Usuário de Teste",
            "email": email,
            "password": "segredo123"
        });
        if let Some(key) = admin_key {
            body["adminKey"] = json!(key);
        }

        let (status, json) = self.post("/api/auth/register", None, body).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", json);

        (
            json["data"]["user"]["id"].as_str().unwrap().to_string(),
            json["data"]["token"].as_str().unwrap().to_string(),
        )
    }
}

/// Flota mínima: un admin, un conductor dueño de la ruta "500" con tres paradas
struct Fleet {
    app: TestApp,
    admin_token: String,
    driver_id: String,
    driver_token: String,
    route_id: String,
    point_ids: Vec<String>,
}

impl Fleet {
    async fn new() -> Self {
        let app = TestApp::new();
        let (_, admin_token) = app.register("admin@example.com", Some(ADMIN_KEY)).await;
        let (driver_id, driver_token) = app.register("driver@example.com", None).await;

        let (status, json) = app
            .post(
                "/api/routes",
                Some(&admin_token),
                json!({
                    "name": "Linha Teste",
                    "busNumber": "500",
                    "maxCapacity": 50,
                    "driverId": driver_id
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create route failed: {}", json);
        let route_id = json["data"]["route"]["id"].as_str().unwrap().to_string();

        let mut point_ids = Vec::new();
        for (i, name) in ["Praça", "Mercado", "Terminal"].iter().enumerate() {
            let (status, json) = app
                .post(
                    "/api/points",
                    Some(&admin_token),
                    json!({
                        "name": name,
                        "latitude": -23.55 + i as f64 * 0.01,
                        "longitude": -46.63
                    }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "create point failed: {}", json);
            let point_id = json["data"]["id"].as_str().unwrap().to_string();

            let (status, json) = app
                .post(
                    "/api/points/route",
                    Some(&admin_token),
                    json!({ "routeId": route_id, "pointId": point_id }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "add point failed: {}", json);
            assert_eq!(json["data"]["routePoint"]["order"], i as i64);

            point_ids.push(point_id);
        }

        Self {
            app,
            admin_token,
            driver_id,
            driver_token,
            route_id,
            point_ids,
        }
    }

    fn status_uri(&self) -> String {
        format!("/api/routes/{}/status", self.route_id)
    }
}

fn passed_flags(route: &Value) -> Vec<bool> {
    route["routePoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|rp| rp["isPassed"].as_bool().unwrap())
        .collect()
}

#[tokio::test]
async fn test_banner_index_and_fallback() {
    let app = TestApp::new();

    let (status, json) = app.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (status, json) = app.get("/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["endpoints"]["routes"].is_object());

    let (status, json) = app.get("/api/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, json) = app.get("/api/public/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/routes", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);

    let (status, _) = app.get("/api/auth/profile", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = TestApp::new();

    let (status, json) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "name": "Admin",
                "email": "boss@example.com",
                "password": "segredo123",
                "adminKey": ADMIN_KEY
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["user"]["role"], "admin");
    assert!(json["data"]["user"].get("passwordHash").is_none());

    let (_, driver_token) = app.register("d@example.com", Some("wrong-key")).await;
    let (status, json) = app.get("/api/auth/profile", Some(&driver_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["user"]["role"], "driver");

    let (status, json) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "boss@example.com", "password": "segredo123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["token"].is_string());

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "boss@example.com", "password": "errada" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_and_invalid() {
    let app = TestApp::new();
    app.register("dup@example.com", None).await;

    let (status, json) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Outro", "email": "dup@example.com", "password": "segredo123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");

    let (status, json) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "X", "email": "invalid", "password": "1" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_promote_to_admin() {
    let app = TestApp::new();
    let (user_id, token) = app.register("promo@example.com", None).await;

    let create_route = json!({ "name": "Linha Nova", "busNumber": "777" });
    let (status, _) = app.post("/api/routes", Some(&token), create_route.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/api/auth/promote",
            None,
            json!({ "userId": user_id, "adminKey": "wrong-key" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app
        .post(
            "/api/auth/promote",
            None,
            json!({ "userId": user_id, "adminKey": ADMIN_KEY }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["user"]["role"], "admin");

    // El mismo token sirve: el middleware vuelve a leer el rol
    let (status, json) = app.post("/api/routes", Some(&token), create_route).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["route"]["maxCapacity"], 50);
    assert_eq!(json["data"]["route"]["isActive"], false);
}

#[tokio::test]
async fn test_driver_forbidden_on_admin_routes() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;
    let token = Some(fleet.driver_token.as_str());

    let (status, json) = app
        .post("/api/points", token, json!({ "name": "Nova", "latitude": 0.0, "longitude": 0.0 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let (status, _) = app
        .post(
            "/api/points/route",
            token,
            json!({ "routeId": fleet.route_id, "pointId": fleet.point_ids[0] }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(
            &format!("/api/routes/{}/driver", fleet.route_id),
            token,
            json!({ "driverId": null }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Lectura sí permitida
    let (status, json) = app.get("/api/points", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_owner_updates_status_and_points_reclassify() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;

    let (status, json) = app
        .put(
            &fleet.status_uri(),
            Some(&fleet.driver_token),
            json!({ "currentPassengers": 25, "isActive": true, "currentPointIndex": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "update failed: {}", json);

    let route = &json["data"]["route"];
    assert_eq!(route["currentPassengers"], 25);
    assert_eq!(route["occupancyPercentage"], 50);
    assert_eq!(route["isActive"], true);
    assert_eq!(route["driver"]["id"], fleet.driver_id.as_str());
    assert_eq!(passed_flags(route), vec![true, true, false]);

    // Retroceder el índice recalcula todo
    let (status, json) = app
        .put(&fleet.status_uri(), Some(&fleet.driver_token), json!({ "currentPointIndex": 0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let route = &json["data"]["route"];
    assert_eq!(passed_flags(route), vec![true, false, false]);
    assert_eq!(route["currentPassengers"], 25);
}

#[tokio::test]
async fn test_status_update_is_idempotent() {
    let fleet = Fleet::new().await;
    let patch = json!({ "currentPassengers": 10, "currentPointIndex": 2 });

    let (_, first) = fleet
        .app
        .put(&fleet.status_uri(), Some(&fleet.driver_token), patch.clone())
        .await;
    let (_, second) = fleet
        .app
        .put(&fleet.status_uri(), Some(&fleet.driver_token), patch)
        .await;

    let first = &first["data"]["route"];
    let second = &second["data"]["route"];
    assert_eq!(first["currentPassengers"], second["currentPassengers"]);
    assert_eq!(first["currentPointIndex"], second["currentPointIndex"]);
    assert_eq!(passed_flags(first), passed_flags(second));
}

#[tokio::test]
async fn test_capacity_exceeded_leaves_route_unchanged() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;

    app.put(&fleet.status_uri(), Some(&fleet.driver_token), json!({ "currentPassengers": 5 }))
        .await;

    let (status, json) = app
        .put(
            &fleet.status_uri(),
            Some(&fleet.driver_token),
            json!({ "currentPassengers": 51, "currentPointIndex": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "CAPACITY_EXCEEDED");

    let (_, json) = app
        .get(&format!("/api/routes/{}", fleet.route_id), Some(&fleet.driver_token))
        .await;
    let route = &json["data"]["route"];
    assert_eq!(route["currentPassengers"], 5);
    assert_eq!(route["currentPointIndex"], 0);
    assert_eq!(passed_flags(route), vec![false, false, false]);
}

#[tokio::test]
async fn test_negative_values_rejected() {
    let fleet = Fleet::new().await;

    let (status, json) = fleet
        .app
        .put(&fleet.status_uri(), Some(&fleet.driver_token), json!({ "currentPassengers": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_only_owner_or_admin_updates_status() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;
    let (_, stranger_token) = app.register("stranger@example.com", None).await;

    let (status, json) = app
        .put(&fleet.status_uri(), Some(&stranger_token), json!({ "currentPassengers": 3 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let (status, _) = app
        .put(&fleet.status_uri(), Some(&fleet.admin_token), json!({ "currentPassengers": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .put(
            "/api/routes/00000000-0000-4000-8000-000000000000/status",
            Some(&fleet.driver_token),
            json!({ "currentPassengers": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_view() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;

    app.put(
        &fleet.status_uri(),
        Some(&fleet.driver_token),
        json!({ "currentPassengers": 1, "currentPointIndex": 1 }),
    )
    .await;

    let (status, json) = app.get("/api/public/bus/500", None).await;
    assert_eq!(status, StatusCode::OK);

    let view = &json["data"];
    assert_eq!(view["busNumber"], "500");
    assert_eq!(view["routeName"], "Linha Teste");
    assert_eq!(view["occupancyPercentage"], 2);
    assert_eq!(view["currentPoint"]["order"], 1);
    assert_eq!(view["currentPoint"]["name"], "Mercado");
    assert_eq!(view["nextPoint"]["order"], 2);
    assert_eq!(view["allPoints"].as_array().unwrap().len(), 3);

    // Fuera del trazado: sin parada actual ni siguiente
    app.put(&fleet.status_uri(), Some(&fleet.driver_token), json!({ "currentPointIndex": 5 }))
        .await;
    let (_, json) = app.get("/api/public/bus/500", None).await;
    assert!(json["data"]["currentPoint"].is_null());
    assert!(json["data"]["nextPoint"].is_null());

    let (status, json) = app.get("/api/public/bus/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_association_management() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;
    let token = Some(fleet.admin_token.as_str());

    let (status, json) = app
        .post(
            "/api/points/route",
            token,
            json!({ "routeId": fleet.route_id, "pointId": fleet.point_ids[0] }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");

    let (status, _) = app
        .delete(
            &format!("/api/points/route/{}/{}", fleet.route_id, fleet.point_ids[1]),
            token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .delete(
            &format!("/api/points/route/{}/{}", fleet.route_id, fleet.point_ids[1]),
            token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = app.get(&format!("/api/routes/{}", fleet.route_id), token).await;
    let orders: Vec<i64> = json["data"]["route"]["routePoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|rp| rp["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 2]);

    // La parada sigue existiendo y ya no pertenece a la ruta
    let (status, json) = app
        .get(&format!("/api/points/{}", fleet.point_ids[1]), token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["routes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_route_admin_errors() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;
    let token = Some(fleet.admin_token.as_str());

    let (status, _) = app
        .post("/api/routes", token, json!({ "name": "Repetida", "busNumber": "500" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (admin_profile_status, admin_profile) = app.get("/api/auth/profile", token).await;
    assert_eq!(admin_profile_status, StatusCode::OK);
    let admin_id = admin_profile["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .put(
            &format!("/api/routes/{}/driver", fleet.route_id),
            token,
            json!({ "driverId": admin_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");

    let (status, json) = app
        .put(
            &format!("/api/routes/{}/driver", fleet.route_id),
            token,
            json!({ "driverId": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["route"]["driver"].is_null());

    // Sin conductor asignado, el antiguo dueño ya no puede actualizar
    let (status, _) = app
        .put(&fleet.status_uri(), Some(&fleet.driver_token), json!({ "isActive": true }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_point_update() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;
    let uri = format!("/api/points/{}", fleet.point_ids[2]);

    let (status, json) = app
        .put(&uri, Some(&fleet.admin_token), json!({ "latitude": 95.0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (status, json) = app
        .put(&uri, Some(&fleet.admin_token), json!({ "name": "Rodoviária", "isActive": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Rodoviária");

    // Las paradas inactivas no aparecen en el listado
    let (_, json) = app.get("/api/points", Some(&fleet.admin_token)).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;

    let (status, json) = app
        .put(&fleet.status_uri(), Some(&fleet.admin_token), json!({ "isActive": "yes" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["message"].is_string());

    let (status, json) = app
        .put_raw(&fleet.status_uri(), &fleet.admin_token, "{not json")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");

    let (status, json) = app
        .post(
            "/api/routes",
            Some(&fleet.admin_token),
            json!({ "name": "Linha", "busNumber": "700", "maxCapacity": "many" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");

    // La ruta no cambió
    let (_, json) = app.get(&format!("/api/routes/{}", fleet.route_id), Some(&fleet.admin_token)).await;
    assert_eq!(json["data"]["route"]["isActive"], false);
}

#[tokio::test]
async fn test_non_owner_with_malformed_body_is_forbidden() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;
    let (_, stranger_token) = app.register("stranger@example.com", None).await;

    let (status, json) = app
        .put(&fleet.status_uri(), Some(&stranger_token), json!({ "currentPassengers": "ten" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    // El dueño con el mismo body recibe el error de formato
    let (status, json) = app
        .put(&fleet.status_uri(), Some(&fleet.driver_token), json!({ "currentPassengers": "ten" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_invalid_path_ids_get_json_errors() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;
    let token = Some(fleet.admin_token.as_str());

    let (status, json) = app.get("/api/routes/not-a-uuid", token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");

    let (status, json) = app.get("/api/points/123", token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");

    let (status, json) = app
        .delete(&format!("/api/points/route/{}/not-a-uuid", fleet.route_id), token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_route_creation_input_rules() {
    let fleet = Fleet::new().await;
    let app = &fleet.app;
    let token = Some(fleet.admin_token.as_str());

    let (status, json) = app
        .post("/api/routes", token, json!({ "name": "Linha", "busNumber": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (status, json) = app
        .post(
            "/api/routes",
            token,
            json!({ "name": "Linha Articulada", "busNumber": " 800 ", "maxCapacity": 250 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create route failed: {}", json);
    assert_eq!(json["data"]["route"]["busNumber"], "800");
    assert_eq!(json["data"]["route"]["maxCapacity"], 250);

    let (status, _) = app
        .post("/api/routes", token, json!({ "name": "Linha", "busNumber": "801", "maxCapacity": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn rate_limited_config(trust_proxy: bool) -> EnvironmentConfig {
    EnvironmentConfig {
        rate_limit_requests: 2,
        trust_proxy,
        ..EnvironmentConfig::default()
    }
}

#[tokio::test]
async fn test_rate_limit_per_client_address() {
    let app = TestApp::with_config(rate_limited_config(false));
    let uri = "/api/public/health";

    assert_eq!(app.get_from(uri, "192.0.2.1:40000", None).await, StatusCode::OK);
    assert_eq!(app.get_from(uri, "192.0.2.2:40000", None).await, StatusCode::OK);
    assert_eq!(app.get_from(uri, "192.0.2.3:40000", None).await, StatusCode::OK);

    // Otro puerto, misma IP: mismo cliente
    assert_eq!(app.get_from(uri, "192.0.2.1:40001", None).await, StatusCode::OK);
    assert_eq!(
        app.get_from(uri, "192.0.2.1:40002", None).await,
        StatusCode::TOO_MANY_REQUESTS
    );

    // Sin proxy de confianza, x-forwarded-for no abre una ventana nueva
    assert_eq!(
        app.get_from(uri, "192.0.2.1:40003", Some("203.0.113.9")).await,
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn test_rate_limit_behind_trusted_proxy() {
    let app = TestApp::with_config(rate_limited_config(true));
    let uri = "/api/public/health";
    let proxy = "10.0.0.1:8080";

    assert_eq!(app.get_from(uri, proxy, Some("203.0.113.1")).await, StatusCode::OK);
    assert_eq!(app.get_from(uri, proxy, Some("203.0.113.1")).await, StatusCode::OK);
    assert_eq!(
        app.get_from(uri, proxy, Some("203.0.113.1")).await,
        StatusCode::TOO_MANY_REQUESTS
    );

    assert_eq!(app.get_from(uri, proxy, Some("203.0.113.2")).await, StatusCode::OK);
}
