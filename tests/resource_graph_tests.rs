//! Integration tests for lazy loading, caching and embedding.
//!
//! These tests run the resource graph against a wiremock server and count
//! round trips to verify when the graph does and does not talk to the
//! server.

use ambari_api::rest::FetchState;
use ambari_api::{Ambari, AmbariConfig, Credentials, ResourceError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, Ambari) {
    let server = MockServer::start().await;
    let config = AmbariConfig::builder()
        .host(server.uri())
        .credentials(Credentials::new("admin", "admin").unwrap())
        .build()
        .unwrap();
    let ambari = Ambari::new(&config).unwrap();
    (server, ambari)
}

async fn requests_to(server: &MockServer, target: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == target)
        .count()
}

async fn total_requests(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

fn user_body(embedded_privileges: serde_json::Value) -> serde_json::Value {
    json!({
        "href": "http://ambari/api/v1/users/admin",
        "Users": {"user_name": "admin", "active": true, "admin": true, "ldap_user": false},
        "privileges": embedded_privileges
    })
}

// ============================================================================
// Lazy Loading
// ============================================================================

#[tokio::test]
async fn test_indexing_never_fetches() {
    let (server, ambari) = setup().await;

    let admin = ambari.users().get("admin");
    let _hosts = ambari.clusters().get("c1").relationship("hosts").unwrap();

    assert_eq!(admin.fetch_state(), FetchState::Unloaded);
    assert_eq!(total_requests(&server).await, 0);
}

#[tokio::test]
async fn test_listed_reference_loads_on_first_attribute() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": "http://ambari/api/v1/users",
            "items": [{"href": "http://ambari/api/v1/users/admin"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(json!([]))))
        .mount(&server)
        .await;

    let users = ambari.users();
    let listed = users.list().await.unwrap();
    assert_eq!(listed.len(), 1);

    let admin = users.get("admin");
    assert!(admin.ptr_eq(&listed[0]));
    assert_eq!(admin.fetch_state(), FetchState::Unloaded);

    assert_eq!(admin.attribute("user_name").await.unwrap(), json!("admin"));
    assert_eq!(admin.fetch_state(), FetchState::Loaded);
    assert_eq!(requests_to(&server, "/api/v1/users/admin").await, 1);
}

#[tokio::test]
async fn test_cached_attributes_never_refetch() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(json!([]))))
        .mount(&server)
        .await;

    let admin = ambari.users().get("admin");
    for _ in 0..3 {
        assert_eq!(admin.attribute("active").await.unwrap(), json!(true));
        assert_eq!(admin.attribute("ldap_user").await.unwrap(), json!(false));
    }
    let is_admin: bool = admin.attribute_as("admin").await.unwrap();
    assert!(is_admin);

    assert_eq!(total_requests(&server).await, 1);
}

#[tokio::test]
async fn test_missing_field_fetches_exactly_once() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(json!([]))))
        .mount(&server)
        .await;

    let admin = ambari.users().get("admin");
    let error = admin.attribute("no_such_field").await.unwrap_err();

    assert!(matches!(
        error,
        ResourceError::FieldNotFound { ref field, ref path, .. }
            if field == "no_such_field" && path == "users/admin"
    ));
    assert_eq!(total_requests(&server).await, 1);
}

#[tokio::test]
async fn test_concurrent_misses_share_one_fetch() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/admin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_body(json!([])))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    let first = ambari.users().get("admin");
    let second = ambari.users().get("admin");
    let (a, b) = tokio::join!(first.attribute("user_name"), second.attribute("active"));

    assert_eq!(a.unwrap(), json!("admin"));
    assert_eq!(b.unwrap(), json!(true));
    assert_eq!(total_requests(&server).await, 1);
}

// ============================================================================
// Identity Stability
// ============================================================================

#[tokio::test]
async fn test_listing_reuses_known_nodes_and_lists_once() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/c1/hosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": "http://ambari/api/v1/clusters/c1/hosts",
            "items": [
                {"href": "http://ambari/api/v1/clusters/c1/hosts/h1", "Hosts": {"cluster_name": "c1", "host_name": "h1"}},
                {"href": "http://ambari/api/v1/clusters/c1/hosts/h2", "Hosts": {"cluster_name": "c1", "host_name": "h2"}}
            ]
        })))
        .mount(&server)
        .await;

    let hosts = ambari.clusters().get("c1").relationship("hosts").unwrap();
    let h1 = hosts.get("h1");

    let listed = hosts.list().await.unwrap();
    let again = hosts.list().await.unwrap();

    assert_eq!(listed.len(), 2);
    assert!(listed[0].ptr_eq(&h1));
    assert!(again[1].ptr_eq(&listed[1]));
    assert_eq!(h1.cached("host_name"), Some(json!("h1")));
    assert_eq!(total_requests(&server).await, 1);
}

#[tokio::test]
async fn test_refresh_relists_without_dropping_members() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"href": "http://ambari/api/v1/users/admin"}]
        })))
        .mount(&server)
        .await;

    let users = ambari.users();
    let bob = users.get("bob");
    let members = users.refresh().await.unwrap();
    users.refresh().await.unwrap();

    assert_eq!(members.len(), 2);
    assert!(members[0].ptr_eq(&bob));
    assert_eq!(total_requests(&server).await, 2);
}

// ============================================================================
// Embedding
// ============================================================================

#[tokio::test]
async fn test_embedded_children_need_no_further_fetch() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": "http://ambari/api/v1/clusters/c1",
            "Clusters": {"cluster_name": "c1", "version": "HDP-2.6"},
            "hosts": [
                {"href": "http://ambari/api/v1/clusters/c1/hosts/h1", "Hosts": {"cluster_name": "c1", "host_name": "h1", "cpu_count": 8}}
            ],
            "services": [
                {"href": "http://ambari/api/v1/clusters/c1/services/HDFS", "ServiceInfo": {"cluster_name": "c1", "service_name": "HDFS"}}
            ]
        })))
        .mount(&server)
        .await;

    let cluster = ambari.clusters().get("c1");
    assert_eq!(cluster.attribute("version").await.unwrap(), json!("HDP-2.6"));

    let hosts = cluster.relationship("hosts").unwrap();
    assert!(hosts.is_listed());
    let listed = hosts.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].attribute("cpu_count").await.unwrap(), json!(8));

    let services = cluster.relationship("services").unwrap();
    assert_eq!(
        services.get("HDFS").attribute("service_name").await.unwrap(),
        json!("HDFS")
    );

    assert_eq!(total_requests(&server).await, 1);
}

#[tokio::test]
async fn test_privilege_attribute_not_embedded_costs_one_more_fetch() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(json!([
            {
                "href": "http://ambari/api/v1/users/admin/privileges/1",
                "PrivilegeInfo": {"privilege_id": 1, "user_name": "admin"}
            }
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/admin/privileges/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": "http://ambari/api/v1/users/admin/privileges/1",
            "PrivilegeInfo": {
                "privilege_id": 1,
                "permission_name": "AMBARI.ADMINISTRATOR",
                "principal_name": "admin",
                "principal_type": "USER",
                "type": "AMBARI",
                "user_name": "admin"
            }
        })))
        .mount(&server)
        .await;

    let admin = ambari.users().get("admin");
    admin.inflate().await.unwrap();
    let privilege = admin.relationship("privileges").unwrap().get("1");

    assert_eq!(
        privilege.attribute("permission_name").await.unwrap(),
        json!("AMBARI.ADMINISTRATOR")
    );
    assert_eq!(total_requests(&server).await, 2);
    assert_eq!(requests_to(&server, "/api/v1/users/admin/privileges/1").await, 1);
}

#[tokio::test]
async fn test_embedded_privilege_id_costs_nothing() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(json!([
            {
                "href": "http://ambari/api/v1/users/admin/privileges/1",
                "PrivilegeInfo": {"privilege_id": 1, "user_name": "admin"}
            }
        ]))))
        .mount(&server)
        .await;

    let admin = ambari.users().get("admin");
    admin.attribute("user_name").await.unwrap();
    let privilege = admin.relationship("privileges").unwrap().get("1");

    assert_eq!(privilege.attribute("privilege_id").await.unwrap(), json!(1));
    assert_eq!(privilege.fetch_state(), FetchState::Unloaded);
    assert_eq!(total_requests(&server).await, 1);
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "message": "The requested resource doesn't exist: User not found, ghost"
        })))
        .mount(&server)
        .await;

    let error = ambari
        .users()
        .get("ghost")
        .attribute("user_name")
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ResourceError::NotFound { resource: "User", ref path } if path == "users/ghost"
    ));
    assert_eq!(error.status_code(), Some(404));
}

#[tokio::test]
async fn test_refused_listing_is_method_not_allowed_and_not_retried() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/actions"))
        .respond_with(ResponseTemplate::new(405).set_body_json(json!({
            "status": 405,
            "message": "Method Not Allowed"
        })))
        .mount(&server)
        .await;

    let error = ambari.actions().list().await.unwrap_err();

    assert!(matches!(error, ResourceError::MethodNotAllowed { ref path, .. } if path == "actions"));
    assert_eq!(total_requests(&server).await, 1);
}

#[tokio::test]
async fn test_server_errors_carry_status_and_message() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/c1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": 500,
            "message": "Server Error"
        })))
        .mount(&server)
        .await;

    let error = ambari.clusters().get("c1").refresh().await.unwrap_err();

    assert_eq!(error.status_code(), Some(500));
    assert!(error.to_string().contains("Server Error"));
    assert!(error.to_string().contains("clusters/c1"));
}

#[tokio::test]
async fn test_unknown_relationship_is_rejected_locally() {
    let (server, ambari) = setup().await;

    let error = ambari.users().get("admin").relationship("widgets").unwrap_err();

    assert!(matches!(error, ResourceError::UnknownRelationship { resource: "User", .. }));
    assert_eq!(total_requests(&server).await, 0);
}

// ============================================================================
// Transport Headers
// ============================================================================

#[tokio::test]
async fn test_requests_carry_auth_and_requested_by_headers() {
    let (server, ambari) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters"))
        .and(header("X-Requested-By", "ambari-api-rust"))
        .and(header("Authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let clusters = ambari.clusters().list().await.unwrap();
    assert!(clusters.is_empty());
}
