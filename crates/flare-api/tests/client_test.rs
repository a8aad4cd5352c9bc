#![allow(clippy::unwrap_used)]
// Integration tests for `FlareClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flare_api::{Error, FlareClient, Record, TransportConfig};

const TOKEN: &str = "a1b2c3d4-e5f6";
const DPID: &str = "00:00:00:00:00:00:00:02";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, FlareClient) {
    let server = MockServer::start().await;
    let client = FlareClient::with_token(
        &server.uri(),
        TOKEN.to_string().into(),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_acquires_and_uses_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sdn/v2.0/auth"))
        .and(body_json(json!({
            "login": { "user": "sdn", "password": "skyline" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "record": {
                "token": "fresh-token",
                "expirationDate": 1_700_000_000_000_i64,
                "userName": "sdn"
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/net/links"))
        .and(header("X-Auth-Token", "fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "links": [] })))
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "skyline".to_string().into();
    let client = FlareClient::login(&server.uri(), "sdn", &password, &TransportConfig::default())
        .await
        .unwrap();

    let links = client.get_links().await.unwrap();
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_login_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sdn/v2.0/auth"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let password: secrecy::SecretString = "wrong".to_string().into();
    let result =
        FlareClient::login(&server.uri(), "sdn", &password, &TransportConfig::default()).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_logout_releases_token() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/sdn/v2.0/auth/{TOKEN}")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_logout_with_expired_token_is_an_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/sdn/v2.0/auth/{TOKEN}")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.logout().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_expired_token_is_an_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_links().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Dispatcher tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_token_header_attached() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/net/clusters"))
        .and(header("X-Auth-Token", TOKEN))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "clusters": [{ "uid": "cluster-1" }] })),
        )
        .mount(&server)
        .await;

    let clusters = client.get_clusters().await.unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].get("uid").unwrap().as_str(), Some("cluster-1"));
}

#[tokio::test]
async fn test_not_found_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such datapath"))
        .mount(&server)
        .await;

    let err = client.get_datapath_detail(DPID).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
    match err {
        Error::Controller { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such datapath");
        }
        other => panic!("expected Controller error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_has_no_status() {
    // Nothing listens on the discard port.
    let client = FlareClient::with_token(
        "http://127.0.0.1:9",
        TOKEN.to_string().into(),
        &TransportConfig::default(),
    )
    .unwrap();

    let err = client.get_links().await.unwrap_err();

    assert_eq!(err.status(), None);
    assert!(!err.is_not_found());
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_empty_body_reads_as_empty_object() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sdn/v2.0/lldp"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let ports: Record = serde_json::from_value(json!({
        "lldp_suppressed": [{ "dpid": DPID, "port": 2 }]
    }))
    .unwrap();
    client.set_lldp(&ports).await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_a_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/net/links"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.get_links().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Query assembly tests ────────────────────────────────────────────

#[tokio::test]
async fn test_arps_with_vid_only() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/net/arps"))
        .and(query_param("vid", "10"))
        .and(query_param_is_missing("ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "arps": [] })))
        .mount(&server)
        .await;

    client.get_arps(Some("10"), None).await.unwrap();
}

#[tokio::test]
async fn test_arps_with_vid_and_ip() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/net/arps"))
        .and(query_param("vid", "10"))
        .and(query_param("ip", "1.2.3.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "arps": [] })))
        .mount(&server)
        .await;

    client.get_arps(Some("10"), Some("1.2.3.4")).await.unwrap();
}

#[tokio::test]
async fn test_arps_without_filters_sends_no_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/net/arps"))
        .and(query_param_is_missing("vid"))
        .and(query_param_is_missing("ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "arps": [] })))
        .mount(&server)
        .await;

    client.get_arps(None, None).await.unwrap();
}

#[tokio::test]
async fn test_nodes_with_dpid_and_port() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/net/nodes"))
        .and(query_param("dpid", DPID))
        .and(query_param("port", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nodes": [] })))
        .mount(&server)
        .await;

    client
        .get_nodes(None, None, Some(DPID), Some(3))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_forward_path_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/paths/forward"))
        .and(query_param("src_dpid", "00:00:00:00:00:00:00:01"))
        .and(query_param("dst_dpid", DPID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path": [{ "dpid": "00:00:00:00:00:00:00:01" }, { "dpid": DPID }]
        })))
        .mount(&server)
        .await;

    let hops = client
        .get_forward_path("00:00:00:00:00:00:00:01", DPID)
        .await
        .unwrap();
    assert_eq!(hops.len(), 2);
}

// ── OpenFlow tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_datapaths() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/of/datapaths"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "datapaths": [
                { "dpid": DPID, "negotiated_version": "1.3.0" }
            ]
        })))
        .mount(&server)
        .await;

    let datapaths = client.get_datapaths().await.unwrap();
    assert_eq!(datapaths.len(), 1);
    assert_eq!(datapaths[0].get("dpid").unwrap().as_str(), Some(DPID));
}

#[tokio::test]
async fn test_get_datapath_detail_dpid_in_path() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/sdn/v2.0/of/datapaths/{DPID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "datapath": { "dpid": DPID, "num_buffers": 256 }
        })))
        .mount(&server)
        .await;

    let datapath = client.get_datapath_detail(DPID).await.unwrap();
    assert_eq!(datapath.get("num_buffers").unwrap().as_i64(), Some(256));
}

#[tokio::test]
async fn test_get_flows_and_membership_check() {
    let (server, client) = setup().await;

    let flow = json!({
        "priority": 30000,
        "idle_timeout": 30,
        "match": [{ "eth_type": "ipv4" }, { "ipv4_src": "10.0.0.1" }],
        "actions": [{ "output": 6 }]
    });

    Mock::given(method("GET"))
        .and(path(format!("/sdn/v2.0/of/datapaths/{DPID}/flows")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "flows": [flow.clone()] })),
        )
        .mount(&server)
        .await;

    let expected = Record::from(flow);
    let flows = client.get_flows(DPID).await.unwrap();

    // Structural equality lets callers test membership by value.
    assert!(flows.contains(&expected));
}

#[tokio::test]
async fn test_add_flow_wraps_body() {
    let (server, client) = setup().await;

    let flow_value = json!({ "priority": 30000, "actions": [{ "output": 6 }] });

    Mock::given(method("POST"))
        .and(path(format!("/sdn/v2.0/of/datapaths/{DPID}/flows")))
        .and(body_json(json!({ "flow": flow_value.clone() })))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let flow = Record::from(flow_value);
    client.add_flow(DPID, &flow).await.unwrap();
}

#[tokio::test]
async fn test_delete_flows_sends_body() {
    let (server, client) = setup().await;

    let flow_value = json!({ "priority": 30000 });

    Mock::given(method("DELETE"))
        .and(path(format!("/sdn/v2.0/of/datapaths/{DPID}/flows")))
        .and(body_json(json!({ "flows": [flow_value.clone()] })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let flows = vec![Record::from(flow_value)];
    client.delete_flows(DPID, &flows).await.unwrap();
}

#[tokio::test]
async fn test_group_stats_query_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/of/stats/groups"))
        .and(query_param("dpid", DPID))
        .and(query_param("group_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "group_stats": [{ "group_id": 7, "packet_count": 42 }]
        })))
        .mount(&server)
        .await;

    let stats = client.get_group_stats(DPID, Some(7)).await.unwrap();
    assert!(stats.contains("group_stats"));
}

#[tokio::test]
async fn test_missing_envelope_key_is_field_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sdn/v2.0/of/datapaths"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "hi" })))
        .mount(&server)
        .await;

    let result = client.get_datapaths().await;
    match result {
        Err(Error::FieldNotFound { ref field }) => assert_eq!(field, "datapaths"),
        other => panic!("expected FieldNotFound, got: {other:?}"),
    }
}
