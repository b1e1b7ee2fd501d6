use battle_summary::combat::{Combatant, ObjectId};
use battle_summary::server::routes::route_request;
use battle_summary::server::AppState;
use battle_summary::store::{CombatantRegistry, MemoryAttributeStorage, SUMMARY_BLOCK_TAG};
use serde_json::{json, Value};

fn state() -> AppState {
    let registry = CombatantRegistry::from_combatants([
        Combatant::new(1, "Warrior", 0),
        Combatant::new(2, "Wizard", 0),
        Combatant::new(10, "Dragon", 3),
        Combatant::new(11, "Spectre", 1),
    ])
    .expect("unique ids");
    AppState::new(registry, Box::new(MemoryAttributeStorage::new()))
}

fn body_json(body: &str) -> Value {
    serde_json::from_str(body).expect("response should be valid json")
}

fn pairs(payload: &Value) -> Vec<(String, String)> {
    payload["records"]
        .as_array()
        .expect("records should be an array")
        .iter()
        .map(|r| {
            (
                r["attacker"]["name"].as_str().unwrap_or_default().to_string(),
                r["target"]["name"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

fn pair(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request(&state(), "GET", "/api/health", "");
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert!(response.body.contains("\"status\": \"ok\""));
}

#[test]
fn combatants_endpoint_lists_roster_by_id() {
    let response = route_request(&state(), "GET", "/api/combatants", "");
    assert_eq!(response.status_code, 200);
    let payload = body_json(&response.body);
    let ids: Vec<u64> = payload
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|c| c["id"].as_u64())
        .collect();
    assert_eq!(ids, [1, 2, 10, 11]);
}

#[test]
fn unknown_owner_has_empty_summary() {
    let response = route_request(&state(), "GET", "/api/summaries/55", "");
    assert_eq!(response.status_code, 200);
    let payload = body_json(&response.body);
    assert_eq!(payload["owner"], 55);
    assert_eq!(payload["ranking"], "sequence");
    assert_eq!(payload["records"].as_array().map(Vec::len), Some(0));
}

#[test]
fn put_then_get_returns_grouped_report() {
    let state = state();
    let body = r#"{"round":3,"attacks":[
        {"attacker":1,"target":10},
        {"attacker":2,"target":11},
        {"attacker":1,"target":11}
    ]}"#;
    let response = route_request(&state, "PUT", "/api/summaries/7", body);
    assert_eq!(response.status_code, 200);
    assert_eq!(
        pairs(&body_json(&response.body)),
        [pair("Warrior", "Dragon"), pair("Warrior", "Spectre"), pair("Wizard", "Spectre")]
    );

    let response = route_request(&state, "GET", "/api/summaries/7", "");
    assert_eq!(response.status_code, 200);
    let payload = body_json(&response.body);
    assert_eq!(
        pairs(&payload),
        [pair("Warrior", "Dragon"), pair("Warrior", "Spectre"), pair("Wizard", "Spectre")]
    );
    let sequences: Vec<u64> = payload["records"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["sequence"].as_u64())
        .collect();
    assert_eq!(sequences, [0, 1, 2]);
}

#[test]
fn get_with_target_index_ranking_reorders() {
    let state = state();
    let body = r#"{"attacks":[{"attacker":1,"target":10},{"attacker":2,"target":11}]}"#;
    assert_eq!(route_request(&state, "PUT", "/api/summaries/7", body).status_code, 200);

    let response = route_request(&state, "GET", "/api/summaries/7?rank=target_index", "");
    assert_eq!(response.status_code, 200);
    let payload = body_json(&response.body);
    assert_eq!(payload["ranking"], "target_index");
    assert_eq!(
        pairs(&payload),
        [pair("Wizard", "Spectre"), pair("Warrior", "Dragon")]
    );
}

#[test]
fn put_with_unknown_combatant_is_bad_request_and_keeps_old_summary() {
    let state = state();
    let ok = r#"{"attacks":[{"attacker":1,"target":10}]}"#;
    assert_eq!(route_request(&state, "PUT", "/api/summaries/7", ok).status_code, 200);

    let bad = r#"{"attacks":[{"attacker":1,"target":404}]}"#;
    let response = route_request(&state, "PUT", "/api/summaries/7", bad);
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("unknown combatant 404"));

    let payload = body_json(&route_request(&state, "GET", "/api/summaries/7", "").body);
    assert_eq!(pairs(&payload), [pair("Warrior", "Dragon")]);
}

#[test]
fn malformed_body_is_bad_request() {
    let response = route_request(&state(), "PUT", "/api/summaries/7", "{not json");
    assert_eq!(response.status_code, 400);
    assert_eq!(body_json(&response.body)["status"], "error");
}

#[test]
fn corrupt_storage_is_reported_not_masked() {
    let state = state();
    {
        let mut storage = state.storage.lock().expect("lock");
        storage
            .write_block(
                ObjectId(7),
                SUMMARY_BLOCK_TAG,
                json!({"attackers": ["1", "2", "1"], "targets": ["10", "11"]}),
            )
            .expect("write");
    }
    let response = route_request(&state, "GET", "/api/summaries/7", "");
    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("corrupt"));
}

#[test]
fn delete_clears_summary() {
    let state = state();
    let body = r#"{"attacks":[{"attacker":1,"target":10}]}"#;
    route_request(&state, "PUT", "/api/summaries/7", body);

    let response = route_request(&state, "DELETE", "/api/summaries/7", "");
    assert_eq!(response.status_code, 200);
    assert_eq!(body_json(&response.body)["removed"], true);

    let response = route_request(&state, "DELETE", "/api/summaries/7", "");
    assert_eq!(body_json(&response.body)["removed"], false);
}

#[test]
fn bad_owner_and_unknown_routes() {
    let state = state();
    assert_eq!(route_request(&state, "GET", "/api/summaries/abc", "").status_code, 400);
    assert_eq!(
        route_request(&state, "GET", "/api/summaries/7?rank=damage", "").status_code,
        400
    );
    assert_eq!(route_request(&state, "POST", "/api/summaries/7", "").status_code, 405);
    assert_eq!(route_request(&state, "GET", "/api/nothing", "").status_code, 404);
}
