//! CLI integration tests
//!
//! Drives the binary end to end with assert_cmd. Sessions use the file
//! backend, so each invocation reopens the same store.

mod common;

use predicates::prelude::*;

use common::{Workspace, SMALL_ARCHETYPES, SMALL_SCENARIOS};

// ─────────────────────────────────────────────────────────────────
// Help and Version
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    Workspace::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("roles"))
        .stdout(predicate::str::contains("catalog"))
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command() {
    Workspace::new()
        .cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("startup-simulator"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ─────────────────────────────────────────────────────────────────
// Roles and Catalog
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_roles_listing() {
    let ws = Workspace::new();

    let roles = ws.json(&["roles"]);
    let ids: Vec<_> = roles.as_array().unwrap().iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec!["engineer", "product_manager", "founder"]);
    assert!(roles[0].get("name").is_none());

    let detailed = ws.json(&["roles", "--details"]);
    assert_eq!(detailed[1]["name"], "Product Manager");
    assert!(detailed[0]["description"].is_string());
}

#[test]
fn test_catalog_scenarios_in_order() {
    let scenarios = Workspace::new().json(&["catalog", "scenarios", "engineer"]);
    let scenarios = scenarios.as_array().unwrap();

    assert_eq!(scenarios.len(), 5);
    for (i, scenario) in scenarios.iter().enumerate() {
        assert_eq!(scenario["id"], format!("engineer_scenario_{}", i + 1));
        assert_eq!(scenario["choices"].as_array().unwrap().len(), 4);
    }
}

#[test]
fn test_catalog_role_without_data_is_empty() {
    let ws = Workspace::new();
    assert_eq!(ws.json(&["catalog", "scenarios", "founder"]), serde_json::json!([]));
    assert_eq!(ws.json(&["catalog", "archetypes", "product-manager"]), serde_json::json!([]));
}

#[test]
fn test_catalog_archetypes() {
    let archetypes = Workspace::new().json(&["catalog", "archetypes", "engineer"]);
    let names: Vec<_> = archetypes
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 6);
    assert!(names.contains(&"The Craftsman".to_string()));
}

#[test]
fn test_catalog_unknown_role_is_usage_error() {
    Workspace::new()
        .cmd()
        .args(["catalog", "scenarios", "marketer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown role"));
}

#[test]
fn test_malformed_catalog_is_internal_error() {
    let ws = Workspace::new();
    ws.write_catalog("scenarios", "engineer", "[{ broken");

    ws.cmd()
        .arg("--data-dir")
        .arg(ws.catalog_dir())
        .args(["catalog", "scenarios", "engineer"])
        .assert()
        .failure()
        .code(50)
        .stderr(predicate::str::contains("E501"));
}

// ─────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_create_session() {
    let ws = Workspace::new();
    let created = ws.json(&["session", "create", "engineer"]);

    assert_eq!(created["role"], "engineer");
    assert_eq!(created["total_scenarios"], 5);
    assert_eq!(created["first_scenario"]["id"], "engineer_scenario_1");

    let session_id = created["session_id"].as_str().unwrap();
    assert!(ws.session_dir().join(format!("{}.json", session_id)).exists());
}

#[test]
fn test_full_session_across_invocations() {
    let ws = Workspace::new();
    let id = ws.create_session("engineer");

    for n in 1..=5 {
        let scenario = format!("engineer_scenario_{}", n);
        let choice = format!("engineer_{}_choice_1", n);
        let outcome = ws.json(&["session", "submit", &id, &scenario, &choice]);

        assert_eq!(outcome["scenarios_completed"], n);
        assert_eq!(outcome["total_scenarios"], 5);
        assert_eq!(outcome["is_complete"], n == 5);
        if n < 5 {
            assert_eq!(outcome["next_scenario"]["id"], format!("engineer_scenario_{}", n + 1));
        } else {
            assert!(outcome["next_scenario"].is_null());
        }
    }

    let state = ws.json(&["session", "state", &id]);
    assert_eq!(state["is_complete"], true);
    assert!(state["current_scenario"].is_null());

    // Stored automatically when the last answer came in
    let stored = ws.json(&["session", "stored-profile", &id]);
    assert_eq!(stored["archetype"]["id"], "engineer_firefighter");
    assert_eq!(stored["score"], 6);
    assert_eq!(stored["coverage"], 1.0);

    let traits = ws.json(&["session", "traits", &id]);
    assert_eq!(traits["speed_focused"], 3);
    assert_eq!(traits["long_term"], 1);

    let report = ws.json(&["session", "profile", &id, "--report"]);
    let report = report.as_array().unwrap();
    assert_eq!(report.len(), 6);
    assert_eq!(report[0]["archetype"]["id"], "engineer_firefighter");
    assert_eq!(report[1]["archetype"]["id"], "engineer_pragmatist");
}

#[test]
fn test_invalid_choice_rejected() {
    let ws = Workspace::new();
    let id = ws.create_session("engineer");

    ws.cmd()
        .args(["session", "submit", &id, "engineer_scenario_1", "not_a_choice"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("Invalid choice"))
        .stderr(predicate::str::contains("catalog scenarios"));

    let state = ws.json(&["session", "state", &id]);
    assert_eq!(state["scenarios_completed"], 0);
    assert_eq!(state["current_scenario"]["id"], "engineer_scenario_1");
}

#[test]
fn test_duplicate_answer_rejected() {
    let ws = Workspace::new();
    let id = ws.create_session("engineer");
    ws.json(&["session", "submit", &id, "engineer_scenario_1", "engineer_1_choice_1"]);

    ws.cmd()
        .args(["session", "submit", &id, "engineer_scenario_1", "engineer_1_choice_2"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("already been answered"));

    assert_eq!(ws.json(&["session", "state", &id])["scenarios_completed"], 1);
}

#[test]
fn test_skipping_ahead_rejected() {
    let ws = Workspace::new();
    let id = ws.create_session("engineer");

    ws.cmd()
        .args(["session", "submit", &id, "engineer_scenario_2", "engineer_2_choice_1"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("E404"))
        .stderr(predicate::str::contains("expected engineer_scenario_1"));

    let state = ws.json(&["session", "state", &id]);
    assert_eq!(state["scenarios_completed"], 0);
    assert_eq!(state["current_scenario"]["id"], "engineer_scenario_1");
}

#[test]
fn test_unknown_scenario() {
    let ws = Workspace::new();
    let id = ws.create_session("engineer");

    ws.cmd()
        .args(["session", "submit", &id, "engineer_scenario_42", "engineer_1_choice_1"])
        .assert()
        .failure()
        .code(30);
}

#[test]
fn test_unknown_session() {
    Workspace::new()
        .cmd()
        .args(["session", "state", "00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_disabled_role_rejected() {
    Workspace::new()
        .cmd()
        .args(["session", "create", "founder"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("not yet supported"));
}

#[test]
fn test_profile_before_any_response() {
    let ws = Workspace::new();
    let id = ws.create_session("engineer");

    ws.cmd()
        .args(["session", "profile", &id])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("No profile available"));

    ws.cmd()
        .args(["session", "stored-profile", &id])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("not generated yet"));
}

#[test]
fn test_profile_mid_session_is_stored() {
    let ws = Workspace::new();
    let id = ws.create_session("engineer");
    ws.json(&["session", "submit", &id, "engineer_scenario_1", "engineer_1_choice_1"]);

    let profile = ws.json(&["session", "profile", &id]);
    assert_eq!(profile["archetype"]["id"], "engineer_craftsman");
    assert_eq!(profile["score"], 2);
    assert_eq!(profile["coverage"], 0.5);

    assert_eq!(ws.json(&["session", "stored-profile", &id]), profile);
}

#[test]
fn test_memory_backend_does_not_persist() {
    let ws = Workspace::new();
    let created = ws.json(&["--backend", "memory", "session", "create", "engineer"]);
    let id = created["session_id"].as_str().unwrap();

    ws.cmd()
        .args(["--backend", "memory", "session", "state", id])
        .assert()
        .failure()
        .code(30);
    assert!(!ws.session_dir().exists());
}

#[test]
fn test_directory_catalog_two_scenarios() {
    let ws = Workspace::new();
    ws.write_catalog("scenarios", "engineer", SMALL_SCENARIOS);
    ws.write_catalog("archetypes", "engineer", SMALL_ARCHETYPES);
    let data_dir = ws.catalog_dir().to_string_lossy().to_string();

    let created = ws.json(&["--data-dir", &data_dir, "session", "create", "engineer"]);
    assert_eq!(created["total_scenarios"], 2);
    assert_eq!(created["first_scenario"]["id"], "s1");
    let id = created["session_id"].as_str().unwrap();

    ws.json(&["--data-dir", &data_dir, "session", "submit", id, "s1", "s1_a"]);
    let last = ws.json(&["--data-dir", &data_dir, "session", "submit", id, "s2", "s2_a"]);
    assert!(last["next_scenario"].is_null());
    assert_eq!(last["scenarios_completed"], 2);
    assert_eq!(last["is_complete"], true);

    let profile = ws.json(&["--data-dir", &data_dir, "session", "stored-profile", id]);
    assert_eq!(profile["archetype"]["id"], "craftsman");
    assert_eq!(profile["score"], 4);
    assert_eq!(profile["coverage"], 1.0);
    assert_eq!(profile["missing_traits"], serde_json::json!([]));
}
