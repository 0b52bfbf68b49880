// Model serialization tests (JSON camelCase, lowercase state)

use devboard::models::*;

#[test]
fn test_container_record_serialization() {
    let c = ContainerRecord {
        id: "abc123".into(),
        name: "web".into(),
        image: "nginx:latest".into(),
        status: "Up 2 hours".into(),
        state: ContainerState::Running,
        ports: vec![PortBinding {
            host: None,
            container: 443,
            protocol: "tcp".into(),
        }],
        created: "2026-10-01 10:00:00 +0000 UTC".into(),
        cpu: Some("0.50%".into()),
        memory: None,
    };
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["state"], "running");
    assert!(json["ports"][0]["host"].is_null());
    assert!(json["memory"].is_null());
    let back: ContainerRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, c);
}

#[test]
fn test_container_state_from_runtime_text() {
    assert_eq!(ContainerState::from_docker("running"), ContainerState::Running);
    assert_eq!(ContainerState::from_docker("Exited"), ContainerState::Exited);
    assert_eq!(ContainerState::from_docker("paused"), ContainerState::Paused);
    for other in ["created", "restarting", "dead", "removing", ""] {
        assert_eq!(ContainerState::from_docker(other), ContainerState::Other);
    }
    assert_eq!(serde_json::to_string(&ContainerState::Other).unwrap(), "\"other\"");
    let parsed: ContainerState = serde_json::from_str("\"restarting\"").unwrap();
    assert_eq!(parsed, ContainerState::Other);
}

#[test]
fn test_listening_port_camel_case() {
    let mut p = ListeningPort::new(5432, "127.0.0.1".into(), 411, "postgres".into());
    p.start_time = Some("2026-10-18T09:15:42+00:00".into());
    let json = serde_json::to_string(&p).unwrap();
    assert!(json.contains("\"localAddress\":\"127.0.0.1\""));
    assert!(json.contains("\"startTime\""));
    assert!(json.contains("\"protocol\":\"TCP\""));
}

#[test]
fn test_git_repo_status_camel_case() {
    let r = GitRepoStatus {
        path: "/work/app".into(),
        name: "app".into(),
        branch: "main".into(),
        dirty: true,
        uncommitted_count: 3,
        unpushed_count: 1,
        behind_count: 0,
    };
    let json = serde_json::to_string(&r).unwrap();
    assert!(json.contains("\"uncommittedCount\":3"));
    assert!(json.contains("\"unpushedCount\":1"));
    assert!(json.contains("\"behindCount\":0"));
}

#[test]
fn test_repo_display_name() {
    assert_eq!(repo_display_name("/home/dev/Developer/app"), "app");
    assert_eq!(repo_display_name("/home/dev/tools/"), "tools");
    assert_eq!(repo_display_name("/"), "/");
}

#[test]
fn test_git_attention_order() {
    let repo = |name: &str, dirty: bool| GitRepoStatus {
        path: format!("/work/{name}"),
        name: name.into(),
        branch: "main".into(),
        dirty,
        uncommitted_count: u32::from(dirty),
        unpushed_count: 0,
        behind_count: 0,
    };
    let mut repos = vec![repo("beta", false), repo("Zeta", true), repo("alpha", true), repo("Alpha", false)];
    repos.sort_by(GitRepoStatus::attention_order);
    let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "Zeta", "Alpha", "beta"]);
}

#[test]
fn test_dev_process_pattern_match() {
    let p = DevProcess {
        pid: 7,
        name: "bash".into(),
        command: "go run ./cmd/api".into(),
        cpu: 0.0,
        memory: 0.0,
        cwd: None,
    };
    assert!(p.matches_any(&["go run".to_string()]));
    assert!(!p.matches_any(&["Go run".to_string(), "node".to_string()]));
}

#[test]
fn test_empty_snapshot_serialization() {
    let json = serde_json::to_value(Snapshot::default()).unwrap();
    for key in ["containers", "ports", "processes", "git"] {
        assert_eq!(json[key]["items"], serde_json::json!([]));
        assert_eq!(json[key]["status"]["refreshCount"], 0);
        assert!(json[key]["status"]["lastError"].is_null());
    }
}
