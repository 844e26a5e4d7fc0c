use super::*;
use std::collections::HashMap;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.get_pages_dir(), PathBuf::from(DEFAULT_PAGES_DIR));
    assert_eq!(config.get_page_title(), DEFAULT_PAGE_TITLE);
    assert_eq!(config.get_title(), DEFAULT_TITLE);
    assert!(config.get_agent("anything.py").is_none());
}

#[test]
fn test_catalogue_config_defaults() {
    let catalogue = Config::default().get_catalogue();
    assert_eq!(catalogue.separator, DEFAULT_SEPARATOR);
    assert_eq!(catalogue.extensions, vec!["py"]);
    assert_eq!(
        catalogue.excluded_files,
        DEFAULT_EXCLUDED_FILES
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_chat_config_defaults() {
    let chat = Config::default().get_chat();
    assert_eq!(chat.timeout_secs, DEFAULT_CHAT_TIMEOUT_SECS);
    assert_eq!(chat.typewriter_speed, DEFAULT_TYPEWRITER_SPEED);
    assert!(!chat.verify_tls);
    assert_eq!(chat.timeout().as_secs(), 300);
}

#[test]
fn test_parse_camel_case_config() {
    let json = r#"{
        "pagesDir": "/srv/portal/pages",
        "pageTitle": "Demo Portal",
        "chat": { "typewriterSpeed": 0 },
        "catalogue": { "extensions": ["py", "rs"] },
        "agents": {
            "2_🤓_Expert_Support.py": {
                "url": "https://example.com/agent",
                "bearerToken": "secret",
                "timeoutSecs": 30
            }
        }
    }"#;

    let config = parse_config(json).unwrap();
    assert_eq!(config.get_pages_dir(), PathBuf::from("/srv/portal/pages"));
    assert_eq!(config.get_page_title(), "Demo Portal");
    // Title falls back independently of pageTitle
    assert_eq!(config.get_title(), DEFAULT_TITLE);

    let chat = config.get_chat();
    assert_eq!(chat.typewriter_speed, 0);
    // Missing fields inside a present section still default
    assert_eq!(chat.timeout_secs, DEFAULT_CHAT_TIMEOUT_SECS);

    let catalogue = config.get_catalogue();
    assert_eq!(catalogue.extensions, vec!["py", "rs"]);
    assert_eq!(catalogue.separator, '_');

    let agent = config.get_agent("2_🤓_Expert_Support.py").unwrap();
    assert_eq!(agent.url, "https://example.com/agent");
    assert_eq!(agent.resolve_token(), Some("secret".to_string()));
    assert_eq!(agent.timeout_secs, Some(30));
}

#[test]
fn test_agent_without_url_is_rejected() {
    let json = r#"{ "agents": { "1_a_b.py": { "bearerToken": "x" } } }"#;
    assert!(parse_config(json).is_err());
}

#[test]
fn test_token_from_named_env_var() {
    let var = "AGENT_PORTAL_TEST_TOKEN_FROM_ENV";
    std::env::set_var(var, "from-env");
    let agent = AgentConfig {
        url: "https://example.com".into(),
        bearer_token: None,
        bearer_token_env: Some(var.into()),
        timeout_secs: None,
        typewriter_speed: None,
    };
    assert_eq!(agent.resolve_token(), Some("from-env".to_string()));
    std::env::remove_var(var);
    assert_eq!(agent.resolve_token(), None);
}

#[test]
fn test_literal_token_wins_over_env() {
    let agent = AgentConfig {
        url: "https://example.com".into(),
        bearer_token: Some("literal".into()),
        bearer_token_env: Some("PATH".into()),
        timeout_secs: None,
        typewriter_speed: None,
    };
    assert_eq!(agent.resolve_token(), Some("literal".to_string()));
}

#[test]
fn test_env_overrides_titles() {
    let mut config = Config {
        page_title: Some("From File".into()),
        ..Default::default()
    };
    let env: HashMap<&str, &str> = [("TITLE", "Catalogue de démos")].into_iter().collect();
    config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.get_page_title(), "From File");
    assert_eq!(config.get_title(), "Catalogue de démos");
}

#[test]
fn test_config_round_trips_through_json() {
    let mut agents = HashMap::new();
    agents.insert(
        "1_🤖_Sales.py".to_string(),
        AgentConfig {
            url: "https://example.com/sales".into(),
            bearer_token: None,
            bearer_token_env: Some("SALES_TOKEN".into()),
            timeout_secs: None,
            typewriter_speed: None,
        },
    );
    let config = Config {
        pages_dir: Some("pages".into()),
        agents: Some(agents),
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("bearerTokenEnv"));
    assert!(!json.contains("pageTitle"));
    let back = parse_config(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = load_config_from_path(&dir.path().join("nope.json"));
    assert_eq!(config.get_catalogue(), CatalogueConfig::default());
    assert_eq!(config.get_chat(), ChatConfig::default());
}

#[test]
fn test_invalid_config_file_uses_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let config = load_config_from_path(&path);
    assert!(config.agents.is_none());
    assert!(config.pages_dir.is_none());
}

#[test]
fn test_agent_overrides_parse_from_camel_case() {
    let json = r#"{
        "chat": { "typewriterSpeed": 25 },
        "agents": {
            "4_✈️_Claims.py": {
                "url": "https://example.com/claims",
                "bearerToken": "t",
                "timeoutSecs": 30,
                "typewriterSpeed": 0
            }
        }
    }"#;
    let config = parse_config(json).unwrap();
    let agent = config.get_agent("4_✈️_Claims.py").unwrap();
    assert_eq!(agent.timeout_secs, Some(30));
    assert_eq!(agent.typewriter_speed, Some(0));
    assert_eq!(config.get_chat().typewriter_speed, 25);
}
