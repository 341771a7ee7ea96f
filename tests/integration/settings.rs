use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use wirebox::{
    Component, ComponentDescriptor, Constructor, ContextConfig, ScopeSettings, ScopeTag,
    Settings, Tag, WireboxError,
};

static BUILT: AtomicUsize = AtomicUsize::new(0);

struct Session {
    id: usize,
}

impl Component for Session {
    fn describe() -> ComponentDescriptor<Self> {
        ComponentDescriptor::new().constructor(Constructor::no_arg(|| Session {
            id: BUILT.fetch_add(1, Ordering::SeqCst),
        }))
    }
}

#[test]
fn test_context_config_from_settings_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("wirebox.yaml");
    std::fs::write(
        &path,
        r#"
scopes:
  - name: pooled
    policy: pooled
    size: 2
  - name: session
    policy: singleton
"#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    let config = ContextConfig::from_settings(&settings).unwrap();
    assert!(config.has_scope(&ScopeTag::singleton()));
    assert!(config.has_scope(&ScopeTag::new("pooled")));
    assert!(config.has_scope(&ScopeTag::new("session")));
}

#[test]
fn test_pooled_scope_from_settings() {
    let settings = Settings::from_yaml_str(
        r#"
scopes:
  - name: pooled
    policy: pooled
"#,
    )
    .unwrap();

    let mut config = ContextConfig::from_settings(&settings).unwrap();
    config.bind::<Session, Session>(&[Tag::scope("pooled")]).unwrap();
    let context = config.get_context().unwrap();

    let ids: Vec<_> = (0..4)
        .map(|_| context.instance::<Session>().unwrap().unwrap().id)
        .collect();
    assert_eq!(ids[0], ids[2]);
    assert_eq!(ids[1], ids[3]);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_invalid_settings_are_rejected() {
    let settings = Settings {
        scopes: vec![ScopeSettings::pooled("pooled", 0)],
    };
    let err = ContextConfig::from_settings(&settings).unwrap_err();
    assert!(matches!(err, WireboxError::Config(_)));
}

#[test]
fn test_default_settings_register_only_singleton() {
    let config = ContextConfig::from_settings(&Settings::default()).unwrap();
    assert!(config.has_scope(&ScopeTag::singleton()));
    assert!(!config.has_scope(&ScopeTag::new("pooled")));
    assert!(config.is_empty());
}
