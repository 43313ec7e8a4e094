use std::collections::HashMap;

use super::*;

fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    Config::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn defaults_when_environment_is_empty() {
    let config = load(&[]).unwrap();
    assert_eq!(config.port, 3000);
    assert_eq!(config.public_base_url, "http://localhost:3000");
    assert_eq!(config.invitation_ttl, time::Duration::hours(72));
    assert_eq!(config.sweep_interval, Duration::from_secs(300));
    assert!(config.mailer.is_none());
}

#[test]
fn overrides_are_applied() {
    let config = load(&[
        ("PORT", "8080"),
        ("PUBLIC_BASE_URL", "https://dash.example.com/"),
        ("INVITATION_TTL_HOURS", "24"),
        ("INVITATION_SWEEP_INTERVAL_SECS", " 60 "),
    ])
    .unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.public_base_url, "https://dash.example.com");
    assert_eq!(config.invitation_ttl, time::Duration::hours(24));
    assert_eq!(config.sweep_interval, Duration::from_secs(60));
}

#[test]
fn unparsable_numbers_fall_back_to_defaults() {
    let config = load(&[("PORT", "eighty"), ("INVITATION_TTL_HOURS", "3 days")]).unwrap();
    assert_eq!(config.port, 3000);
    assert_eq!(config.invitation_ttl, time::Duration::hours(DEFAULT_INVITATION_TTL_HOURS));
}

#[test]
fn rejects_non_positive_ttl() {
    assert_eq!(load(&[("INVITATION_TTL_HOURS", "0")]).unwrap_err(), ConfigError::NonPositiveTtl(0));
    assert_eq!(load(&[("INVITATION_TTL_HOURS", "-5")]).unwrap_err(), ConfigError::NonPositiveTtl(-5));
}

#[test]
fn rejects_zero_sweep_interval() {
    assert_eq!(
        load(&[("INVITATION_SWEEP_INTERVAL_SECS", "0")]).unwrap_err(),
        ConfigError::ZeroSweepInterval
    );
}

#[test]
fn rejects_base_url_without_scheme() {
    assert!(matches!(
        load(&[("PUBLIC_BASE_URL", "dash.example.com")]),
        Err(ConfigError::InvalidBaseUrl(_))
    ));
}

#[test]
fn mailer_requires_both_key_and_sender() {
    assert!(load(&[("RESEND_API_KEY", "re_123")]).unwrap().mailer.is_none());
    assert!(load(&[("RESEND_API_KEY", "re_123"), ("RESEND_FROM", "  ")]).unwrap().mailer.is_none());

    let config = load(&[("RESEND_API_KEY", "re_123"), ("RESEND_FROM", "team@example.com")]).unwrap();
    assert_eq!(
        config.mailer,
        Some(MailerConfig { api_key: "re_123".to_owned(), from: "team@example.com".to_owned() })
    );
}

#[test]
fn magic_link_joins_base_and_token() {
    let config = load(&[("PUBLIC_BASE_URL", "https://dash.example.com")]).unwrap();
    assert_eq!(config.magic_link("abc123"), "https://dash.example.com/magic/abc123");
}

#[test]
fn client_dir_defaults_to_workspace_build_and_can_be_overridden() {
    assert!(load(&[]).unwrap().client_dir.ends_with("client/dist"));
    let config = load(&[("CLIENT_DIST_DIR", "/srv/propdash")]).unwrap();
    assert_eq!(config.client_dir, std::path::PathBuf::from("/srv/propdash"));
}
