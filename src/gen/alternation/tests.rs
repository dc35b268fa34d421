use super::*;

#[test]
fn default_policy_matches_spec_table() {
    let policy = AlternationPolicy::default();

    assert_eq!(policy.rule_for("Mathematics"), Some(&Rule { active: true, frequency: 2 }));
    assert_eq!(policy.rule_for("Physics"), Some(&Rule { active: true, frequency: 2 }));
    assert_eq!(policy.rule_for("English"), Some(&Rule { active: true, frequency: 2 }));
    assert_eq!(policy.rule_for("Chemistry"), Some(&Rule { active: true, frequency: 4 }));
    assert_eq!(policy.rule_for("EngineeringSci"), Some(&Rule { active: true, frequency: 4 }));
    assert_eq!(policy.rule_for("French"), Some(&Rule { active: true, frequency: 8 }));
    assert_eq!(policy.rule_for("Unknown"), None);
}

#[test]
fn inactive_rule_is_ignored() {
    let policy = AlternationPolicy::from_rules([(
        "Mathematics".to_string(),
        Rule { active: false, frequency: 2 },
    )])
    .unwrap();

    assert_eq!(policy.rule_for("Mathematics"), None);
}

#[test]
fn custom_rules_replace_defaults_wholesale() {
    let policy = AlternationPolicy::from_rules([(
        "Biology".to_string(),
        Rule { active: true, frequency: 4 },
    )])
    .unwrap();

    assert_eq!(policy.rule_for("Mathematics"), None);
    assert_eq!(
        policy.rule_for("Biology"),
        Some(&Rule { active: true, frequency: 4 })
    );
}

#[test]
fn rejects_invalid_frequency() {
    let err = AlternationPolicy::from_rules([(
        "Mathematics".to_string(),
        Rule { active: true, frequency: 3 },
    )])
    .unwrap_err();
    assert!(matches!(err, Error::InvalidFrequency(_, 3)));
}

#[test]
fn parses_from_json() {
    let json = r#"{"Mathematics": {"active": true, "frequency": 2}, "French": {"active": false, "frequency": 8}}"#;
    let policy = AlternationPolicy::from_reader(json.as_bytes()).unwrap();
    assert_eq!(
        policy.rule_for("Mathematics"),
        Some(&Rule { active: true, frequency: 2 })
    );
    assert_eq!(policy.rule_for("French"), None);
}
