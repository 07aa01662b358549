use costgrid_common::{Currency, MonthlyValues, Scenario};
use costgrid_scenario::{Manifest, ScenarioError, WaterfallSpec, generate_schema_value};

fn load_fixture(name: &str) -> Manifest {
    let path = format!("tests/fixtures/{}.yaml", name);
    Manifest::load(path).expect("fixture should deserialize")
}

#[test]
fn hr_fixture_validates() {
    let manifest = load_fixture("hr_hk_2025");
    manifest.validate().expect("fixture should validate");
}

#[test]
fn hr_fixture_builds_derived_state() {
    let bundle = load_fixture("hr_hk_2025")
        .into_bundle()
        .expect("fixture should build");
    let state = &bundle.state;

    assert_eq!(state.scenario(), Scenario::Worst);
    assert_eq!(state.currency(), Currency::Hkd);
    assert_eq!(state.drivers().headcount, 15);
    // omitted drivers keep their defaults
    assert_eq!(state.drivers().fx_rate, 7.8);

    // 12,500 * 1.045 * 15 = 195,937.5, rounded half up
    assert_eq!(
        state.registry().get("c1").unwrap().monthly_values,
        MonthlyValues::flat(195_938.0)
    );
    assert_eq!(
        state.registry().get("c5").unwrap().monthly_values,
        MonthlyValues::flat(2_000.0)
    );
    assert_eq!(state.registry().row_total("c4"), Some(100_000.0));

    assert_eq!(bundle.departments.len(), 3);
    let kpis = bundle.kpis();
    assert_eq!(kpis.total_budget, 8_500_000.0);
    assert_eq!(kpis.approvals_due, 2);

    let bars = state.bridge();
    assert_eq!(bars.len(), 5);
    assert!((bars[3].cumulative - 12.0).abs() < 1e-9);
    assert_eq!(bars[4].cumulative, 12.0);
}

#[test]
fn fixture_survives_yaml_round_trip() {
    let manifest = load_fixture("hr_hk_2025");
    let yaml = manifest.to_yaml().unwrap();
    let reparsed = Manifest::from_yaml_str(&yaml).unwrap();
    assert_eq!(reparsed, manifest);
}

#[test]
fn every_issue_is_reported_at_once() {
    let mut manifest = load_fixture("hr_hk_2025");
    manifest.spec = "fio".to_string();
    manifest.spec_version = "2.0.0".to_string();
    manifest.scenario.id = "HR 2025".to_string();
    let items = manifest.cost_items.as_mut().unwrap();
    items[1].id = "c1".to_string();
    items[2].gl_code = "6001".to_string();
    items[3].monthly_values.pop();

    let err = manifest.validate().expect_err("validation should fail");
    let paths: Vec<&str> = err.issues().iter().map(|i| i.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "spec",
            "spec_version",
            "scenario.id",
            "cost_items[1].id",
            "cost_items[2].gl_code",
            "cost_items[3].monthly_values",
        ]
    );
}

#[test]
fn conflicting_waterfall_flags_rejected() {
    let mut manifest = load_fixture("hr_hk_2025");
    manifest.waterfall = Some(vec![WaterfallSpec {
        name: "End".to_string(),
        value: 1.0,
        total: true,
        decrease: true,
        fill: None,
    }]);

    let err = manifest.validate().expect_err("validation should fail");
    insta::assert_debug_snapshot!(err.issues(), @r#"
    [
        ManifestIssue {
            path: "waterfall[0]",
            message: "a step cannot be both `total` and `decrease`",
        },
    ]
    "#);
}

#[test]
fn negative_magnitudes_and_duplicate_departments_rejected() {
    let mut manifest = load_fixture("hr_hk_2025");
    manifest.waterfall.as_mut().unwrap()[1].value = -0.7;
    let departments = manifest.departments.as_mut().unwrap();
    departments[2].id = "1".to_string();
    departments[0].last_year_actuals = f64::NAN;

    let err = manifest.validate().expect_err("validation should fail");
    assert!(err.has_issue_at("waterfall[1].value"));
    assert!(err.has_issue_at("departments[2].id"));
    assert!(err.has_issue_at("departments[0].last_year_actuals"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Manifest::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ScenarioError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn load_reads_written_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seeded.yaml");
    std::fs::write(&path, Manifest::seeded().to_yaml().unwrap()).unwrap();
    assert_eq!(Manifest::load(&path).unwrap(), Manifest::seeded());
}

#[test]
fn schema_describes_manifest_sections() {
    let schema = generate_schema_value();
    assert!(schema.is_object(), "schema root should be an object");
    let properties = schema["properties"].as_object().expect("top-level properties");
    for key in ["spec", "spec_version", "scenario", "drivers", "cost_items", "departments", "waterfall"] {
        assert!(properties.contains_key(key), "missing `{key}` in schema");
    }
    let required: Vec<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(required.contains(&"spec"));
    assert!(!required.contains(&"drivers"));
}
