//! Library-level pipeline tests: scan, classify, derive, render.

mod support;

use kubify::core::classify::{classify_variables, is_secret};
use kubify::core::domain::{ImageTag, Namespace, Role};
use kubify::core::manifest::{Kind, ManifestSet};
use kubify::core::outcome::{Outcome, Warning};
use kubify::core::plan::{DatabasePolicy, Inputs, Plan};
use kubify::core::scan::Scanner;
use proptest::prelude::*;
use support::*;

fn plan(t: &Test, policy: DatabasePolicy) -> Plan {
    let scan = Scanner::new().scan(t.dir.path()).unwrap();
    let vars = classify_variables(&scan.env_files).unwrap();
    let mut inputs = Inputs::new(ImageTag::new("test").unwrap());
    inputs.namespace = Some("shop".into());
    inputs.policy = policy;
    Plan::derive(&scan, vars, inputs).unwrap()
}

#[test]
fn test_end_to_end_explicit_host() {
    let t = Test::full_stack();
    let plan = plan(&t, DatabasePolicy::ExplicitHost);

    let roles: Vec<_> = plan.services.iter().map(|s| (s.role().clone(), s.port())).collect();
    assert_eq!(roles, vec![(Role::Backend, 5000), (Role::Frontend, 80)]);
    assert_eq!(plan.config["DATABASE_HOST"], "postgres.shop.svc.cluster.local");
    assert_eq!(plan.secret["DATABASE_PASSWORD"], "x");
    assert!(matches!(Outcome::from_warnings(plan.warnings.clone()), Outcome::Completed));

    let set = ManifestSet::render(&plan).unwrap();
    assert_eq!(set.of_kind(Kind::Namespace).count(), 1);
    let config_maps: Vec<_> = set.of_kind(Kind::ConfigMap).map(|m| m.name.as_str()).collect();
    assert_eq!(
        config_maps.iter().filter(|name| **name == plan.config_map_name()).count(),
        1
    );
    assert_eq!(config_maps, vec!["shop-config", "postgres-init"]);
    assert_eq!(set.of_kind(Kind::Secret).count(), 1);
    assert_eq!(set.of_kind(Kind::PersistentVolumeClaim).count(), 1);
    assert_eq!(set.of_kind(Kind::Deployment).count(), 3);
    assert_eq!(set.of_kind(Kind::Service).count(), 3);
    assert_eq!(set.of_kind(Kind::Ingress).count(), 0);
}

#[test]
fn test_absence_policy_with_init_sql_means_external_database() {
    let t = Test::full_stack();
    let plan = plan(&t, DatabasePolicy::Absence);

    assert!(plan.database.is_none());
    assert_eq!(plan.config["DATABASE_HOST"], "postgres");
}

#[test]
fn test_missing_password_is_a_warning() {
    let t = Test::with_files(&[
        ("api/Dockerfile", FLASK_DOCKERFILE),
        (".env", "DATABASE_HOST=db\n"),
    ]);
    let plan = plan(&t, DatabasePolicy::ExplicitHost);

    assert_eq!(
        plan.warnings,
        vec![Warning::MissingDatabasePassword {
            key: "DATABASE_PASSWORD".into()
        }]
    );
}

#[test]
fn test_classification_examples() {
    assert!(is_secret("DATABASE_PASSWORD"));
    assert!(is_secret("API_TOKEN"));
    assert!(!is_secret("LOG_LEVEL"));
    assert!(!is_secret("password"));
}

proptest! {
    #[test]
    fn prop_namespace_is_dns_label(raw in ".{0,80}") {
        let ns = Namespace::sanitize(&raw);
        let s = ns.as_str();
        prop_assert!(!s.is_empty());
        prop_assert!(s.len() <= 63);
        prop_assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!s.starts_with('-') && !s.ends_with('-'));
    }
}
