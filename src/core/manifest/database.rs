//! Managed PostgreSQL objects.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{
    Deployment, DeploymentSpec, DeploymentStrategy, StatefulSet, StatefulSetSpec,
};
use k8s_openapi::api::core::v1::{
    ConfigMap, ConfigMapKeySelector, ConfigMapVolumeSource, Container, ContainerPort, EnvVar,
    EnvVarSource, ExecAction, PersistentVolumeClaim, PersistentVolumeClaimSpec,
    PersistentVolumeClaimVolumeSource, PodSpec, PodTemplateSpec, Probe, SecretKeySelector,
    Service, ServicePort, ServiceSpec, Volume, VolumeMount, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use super::{app_labels, common_labels, metadata, Kind, Manifest};
use crate::core::constants::{
    DATABASE_DATA_PATH, DATABASE_IMAGE, DATABASE_INIT_PATH, DATABASE_PORT, INIT_SQL,
};
use crate::core::plan::{DatabasePlan, DatabaseWorkload, Plan, ValueSource};
use crate::error::Result;

const DATA_VOLUME: &str = "data";
const INIT_VOLUME: &str = "init";

/// Render every object of the managed database, in apply order.
pub(super) fn render(plan: &Plan, db: &DatabasePlan) -> Result<Vec<Manifest>> {
    let mut manifests = Vec::new();

    if db.init_sql.is_some() {
        let name = init_name(db);
        manifests.push(Manifest::new(
            "03-postgres-init.yaml".into(),
            Kind::ConfigMap,
            &name,
            &init_config_map(plan, db),
        )?);
    }

    match db.workload {
        DatabaseWorkload::Deployment => {
            let claim = claim_name(db);
            manifests.push(Manifest::new(
                "04-postgres-pvc.yaml".into(),
                Kind::PersistentVolumeClaim,
                &claim,
                &PersistentVolumeClaim {
                    metadata: metadata(plan, &claim, Some(&db.service)),
                    spec: Some(claim_spec(db)),
                    ..PersistentVolumeClaim::default()
                },
            )?);
            manifests.push(Manifest::new(
                "05-postgres-deployment.yaml".into(),
                Kind::Deployment,
                &db.service,
                &deployment(plan, db),
            )?);
        }
        DatabaseWorkload::StatefulSet => {
            manifests.push(Manifest::new(
                "05-postgres-statefulset.yaml".into(),
                Kind::StatefulSet,
                &db.service,
                &stateful_set(plan, db),
            )?);
        }
    }

    manifests.push(Manifest::new(
        "06-postgres-service.yaml".into(),
        Kind::Service,
        &db.service,
        &service(plan, db),
    )?);

    Ok(manifests)
}

fn init_name(db: &DatabasePlan) -> String {
    format!("{}-init", db.service)
}

fn claim_name(db: &DatabasePlan) -> String {
    format!("{}-data", db.service)
}

fn init_config_map(plan: &Plan, db: &DatabasePlan) -> ConfigMap {
    let data = db
        .init_sql
        .as_ref()
        .map(|sql| BTreeMap::from([(INIT_SQL.to_string(), sql.clone())]));

    ConfigMap {
        metadata: metadata(plan, &init_name(db), Some(&db.service)),
        data,
        ..ConfigMap::default()
    }
}

fn claim_spec(db: &DatabasePlan) -> PersistentVolumeClaimSpec {
    PersistentVolumeClaimSpec {
        access_modes: Some(vec!["ReadWriteOnce".to_string()]),
        resources: Some(VolumeResourceRequirements {
            requests: Some(BTreeMap::from([(
                "storage".to_string(),
                Quantity(db.pvc_size.to_string()),
            )])),
            ..VolumeResourceRequirements::default()
        }),
        ..PersistentVolumeClaimSpec::default()
    }
}

fn env_var(plan: &Plan, name: &str, source: &ValueSource) -> EnvVar {
    let (value, value_from) = match source {
        ValueSource::Literal(value) => (Some(value.clone()), None),
        ValueSource::Secret(key) => (
            None,
            Some(EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: plan.secret_name().into(),
                    key: key.clone(),
                    ..SecretKeySelector::default()
                }),
                ..EnvVarSource::default()
            }),
        ),
        ValueSource::ConfigMap(key) => (
            None,
            Some(EnvVarSource {
                config_map_key_ref: Some(ConfigMapKeySelector {
                    name: plan.config_map_name().into(),
                    key: key.clone(),
                    ..ConfigMapKeySelector::default()
                }),
                ..EnvVarSource::default()
            }),
        ),
    };

    EnvVar {
        name: name.to_string(),
        value,
        value_from,
    }
}

fn container(plan: &Plan, db: &DatabasePlan) -> Container {
    let mut mounts = vec![VolumeMount {
        name: DATA_VOLUME.to_string(),
        mount_path: DATABASE_DATA_PATH.to_string(),
        sub_path: Some("pgdata".to_string()),
        ..VolumeMount::default()
    }];
    if db.init_sql.is_some() {
        mounts.push(VolumeMount {
            name: INIT_VOLUME.to_string(),
            mount_path: DATABASE_INIT_PATH.to_string(),
            read_only: Some(true),
            ..VolumeMount::default()
        });
    }

    Container {
        name: db.service.clone(),
        image: Some(DATABASE_IMAGE.to_string()),
        image_pull_policy: Some("IfNotPresent".to_string()),
        ports: Some(vec![ContainerPort {
            container_port: i32::from(DATABASE_PORT),
            name: Some("postgres".to_string()),
            ..ContainerPort::default()
        }]),
        env: Some(vec![
            env_var(plan, "POSTGRES_USER", &db.user),
            env_var(plan, "POSTGRES_PASSWORD", &db.password),
            env_var(plan, "POSTGRES_DB", &db.name),
        ]),
        readiness_probe: Some(Probe {
            exec: Some(ExecAction {
                command: Some(vec![
                    "sh".to_string(),
                    "-c".to_string(),
                    "pg_isready -U \"$POSTGRES_USER\"".to_string(),
                ]),
            }),
            initial_delay_seconds: Some(5),
            period_seconds: Some(10),
            ..Probe::default()
        }),
        volume_mounts: Some(mounts),
        ..Container::default()
    }
}

/// Pod template. `data_claim` mounts a standalone PVC; a StatefulSet
/// supplies its own claim template instead.
fn template(plan: &Plan, db: &DatabasePlan, data_claim: Option<String>) -> PodTemplateSpec {
    let mut volumes = Vec::new();
    if let Some(claim_name) = data_claim {
        volumes.push(Volume {
            name: DATA_VOLUME.to_string(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name,
                ..PersistentVolumeClaimVolumeSource::default()
            }),
            ..Volume::default()
        });
    }
    if db.init_sql.is_some() {
        volumes.push(Volume {
            name: INIT_VOLUME.to_string(),
            config_map: Some(ConfigMapVolumeSource {
                name: init_name(db).into(),
                ..ConfigMapVolumeSource::default()
            }),
            ..Volume::default()
        });
    }

    let mut labels = common_labels(plan);
    labels.extend(app_labels(&db.service));

    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(labels),
            ..ObjectMeta::default()
        }),
        spec: Some(PodSpec {
            containers: vec![container(plan, db)],
            volumes: (!volumes.is_empty()).then_some(volumes),
            ..PodSpec::default()
        }),
    }
}

fn selector(db: &DatabasePlan) -> LabelSelector {
    LabelSelector {
        match_labels: Some(app_labels(&db.service)),
        ..LabelSelector::default()
    }
}

fn deployment(plan: &Plan, db: &DatabasePlan) -> Deployment {
    Deployment {
        metadata: metadata(plan, &db.service, Some(&db.service)),
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            // Two pods must never share the data volume.
            strategy: Some(DeploymentStrategy {
                type_: Some("Recreate".to_string()),
                ..DeploymentStrategy::default()
            }),
            selector: selector(db),
            template: template(plan, db, Some(claim_name(db))),
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    }
}

fn stateful_set(plan: &Plan, db: &DatabasePlan) -> StatefulSet {
    StatefulSet {
        metadata: metadata(plan, &db.service, Some(&db.service)),
        spec: Some(StatefulSetSpec {
            replicas: Some(1),
            service_name: db.service.clone().into(),
            selector: selector(db),
            template: template(plan, db, None),
            volume_claim_templates: Some(vec![PersistentVolumeClaim {
                metadata: ObjectMeta {
                    name: Some(DATA_VOLUME.to_string()),
                    ..ObjectMeta::default()
                },
                spec: Some(claim_spec(db)),
                ..PersistentVolumeClaim::default()
            }]),
            ..StatefulSetSpec::default()
        }),
        ..StatefulSet::default()
    }
}

fn service(plan: &Plan, db: &DatabasePlan) -> Service {
    let headless = db.workload == DatabaseWorkload::StatefulSet;

    Service {
        metadata: metadata(plan, &db.service, Some(&db.service)),
        spec: Some(ServiceSpec {
            cluster_ip: headless.then(|| "None".to_string()),
            selector: Some(app_labels(&db.service)),
            ports: Some(vec![ServicePort {
                name: Some("postgres".to_string()),
                port: i32::from(DATABASE_PORT),
                target_port: Some(IntOrString::Int(i32::from(DATABASE_PORT))),
                protocol: Some("TCP".to_string()),
                ..ServicePort::default()
            }]),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    }
}
