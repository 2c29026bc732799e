//! Namespace, env and application workload objects.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    ConfigMap, ConfigMapEnvSource, Container, ContainerPort, EnvFromSource, HTTPGetAction,
    Namespace, PodSpec, PodTemplateSpec, Probe, Secret, SecretEnvSource, Service, ServicePort,
    ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use sha2::{Digest, Sha256};

use super::{app_labels, common_labels, metadata};
use crate::core::constants::{CHECKSUM_ANNOTATION, HEALTH_PATH, SERVICE_PORT};
use crate::core::domain::ServiceDescriptor;
use crate::core::plan::Plan;

pub(super) fn namespace(plan: &Plan) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(plan.namespace.to_string()),
            labels: Some(common_labels(plan)),
            ..ObjectMeta::default()
        },
        ..Namespace::default()
    }
}

pub(super) fn config_map(plan: &Plan) -> ConfigMap {
    ConfigMap {
        metadata: metadata(plan, &plan.config_map_name(), None),
        data: Some(plan.config.clone()),
        ..ConfigMap::default()
    }
}

pub(super) fn secret(plan: &Plan) -> Secret {
    Secret {
        metadata: metadata(plan, &plan.secret_name(), None),
        type_: Some("Opaque".to_string()),
        string_data: Some(plan.secret.clone()),
        ..Secret::default()
    }
}

/// `envFrom` entries for the env objects that were rendered.
///
/// References are optional so a pod still starts if the object is removed.
pub(super) fn env_from(plan: &Plan) -> Option<Vec<EnvFromSource>> {
    let mut sources = Vec::new();

    if plan.has_config() {
        sources.push(EnvFromSource {
            config_map_ref: Some(ConfigMapEnvSource {
                name: plan.config_map_name().into(),
                optional: Some(true),
            }),
            ..EnvFromSource::default()
        });
    }

    if plan.has_secret() {
        sources.push(EnvFromSource {
            secret_ref: Some(SecretEnvSource {
                name: plan.secret_name().into(),
                optional: Some(true),
            }),
            ..EnvFromSource::default()
        });
    }

    (!sources.is_empty()).then_some(sources)
}

/// SHA-256 over config and secret data, hex encoded.
///
/// Stored on pod templates so a changed variable rolls the pods.
pub(super) fn checksum(plan: &Plan) -> String {
    let mut hasher = Sha256::new();
    for (prefix, map) in [("config", &plan.config), ("secret", &plan.secret)] {
        for (key, value) in map {
            hasher.update(prefix.as_bytes());
            hasher.update([0]);
            hasher.update(key.as_bytes());
            hasher.update([0]);
            hasher.update(value.as_bytes());
            hasher.update([0]);
        }
    }
    format!("{:x}", hasher.finalize())
}

fn http_probe(port: u16, initial_delay: i32) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(HEALTH_PATH.to_string()),
            port: IntOrString::Int(i32::from(port)),
            ..HTTPGetAction::default()
        }),
        initial_delay_seconds: Some(initial_delay),
        period_seconds: Some(10),
        ..Probe::default()
    }
}

pub(super) fn deployment(plan: &Plan, svc: &ServiceDescriptor) -> Deployment {
    let container = Container {
        name: svc.name().to_string(),
        image: Some(svc.image().to_string()),
        image_pull_policy: Some("IfNotPresent".to_string()),
        ports: Some(vec![ContainerPort {
            container_port: i32::from(svc.port()),
            name: Some("http".to_string()),
            ..ContainerPort::default()
        }]),
        env_from: env_from(plan),
        readiness_probe: Some(http_probe(svc.port(), 5)),
        liveness_probe: Some(http_probe(svc.port(), 15)),
        ..Container::default()
    };

    let mut pod_labels = common_labels(plan);
    pod_labels.extend(app_labels(svc.name()));

    Deployment {
        metadata: metadata(plan, svc.name(), Some(svc.name())),
        spec: Some(DeploymentSpec {
            replicas: Some(plan.replicas),
            selector: LabelSelector {
                match_labels: Some(app_labels(svc.name())),
                ..LabelSelector::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels),
                    annotations: Some(BTreeMap::from([(
                        CHECKSUM_ANNOTATION.to_string(),
                        checksum(plan),
                    )])),
                    ..ObjectMeta::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    ..PodSpec::default()
                }),
            },
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    }
}

pub(super) fn service(plan: &Plan, svc: &ServiceDescriptor) -> Service {
    Service {
        metadata: metadata(plan, svc.name(), Some(svc.name())),
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_string()),
            selector: Some(app_labels(svc.name())),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: SERVICE_PORT,
                target_port: Some(IntOrString::Int(i32::from(svc.port()))),
                protocol: Some("TCP".to_string()),
                ..ServicePort::default()
            }]),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    }
}
