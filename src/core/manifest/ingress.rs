use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, ServiceBackendPort,
};

use super::metadata;
use crate::core::constants::SERVICE_PORT;
use crate::core::domain::Role;
use crate::core::plan::Plan;

pub(super) fn name(plan: &Plan) -> String {
    format!("{}-ingress", plan.namespace)
}

fn path(prefix: &str, service: &str) -> HTTPIngressPath {
    HTTPIngressPath {
        path: Some(prefix.to_string()),
        path_type: "Prefix".to_string(),
        backend: IngressBackend {
            service: Some(IngressServiceBackend {
                name: service.to_string(),
                port: Some(ServiceBackendPort {
                    number: Some(SERVICE_PORT),
                    ..ServiceBackendPort::default()
                }),
            }),
            ..IngressBackend::default()
        },
    }
}

/// Ingress routing `/api` to the backend and `/` to the frontend, or to the
/// first service when there is no frontend. `None` without a host.
pub(super) fn ingress(plan: &Plan) -> Option<Ingress> {
    let host = plan.host.as_ref()?;
    let root = plan
        .service_with_role(&Role::Frontend)
        .or_else(|| plan.services.first())?;

    let mut paths = Vec::with_capacity(2);
    if let Some(backend) = plan.service_with_role(&Role::Backend) {
        paths.push(path("/api", backend.name()));
    }
    paths.push(path("/", root.name()));

    Some(Ingress {
        metadata: metadata(plan, &name(plan), None),
        spec: Some(IngressSpec {
            rules: Some(vec![IngressRule {
                host: Some(host.clone()),
                http: Some(HTTPIngressRuleValue { paths }),
            }]),
            ..IngressSpec::default()
        }),
        ..Ingress::default()
    })
}
