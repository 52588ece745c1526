//! One reconciliation pass: merge, attach apps, validate, render, write.
//!
//! Watching the cluster and reloading nginx happen outside this crate; the
//! caller hands in a [`RouterSnapshot`] and a destination.

use std::path::Path;

use crate::config::{merge_router_config_with, validate_config, Precedence, RouterConfig, RouterSnapshot};
use crate::error::Result;
use crate::template::NginxTemplate;

/// Build the validated configuration for `snapshot`.
pub fn reconcile(snapshot: &RouterSnapshot, precedence: Precedence) -> Result<RouterConfig> {
    let config = merge_router_config_with(&snapshot.annotations, &snapshot.config_map, precedence)?
        .with_apps(snapshot.apps.clone());
    validate_config(&config)?;
    Ok(config)
}

/// Holds the compiled template across passes.
#[derive(Debug, Clone)]
pub struct Reconciler {
    template: NginxTemplate,
    precedence: Precedence,
}

impl Reconciler {
    /// Compile the template. Fails only if the built-in template is broken.
    pub fn new(precedence: Precedence) -> Result<Self> {
        Ok(Self {
            template: NginxTemplate::new()?,
            precedence,
        })
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// Merge and render without touching the filesystem.
    pub fn render(&self, snapshot: &RouterSnapshot) -> Result<String> {
        let config = reconcile(snapshot, self.precedence)?;
        Ok(self.template.render(&config)?)
    }

    /// Merge, render and write to `path`. Returns the config that was written.
    pub fn run(&self, snapshot: &RouterSnapshot, path: &Path) -> Result<RouterConfig> {
        let config = reconcile(snapshot, self.precedence)?;
        self.template.write_config(&config, path)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::Error;

    #[test]
    fn test_reconcile_attaches_apps() {
        let mut snapshot = RouterSnapshot::default();
        snapshot
            .config_map
            .insert("nginx.useProxyProtocol".into(), "true".into());
        snapshot.apps.push(AppConfig {
            service_ip: "10.0.0.1".into(),
            available: true,
            domains: vec!["example.com".into()],
        });

        let config = reconcile(&snapshot, Precedence::default()).unwrap();
        assert!(config.use_proxy_protocol);
        assert_eq!(config.apps, snapshot.apps);
    }

    #[test]
    fn test_reconcile_rejects_invalid_merge_result() {
        let mut snapshot = RouterSnapshot::default();
        snapshot
            .annotations
            .insert("router.deis.io/nginx.builder.tcpTimeout".into(), "60s".into());

        let err = reconcile(&snapshot, Precedence::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("service address"));
    }

    #[test]
    fn test_reconcile_propagates_merge_error() {
        let mut snapshot = RouterSnapshot::default();
        snapshot
            .config_map
            .insert("nginx.serverNameHashMaxSize".into(), "big".into());

        let err = reconcile(&snapshot, Precedence::default()).unwrap_err();
        assert!(matches!(err, Error::Merge(_)));
    }

    #[test]
    fn test_render_without_writing() {
        let reconciler = Reconciler::new(Precedence::AnnotationsWin).unwrap();
        assert_eq!(reconciler.precedence(), Precedence::AnnotationsWin);
        let out = reconciler.render(&RouterSnapshot::default()).unwrap();
        assert!(out.starts_with("user nginx;\n"));
    }
}
