//! Layer precedence.
//!
//! Each layer is parsed on its own into a sparse [`Layer`]; the merged
//! configuration is the defaults with the lower-precedence layer overlaid
//! first and the higher-precedence layer overlaid last. A leaf therefore
//! always takes exactly one layer's value, and a composite exists iff one of
//! its leaves was set by either layer.

use crate::config::keys::LayerSource;
use crate::config::layer::{parse_layer, Layer, MergeError};
use crate::config::schema::RouterConfig;

/// Which layer wins when both set the same leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precedence {
    /// Config map > annotations > defaults.
    #[default]
    ConfigMapWins,
    /// Annotations > config map > defaults. Matches routers that applied the
    /// config map before the deployment annotations.
    AnnotationsWin,
}

impl Precedence {
    /// Layers in overlay order, lowest precedence first.
    fn order<'a>(self, annotations: &'a Layer, config_map: &'a Layer) -> [&'a Layer; 2] {
        match self {
            Precedence::ConfigMapWins => [annotations, config_map],
            Precedence::AnnotationsWin => [config_map, annotations],
        }
    }
}

/// Merge deployment annotations and config map data over the defaults with
/// config map precedence.
pub fn merge_router_config<A, AK, AV, C, CK, CV>(
    annotations: A,
    config_map: C,
) -> Result<RouterConfig, MergeError>
where
    A: IntoIterator<Item = (AK, AV)>,
    AK: AsRef<str>,
    AV: AsRef<str>,
    C: IntoIterator<Item = (CK, CV)>,
    CK: AsRef<str>,
    CV: AsRef<str>,
{
    merge_router_config_with(annotations, config_map, Precedence::default())
}

/// Merge with an explicit layer precedence.
pub fn merge_router_config_with<A, AK, AV, C, CK, CV>(
    annotations: A,
    config_map: C,
    precedence: Precedence,
) -> Result<RouterConfig, MergeError>
where
    A: IntoIterator<Item = (AK, AV)>,
    AK: AsRef<str>,
    AV: AsRef<str>,
    C: IntoIterator<Item = (CK, CV)>,
    CK: AsRef<str>,
    CV: AsRef<str>,
{
    let annotations = parse_layer(LayerSource::Annotations, annotations)?;
    let config_map = parse_layer(LayerSource::ConfigMap, config_map)?;
    Ok(overlay(&annotations, &config_map, precedence))
}

/// Combine two parsed layers over fresh defaults.
pub fn overlay(annotations: &Layer, config_map: &Layer, precedence: Precedence) -> RouterConfig {
    let mut config = RouterConfig::default();
    for layer in precedence.order(annotations, config_map) {
        layer.apply_to(&mut config);
    }

    tracing::info!(
        annotation_keys = annotations.len(),
        config_map_keys = config_map.len(),
        ?precedence,
        gzip = config.gzip.is_some(),
        builder = config.builder.is_some(),
        "Router configuration merged"
    );

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys::{ConfigField, Value};
    use std::collections::HashMap;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_layers_yield_defaults() {
        let config = merge_router_config(&map(&[]), &map(&[])).unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_config_map_wins_conflicts() {
        let annotations = map(&[("router.deis.io/nginx.workerProcesses", "2")]);
        let config_map = map(&[("nginx.workerProcesses", "8")]);
        let config = merge_router_config(&annotations, &config_map).unwrap();
        assert_eq!(config.worker_processes, "8");
    }

    #[test]
    fn test_annotations_win_when_requested() {
        let annotations = map(&[("router.deis.io/nginx.workerProcesses", "2")]);
        let config_map = map(&[("nginx.workerProcesses", "8")]);
        let config =
            merge_router_config_with(&annotations, &config_map, Precedence::AnnotationsWin)
                .unwrap();
        assert_eq!(config.worker_processes, "2");
    }

    #[test]
    fn test_composite_leaves_merge_independently() {
        let annotations = map(&[
            ("router.deis.io/nginx.gzip.compLevel", "3"),
            ("router.deis.io/nginx.gzip.vary", "off"),
        ]);
        let config_map = map(&[("nginx.gzip.compLevel", "7")]);
        let gzip = merge_router_config(&annotations, &config_map)
            .unwrap()
            .gzip
            .unwrap();
        assert_eq!(gzip.comp_level, "7");
        assert_eq!(gzip.vary, "off");
        assert_eq!(gzip.proxied, "any");
    }

    #[test]
    fn test_error_in_either_layer_aborts() {
        let good = map(&[("nginx.defaultTimeout", "60s")]);
        let bad_annotations = map(&[("router.deis.io/nginx.ssl.hsts.preload", "yes")]);
        let err = merge_router_config(&bad_annotations, &good).unwrap_err();
        assert_eq!(err.layer(), LayerSource::Annotations);

        let bad_config_map = map(&[("nginx.ssl.hsts.preload", "yes")]);
        let err = merge_router_config(&map(&[]), &bad_config_map).unwrap_err();
        assert_eq!(err.layer(), LayerSource::ConfigMap);
    }

    #[test]
    fn test_overlay_of_parsed_layers() {
        let annotations = parse_layer(
            LayerSource::Annotations,
            [("router.deis.io/nginx.builder.serviceIP", "10.1.2.3")],
        )
        .unwrap();
        let config_map = Layer::empty(LayerSource::ConfigMap);
        assert_eq!(
            annotations.get(ConfigField::BuilderServiceIp),
            Some(&Value::String("10.1.2.3".into()))
        );

        let config = overlay(&annotations, &config_map, Precedence::ConfigMapWins);
        assert_eq!(config.builder.unwrap().service_ip, "10.1.2.3");
        assert!(config.gzip.is_none());
    }
}
