use std::env;
use std::str::FromStr;

use backend::{EngineHost, LoopConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::test_card::TestCardHost;

const TARGET_FPS_ENV_VAR: &str = "DGRL_TARGET_FPS";
const WINDOW_SCALE_ENV_VAR: &str = "DGRL_WINDOW_SCALE";
const MUSIC_VOLUME_ENV_VAR: &str = "DGRL_MUSIC_VOLUME";
const SHOW_FPS_ENV_VAR: &str = "DGRL_SHOW_FPS";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) host: Box<dyn EngineHost>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== doomgeneric-rl startup ===");

    let config = config_from_lookup(|name| env::var(name).ok());
    let args: Vec<String> = env::args().collect();
    AppWiring {
        config,
        host: Box::new(TestCardHost::new(args)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LoopConfig {
    let defaults = LoopConfig::default();
    let max_render_fps = parse_override::<u32>(&lookup, TARGET_FPS_ENV_VAR)
        .map(|fps| (fps > 0).then_some(fps))
        .unwrap_or(defaults.max_render_fps);
    let window_scale = parse_override::<u32>(&lookup, WINDOW_SCALE_ENV_VAR)
        .filter(|scale| {
            let valid = *scale > 0;
            if !valid {
                warn!(
                    var = WINDOW_SCALE_ENV_VAR,
                    "window scale must be positive; using default"
                );
            }
            valid
        })
        .unwrap_or(defaults.window_scale);
    let master_volume = parse_override::<f32>(&lookup, MUSIC_VOLUME_ENV_VAR)
        .filter(|volume| {
            let valid = (0.0..=1.0).contains(volume);
            if !valid {
                warn!(
                    var = MUSIC_VOLUME_ENV_VAR,
                    "music volume must be within 0..=1; using default"
                );
            }
            valid
        })
        .unwrap_or(defaults.master_volume);
    let show_fps = parse_override::<bool>(&lookup, SHOW_FPS_ENV_VAR).unwrap_or(defaults.show_fps);

    LoopConfig {
        max_render_fps,
        window_scale,
        master_volume,
        show_fps,
        ..defaults
    }
}

fn parse_override<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Option<T> {
    let raw = lookup(var)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var, value = %raw, "invalid environment override; using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        assert_eq!(config_from_lookup(|_| None), LoopConfig::default());
    }

    #[test]
    fn valid_overrides_are_applied() {
        let config = config_from_lookup(lookup_from(&[
            (TARGET_FPS_ENV_VAR, "35"),
            (WINDOW_SCALE_ENV_VAR, "2"),
            (MUSIC_VOLUME_ENV_VAR, " 0.25 "),
            (SHOW_FPS_ENV_VAR, "false"),
        ]));
        assert_eq!(config.max_render_fps, Some(35));
        assert_eq!(config.window_scale, 2);
        assert_eq!(config.master_volume, 0.25);
        assert!(!config.show_fps);
    }

    #[test]
    fn zero_target_fps_uncaps_rendering() {
        let config = config_from_lookup(lookup_from(&[(TARGET_FPS_ENV_VAR, "0")]));
        assert_eq!(config.max_render_fps, None);
    }

    #[test]
    fn invalid_overrides_fall_back_to_defaults() {
        let config = config_from_lookup(lookup_from(&[
            (TARGET_FPS_ENV_VAR, "fast"),
            (WINDOW_SCALE_ENV_VAR, "0"),
            (MUSIC_VOLUME_ENV_VAR, "1.5"),
            (SHOW_FPS_ENV_VAR, "yes please"),
        ]));
        assert_eq!(config, LoopConfig::default());
    }
}
