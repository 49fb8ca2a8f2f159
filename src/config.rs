use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sprite edge length in pixels. The pet window is exactly this size.
pub const SPRITE_SIZE: u32 = 80;
/// Pixels moved per movement tick on each axis.
pub const CHASE_SPEED: i32 = 8;
/// Cursor closer than this on both axes counts as "caught".
pub const STOP_DISTANCE: i32 = 50;
/// Gap between the spawn position and the bottom-right corner.
pub const SPAWN_INSET: i32 = 50;
/// Movement timer period.
pub const MOVE_INTERVAL: Duration = Duration::from_millis(30);
/// Animation timer period.
pub const ANIM_INTERVAL: Duration = Duration::from_millis(150);

/// Env var overriding the asset directory.
pub const ASSETS_ENV: &str = "DESKCAT_ASSETS";
/// Env var that starts the pet in dock mode.
pub const START_DOCKED_ENV: &str = "DESKCAT_START_DOCKED";

/// Runtime tunables. Defaults come from the constants above.
#[derive(Debug, Clone)]
pub struct PetConfig {
    pub sprite_size: u32,
    pub chase_speed: i32,
    pub stop_distance: i32,
    pub spawn_inset: i32,
    pub move_interval: Duration,
    pub anim_interval: Duration,
    pub asset_dir: PathBuf,
    pub start_chasing: bool,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            sprite_size: SPRITE_SIZE,
            chase_speed: CHASE_SPEED,
            stop_distance: STOP_DISTANCE,
            spawn_inset: SPAWN_INSET,
            move_interval: MOVE_INTERVAL,
            anim_interval: ANIM_INTERVAL,
            asset_dir: PathBuf::from("assets"),
            start_chasing: true,
        }
    }
}

impl PetConfig {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));

        Self {
            asset_dir: resolve_asset_dir(std::env::var_os(ASSETS_ENV).map(PathBuf::from), exe_dir),
            start_chasing: !std::env::var(START_DOCKED_ENV)
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            ..Self::default()
        }
    }
}

/// Pick the asset directory: explicit override, then `assets/` beside the
/// executable, then `assets/` relative to the working directory.
pub fn resolve_asset_dir(override_dir: Option<PathBuf>, exe_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    if let Some(beside_exe) = exe_dir.map(|d| d.join("assets")) {
        if beside_exe.is_dir() {
            return beside_exe;
        }
    }
    PathBuf::from("assets")
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        let dir = resolve_asset_dir(Some(PathBuf::from("/tmp/sprites")), None);
        assert_eq!(dir, PathBuf::from("/tmp/sprites"));
    }

    #[test]
    fn assets_beside_executable() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("assets")).unwrap();

        let dir = resolve_asset_dir(None, Some(tmp.path().to_path_buf()));
        assert_eq!(dir, tmp.path().join("assets"));
    }

    #[test]
    fn falls_back_to_working_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = resolve_asset_dir(None, Some(tmp.path().to_path_buf()));
        assert_eq!(dir, PathBuf::from("assets"));
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
