//! Engine-side names: mod identifiers, sprite logical paths and atlas paths.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ModAtlasError;

/// Separator the engine uses in resource paths.
pub const ENGINE_SEPARATOR: char = '\\';

/// Engine directory every atlas manifest is registered under.
pub const ATLAS_ENGINE_DIR: &str = r"bin\Win\Atlases";

// "Owner-ModName": a word segment, a hyphen, another word segment. ASCII only.
#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static TARGET_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)^[a-z0-9]+(?:[0-9a-z_]+[a-z0-9])?-[0-9a-z_]+$").expect("valid regex")
});

pub fn is_valid_target_name(name: &str) -> bool {
    TARGET_NAME.is_match(name)
}

pub fn validate_target_name(name: &str) -> Result<(), ModAtlasError> {
    if is_valid_target_name(name) {
        Ok(())
    } else {
        Err(ModAtlasError::InvalidTargetName(name.to_string()))
    }
}

/// The mod identifier a target directory stands for: its file stem.
pub fn target_base_name(target_dir: &Path) -> String {
    target_dir
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Engine path of the atlas manifest for a sheet.
pub fn atlas_engine_name(sheet_stem: &str) -> String {
    format!("{}{}{}", ATLAS_ENGINE_DIR, ENGINE_SEPARATOR, sheet_stem)
}

/// Engine path of a sprite: `<base>\<path relative to source root, no extension>`.
///
/// Paths outside `source_root` keep their full path (minus root/prefix
/// components).
pub fn logical_name(base_name: &str, source_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(source_root).unwrap_or(path);
    let relative = relative.with_extension("");

    let mut name = base_name.to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            name.push(ENGINE_SEPARATOR);
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_accepts_owner_mod_names() {
        assert!(is_valid_target_name("AcmeCorp-CoolMod"));
        assert!(is_valid_target_name("acme-cool_mod"));
        assert!(is_valid_target_name("A1-x"));
        assert!(is_valid_target_name("Team_42b-Mod"));
    }

    #[test]
    fn test_rejects_malformed_names() {
        assert!(!is_valid_target_name("coolmod"));
        assert!(!is_valid_target_name(""));
        assert!(!is_valid_target_name("-CoolMod"));
        assert!(!is_valid_target_name("AcmeCorp-"));
        assert!(!is_valid_target_name("Acme_-Mod"));
        assert!(!is_valid_target_name("Acme Corp-Mod"));
        assert!(!is_valid_target_name("Ácme-Mod"));
    }

    #[test]
    fn test_validate_reports_name() {
        let err = validate_target_name("coolmod").unwrap_err();
        assert!(err.to_string().contains("coolmod"));
    }

    #[test]
    fn test_target_base_name_uses_stem() {
        assert_eq!(
            target_base_name(Path::new("out/AcmeCorp-CoolMod")),
            "AcmeCorp-CoolMod"
        );
        assert_eq!(target_base_name(Path::new("out/Acme-Mod.v2")), "Acme-Mod");
    }

    #[test]
    fn test_atlas_engine_name() {
        assert_eq!(atlas_engine_name("Acme-Mod0"), r"bin\Win\Atlases\Acme-Mod0");
    }

    #[test]
    fn test_logical_name_strips_root_and_extension() {
        let root = PathBuf::from("/assets/src");
        let path = root.join("icons").join("boons").join("zeus.bolt.png");

        assert_eq!(
            logical_name("Acme-Mod", &root, &path),
            r"Acme-Mod\icons\boons\zeus.bolt"
        );
    }

    #[test]
    fn test_logical_name_at_root() {
        let root = PathBuf::from("assets");
        assert_eq!(
            logical_name("Acme-Mod", &root, &root.join("a.png")),
            r"Acme-Mod\a"
        );
    }

    #[test]
    fn test_logical_name_collision_is_not_resolved() {
        let root = PathBuf::from("assets");
        let png = logical_name("Acme-Mod", &root, &root.join("ui/icon.png"));
        let dds = logical_name("Acme-Mod", &root, &root.join("ui/icon.dds"));
        assert_eq!(png, dds);
    }
}
