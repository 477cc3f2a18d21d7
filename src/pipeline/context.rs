use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::cli::PackageCodec;
use crate::naming::{target_base_name, validate_target_name};
use crate::packing::PackSettings;

/// Everything a build needs from the caller.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    /// Where the packer writes raw sheets and frame manifests
    pub work_dir: PathBuf,
    pub include_hulls: bool,
    pub package: bool,
    pub codec: PackageCodec,
    pub pack: PackSettings,
}

impl BuildOptions {
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            work_dir: PathBuf::from("."),
            include_hulls: false,
            package: true,
            codec: PackageCodec::default(),
            pack: PackSettings::default(),
        }
    }
}

/// Validated paths and names for one build.
///
/// Only a context whose base name passed validation can be constructed,
/// so holding one means the target may be touched.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub work_dir: PathBuf,
    /// Mod guid taken from the target directory name
    pub base_name: String,
}

impl BuildContext {
    pub fn new(options: &BuildOptions) -> Result<Self> {
        let base_name = target_base_name(&options.target_dir);
        validate_target_name(&base_name)?;

        Ok(Self {
            source_dir: options.source_dir.clone(),
            target_dir: options.target_dir.clone(),
            work_dir: options.work_dir.clone(),
            base_name,
        })
    }

    pub fn manifest_dir(&self) -> PathBuf {
        self.target_dir.join("manifest")
    }

    pub fn textures_dir(&self) -> PathBuf {
        self.target_dir.join("textures")
    }

    pub fn atlas_dir(&self) -> PathBuf {
        self.textures_dir().join("atlases")
    }

    /// `<target>.pkg`, next to the target directory.
    pub fn package_path(&self) -> PathBuf {
        let name = self
            .target_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.base_name.clone());
        self.target_dir.with_file_name(format!("{}.pkg", name))
    }

    /// Wipe any previous target and lay out an empty one.
    pub fn prepare_target_dir(&self) -> Result<()> {
        if self.target_dir.is_dir() {
            warn!(
                "Target directory {} already exists, deleting it",
                self.target_dir.display()
            );
            fs::remove_dir_all(&self.target_dir).with_context(|| {
                format!("failed to remove {}", self.target_dir.display())
            })?;
        }

        for dir in [self.manifest_dir(), self.atlas_dir()] {
            create_dir(&dir)?;
        }
        info!("Prepared {}", self.target_dir.display());

        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModAtlasError;

    #[test]
    fn test_context_rejects_bad_target_name() {
        let options = BuildOptions::new("sprites", "out/coolmod");
        let err = BuildContext::new(&options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModAtlasError>(),
            Some(ModAtlasError::InvalidTargetName(name)) if name == "coolmod"
        ));
    }

    #[test]
    fn test_layout_paths() {
        let options = BuildOptions::new("sprites", "out/Acme-Mod");
        let ctx = BuildContext::new(&options).unwrap();

        assert_eq!(ctx.base_name, "Acme-Mod");
        assert_eq!(ctx.manifest_dir(), PathBuf::from("out/Acme-Mod/manifest"));
        assert_eq!(
            ctx.atlas_dir(),
            PathBuf::from("out/Acme-Mod/textures/atlases")
        );
        assert_eq!(ctx.package_path(), PathBuf::from("out/Acme-Mod.pkg"));
    }

    #[test]
    fn test_prepare_replaces_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Acme-Mod");
        fs::create_dir_all(target.join("old")).unwrap();
        fs::write(target.join("old/stale.txt"), "stale").unwrap();

        let ctx = BuildContext::new(&BuildOptions::new(dir.path(), &target)).unwrap();
        ctx.prepare_target_dir().unwrap();

        let mut entries: Vec<_> = fs::read_dir(&target)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        assert_eq!(entries, vec!["manifest", "textures"]);
        assert!(ctx.atlas_dir().is_dir());
    }
}
