//! Build layout - where a build reads from and writes to.

use std::path::{Path, PathBuf};

use crate::core::workspace::{Profile, Workspace};

/// Directories and profile for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    /// Project root; object paths mirror sources relative to it
    pub root: PathBuf,
    /// Where the artifact and companions land
    pub output_dir: PathBuf,
    /// Where object files land
    pub object_dir: PathBuf,
    pub profile: Profile,
}

impl BuildLayout {
    pub fn new(root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, profile: Profile) -> Self {
        let output_dir = output_dir.into();
        BuildLayout {
            root: root.into(),
            object_dir: output_dir.join("obj"),
            output_dir,
            profile,
        }
    }

    pub fn from_workspace(ws: &Workspace) -> Self {
        BuildLayout {
            root: ws.root().to_path_buf(),
            output_dir: ws.output_dir(),
            object_dir: ws.object_dir(),
            profile: ws.profile(),
        }
    }

    /// Object file path for a source.
    ///
    /// Sources outside the root keep their relative shape with `..` spelled
    /// `__`, so distinct sources never share an object.
    pub fn object_path(&self, source: &Path, ext: &str) -> PathBuf {
        let rel = crate::util::fs::relative_path(&self.root, source);

        let mut out = self.object_dir.clone();
        for component in rel.components() {
            match component {
                std::path::Component::ParentDir => out.push("__"),
                std::path::Component::Normal(part) => out.push(part),
                _ => {}
            }
        }

        let file_name = out
            .file_name()
            .map(|n| format!("{}.{}", n.to_string_lossy(), ext))
            .unwrap_or_else(|| format!("out.{}", ext));
        out.set_file_name(file_name);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_paths_mirror_sources() {
        let layout = BuildLayout::new("/p", "/p/.extbuild/target/debug", Profile::Debug);
        assert_eq!(
            layout.object_path(Path::new("/p/src/Math/vector2.cpp"), "o"),
            PathBuf::from("/p/.extbuild/target/debug/obj/src/Math/vector2.cpp.o")
        );
    }

    #[test]
    fn test_same_file_name_in_different_dirs() {
        let layout = BuildLayout::new("/p", "/p/out", Profile::Release);
        let a = layout.object_path(Path::new("/p/src/util.cpp"), "obj");
        let b = layout.object_path(Path::new("/p/wraps/util.cpp"), "obj");
        assert_ne!(a, b);
    }

    #[test]
    fn test_sources_outside_root() {
        let layout = BuildLayout::new("/p", "/p/out", Profile::Debug);
        assert_eq!(
            layout.object_path(Path::new("/shared/lib.cxx"), "o"),
            PathBuf::from("/p/out/obj/__/shared/lib.cxx.o")
        );
    }
}
