//! Artifact naming.
//!
//! Toolchains that build interpreter extensions tag the shared library with
//! an ABI suffix (`_toolbox.cpython-311-x86_64-linux-gnu.so`). Consumers that
//! load the module by a fixed name want `_toolbox.so` instead, so the suffix
//! is stripped while the real file extension is kept.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Remove one occurrence of `suffix` from the stem of `filename`, keeping
/// its extension.
///
/// The last occurrence inside the stem is removed. A suffix that carries the
/// extension with it (`.cpython-311-x86_64.so`) may instead match at the very
/// end of the name, and the extension is put back. Matches that reach into
/// the extension any other way are ignored. The input is returned unchanged
/// when the suffix is empty, absent, or is the whole stem.
///
/// ```
/// use extbuild::strip_suffix;
///
/// assert_eq!(strip_suffix("mod.cpython-311-x86_64.so", ".cpython-311-x86_64.so"), "mod.so");
/// assert_eq!(strip_suffix("mod.so", ".cpython-311-x86_64.so"), "mod.so");
/// assert_eq!(strip_suffix("mod.pyd", ".py"), "mod.pyd");
/// ```
pub fn strip_suffix(filename: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return filename.to_string();
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let stem = &filename[..filename.len() - extension.len()];

    let stripped_stem = if suffix.len() >= extension.len() && filename.ends_with(suffix) {
        filename[..filename.len() - suffix.len()].to_string()
    } else if let Some(pos) = stem.rfind(suffix) {
        format!("{}{}", &stem[..pos], &stem[pos + suffix.len()..])
    } else {
        return filename.to_string();
    };

    if stripped_stem.is_empty() {
        return filename.to_string();
    }

    stripped_stem + &extension
}

/// The file name of the produced module, before and after suffix stripping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactName {
    /// Name the toolchain convention produces (`_mod.cpython-311-x86_64.so`)
    pub conventional: String,
    /// Name the artifact is written under
    pub final_name: String,
}

impl ArtifactName {
    /// Compose the conventional name and derive the final one.
    ///
    /// With an ABI suffix the conventional name is `stem + suffix`; without
    /// one it is `stem.ext` using the toolchain's shared library extension.
    pub fn new(stem: &str, abi_suffix: Option<&str>, shared_ext: &str, strip: bool) -> Self {
        let conventional = match abi_suffix {
            Some(suffix) if !suffix.is_empty() => format!("{}{}", stem, suffix),
            _ => format!("{}.{}", stem, shared_ext),
        };

        let final_name = match abi_suffix {
            Some(suffix) if strip => strip_suffix(&conventional, suffix),
            _ => conventional.clone(),
        };

        if final_name != conventional {
            tracing::debug!("artifact renamed: {} -> {}", conventional, final_name);
        }

        ArtifactName {
            conventional,
            final_name,
        }
    }

    /// Whether stripping changed the name.
    pub fn was_renamed(&self) -> bool {
        self.conventional != self.final_name
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.final_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUFFIX: &str = ".cpython-311-x86_64.so";

    #[test]
    fn test_strip_full_suffix_keeps_extension() {
        assert_eq!(strip_suffix("mod.cpython-311-x86_64.so", SUFFIX), "mod.so");
    }

    #[test]
    fn test_strip_suffix_without_extension_part() {
        assert_eq!(
            strip_suffix("_toolbox.cpython-311.pyd", ".cpython-311"),
            "_toolbox.pyd"
        );
    }

    #[test]
    fn test_missing_suffix_is_noop() {
        assert_eq!(strip_suffix("mod.so", SUFFIX), "mod.so");
        assert_eq!(strip_suffix("libfoo.dylib", SUFFIX), "libfoo.dylib");
        assert_eq!(strip_suffix("noext", SUFFIX), "noext");
    }

    #[test]
    fn test_empty_suffix_is_noop() {
        assert_eq!(strip_suffix("mod.so", ""), "mod.so");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let inputs = [
            "mod.cpython-311-x86_64.so",
            "mod.so",
            "_x.pyd",
            "lib_x.cpython-311-x86_64.so.1",
        ];
        for input in inputs {
            let once = strip_suffix(input, SUFFIX);
            let twice = strip_suffix(&once, SUFFIX);
            assert_eq!(once, twice, "not idempotent for {}", input);
        }
    }

    #[test]
    fn test_only_one_occurrence_removed() {
        let doubled = format!("a{}{}", ".abi3", ".abi3.so");
        assert_eq!(strip_suffix(&doubled, ".abi3"), "a.abi3.so");
    }

    #[test]
    fn test_suffix_inside_extension_is_ignored() {
        let once = strip_suffix("mod.pyd", ".py");
        assert_eq!(once, "mod.pyd");
        assert_eq!(strip_suffix(&once, ".py"), "mod.pyd");
        assert_eq!(strip_suffix("mod.so", "o"), "md.so");
        assert_eq!(strip_suffix("md.so", "o"), "md.so");
    }

    #[test]
    fn test_suffix_equal_to_filename_is_noop() {
        assert_eq!(strip_suffix(SUFFIX, SUFFIX), SUFFIX);
    }

    #[test]
    fn test_artifact_name_with_suffix() {
        let name = ArtifactName::new("_toolbox", Some(SUFFIX), "so", true);
        assert_eq!(name.conventional, "_toolbox.cpython-311-x86_64.so");
        assert_eq!(name.final_name, "_toolbox.so");
        assert!(name.was_renamed());
    }

    #[test]
    fn test_artifact_name_keep_suffix() {
        let name = ArtifactName::new("_toolbox", Some(SUFFIX), "so", false);
        assert_eq!(name.final_name, "_toolbox.cpython-311-x86_64.so");
        assert!(!name.was_renamed());
    }

    #[test]
    fn test_artifact_name_without_suffix() {
        let name = ArtifactName::new("_toolbox", None, "dll", true);
        assert_eq!(name.final_name, "_toolbox.dll");
        assert_eq!(name.to_string(), "_toolbox.dll");
    }
}
