//! MSVC toolchain implementation.

use std::path::{Path, PathBuf};

use crate::core::language::Language;

use super::{CommandSpec, CompileInput, CompileOptions, LinkInput, Toolchain, ToolchainPlatform};

/// MSVC toolchain (Windows).
#[derive(Debug, Clone)]
pub struct MsvcToolchain {
    /// Path to cl.exe (compiler)
    pub cl: PathBuf,
    /// Path to link.exe (linker)
    pub link: PathBuf,
}

impl MsvcToolchain {
    /// Create a new MSVC toolchain.
    pub fn new(cl: PathBuf, link: PathBuf) -> Self {
        MsvcToolchain { cl, link }
    }
}

impl Toolchain for MsvcToolchain {
    fn platform(&self) -> ToolchainPlatform {
        ToolchainPlatform::Msvc
    }

    fn compiler_path(&self, _lang: Language) -> &Path {
        // cl.exe handles both C and C++
        &self.cl
    }

    fn compile_command(
        &self,
        input: &CompileInput,
        lang: Language,
        opts: &CompileOptions,
    ) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cl);

        cmd = cmd.arg("/nologo");
        cmd = cmd.arg("/c");

        if lang == Language::Cxx {
            cmd = cmd.arg("/TP");
            cmd = cmd.arg("/EHsc");
        } else {
            cmd = cmd.arg("/TC");
        }

        if let Some(std) = opts.std {
            cmd = cmd.arg(format!("/std:{}", std.msvc_flag_value()));
        }

        if opts.profile.is_debug() {
            cmd = cmd.args(["/Od", "/Zi", "/MDd"]);
        } else {
            cmd = cmd.args(["/O2", "/MD", "/DNDEBUG"]);
        }

        for dir in &input.include_dirs {
            cmd = cmd.arg(format!("/I{}", dir.display()));
        }

        for (name, value) in &input.defines {
            match value {
                Some(v) => cmd = cmd.arg(format!("/D{}={}", name, v)),
                None => cmd = cmd.arg(format!("/D{}", name)),
            }
        }

        cmd = cmd.args(input.cflags.iter().cloned());

        cmd = cmd.arg(input.source.display().to_string());
        cmd = cmd.arg(format!("/Fo{}", input.output.display()));

        cmd
    }

    fn link_shared_command(
        &self,
        input: &LinkInput,
        _lang: Language,
        opts: &CompileOptions,
    ) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.link);

        cmd = cmd.arg("/nologo");
        cmd = cmd.arg("/DLL");
        if opts.profile.is_debug() {
            cmd = cmd.arg("/DEBUG");
        }
        cmd = cmd.arg(format!("/OUT:{}", input.output.display()));

        for obj in &input.objects {
            cmd = cmd.arg(obj.display().to_string());
        }

        cmd = cmd.args(input.ldflags.iter().cloned());

        cmd
    }

    fn object_extension(&self) -> &str {
        "obj"
    }

    fn shared_lib_extension(&self) -> &str {
        "dll"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::{CppStandard, Standard};
    use crate::core::workspace::Profile;

    fn msvc() -> MsvcToolchain {
        MsvcToolchain::new(PathBuf::from("cl"), PathBuf::from("link"))
    }

    #[test]
    fn test_msvc_cxx_compile_command() {
        let input = CompileInput {
            source: PathBuf::from("src/matrix.cpp"),
            output: PathBuf::from("obj/matrix.obj"),
            include_dirs: vec![PathBuf::from("C:/include")],
            defines: vec![("VERSION".to_string(), Some("1".to_string()))],
            cflags: vec!["/std:c++20".to_string(), "/MP".to_string()],
        };
        let opts = CompileOptions {
            std: Some(Standard::Cxx(CppStandard::Cpp17)),
            profile: Profile::Release,
        };

        let cmd = msvc().compile_command(&input, Language::Cxx, &opts);
        assert_eq!(cmd.program, PathBuf::from("cl"));
        assert!(cmd.args.contains(&"/TP".to_string()));
        assert!(cmd.args.contains(&"/EHsc".to_string()));
        assert!(cmd.args.contains(&"/std:c++17".to_string()));
        assert!(cmd.args.contains(&"/MD".to_string()));
        assert!(cmd.args.contains(&"/IC:/include".to_string()));
        assert!(cmd.args.contains(&"/DVERSION=1".to_string()));
        assert!(cmd.args.contains(&"/MP".to_string()));
        assert_eq!(cmd.args.last().unwrap(), "/Foobj/matrix.obj");
    }

    #[test]
    fn test_msvc_link_dll() {
        let input = LinkInput {
            objects: vec![PathBuf::from("a.obj")],
            output: PathBuf::from("_test.pyd"),
            ldflags: vec![],
        };
        let cmd = msvc().link_shared_command(&input, Language::Cxx, &CompileOptions::default());
        assert_eq!(cmd.program, PathBuf::from("link"));
        assert!(cmd.args.contains(&"/DLL".to_string()));
        assert!(cmd.args.contains(&"/DEBUG".to_string()));
        assert!(cmd.args.contains(&"/OUT:_test.pyd".to_string()));
    }

    #[test]
    fn test_msvc_extensions() {
        assert_eq!(msvc().object_extension(), "obj");
        assert_eq!(msvc().shared_lib_extension(), "dll");
    }
}
