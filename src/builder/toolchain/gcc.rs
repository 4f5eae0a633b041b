//! GCC/Clang toolchain implementation.

use std::path::{Path, PathBuf};

use crate::core::language::Language;

use super::{CommandSpec, CompileInput, CompileOptions, LinkInput, Toolchain, ToolchainPlatform};

/// GCC/Clang toolchain (Unix-like systems).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Path to the C compiler
    pub cc: PathBuf,
    /// Path to the C++ compiler
    pub cxx: PathBuf,
    /// Compiler family (gcc, clang, apple-clang)
    pub family: ToolchainPlatform,
}

impl GccToolchain {
    /// Create a new GCC-style toolchain.
    pub fn new(cc: PathBuf, cxx: PathBuf, family: ToolchainPlatform) -> Self {
        GccToolchain { cc, cxx, family }
    }

    /// Infer C++ compiler path from C compiler path.
    ///
    /// - gcc, x86_64-linux-gnu-gcc -> g++, x86_64-linux-gnu-g++
    /// - clang -> clang++
    /// - cc, /usr/bin/cc -> c++, /usr/bin/c++
    pub fn infer_cxx(cc: &Path) -> PathBuf {
        let cc_str = cc.to_string_lossy();

        if cc_str.ends_with("gcc") {
            return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 2]));
        }

        if cc_str.ends_with("clang") {
            return PathBuf::from(format!("{}++", cc_str));
        }

        // Only a whole "cc" basename, not "mycc"
        let is_standalone_cc = cc_str == "cc"
            || cc_str.ends_with("/cc")
            || cc_str.ends_with("\\cc")
            || cc_str.ends_with("-cc");

        if is_standalone_cc {
            return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 1]));
        }

        PathBuf::from(format!("{}++", cc_str))
    }

    fn driver(&self, lang: Language) -> &PathBuf {
        match lang {
            Language::C => &self.cc,
            Language::Cxx => &self.cxx,
        }
    }
}

impl Toolchain for GccToolchain {
    fn platform(&self) -> ToolchainPlatform {
        self.family
    }

    fn compiler_path(&self, lang: Language) -> &Path {
        self.driver(lang)
    }

    fn compile_command(
        &self,
        input: &CompileInput,
        lang: Language,
        opts: &CompileOptions,
    ) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.driver(lang));

        cmd = cmd.arg("-c");

        // Shared objects need position-independent code
        cmd = cmd.arg("-fPIC");

        if let Some(std) = opts.std {
            cmd = cmd.arg(format!("-std={}", std.gnu_flag_value()));
        }

        if opts.profile.is_debug() {
            cmd = cmd.args(["-g", "-O0"]);
        } else {
            cmd = cmd.args(["-O2", "-DNDEBUG"]);
        }

        for dir in &input.include_dirs {
            cmd = cmd.arg(format!("-I{}", dir.display()));
        }

        for (name, value) in &input.defines {
            match value {
                Some(v) => cmd = cmd.arg(format!("-D{}={}", name, v)),
                None => cmd = cmd.arg(format!("-D{}", name)),
            }
        }

        cmd = cmd.args(input.cflags.iter().cloned());

        cmd = cmd.arg(input.source.display().to_string());
        cmd = cmd.arg("-o");
        cmd = cmd.arg(input.output.display().to_string());

        cmd
    }

    fn link_shared_command(
        &self,
        input: &LinkInput,
        lang: Language,
        opts: &CompileOptions,
    ) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.driver(lang));

        if self.family == ToolchainPlatform::AppleClang {
            // Interpreter symbols resolve at load time
            cmd = cmd.args(["-bundle", "-undefined", "dynamic_lookup"]);
        } else {
            cmd = cmd.arg("-shared");
        }

        if opts.profile.is_debug() {
            cmd = cmd.arg("-g");
        }

        cmd = cmd.arg("-o");
        cmd = cmd.arg(input.output.display().to_string());

        for obj in &input.objects {
            cmd = cmd.arg(obj.display().to_string());
        }

        cmd = cmd.args(input.ldflags.iter().cloned());

        cmd
    }

    fn object_extension(&self) -> &str {
        "o"
    }

    fn shared_lib_extension(&self) -> &str {
        if self.family == ToolchainPlatform::AppleClang {
            "dylib"
        } else {
            "so"
        }
    }
}
