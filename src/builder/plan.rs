//! Build plan generation.
//!
//! A BuildPlan spells out every command a build will run: one compile per
//! source, then a single shared-library link. It is computed up front so it
//! can be printed (`--plan`) or exported as `compile_commands.json` without
//! running anything.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::context::BuildLayout;
use crate::builder::toolchain::{
    parse_defines, CommandSpec, CompileInput, CompileOptions, LinkInput, Toolchain,
};
use crate::core::artifact::ArtifactName;
use crate::core::descriptor::BuildDescriptor;
use crate::util::fs::write_string;

/// A complete build plan.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub module: String,
    /// Toolchain family the commands were generated for
    pub toolchain: &'static str,
    pub profile: &'static str,
    /// Compilation steps, in source order
    pub compile_steps: Vec<CompileStep>,
    pub link: LinkStep,
    pub artifact: ArtifactName,
    /// Files copied next to the artifact after linking
    pub companions: Vec<PathBuf>,
}

/// Compile one source file to an object file.
#[derive(Debug, Clone, Serialize)]
pub struct CompileStep {
    pub source: PathBuf,
    pub output: PathBuf,
    pub command: CommandSpec,
}

/// Link every object into the shared library.
#[derive(Debug, Clone, Serialize)]
pub struct LinkStep {
    pub objects: Vec<PathBuf>,
    pub output: PathBuf,
    pub command: CommandSpec,
}

/// Entry in `compile_commands.json`.
#[derive(Debug, Serialize)]
struct CompileCommand {
    directory: String,
    file: String,
    arguments: Vec<String>,
    output: String,
}

impl BuildPlan {
    /// Generate the commands for a descriptor.
    pub fn new(desc: &BuildDescriptor, layout: &BuildLayout, toolchain: &dyn Toolchain) -> Self {
        let opts = CompileOptions {
            std: desc.standard,
            profile: layout.profile,
        };
        let defines = parse_defines(&desc.defines);

        let compile_steps: Vec<CompileStep> = desc
            .sources
            .iter()
            .map(|source| {
                let output = layout.object_path(source, toolchain.object_extension());
                let input = CompileInput {
                    source: source.clone(),
                    output: output.clone(),
                    include_dirs: desc.include_dirs.clone(),
                    defines: defines.clone(),
                    cflags: desc.flags.clone(),
                };
                CompileStep {
                    source: source.clone(),
                    command: toolchain.compile_command(&input, desc.language, &opts),
                    output,
                }
            })
            .collect();

        let artifact = ArtifactName::new(
            &desc.artifact_stem,
            desc.abi_suffix.as_deref(),
            toolchain.shared_lib_extension(),
            desc.strip_suffix,
        );

        let objects: Vec<PathBuf> = compile_steps.iter().map(|s| s.output.clone()).collect();
        let output = layout.output_dir.join(&artifact.final_name);
        let input = LinkInput {
            objects: objects.clone(),
            output: output.clone(),
            ldflags: desc.ldflags.clone(),
        };
        let link = LinkStep {
            command: toolchain.link_shared_command(&input, desc.language, &opts),
            objects,
            output,
        };

        BuildPlan {
            module: desc.module_name.clone(),
            toolchain: toolchain.platform().as_str(),
            profile: layout.profile.as_str(),
            compile_steps,
            link,
            artifact,
            companions: desc.companions.clone(),
        }
    }

    /// Number of compile steps.
    pub fn compile_count(&self) -> usize {
        self.compile_steps.len()
    }

    /// Path of the artifact this plan produces.
    pub fn artifact_path(&self) -> &Path {
        &self.link.output
    }

    /// Pretty-printed JSON for `--plan`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `compile_commands.json` for IDE integration.
    pub fn emit_compile_commands(&self, root: &Path, path: &Path) -> Result<()> {
        let commands: Vec<CompileCommand> = self
            .compile_steps
            .iter()
            .map(|step| {
                let mut arguments = Vec::with_capacity(step.command.args.len() + 1);
                arguments.push(step.command.program.display().to_string());
                arguments.extend(step.command.args.iter().cloned());

                CompileCommand {
                    directory: root.display().to_string(),
                    file: step.source.display().to_string(),
                    arguments,
                    output: step.output.display().to_string(),
                }
            })
            .collect();

        let json = serde_json::to_string_pretty(&commands)?;
        write_string(path, &json)?;
        tracing::info!("wrote {}", path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::{GccToolchain, ToolchainPlatform};
    use crate::core::language::Language;
    use crate::core::workspace::Profile;
    use crate::sources::SourceFileList;
    use tempfile::TempDir;

    fn descriptor(sources: &[&str]) -> BuildDescriptor {
        BuildDescriptor {
            module_name: "toolbox".to_string(),
            artifact_stem: "_toolbox".to_string(),
            language: Language::Cxx,
            standard: None,
            sources: SourceFileList::from(
                sources.iter().map(PathBuf::from).collect::<Vec<_>>(),
            ),
            include_dirs: vec![PathBuf::from("/p/include")],
            defines: vec!["LEVEL=2".to_string()],
            flags: vec!["-Wall".to_string()],
            ldflags: vec!["-lm".to_string()],
            abi_suffix: Some(".cpython-311-x86_64-linux-gnu.so".to_string()),
            strip_suffix: true,
            companions: vec![],
        }
    }

    fn gcc() -> GccToolchain {
        GccToolchain::new("gcc".into(), "g++".into(), ToolchainPlatform::Gcc)
    }

    #[test]
    fn test_plan_one_compile_per_source() {
        let desc = descriptor(&["/p/src/a.cpp", "/p/wraps/a_wrap.cxx"]);
        let layout = BuildLayout::new("/p", "/p/out/debug", Profile::Debug);
        let plan = BuildPlan::new(&desc, &layout, &gcc());

        assert_eq!(plan.compile_count(), 2);
        assert_eq!(plan.link.objects.len(), 2);
        assert_eq!(plan.artifact.final_name, "_toolbox.so");
        assert_eq!(plan.artifact_path(), Path::new("/p/out/debug/_toolbox.so"));

        let args = &plan.compile_steps[0].command.args;
        assert!(args.contains(&"-I/p/include".to_string()));
        assert!(args.contains(&"-DLEVEL=2".to_string()));
        assert!(args.contains(&"/p/src/a.cpp".to_string()));

        // User flags come after the toolchain's own
        let fpic = args.iter().position(|a| a == "-fPIC").unwrap();
        let wall = args.iter().position(|a| a == "-Wall").unwrap();
        assert!(fpic < wall);

        assert!(plan.link.command.args.contains(&"-lm".to_string()));
    }

    #[test]
    fn test_plan_without_strip_keeps_conventional_name() {
        let mut desc = descriptor(&["/p/src/a.cpp"]);
        desc.strip_suffix = false;
        let layout = BuildLayout::new("/p", "/p/out", Profile::Release);
        let plan = BuildPlan::new(&desc, &layout, &gcc());
        assert_eq!(
            plan.artifact.final_name,
            "_toolbox.cpython-311-x86_64-linux-gnu.so"
        );
    }

    #[test]
    fn test_plan_json() {
        let desc = descriptor(&["/p/src/a.cpp"]);
        let layout = BuildLayout::new("/p", "/p/out", Profile::Debug);
        let json = BuildPlan::new(&desc, &layout, &gcc()).to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["module"], "toolbox");
        assert_eq!(value["toolchain"], "gcc");
        assert_eq!(value["artifact"]["final_name"], "_toolbox.so");
        assert_eq!(value["compile_steps"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_emit_compile_commands() {
        let tmp = TempDir::new().unwrap();
        let desc = descriptor(&["/p/src/a.cpp", "/p/src/b.cpp"]);
        let layout = BuildLayout::new("/p", "/p/out", Profile::Debug);
        let plan = BuildPlan::new(&desc, &layout, &gcc());

        let path = tmp.path().join("compile_commands.json");
        plan.emit_compile_commands(Path::new("/p"), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["file"], "/p/src/a.cpp");
        assert_eq!(entries[0]["arguments"][0], "g++");
    }
}
