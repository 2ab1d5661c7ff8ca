//! Project automation entry point.
//!
//! Implements the `xtask` command-line helpers for building, packaging,
//! and linting the Gunsmith Tweaks mod data.

use std::{
    ffi::OsStr,
    fs,
    fs::File,
    io,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result, anyhow, bail};
use cargo_metadata::MetadataCommand;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gunsmith_data::{QuestId, ValidationError, lint_description_overrides, lint_reward_overrides};
use gunsmith_tweaks::loader::{load_config, load_description_overrides, load_reward_overrides};
use gunsmith_tweaks::{EditableSet, ModDirectory, OverrideFile};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

const PACKAGE: &str = "gunsmith_tweaks";

#[derive(Parser)]
#[command(author, version, about = "Project automation tasks for Gunsmith Tweaks.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dry-run harness.
    Build(BuildArgs),
    /// Stage the mod data (and harness binary) for distribution.
    Package(PackageArgs),
    /// Check the override files for entries the mod would skip.
    LintData(LintDataArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Select cargo profile (debug or release).
    #[arg(long, value_enum, default_value_t = Profile::Release)]
    profile: Profile,
    /// Build for a specific target triple.
    #[arg(long)]
    target: Option<String>,
}

#[derive(Args)]
struct PackageArgs {
    /// Override the target triple (defaults to host compiler triple).
    #[arg(long)]
    target: Option<String>,
    /// Cargo build profile used for artifacts.
    #[arg(long, value_enum, default_value_t = Profile::Release)]
    profile: Profile,
    /// Where to place staged packages.
    #[arg(long, value_name = "DIR")]
    dist_dir: Option<PathBuf>,
    /// Desired archive style.
    #[arg(long, value_enum, default_value_t = ArchiveFormat::Zip, alias = "archive")]
    format: ArchiveFormat,
    /// Override generated package directory/archive name.
    #[arg(long, value_name = "NAME")]
    name: Option<String>,
    /// Leave the harness binary out and ship data files only.
    #[arg(long)]
    data_only: bool,
}

#[derive(Args)]
struct LintDataArgs {
    /// Mod root containing config/ and db/.
    #[arg(long, value_name = "DIR", default_value = "gunsmith_tweaks/data")]
    data_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Debug,
    Release,
}

impl Profile {
    fn cargo_flag(self) -> Option<&'static str> {
        match self {
            Profile::Debug => None,
            Profile::Release => Some("--release"),
        }
    }

    fn dir_name(self) -> &'static str {
        match self {
            Profile::Debug => "debug",
            Profile::Release => "release",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ArchiveFormat {
    Zip,
    Directory,
}

struct Workspace {
    root: PathBuf,
    target_dir: PathBuf,
    mod_version: String,
    host_triple: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let workspace = Workspace::detect()?;

    match cli.command {
        Commands::Build(args) => build(&workspace, &args),
        Commands::Package(args) => package(&workspace, &args),
        Commands::LintData(args) => lint_data(&workspace, &args),
    }
}

fn build(workspace: &Workspace, args: &BuildArgs) -> Result<()> {
    let mut command = cargo_cmd("build", workspace);
    command.arg("-p").arg(PACKAGE);
    if let Some(flag) = args.profile.cargo_flag() {
        command.arg(flag);
    }
    if let Some(target) = &args.target {
        command.arg("--target").arg(target);
    }

    run_command(&mut command, "cargo build (gunsmith_tweaks)")
}

fn package(workspace: &Workspace, args: &PackageArgs) -> Result<()> {
    let data_src = workspace.root.join("gunsmith_tweaks/data");
    let problems = lint_mod_dir(&data_src)?;
    if !problems.is_empty() {
        bail!("refusing to package: {} data problem(s); run `cargo xtask lint-data`", problems.len());
    }

    let target_triple = args.target.clone().unwrap_or_else(|| workspace.host_triple.clone());
    let binary_name = executable_name(PACKAGE, &target_triple);
    let binary_path = artifact_path(&workspace.target_dir, &binary_name, args.profile, args.target.as_deref());

    if !args.data_only {
        build(
            workspace,
            &BuildArgs {
                profile: args.profile,
                target: args.target.clone(),
            },
        )?;
        if !binary_path.exists() {
            bail!("expected harness binary at '{}' but it was not found", binary_path.display());
        }
    }

    let dist_root = args.dist_dir.clone().unwrap_or_else(|| workspace.target_dir.join("dist"));
    fs::create_dir_all(&dist_root).with_context(|| format!("unable to ensure dist dir {}", dist_root.display()))?;

    let package_name = args.name.clone().unwrap_or_else(|| {
        if args.data_only {
            format!("gunsmith-tweaks-v{}", workspace.mod_version)
        } else {
            format!("gunsmith-tweaks-v{}-{}", workspace.mod_version, target_triple)
        }
    });

    let staging_dir = dist_root.join(&package_name);
    ensure_clean_dir(&staging_dir)?;

    // The host only reads config/ and db/; the database dumps are harness fixtures.
    for sub in ["config", "db"] {
        copy_dir_recursive(&data_src.join(sub), &staging_dir.join(sub))
            .with_context(|| format!("copying {sub} from {}", data_src.display()))?;
    }

    if !args.data_only {
        fs::copy(&binary_path, staging_dir.join(&binary_name))
            .with_context(|| format!("failed to copy {}", binary_path.display()))?;
        copy_dir_recursive(&data_src.join("database"), &staging_dir.join("database"))
            .with_context(|| format!("copying database from {}", data_src.display()))?;
    }

    copy_support_files(workspace, &staging_dir)?;

    match args.format {
        ArchiveFormat::Directory => {
            println!("Package staged at {}", staging_dir.display());
        },
        ArchiveFormat::Zip => {
            let archive_path = dist_root.join(format!("{package_name}.zip"));
            create_zip_from_dir(&staging_dir, &archive_path)
                .with_context(|| format!("creating archive {}", archive_path.display()))?;
            println!("Archive written to {}", archive_path.display());
        },
    }

    Ok(())
}

fn lint_data(workspace: &Workspace, args: &LintDataArgs) -> Result<()> {
    let data_dir = workspace.root.join(&args.data_dir);
    let problems = lint_mod_dir(&data_dir)?;
    if problems.is_empty() {
        println!("{}: override data is clean", data_dir.display());
        return Ok(());
    }
    for problem in &problems {
        println!("- {problem}");
    }
    bail!("{} data problem(s) found in {}", problems.len(), data_dir.display());
}

/// Parse every mod file and collect entries the plugin would skip.
fn lint_mod_dir(data_dir: &Path) -> Result<Vec<ValidationError>> {
    let mods = ModDirectory::new(data_dir);
    let editable = EditableSet::gunsmith();
    let is_editable = |id: &QuestId| editable.contains(id);

    load_config(&data_dir.join("config/config.json")).context("while linting mod config")?;

    let mut problems = Vec::new();
    for file in [OverrideFile::Default, OverrideFile::LoreAccurate] {
        let overrides =
            load_reward_overrides(&mods.path_of(file)).with_context(|| format!("while linting {}", file.file_name()))?;
        problems.extend(lint_reward_overrides(file.file_name(), &overrides, is_editable));
    }
    let descriptions = load_description_overrides(&mods.path_of(OverrideFile::Descriptions))
        .context("while linting Descriptions.json")?;
    problems.extend(lint_description_overrides(
        OverrideFile::Descriptions.file_name(),
        &descriptions,
        is_editable,
    ));
    Ok(problems)
}

fn ensure_clean_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path).with_context(|| format!("removing existing directory {}", path.display()))?;
    }
    fs::create_dir_all(path).with_context(|| format!("creating directory {}", path.display()))
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    if dst.exists() {
        fs::remove_dir_all(dst).with_context(|| format!("clearing {}", dst.display()))?;
    }
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("walking {}", src.display()))?;
        let path = entry.path();
        let relative = match path.strip_prefix(src) {
            Ok(rel) if rel.as_os_str().is_empty() => {
                fs::create_dir_all(dst).with_context(|| format!("creating {}", dst.display()))?;
                continue;
            },
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target_path = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path).with_context(|| format!("creating {}", target_path.display()))?;
        } else {
            if let Some(parent) = target_path.parent() {
                fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::copy(path, &target_path)
                .with_context(|| format!("copying '{}' to '{}'", path.display(), target_path.display()))?;
        }
    }
    Ok(())
}

fn copy_support_files(workspace: &Workspace, staging_dir: &Path) -> Result<()> {
    copy_optional_file(&workspace.root.join("LICENSE"), &staging_dir.join("LICENSE"))?;
    copy_optional_file(&workspace.root.join("README.md"), &staging_dir.join("README.md"))
}

fn copy_optional_file(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        return Ok(());
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::copy(src, dst).with_context(|| format!("copying '{}' to '{}'", src.display(), dst.display()))?;
    Ok(())
}

fn create_zip_from_dir(src: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest)?;
    let mut zip = ZipWriter::new(file);
    let dir_options = FileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .unix_permissions(0o755);

    for entry in WalkDir::new(src) {
        let entry = entry?;
        let path = entry.path();
        let rel = match path.strip_prefix(src) {
            Ok(rel) if rel.as_os_str().is_empty() => continue,
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let mut name = rel.to_string_lossy().replace('\\', "/");
        if entry.file_type().is_dir() {
            if !name.ends_with('/') {
                name.push('/');
            }
            zip.add_directory(name, dir_options)?;
            continue;
        }

        let perms = if is_executable_candidate(rel) { 0o755 } else { 0o644 };
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(perms);
        zip.start_file(name, options)?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

fn is_executable_candidate(path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(OsStr::to_str) else {
        return false;
    };
    file_name.ends_with(".exe") || file_name == PACKAGE
}

fn cargo_cmd(subcommand: &str, workspace: &Workspace) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg(subcommand);
    cmd.current_dir(&workspace.root);
    cmd
}

fn run_command(command: &mut Command, label: &str) -> Result<()> {
    let status = command.status().with_context(|| format!("{label} failed to start"))?;
    if !status.success() {
        bail!("{label} exited with {}", status);
    }
    Ok(())
}

fn artifact_path(target_dir: &Path, binary: &str, profile: Profile, target: Option<&str>) -> PathBuf {
    let mut path = target_dir.to_path_buf();
    if let Some(triple) = target {
        path.push(triple);
    }
    path.push(profile.dir_name());
    path.push(binary);
    path
}

fn executable_name(base: &str, target_triple: &str) -> String {
    if target_triple.contains("windows") {
        format!("{base}.exe")
    } else {
        base.to_string()
    }
}

impl Workspace {
    fn detect() -> Result<Self> {
        let metadata = MetadataCommand::new()
            .no_deps()
            .exec()
            .context("gathering cargo metadata for workspace")?;

        let root = metadata.workspace_root.into_std_path_buf();
        let target_dir = metadata.target_directory.into_std_path_buf();
        let mod_version = metadata
            .packages
            .iter()
            .find(|package| package.name == PACKAGE)
            .map(|package| package.version.to_string())
            .context("unable to find gunsmith_tweaks package metadata")?;

        Ok(Self {
            root,
            target_dir,
            mod_version,
            host_triple: detect_host_triple()?,
        })
    }
}

fn detect_host_triple() -> Result<String> {
    let output = Command::new("rustc")
        .arg("-vV")
        .output()
        .context("running `rustc -vV`")?;
    if !output.status.success() {
        bail!("`rustc -vV` exited with {}", output.status);
    }
    let stdout = String::from_utf8(output.stdout).context("parsing rustc output as UTF-8")?;
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("host: ").map(str::to_string))
        .ok_or_else(|| anyhow!("failed to parse host triple from rustc -vV output"))
}
