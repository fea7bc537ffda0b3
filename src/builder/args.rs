//! Argument vectors for the configure and build invocations.
//!
//! [`ArgumentBuilder`] is a pure function of the task name, the settings and
//! the host. It never touches the filesystem, so the exact command line can
//! be checked without running anything.

use std::path::Path;

use crate::builder::errors::TaskError;
use crate::core::settings::{non_empty, on_off, BuildSettings};
use crate::core::task::{targets_linux, TaskKind};
use crate::core::HostPlatform;

/// Executable used to reach the Linux guest from a Windows host.
pub const GUEST_SHELL: &str = "wsl.exe";

/// Flag selecting a WSL distribution.
pub const DISTRIBUTION_FLAG: &str = "--distribution";

/// Builds the command line for one task invocation.
pub struct ArgumentBuilder<'a> {
    task: &'a str,
    settings: &'a BuildSettings,
    host: &'a dyn HostPlatform,
}

impl<'a> ArgumentBuilder<'a> {
    pub fn new(task: &'a str, settings: &'a BuildSettings, host: &'a dyn HostPlatform) -> Self {
        ArgumentBuilder {
            task,
            settings,
            host,
        }
    }

    /// Whether this invocation runs inside the Linux guest.
    ///
    /// Evaluated on every call: the host is fixed, the task name is not.
    pub fn dispatches_to_guest(&self) -> bool {
        targets_linux(self.task) && self.host.os().is_windows()
    }

    /// Arguments for the given task kind.
    pub fn for_kind(&self, kind: TaskKind) -> Result<Vec<String>, TaskError> {
        match kind {
            TaskKind::Configure => self.configure(),
            TaskKind::Build => Ok(self.build()),
        }
    }

    /// `[wsl.exe ...] cmake [-G ..] [-A ..] [-T ..] [-D...]... <source>`
    pub fn configure(&self) -> Result<Vec<String>, TaskError> {
        let source_dir = self
            .settings
            .source_dir()
            .ok_or_else(|| TaskError::MissingSetting {
                task: self.task.to_string(),
                setting: "source_dir",
            })?;

        let s = self.settings;
        let mut args = self.prefix();

        if let Some(generator) = non_empty(&s.generator) {
            args.push("-G".to_string());
            args.push(generator.to_string());
        }

        if let Some(platform) = non_empty(&s.platform) {
            args.push("-A".to_string());
            args.push(platform.to_string());
        }

        if let Some(toolset) = non_empty(&s.toolset) {
            args.push("-T".to_string());
            args.push(toolset.to_string());
        }

        if let Some(types) = non_empty(&s.configuration_types) {
            args.push(format!("-DCMAKE_CONFIGURATION_TYPES={}", types));
        }

        if let Some(prefix) = non_empty(&s.install_prefix) {
            args.push(format!("-DCMAKE_INSTALL_PREFIX={}", prefix));
        }

        if let Some(shared) = s.build_shared_libs {
            args.push(format!("-DBUILD_SHARED_LIBS={}", on_off(shared)));
        }

        if let Some(static_libs) = s.build_static_libs {
            args.push(format!("-DBUILD_STATIC_LIBS={}", on_off(static_libs)));
        }

        for (key, value) in &s.options {
            args.push(format!("-D{}={}", key, value));
        }

        let source = absolute(source_dir);
        if self.dispatches_to_guest() {
            args.push(guest_path(&source));
        } else {
            args.push(source);
        }

        Ok(args)
    }

    /// `[wsl.exe ...] cmake --build . [--config C] [--target T] [--clean-first] [-- -jN]`
    pub fn build(&self) -> Vec<String> {
        let s = self.settings;
        let mut args = self.prefix();

        // The tool runs inside the working directory.
        args.push("--build".to_string());
        args.push(".".to_string());

        // An empty config or target is left out rather than passed as "".
        if let Some(config) = non_empty(&s.build_config) {
            args.push("--config".to_string());
            args.push(config.to_string());
        }

        if let Some(target) = non_empty(&s.build_target) {
            args.push("--target".to_string());
            args.push(target.to_string());
        }

        if s.clean_first() {
            args.push("--clean-first".to_string());
        }

        if s.parallel() {
            args.push("--".to_string());
            args.push(format!("-j{}", self.host.job_count()));
        }

        args
    }

    /// Guest dispatch prefix followed by the executable.
    fn prefix(&self) -> Vec<String> {
        let mut args = Vec::new();
        let guest = self.dispatches_to_guest();

        if guest {
            args.push(GUEST_SHELL.to_string());
            if let Some(distribution) = non_empty(&self.settings.distribution) {
                args.push(DISTRIBUTION_FLAG.to_string());
                args.push(distribution.to_string());
            }
        }

        let executable = self.settings.executable();
        if guest && is_native_absolute(executable) {
            args.push(guest_path(executable));
        } else {
            args.push(executable.to_string());
        }

        args
    }
}

/// `C:\...` style path: the second character is the drive colon.
fn is_native_absolute(path: &str) -> bool {
    path.char_indices().nth(1).is_some_and(|(_, c)| c == ':')
}

/// Shell expression converting a Windows path into its WSL mount path.
pub fn guest_path(path: &str) -> String {
    format!("$(wslpath -u '{}')", path)
}

fn absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedHost, HostOs};

    const LINUX: FixedHost = FixedHost {
        os: HostOs::Linux,
        parallelism: 4,
    };
    const WINDOWS: FixedHost = FixedHost {
        os: HostOs::Windows,
        parallelism: 4,
    };

    fn settings() -> BuildSettings {
        BuildSettings::new("/work/build").with_source_dir("/work/src")
    }

    #[test]
    fn test_minimal_configure() {
        let s = settings();
        let args = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap();

        assert_eq!(args, ["cmake", "/work/src"]);
    }

    #[test]
    fn test_configure_full_order() {
        let mut s = settings().with_executable("/opt/cmake/bin/cmake");
        s.generator = Some("Ninja".to_string());
        s.platform = Some("x64".to_string());
        s.toolset = Some("v142".to_string());
        s.configuration_types = Some("Debug;Release".to_string());
        s.install_prefix = Some("/work/dist".to_string());
        s.build_shared_libs = Some(true);
        s.build_static_libs = Some(false);
        let s = s.with_option("FOO", "1").with_option("BAR", "two words");

        let args = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap();

        assert_eq!(
            args,
            [
                "/opt/cmake/bin/cmake",
                "-G",
                "Ninja",
                "-A",
                "x64",
                "-T",
                "v142",
                "-DCMAKE_CONFIGURATION_TYPES=Debug;Release",
                "-DCMAKE_INSTALL_PREFIX=/work/dist",
                "-DBUILD_SHARED_LIBS=ON",
                "-DBUILD_STATIC_LIBS=OFF",
                "-DFOO=1",
                "-DBAR=two words",
                "/work/src",
            ]
        );
    }

    #[test]
    fn test_unset_generator_platform_toolset_are_omitted() {
        let mut s = settings();
        s.generator = Some(String::new());
        s.install_prefix = Some(String::new());

        let args = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap();

        for flag in ["-G", "-A", "-T"] {
            assert!(!args.iter().any(|a| a == flag), "unexpected {}", flag);
        }
        assert!(!args.iter().any(|a| a.starts_with("-DCMAKE_INSTALL_PREFIX")));
    }

    #[test]
    fn test_empty_build_config_and_target_are_omitted() {
        let mut s = settings();
        s.build_config = Some(String::new());
        s.build_target = Some(String::new());

        let args = ArgumentBuilder::new("cmakeBuild", &s, &LINUX).build();
        assert_eq!(args, ["cmake", "--build", "."]);
    }

    #[test]
    fn test_options_in_insertion_order() {
        let s = settings()
            .with_option("Z_LAST_ALPHA", "a")
            .with_option("A_FIRST_ALPHA", "b")
            .with_option("WITH_EQ", "x=y");

        let args = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap();

        let defines: Vec<_> = args.iter().filter(|a| a.starts_with("-D")).collect();
        assert_eq!(
            defines,
            ["-DZ_LAST_ALPHA=a", "-DA_FIRST_ALPHA=b", "-DWITH_EQ=x=y"]
        );
    }

    #[test]
    fn test_shared_libs_tri_state() {
        let mut s = settings();
        let count = |args: &[String], token: &str| args.iter().filter(|a| *a == token).count();

        let args = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap();
        assert!(!args.iter().any(|a| a.starts_with("-DBUILD_SHARED_LIBS")));
        assert!(!args.iter().any(|a| a.starts_with("-DBUILD_STATIC_LIBS")));

        s.build_shared_libs = Some(true);
        let args = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap();
        assert_eq!(count(&args, "-DBUILD_SHARED_LIBS=ON"), 1);
        assert_eq!(count(&args, "-DBUILD_SHARED_LIBS=OFF"), 0);

        s.build_shared_libs = Some(false);
        let args = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap();
        assert_eq!(count(&args, "-DBUILD_SHARED_LIBS=OFF"), 1);
    }

    #[test]
    fn test_source_dir_is_last() {
        let mut s = settings().with_option("A", "1");
        s.generator = Some("Unix Makefiles".to_string());
        s.build_static_libs = Some(true);

        let args = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap();
        assert_eq!(args.last().map(String::as_str), Some("/work/src"));
    }

    #[test]
    fn test_relative_source_dir_is_made_absolute() {
        let s = BuildSettings::new("build").with_source_dir("project");
        let args = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap();

        let last = args.last().unwrap();
        assert!(Path::new(last).is_absolute());
        assert!(last.ends_with("project"));
    }

    #[test]
    fn test_configure_requires_source_dir() {
        let s = BuildSettings::new("build");
        let err = ArgumentBuilder::new("cmakeConfigure", &s, &LINUX)
            .configure()
            .unwrap_err();

        assert!(matches!(
            err,
            TaskError::MissingSetting {
                setting: "source_dir",
                ..
            }
        ));
    }

    #[test]
    fn test_minimal_build() {
        let s = settings();
        let args = ArgumentBuilder::new("cmakeBuild", &s, &LINUX).build();
        assert_eq!(args, ["cmake", "--build", "."]);
    }

    #[test]
    fn test_build_full_order() {
        let mut s = settings();
        s.build_config = Some("Release".to_string());
        s.build_target = Some("install".to_string());
        s.build_clean = Some(true);
        s.job_count = Some(2);

        let host = FixedHost::new(HostOs::Linux, 16);
        let args = ArgumentBuilder::new("cmakeBuild", &s, &host).build();

        assert_eq!(
            args,
            [
                "cmake",
                "--build",
                ".",
                "--config",
                "Release",
                "--target",
                "install",
                "--clean-first",
                "--",
                "-j8",
            ]
        );
    }

    #[test]
    fn test_build_job_count_uses_host() {
        let mut s = settings();
        s.job_count = Some(64);

        let host = FixedHost::new(HostOs::Linux, 3);
        let args = ArgumentBuilder::new("cmakeBuild", &s, &host).build();
        assert_eq!(&args[args.len() - 2..], ["--", "-j3"]);

        s.job_count = None;
        let args = ArgumentBuilder::new("cmakeBuild", &s, &host).build();
        assert!(!args.iter().any(|a| a == "--" || a.starts_with("-j")));
    }

    #[test]
    fn test_clean_false_is_omitted() {
        let mut s = settings();
        s.build_clean = Some(false);
        let args = ArgumentBuilder::new("cmakeBuild", &s, &LINUX).build();
        assert!(!args.iter().any(|a| a == "--clean-first"));
    }

    #[test]
    fn test_guest_dispatch_on_windows() {
        let mut s = BuildSettings::new("C:\\work\\build").with_source_dir("C:\\work\\src");
        s.distribution = Some("Ubuntu-22.04".to_string());

        let args = ArgumentBuilder::new("linuxBuild", &s, &WINDOWS).build();
        assert_eq!(
            args,
            ["wsl.exe", "--distribution", "Ubuntu-22.04", "cmake", "--build", "."]
        );
    }

    #[test]
    fn test_guest_dispatch_empty_distribution() {
        let mut s = settings();
        s.distribution = Some(String::new());

        let args = ArgumentBuilder::new("linuxBuild", &s, &WINDOWS).build();
        assert_eq!(args, ["wsl.exe", "cmake", "--build", "."]);
    }

    #[test]
    fn test_no_dispatch_off_windows() {
        let mut s = settings();
        s.distribution = Some("Ubuntu".to_string());

        for os in [HostOs::Linux, HostOs::MacOs, HostOs::Other] {
            let host = FixedHost::new(os, 4);
            let builder = ArgumentBuilder::new("linuxConfigure", &s, &host);
            assert!(!builder.dispatches_to_guest());
            assert_eq!(builder.configure().unwrap()[0], "cmake");
            assert_eq!(builder.build()[0], "cmake");
        }
    }

    #[test]
    fn test_no_dispatch_without_marker() {
        let s = settings();
        let builder = ArgumentBuilder::new("win64Configure", &s, &WINDOWS);
        assert!(!builder.dispatches_to_guest());
        assert_eq!(builder.build()[0], "cmake");
    }

    #[test]
    fn test_guest_executable_and_source_translation() {
        let s = BuildSettings::new("C:\\work\\build")
            .with_source_dir("/mnt/c/work/src")
            .with_executable("C:\\Program Files\\CMake\\bin\\cmake.exe");

        let builder = ArgumentBuilder::new("linuxConfigure", &s, &WINDOWS);
        let args = builder.configure().unwrap();

        assert_eq!(args[0], "wsl.exe");
        assert_eq!(
            args[1],
            "$(wslpath -u 'C:\\Program Files\\CMake\\bin\\cmake.exe')"
        );
        assert_eq!(
            args.last().map(String::as_str),
            Some("$(wslpath -u '/mnt/c/work/src')")
        );

        let args = builder.build();
        assert_eq!(
            args[1],
            "$(wslpath -u 'C:\\Program Files\\CMake\\bin\\cmake.exe')"
        );
    }

    #[test]
    fn test_guest_keeps_plain_executable_name() {
        let s = settings().with_executable("/usr/local/bin/cmake");
        let args = ArgumentBuilder::new("linuxBuild", &s, &WINDOWS).build();
        assert_eq!(args[1], "/usr/local/bin/cmake");
    }

    #[test]
    fn test_for_kind() {
        let s = settings();
        let builder = ArgumentBuilder::new("task", &s, &LINUX);
        assert_eq!(
            builder.for_kind(TaskKind::Build).unwrap(),
            builder.build()
        );
        assert_eq!(
            builder.for_kind(TaskKind::Configure).unwrap(),
            builder.configure().unwrap()
        );
    }
}
