use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::utils::{TaskError, TaskResult};

/// An immediate subdirectory of the packages root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    /// Relative to the repository root if `packages_dir` is relative.
    path: PathBuf,
}

impl Package {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<package>/<sub>` if that directory exists under `root`.
    pub fn subdir(&self, root: &Path, sub: &str) -> Option<PathBuf> {
        let rel = self.path.join(sub);
        root.join(&rel).is_dir().then_some(rel)
    }
}

#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    packages: Vec<Package>,
}

impl Workspace {
    /// Enumerate packages under `root/packages_dir`, sorted by name.
    ///
    /// Hidden entries and plain files are skipped. A missing packages
    /// directory is an empty workspace.
    pub fn discover(root: &Path, packages_dir: &Path) -> TaskResult<Self> {
        let dir = root.join(packages_dir);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("No packages directory at {}", dir.display());
                return Ok(Workspace {
                    root: root.to_path_buf(),
                    packages: Vec::new(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut packages = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy().to_string();
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            packages.push(Package {
                path: packages_dir.join(&file_name),
                name,
            });
        }
        packages.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Workspace {
            root: root.to_path_buf(),
            packages,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Packages named in `names`, or all of them when `names` is empty.
    pub fn select(&self, names: &[String]) -> TaskResult<Vec<&Package>> {
        if names.is_empty() {
            return Ok(self.packages.iter().collect());
        }
        if let Some(missing) = names
            .iter()
            .find(|name| !self.packages.iter().any(|p| &p.name == *name))
        {
            return Err(TaskError::PackageNotFound(missing.clone()));
        }
        Ok(self
            .packages
            .iter()
            .filter(|p| names.contains(&p.name))
            .collect())
    }

    /// `<package>/<sub>` for every package that has it.
    pub fn with_subdir<'a>(
        &self,
        packages: &[&'a Package],
        sub: &str,
    ) -> Vec<(&'a Package, PathBuf)> {
        packages
            .iter()
            .filter_map(|p| {
                let found = p.subdir(&self.root, sub);
                if found.is_none() {
                    debug!("    {}: no {} directory, skipped", p.name(), sub);
                }
                found.map(|dir| (*p, dir))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(dirs: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for d in dirs {
            fs::create_dir_all(dir.path().join(d)).unwrap();
        }
        dir
    }

    fn names(ws: &Workspace) -> Vec<&str> {
        ws.packages().iter().map(|p| p.name()).collect()
    }

    #[test]
    fn test_discover_sorted_immediate_dirs() {
        let dir = fixture(&["packages/zeta/src", "packages/alpha/tests", "packages/mid"]);
        fs::write(dir.path().join("packages/README.md"), "").unwrap();
        fs::create_dir_all(dir.path().join("packages/.cache")).unwrap();

        let ws = Workspace::discover(dir.path(), Path::new("packages")).unwrap();
        assert_eq!(names(&ws), vec!["alpha", "mid", "zeta"]);
        assert_eq!(ws.packages()[0].path(), Path::new("packages/alpha"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_package_name_keeps_real_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = fixture(&[]);
        let raw = OsStr::from_bytes(b"pkg\xff");
        fs::create_dir_all(dir.path().join("packages").join(raw).join("src")).unwrap();

        let ws = Workspace::discover(dir.path(), Path::new("packages")).unwrap();
        assert_eq!(ws.packages().len(), 1);
        let package = &ws.packages()[0];
        assert_eq!(package.name(), "pkg\u{fffd}");
        assert_eq!(package.path(), Path::new("packages").join(raw));
        assert!(package.subdir(dir.path(), "src").is_some());
    }

    #[test]
    fn test_missing_packages_dir_is_empty() {
        let dir = fixture(&[]);
        let ws = Workspace::discover(dir.path(), Path::new("packages")).unwrap();
        assert!(ws.packages().is_empty());
    }

    #[test]
    fn test_subdir_presence() {
        let dir = fixture(&["packages/a/src", "packages/b/tests"]);
        let ws = Workspace::discover(dir.path(), Path::new("packages")).unwrap();
        let all = ws.select(&[]).unwrap();

        let with_src = ws.with_subdir(&all, "src");
        assert_eq!(with_src.len(), 1);
        assert_eq!(with_src[0].0.name(), "a");
        assert_eq!(with_src[0].1, Path::new("packages/a/src"));

        let with_tests = ws.with_subdir(&all, "tests");
        assert_eq!(with_tests.len(), 1);
        assert_eq!(with_tests[0].0.name(), "b");
    }

    #[test]
    fn test_src_file_is_not_a_directory() {
        let dir = fixture(&["packages/a"]);
        fs::write(dir.path().join("packages/a/src"), "not a dir").unwrap();
        let ws = Workspace::discover(dir.path(), Path::new("packages")).unwrap();
        assert!(ws.packages()[0].subdir(dir.path(), "src").is_none());
    }

    #[test]
    fn test_select_by_name() {
        let dir = fixture(&["packages/a", "packages/b", "packages/c"]);
        let ws = Workspace::discover(dir.path(), Path::new("packages")).unwrap();

        let picked = ws.select(&["c".to_string(), "a".to_string()]).unwrap();
        let picked: Vec<&str> = picked.iter().map(|p| p.name()).collect();
        assert_eq!(picked, vec!["a", "c"]);

        match ws.select(&["nope".to_string()]) {
            Err(TaskError::PackageNotFound(name)) => assert_eq!(name, "nope"),
            other => panic!("expected PackageNotFound, got {:?}", other),
        }
    }
}
