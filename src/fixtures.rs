#[cfg(test)]
pub mod test {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use serde::Serialize;

    use crate::layout::{Layout, ScopePaths};

    /// Write `content` to `dir/name`, creating parent directories.
    pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create `dir/.git/HEAD` with the given content.
    pub fn init_repo(dir: &Path, head: &str) {
        let git = dir.join(".git");
        fs::create_dir_all(&git).unwrap();
        fs::write(git.join("HEAD"), head).unwrap();
    }

    /// A layout whose system and global files live under `root`, so tests
    /// never touch the real home directory.
    pub fn sandbox(root: &Path) -> (Layout, ScopePaths) {
        let layout = Layout {
            system_config: root.join("etc").join("gitconfig"),
            ..Layout::defaults().unwrap()
        };
        let paths = ScopePaths {
            system: layout.system_config.clone(),
            global: vec![
                root.join("xdg").join("git").join("config"),
                root.join("home").join(".gitconfig"),
            ],
        };
        (layout, paths)
    }

    // -- Fixture for serde presets -----------------------------------------------

    #[derive(Serialize, Debug, PartialEq)]
    pub struct Defaults {
        pub core: CoreDefaults,
        pub mounts: MountDefaults,
        pub remote: BTreeMap<String, RemoteDefaults>,
    }

    #[derive(Serialize, Debug, PartialEq)]
    pub struct CoreDefaults {
        pub editor: String,
        pub autosync: bool,
        pub timeout: u32,
        pub signkey: Option<String>,
    }

    #[derive(Serialize, Debug, PartialEq)]
    pub struct MountDefaults {
        pub path: Vec<String>,
    }

    #[derive(Serialize, Debug, PartialEq)]
    pub struct RemoteDefaults {
        pub url: String,
    }

    impl Default for Defaults {
        fn default() -> Self {
            Self {
                core: CoreDefaults {
                    editor: "vi".into(),
                    autosync: true,
                    timeout: 45,
                    signkey: None,
                },
                mounts: MountDefaults {
                    path: vec!["/srv/a".into(), "/srv/b".into()],
                },
                remote: BTreeMap::from([(
                    "Origin".to_string(),
                    RemoteDefaults {
                        url: "https://example.com".into(),
                    },
                )]),
            }
        }
    }

    #[test]
    fn write_file_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(dir.path(), "a/b/config", "[core]\n");
        assert_eq!(fs::read_to_string(path).unwrap(), "[core]\n");
    }
}
