//! Tests for the configuration sources

use autopypath_core::{
    DotenvConfig, Error, LoadStrategy, ManualSettings, SourceConfig, SourceName, TomlConfig,
};
use autopypath_test_utils::TestRepo;
use std::collections::HashSet;

mod equality_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn equal_settings_from_different_sources_are_equal() {
        let repo = TestRepo::new();
        repo.mkdir("src");
        repo.write_pyproject(r#"paths = ["src"]"#);
        repo.write_dotenv("src");

        let manual = ManualSettings {
            paths: Some(vec![repo.path("src")]),
            ..Default::default()
        }
        .to_config()
        .unwrap();
        let pyproject = TomlConfig::pyproject(repo.root()).unwrap();
        let dotenv = DotenvConfig::load(repo.root(), false).unwrap();

        assert_eq!(&manual, pyproject.config());
        assert_eq!(pyproject.config(), dotenv.config());

        let unique: HashSet<&SourceConfig> =
            [&manual, pyproject.config(), dotenv.config()].into_iter().collect();
        assert_eq!(unique.len(), 1);
    }

    #[test]
    fn marker_order_does_not_affect_equality() {
        let repo = TestRepo::new();
        repo.write_autopypath_toml(r#"repo_markers = { ".git" = "dir", "setup.py" = "file" }"#);
        repo.write_pyproject(r#"repo_markers = { "setup.py" = "file", ".git" = "dir" }"#);

        let tool = TomlConfig::autopypath(repo.root()).unwrap();
        let manifest = TomlConfig::pyproject(repo.root()).unwrap();

        assert_eq!(tool.config(), manifest.config());
        let names: Vec<&str> = tool
            .config()
            .repo_markers()
            .unwrap()
            .iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec![".git", "setup.py"]);
    }
}

mod toml_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn custom_section_and_file() {
        let repo = TestRepo::new();
        repo.write_file(
            "tools.toml",
            "[tools.paths.config]\nload_strategy = \"replace\"\npath_resolution_order = [\"dotenv\"]\n",
        );

        let config = TomlConfig::load(repo.root(), "tools.toml", "tools.paths.config").unwrap();

        assert_eq!(config.toml_section(), "tools.paths.config");
        assert_eq!(config.config().load_strategy(), Some(LoadStrategy::Replace));
        assert_eq!(config.config().source_order().unwrap(), &[SourceName::Dotenv]);
    }

    #[test]
    fn explicit_missing_file_is_file_not_found() {
        let repo = TestRepo::new();
        let err = TomlConfig::load(repo.root(), "custom.toml", "tool.autopypath").unwrap_err();
        assert!(
            matches!(&err, Error::FileNotFound { filename, .. } if filename == "custom.toml"),
            "{err}"
        );
    }

    #[test]
    fn root_must_be_a_directory() {
        let repo = TestRepo::new();
        let file = repo.write_file("not-a-dir", "");
        assert!(TomlConfig::pyproject(&file).unwrap_err().is_value_error());
        assert!(DotenvConfig::load(&file, false).unwrap_err().is_value_error());
    }

    #[test]
    fn empty_section_defines_nothing() {
        let repo = TestRepo::new();
        let file = repo.write_autopypath_toml("");

        let config = TomlConfig::autopypath(repo.root()).unwrap();

        assert!(config.config().is_empty());
        assert_eq!(config.toml_file().path().unwrap(), file);
    }

    #[test]
    fn display_shows_each_setting() {
        let repo = TestRepo::new();
        repo.mkdir("src");
        repo.write_pyproject("paths = [\"src\"]\nload_strategy = \"prepend\"");

        let config = TomlConfig::pyproject(repo.root()).unwrap();
        let rendered = config.config().to_string();

        assert!(rendered.contains("repo_markers=None"));
        assert!(rendered.contains("load_strategy=prepend"));
        assert!(rendered.contains("path_resolution_order=None"));
        assert!(rendered.contains("src"));
    }
}
