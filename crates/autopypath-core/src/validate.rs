//! Validators for configuration values.
//!
//! Every validator either returns the normalized value or fails with
//! [`Error::InvalidType`] (wrong shape) or [`Error::InvalidValue`] (right
//! shape, bad content). Validation failures are never recovered from.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::defaults::MAX_NAME_LENGTH;
use crate::error::{Error, Result};
use crate::types::{LoadStrategy, MarkerType, RepoMarkers, SourceName};

/// Characters rejected in names on either Windows or POSIX.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\0'];

/// Device names Windows reserves regardless of case or extension.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const SECTION_SEPARATORS: &[u8] = b".-_";

static TOML_SECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9_.-]*[A-Za-z0-9])?$").expect("section pattern is valid")
});

/// Validate repository markers.
///
/// Returns `None` when there are no entries: an empty map means "not
/// configured", never "match nothing".
pub fn repo_markers<K: AsRef<str>>(
    entries: impl IntoIterator<Item = (K, MarkerType)>,
) -> Result<Option<RepoMarkers>> {
    let mut validated = Vec::new();
    for (name, kind) in entries {
        let name = name.as_ref();
        filename(name)?;
        validated.push((name.to_string(), kind));
    }
    if validated.is_empty() {
        return Ok(None);
    }
    Ok(Some(RepoMarkers::from_validated(validated)))
}

/// Validate a sequence of paths, preserving order and duplicates.
pub fn paths<P: AsRef<Path>>(items: impl IntoIterator<Item = P>) -> Result<Option<Vec<PathBuf>>> {
    let validated = items
        .into_iter()
        .map(|item| path_or_str(item.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok((!validated.is_empty()).then_some(validated))
}

/// Resolve a load strategy literal.
pub fn load_strategy(value: &str) -> Result<LoadStrategy> {
    value.parse()
}

/// Validate a source order: no duplicates, `None` when empty.
pub fn source_order(items: impl IntoIterator<Item = SourceName>) -> Result<Option<Vec<SourceName>>> {
    let order: Vec<SourceName> = items.into_iter().collect();

    let mut duplicates: Vec<SourceName> = Vec::new();
    for (index, source) in order.iter().enumerate() {
        if order[..index].contains(source) && !duplicates.contains(source) {
            duplicates.push(*source);
        }
    }
    if !duplicates.is_empty() {
        let names = duplicates
            .iter()
            .map(SourceName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::invalid_value(
            "path_resolution_order",
            format!("duplicate sources are not allowed: {names}"),
        ));
    }

    Ok((!order.is_empty()).then_some(order))
}

/// Resolve source literals, then validate them as a source order.
pub fn source_order_literals<S: AsRef<str>>(
    items: impl IntoIterator<Item = S>,
) -> Result<Option<Vec<SourceName>>> {
    let parsed = items
        .into_iter()
        .map(|item| item.as_ref().parse::<SourceName>())
        .collect::<Result<Vec<_>>>()?;
    source_order(parsed)
}

/// Validate a single path.
///
/// Segments are split on both `/` and `\` so the result does not depend on
/// the host platform. A leading root or drive letter is not a name and is
/// exempt from name validation.
pub fn path_or_str(path: &Path) -> Result<PathBuf> {
    let Some(text) = path.to_str() else {
        return Err(Error::invalid_type(
            "path",
            "a UTF-8 path or string",
            format!("non-UTF-8 path {}", path.display()),
        ));
    };

    if text.contains('\0') {
        return Err(Error::invalid_value("path", "path cannot contain a null byte"));
    }
    if text.trim().is_empty() {
        return Err(Error::invalid_value("path", "path cannot be empty or only whitespace"));
    }
    if text.trim_start() != text {
        return Err(Error::invalid_value("path", "path cannot have leading whitespace"));
    }
    if text.trim_end() != text {
        return Err(Error::invalid_value("path", "path cannot have trailing whitespace"));
    }
    if text.chars().all(|c| c == '\\') {
        return Err(Error::invalid_value("path", "path cannot be only backslashes"));
    }
    if text.chars().all(|c| c == '/') {
        return Err(Error::invalid_value("path", "path cannot be only forward slashes"));
    }

    for (index, segment) in text.split(['/', '\\']).enumerate() {
        if segment.is_empty() || (index == 0 && is_drive_letter(segment)) {
            continue;
        }
        filename(segment)?;
    }

    Ok(PathBuf::from(text))
}

fn is_drive_letter(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Validate a single file or directory name.
pub fn filename(name: &str) -> Result<()> {
    const FIELD: &str = "file or directory name";

    if name.trim().is_empty() {
        return Err(Error::invalid_value(FIELD, "name cannot be empty or whitespace"));
    }
    if name.trim_start() != name {
        return Err(Error::invalid_value(FIELD, "name cannot have leading whitespace"));
    }
    if name.trim_end() != name {
        return Err(Error::invalid_value(FIELD, "name cannot have trailing whitespace"));
    }
    if name.contains(['/', '\\', MAIN_SEPARATOR]) {
        return Err(Error::invalid_value(
            FIELD,
            format!("{name:?} cannot contain path separators"),
        ));
    }
    if name.contains(FORBIDDEN_CHARS) || is_reserved_name(name) {
        return Err(Error::invalid_value(FIELD, format!("{name:?} is not allowed")));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::invalid_value(
            FIELD,
            format!("{name:?} exceeds the maximum length of {MAX_NAME_LENGTH} characters"),
        ));
    }
    Ok(())
}

fn is_reserved_name(name: &str) -> bool {
    let base = name.split('.').next().unwrap_or(name).to_ascii_uppercase();
    RESERVED_NAMES.contains(&base.as_str())
}

/// Validate a dotted TOML section path such as `tool.autopypath`.
pub fn toml_section(name: &str) -> Result<&str> {
    if !TOML_SECTION_PATTERN.is_match(name) {
        return Err(Error::invalid_value(
            "toml section",
            format!("{name:?} is not a valid section name"),
        ));
    }
    let consecutive = name
        .as_bytes()
        .windows(2)
        .any(|pair| SECTION_SEPARATORS.contains(&pair[0]) && SECTION_SEPARATORS.contains(&pair[1]));
    if consecutive {
        return Err(Error::invalid_value(
            "toml section",
            format!("{name:?} cannot contain consecutive '.', '-' or '_' characters"),
        ));
    }
    Ok(name)
}

/// Strict boolean check for flags read from dynamic input.
pub fn boolean_flag(field: &str, value: &toml::Value) -> Result<bool> {
    match value {
        toml::Value::Boolean(flag) => Ok(*flag),
        other => Err(Error::invalid_type(field, "boolean", toml_type_name(other))),
    }
}

/// The file whose location anchors the search; must be an existing regular file.
pub fn context_file(path: &Path) -> Result<PathBuf> {
    let validated = path_or_str(path)?;
    if !validated.is_file() {
        return Err(Error::invalid_value(
            "context_file",
            format!("{} does not exist or is not a file", validated.display()),
        ));
    }
    Ok(validated)
}

/// A repository root; must be an existing directory.
pub fn root_dir(path: &Path) -> Result<PathBuf> {
    let validated = path_or_str(path)?;
    if !validated.is_dir() {
        return Err(Error::invalid_value(
            "repository root",
            format!("{} does not exist or is not a directory", validated.display()),
        ));
    }
    Ok(validated)
}

/// TOML type name used in error messages.
pub(crate) fn toml_type_name(value: &toml::Value) -> &'static str {
    match value {
        toml::Value::String(_) => "string",
        toml::Value::Integer(_) => "integer",
        toml::Value::Float(_) => "float",
        toml::Value::Boolean(_) => "boolean",
        toml::Value::Datetime(_) => "datetime",
        toml::Value::Array(_) => "array",
        toml::Value::Table(_) => "table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(" leading")]
    #[case("trailing ")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("what?")]
    #[case("star*")]
    #[case("pipe|")]
    #[case("colon:")]
    #[case("quote\"")]
    #[case("nul\0")]
    #[case("CON")]
    #[case("con.txt")]
    #[case("Lpt9.log")]
    #[case("com1")]
    fn filename_rejects(#[case] name: &str) {
        let err = filename(name).unwrap_err();
        assert!(err.is_value_error(), "{name:?} -> {err}");
    }

    #[rstest]
    #[case(".git")]
    #[case("pyproject.toml")]
    #[case("_darcs")]
    #[case("CONSOLE")]
    #[case("COM10")]
    fn filename_accepts(#[case] name: &str) {
        assert!(filename(name).is_ok(), "{name:?} should be accepted");
    }

    #[test]
    fn filename_length_limit() {
        assert!(filename(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(filename(&"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case(" src")]
    #[case("src ")]
    #[case("///")]
    #[case("\\\\")]
    #[case("src/\0")]
    #[case("src/CON/pkg")]
    #[case("src/what?")]
    fn path_rejects(#[case] path: &str) {
        let err = path_or_str(Path::new(path)).unwrap_err();
        assert!(err.is_value_error(), "{path:?} -> {err}");
    }

    #[rstest]
    #[case("src")]
    #[case("src/pkg")]
    #[case("/abs/src")]
    #[case("C:\\Users\\dev\\src")]
    #[case("c:/work")]
    #[case("../sibling")]
    #[case("a//b")]
    fn path_accepts(#[case] path: &str) {
        assert_eq!(path_or_str(Path::new(path)).unwrap(), PathBuf::from(path));
    }

    #[test]
    fn drive_letter_only_exempt_in_leading_position() {
        assert!(path_or_str(Path::new("src/C:/x")).is_err());
    }

    #[test]
    fn paths_preserves_order_and_duplicates() {
        let validated = paths(["b", "a", "b"]).unwrap().unwrap();
        assert_eq!(
            validated,
            vec![PathBuf::from("b"), PathBuf::from("a"), PathBuf::from("b")]
        );
    }

    #[test]
    fn empty_paths_are_none() {
        assert_eq!(paths(Vec::<&str>::new()).unwrap(), None);
    }

    #[test]
    fn empty_markers_are_none() {
        assert_eq!(repo_markers(Vec::<(&str, MarkerType)>::new()).unwrap(), None);
    }

    #[test]
    fn markers_reject_bad_names() {
        let err = repo_markers([("bad/name", MarkerType::File)]).unwrap_err();
        assert!(err.is_value_error());
    }

    #[test]
    fn source_order_rejects_duplicates_and_names_them() {
        let err = source_order([
            SourceName::Manual,
            SourceName::Dotenv,
            SourceName::Manual,
        ])
        .unwrap_err();
        assert!(err.is_value_error());
        assert!(err.to_string().contains("manual"), "{err}");
        assert!(!err.to_string().contains("dotenv"), "{err}");
    }

    #[test]
    fn source_order_literals_reject_unknown() {
        let err = source_order_literals(["manual", "env"]).unwrap_err();
        assert!(err.is_value_error());
    }

    #[test]
    fn empty_source_order_is_none() {
        assert_eq!(source_order_literals(Vec::<String>::new()).unwrap(), None);
    }

    #[test]
    fn load_strategy_literal() {
        assert_eq!(load_strategy("replace").unwrap(), LoadStrategy::Replace);
        assert!(load_strategy("merge").unwrap_err().is_value_error());
    }

    #[rstest]
    #[case("tool.autopypath")]
    #[case("tool.my-tool")]
    #[case("a")]
    #[case("tool.my_tool2")]
    fn toml_section_accepts(#[case] name: &str) {
        assert_eq!(toml_section(name).unwrap(), name);
    }

    #[rstest]
    #[case("")]
    #[case(".tool")]
    #[case("tool.")]
    #[case("tool..autopypath")]
    #[case("tool__x")]
    #[case("tool.-x")]
    #[case("tool autopypath")]
    fn toml_section_rejects(#[case] name: &str) {
        assert!(toml_section(name).unwrap_err().is_value_error());
    }

    #[test]
    fn boolean_flag_is_strict() {
        assert!(boolean_flag("strict", &toml::Value::Boolean(true)).unwrap());
        let err = boolean_flag("strict", &toml::Value::String("true".into())).unwrap_err();
        assert!(err.is_type_error());
        let err = boolean_flag("strict", &toml::Value::Integer(1)).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn context_file_must_be_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("script.py");
        std::fs::write(&file, "print('hi')").unwrap();

        assert_eq!(context_file(&file).unwrap(), file);
        assert!(context_file(dir.path()).unwrap_err().is_value_error());
        assert!(context_file(&dir.path().join("missing.py")).is_err());
    }

    #[test]
    fn root_dir_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "").unwrap();

        assert!(root_dir(dir.path()).is_ok());
        assert!(root_dir(&file).unwrap_err().is_value_error());
    }
}
