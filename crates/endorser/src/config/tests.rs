use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_parse_full_declaration() {
	let config = RegistryConfig::from_toml(
		r#"
		[[tables]]
		name = "fname"
		bits = 13
		variant = { kind = "name", capacity = 256 }
		retention = "append_only"

		[[tables]]
		name = "task_cred"
		bits = 10
		variant = { kind = "blob" }
		duplicates = "reject"
		"#,
	)
	.unwrap();

	assert_eq!(
		config.tables,
		vec![
			TableConfig::new("fname", 13, Variant::name(256)).retention(RetentionKind::AppendOnly),
			TableConfig::new("task_cred", 10, Variant::Blob).duplicates(DuplicatePolicy::Reject),
		]
	);
}

#[test]
fn test_name_capacity_defaults() {
	let config = RegistryConfig::from_toml(
		r#"
		[[tables]]
		name = "paths"
		bits = 4
		variant = { kind = "name" }
		"#,
	)
	.unwrap();
	let table = config.get("paths").unwrap();
	assert_eq!(table.variant, Variant::name(crate::variant::DEFAULT_NAME_CAPACITY));
	assert_eq!(table.retention, RetentionKind::Evictable);
	assert_eq!(table.duplicates, DuplicatePolicy::Replace);
}

#[test]
fn test_empty_document_has_no_tables() {
	assert_eq!(RegistryConfig::from_toml("").unwrap(), RegistryConfig::empty());
}

#[test]
fn test_unknown_variant_is_a_parse_error() {
	let err = RegistryConfig::from_toml(
		r#"
		[[tables]]
		name = "x"
		bits = 4
		variant = { kind = "float" }
		"#,
	)
	.unwrap_err();
	assert!(matches!(err, Error::Parse(_)), "{err}");
}

#[test]
fn test_round_trips_through_toml() {
	let config = RegistryConfig::default();
	let text = toml::to_string(&config).unwrap();
	assert_eq!(RegistryConfig::from_toml(&text).unwrap(), config);
}

#[test]
fn test_load_from_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(
		file,
		"[[tables]]\nname = \"subject\"\nbits = 3\nvariant = {{ kind = \"scalar\" }}"
	)
	.unwrap();

	let config = RegistryConfig::load(file.path()).unwrap();
	assert_eq!(config.tables, vec![TableConfig::new("subject", 3, Variant::Scalar)]);
}

#[test]
fn test_load_missing_file_reports_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("missing.toml");
	let err = RegistryConfig::load(&path).unwrap_err();
	match err {
		Error::Io { path: reported, .. } => assert_eq!(reported, path),
		other => panic!("expected I/O error, got {other}"),
	}
}

#[test]
fn test_builtin_set() {
	let config = RegistryConfig::default();
	assert_eq!(config.tables.len(), 3 + ObjectKind::ALL.len());

	let fname = config.get(FNAME_TABLE).unwrap();
	assert_eq!(fname.bits, 13);
	assert_eq!(fname.retention, RetentionKind::AppendOnly);

	for kind in ObjectKind::ALL {
		let table = config.get(kind.table_name()).unwrap();
		assert_eq!(table.variant, Variant::Scalar);
		assert_eq!(table.bits, 8);
	}
}
