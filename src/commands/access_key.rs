//! Access-key export: Terraform config and import script.
//!
//! One-shot export like the property command: whole files, pre-flight
//! guard against existing targets. The interesting part is the credential
//! mapping, where the key's versions land in `credential_a`/`credential_b`
//! blocks with the newest version always in `credential_a`.

use anyhow::Result;
use edgeapi::EdgeClient;
use edgeapi::cloudaccess::{AccessKey, AccessKeyVersion, CloudAccessApi, KeyGroup};
use std::fmt::Write as _;
use std::fs;
use tfkit::WorkDir;
use tfkit::address::normalize_label;
use tfkit::{import, scan};

use crate::Context as AppContext;
use crate::cli::AccessKeyArgs;
use crate::paths;
use crate::ui;

// ============================================================================
// Public entry points
// ============================================================================

/// Access-key export against the live API (`tfport access-key`)
pub fn run(ctx: &AppContext, args: AccessKeyArgs) -> Result<()> {
    let section = paths::section(ctx.section.as_deref());
    let credentials = paths::credentials_file(ctx.credentials.as_deref())?;
    let creds = edgeapi::credentials::load(&credentials, &section)?;
    let client = EdgeClient::new(&creds);
    export(ctx, &client, &section, args)
}

/// Export one access key against any cloud-access API implementation.
pub fn export(
    ctx: &AppContext,
    api: &dyn CloudAccessApi,
    section: &str,
    args: AccessKeyArgs,
) -> Result<()> {
    let work = WorkDir::new(paths::expand(&args.work_dir))?;
    ui::header(&format!("Access key export: {}", args.uid));

    let config_path = work.file("cloudaccess.tf");
    let variables_path = work.file("variables.tf");
    let import_path = work.file("import.sh");
    scan::ensure_absent([
        config_path.as_path(),
        variables_path.as_path(),
        import_path.as_path(),
    ])?;

    let key = api.get_access_key(args.uid)?;
    let group = key.primary_group()?;
    let versions = api.list_key_versions(args.uid)?;
    let (credential_a, credential_b) = credentials(versions);

    if ctx.verbose > 0 {
        ui::kv("Key", &key.access_key_name);
        ui::kv("Group", &group.group_id.to_string());
        ui::kv("Method", &key.authentication_method);
    }

    fs::write(
        &config_path,
        cloudaccess_tf(&key, group, credential_a.as_ref(), credential_b.as_ref()),
    )?;
    fs::write(&variables_path, variables_tf(section))?;
    import::write_import_script(&import_path, &import_sh(&key))?;

    ui::success(&format!(
        "Access key export complete: {} ({})",
        key.access_key_name,
        ui::count_noun(
            usize::from(credential_a.is_some()) + usize::from(credential_b.is_some()),
            "credential"
        ),
    ));
    Ok(())
}

// ============================================================================
// Credential mapping
// ============================================================================

/// Pick the versions for the `credential_a`/`credential_b` blocks.
///
/// After an ascending sort by version number, the newest version is
/// `credential_a` and the second-newest `credential_b`. The API keeps at
/// most two versions alive, so anything older only shows up in stale
/// listings and is dropped.
fn credentials(
    mut versions: Vec<AccessKeyVersion>,
) -> (Option<AccessKeyVersion>, Option<AccessKeyVersion>) {
    versions.sort_by_key(|v| v.version);
    match versions.len() {
        0 => (None, None),
        1 => (versions.pop(), None),
        _ => {
            let newest = versions.pop();
            let previous = versions.pop();
            (newest, previous)
        }
    }
}

// ============================================================================
// Terraform text
// ============================================================================

fn cloudaccess_tf(
    key: &AccessKey,
    group: &KeyGroup,
    credential_a: Option<&AccessKeyVersion>,
    credential_b: Option<&AccessKeyVersion>,
) -> String {
    let label = normalize_label(&key.access_key_name);
    let contract_id = group.contract_ids.first().map(String::as_str).unwrap_or_default();

    let mut out = String::new();
    writeln!(out, "provider \"cdn\" {{").unwrap();
    writeln!(out, "  section = var.section").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "resource \"cdn_access_key\" \"{label}\" {{").unwrap();
    writeln!(out, "  access_key_name = \"{}\"", key.access_key_name).unwrap();
    writeln!(
        out,
        "  authentication_method = \"{}\"",
        key.authentication_method
    )
    .unwrap();
    writeln!(out, "  contract_id = \"{contract_id}\"").unwrap();
    writeln!(out, "  group_id = {}", group.group_id).unwrap();

    for (block, version) in [("credential_a", credential_a), ("credential_b", credential_b)] {
        if let Some(version) = version {
            writeln!(out).unwrap();
            writeln!(out, "  {block} {{").unwrap();
            if let Some(id) = &version.cloud_access_key_id {
                writeln!(out, "    cloud_access_key_id = \"{id}\"").unwrap();
            }
            writeln!(out, "    version = {}", version.version).unwrap();
            writeln!(out, "  }}").unwrap();
        }
    }

    if let Some(net) = &key.network_configuration {
        writeln!(out).unwrap();
        writeln!(out, "  network_configuration {{").unwrap();
        writeln!(out, "    security_network = \"{}\"", net.security_network).unwrap();
        if let Some(cdn) = &net.additional_cdn {
            writeln!(out, "    additional_cdn = \"{cdn}\"").unwrap();
        }
        writeln!(out, "  }}").unwrap();
    }

    writeln!(out, "}}").unwrap();
    out
}

fn variables_tf(section: &str) -> String {
    let mut out = String::new();
    writeln!(out, "variable \"section\" {{").unwrap();
    writeln!(out, "  default = \"{section}\"").unwrap();
    writeln!(out, "}}").unwrap();
    out
}

fn import_sh(key: &AccessKey) -> String {
    let mut out = String::new();
    writeln!(out, "terraform init").unwrap();
    writeln!(
        out,
        "terraform import cdn_access_key.{} {}",
        normalize_label(&key.access_key_name),
        key.access_key_uid
    )
    .unwrap();
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use edgeapi::cloudaccess::{MockCloudAccess, NetworkConfiguration};
    use std::path::Path;
    use tempfile::TempDir;

    fn ctx() -> AppContext {
        AppContext {
            verbose: 0,
            quiet: true,
            credentials: None,
            section: None,
        }
    }

    fn access_key_args(dir: &Path) -> AccessKeyArgs {
        AccessKeyArgs {
            uid: 12345,
            work_dir: dir.to_string_lossy().into_owned(),
        }
    }

    fn base_key() -> AccessKey {
        AccessKey {
            access_key_uid: 12345,
            access_key_name: "origin-key".to_string(),
            authentication_method: "AWS4-HMAC-SHA256".to_string(),
            groups: vec![KeyGroup {
                group_id: 15,
                contract_ids: vec!["ctr_1-2ABCDE".to_string()],
            }],
            network_configuration: None,
        }
    }

    fn version(number: u32, id: &str) -> AccessKeyVersion {
        AccessKeyVersion {
            version: number,
            cloud_access_key_id: Some(id.to_string()),
        }
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    // ── artifacts ────────────────────────────────────────────────────

    #[test]
    fn export_writes_all_artifacts() {
        let tmp = TempDir::new().unwrap();
        let mut api = MockCloudAccess::new();
        api.add_key(base_key());
        // Out of order on purpose; the mapping sorts
        api.add_version(12345, version(2, "AKIA222"));
        api.add_version(12345, version(1, "AKIA111"));

        export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap();

        let config = read(&tmp.path().join("cloudaccess.tf"));
        assert!(config.contains("provider \"cdn\" {\n  section = var.section\n}"));
        assert!(config.contains("resource \"cdn_access_key\" \"origin_key\""));
        assert!(config.contains("access_key_name = \"origin-key\""));
        assert!(config.contains("authentication_method = \"AWS4-HMAC-SHA256\""));
        assert!(config.contains("contract_id = \"ctr_1-2ABCDE\""));
        assert!(config.contains("group_id = 15"));
        assert!(config.contains(
            "credential_a {\n    cloud_access_key_id = \"AKIA222\"\n    version = 2\n  }"
        ));
        assert!(config.contains(
            "credential_b {\n    cloud_access_key_id = \"AKIA111\"\n    version = 1\n  }"
        ));
        assert!(config.find("credential_a").unwrap() < config.find("credential_b").unwrap());

        let variables = read(&tmp.path().join("variables.tf"));
        assert!(variables.contains("variable \"section\" {\n  default = \"default\"\n}"));

        let script_path = tmp.path().join("import.sh");
        let lines: Vec<_> = read(&script_path).lines().map(String::from).collect();
        assert_eq!(
            lines,
            vec![
                "terraform init",
                "terraform import cdn_access_key.origin_key 12345",
            ]
        );
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&script_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    // ── credential mapping ───────────────────────────────────────────

    #[test]
    fn no_versions_render_no_credential_blocks() {
        let tmp = TempDir::new().unwrap();
        let mut api = MockCloudAccess::new();
        api.add_key(base_key());

        export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap();

        let config = read(&tmp.path().join("cloudaccess.tf"));
        assert!(config.contains("resource \"cdn_access_key\" \"origin_key\""));
        assert!(!config.contains("credential_a"));
        assert!(!config.contains("credential_b"));
    }

    #[test]
    fn single_version_maps_to_credential_a() {
        let tmp = TempDir::new().unwrap();
        let mut api = MockCloudAccess::new();
        api.add_key(base_key());
        api.add_version(12345, version(7, "AKIA777"));

        export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap();

        let config = read(&tmp.path().join("cloudaccess.tf"));
        assert!(config.contains("credential_a"));
        assert!(config.contains("\"AKIA777\""));
        assert!(config.contains("version = 7"));
        assert!(!config.contains("credential_b"));
    }

    #[test]
    fn three_versions_keep_newest_two() {
        let tmp = TempDir::new().unwrap();
        let mut api = MockCloudAccess::new();
        api.add_key(base_key());
        api.add_version(12345, version(1, "AKIA111"));
        api.add_version(12345, version(3, "AKIA333"));
        api.add_version(12345, version(2, "AKIA222"));

        export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap();

        let config = read(&tmp.path().join("cloudaccess.tf"));
        assert!(config.contains(
            "credential_a {\n    cloud_access_key_id = \"AKIA333\"\n    version = 3\n  }"
        ));
        assert!(config.contains(
            "credential_b {\n    cloud_access_key_id = \"AKIA222\"\n    version = 2\n  }"
        ));
        assert!(!config.contains("AKIA111"));
    }

    #[test]
    fn version_without_cloud_key_id_omits_line() {
        let tmp = TempDir::new().unwrap();
        let mut api = MockCloudAccess::new();
        api.add_key(base_key());
        api.add_version(
            12345,
            AccessKeyVersion {
                version: 1,
                cloud_access_key_id: None,
            },
        );

        export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap();

        let config = read(&tmp.path().join("cloudaccess.tf"));
        assert!(config.contains("credential_a {\n    version = 1\n  }"));
        assert!(!config.contains("cloud_access_key_id"));
    }

    // ── optional blocks and guards ───────────────────────────────────

    #[test]
    fn network_configuration_block_is_optional() {
        // Absent on the key: no block at all
        let tmp = TempDir::new().unwrap();
        let mut api = MockCloudAccess::new();
        api.add_key(base_key());
        export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap();
        assert!(!read(&tmp.path().join("cloudaccess.tf")).contains("network_configuration"));

        // Present with the additional CDN
        let tmp = TempDir::new().unwrap();
        let mut key = base_key();
        key.network_configuration = Some(NetworkConfiguration {
            security_network: "ENHANCED_TLS".to_string(),
            additional_cdn: Some("CHINA_CDN".to_string()),
        });
        let mut api = MockCloudAccess::new();
        api.add_key(key);
        export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap();
        let config = read(&tmp.path().join("cloudaccess.tf"));
        assert!(config.contains("security_network = \"ENHANCED_TLS\""));
        assert!(config.contains("additional_cdn = \"CHINA_CDN\""));

        // Present without the additional CDN
        let tmp = TempDir::new().unwrap();
        let mut key = base_key();
        key.network_configuration = Some(NetworkConfiguration {
            security_network: "STANDARD_TLS".to_string(),
            additional_cdn: None,
        });
        let mut api = MockCloudAccess::new();
        api.add_key(key);
        export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap();
        let config = read(&tmp.path().join("cloudaccess.tf"));
        assert!(config.contains("security_network = \"STANDARD_TLS\""));
        assert!(!config.contains("additional_cdn"));
    }

    #[test]
    fn key_without_group_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut key = base_key();
        key.groups = Vec::new();
        let mut api = MockCloudAccess::new();
        api.add_key(key);

        let err = export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<edgeapi::Error>(),
            Some(edgeapi::Error::NoGroup { uid: 12345 })
        ));
        assert!(!tmp.path().join("cloudaccess.tf").exists());
    }

    #[test]
    fn existing_artifact_aborts_export() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("variables.tf"), "leftover").unwrap();
        let mut api = MockCloudAccess::new();
        api.add_key(base_key());

        let err = export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<tfkit::Error>(),
            Some(tfkit::Error::ArtifactExists { .. })
        ));
    }

    #[test]
    fn missing_key_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let api = MockCloudAccess::new();

        let err = export(&ctx(), &api, "default", access_key_args(tmp.path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<edgeapi::Error>(),
            Some(edgeapi::Error::NotFound { kind: "access key", .. })
        ));
    }
}
