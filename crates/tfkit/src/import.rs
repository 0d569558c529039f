//! Import-script generation.
//!
//! The script binds freshly declared resources to their live counterparts:
//! `terraform init`, the zone import when the corresponding config run
//! created the zone block, then one import per rendered recordset. Already
//! declared resources are assumed to be in state and never re-imported.

use crate::address::{RecordId, zone_label};
use crate::error::Result;
use crate::inventory::ZoneConfig;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Build the import script for one config run's output.
pub fn build_import_script(config: &ZoneConfig) -> String {
    let mut out = String::new();
    writeln!(out, "terraform init").unwrap();
    if config.zone_created {
        writeln!(
            out,
            "terraform import cdn_dns_zone.{} {}",
            zone_label(&config.zone),
            config.zone
        )
        .unwrap();
    }
    for (name, types) in &config.recordsets {
        for rtype in types {
            let id = RecordId::new(config.zone.as_str(), name.as_str(), rtype.as_str());
            writeln!(
                out,
                "terraform import cdn_dns_record.{} {}",
                id.label(),
                id.import_id()
            )
            .unwrap();
        }
    }
    out
}

/// Write the import script and mark it executable.
pub fn write_import_script(path: &Path, script: &str) -> Result<()> {
    fs::write(path, script)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::RecordSets;
    use tempfile::TempDir;

    fn config(zone_created: bool, pairs: &[(&str, &[&str])]) -> ZoneConfig {
        let mut recordsets = RecordSets::new();
        for (name, types) in pairs {
            recordsets.insert(
                (*name).to_string(),
                types.iter().map(|t| (*t).to_string()).collect(),
            );
        }
        ZoneConfig {
            zone: "example.com".to_string(),
            zone_created,
            recordsets,
        }
    }

    #[test]
    fn test_fresh_zone_script() {
        // New zone with two recordsets: init, zone import, two record
        // imports, in that order.
        let config = config(
            true,
            &[("example.com", &["A"]), ("www.example.com", &["CNAME"])],
        );
        let script = build_import_script(&config);

        let lines: Vec<_> = script.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "terraform init");
        assert_eq!(
            lines[1],
            "terraform import cdn_dns_zone.example_com example.com"
        );
        assert_eq!(
            lines[2],
            "terraform import cdn_dns_record.example_com_example_com_A example.com#example.com#A"
        );
        assert_eq!(
            lines[3],
            "terraform import cdn_dns_record.example_com_www_example_com_CNAME example.com#www.example.com#CNAME"
        );
    }

    #[test]
    fn test_existing_zone_skips_zone_import() {
        let config = config(false, &[("mail.example.com", &["MX"])]);
        let script = build_import_script(&config);

        let lines: Vec<_> = script.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "terraform init");
        assert!(lines[1].starts_with("terraform import cdn_dns_record."));
    }

    #[test]
    fn test_settled_run_still_inits() {
        let config = config(false, &[]);
        assert_eq!(build_import_script(&config), "terraform init\n");
    }

    #[test]
    fn test_lexicographic_line_order() {
        let config = config(
            true,
            &[
                ("www.example.com", &["CNAME"]),
                ("api.example.com", &["A", "AAAA"]),
            ],
        );
        let script = build_import_script(&config);

        let api_a = script.find("api_example_com_A ").unwrap();
        let api_aaaa = script.find("api_example_com_AAAA").unwrap();
        let www = script.find("www_example_com_CNAME").unwrap();
        assert!(api_a < api_aaaa && api_aaaa < www);
    }

    #[test]
    fn test_write_marks_executable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("example_com_import.sh");
        write_import_script(&path, "terraform init\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "terraform init\n");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }
}
