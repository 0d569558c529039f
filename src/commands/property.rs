//! Property export: rule-tree snippets, Terraform config, import script.
//!
//! One-shot export of a delivery property's latest version. Unlike the
//! zone pipeline there is no merge: every artifact is written whole, so
//! the export refuses to run when any target already exists.

use anyhow::Result;
use edgeapi::EdgeClient;
use edgeapi::papi::{
    EdgeHostname, Group, Hostname, Property, PropertyApi, PropertyVersion, RuleTree,
};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tfkit::WorkDir;
use tfkit::{import, scan};

use crate::Context as AppContext;
use crate::cli::PropertyArgs;
use crate::paths;
use crate::ui;

/// One rendered `cdn_edge_hostname` resource.
///
/// Keyed by its resource label, which comes from the hostname mapping's
/// `cname_to` rather than the edge hostname's own domain; several
/// hostname mappings can share one edge hostname.
struct EdgeHostnameResource {
    cname_to: String,
    detail: EdgeHostname,
}

// ============================================================================
// Public entry points
// ============================================================================

/// Property export against the live API (`tfport property`)
pub fn run(ctx: &AppContext, args: PropertyArgs) -> Result<()> {
    let section = paths::section(ctx.section.as_deref());
    let credentials = paths::credentials_file(ctx.credentials.as_deref())?;
    let creds = edgeapi::credentials::load(&credentials, &section)?;
    let client = EdgeClient::new(&creds);
    export(ctx, &client, &section, args)
}

/// Export one property against any property API implementation.
pub fn export(
    ctx: &AppContext,
    api: &dyn PropertyApi,
    section: &str,
    args: PropertyArgs,
) -> Result<()> {
    let work = WorkDir::new(paths::expand(&args.work_dir))?;
    ui::header(&format!("Property export: {}", args.name));

    let snippets_dir = work.file("property-snippets");
    let property_path = work.file("property.tf");
    let versions_path = work.file("versions.tf");
    let variables_path = work.file("variables.tf");
    let import_path = work.file("import.sh");
    scan::ensure_absent([
        property_path.as_path(),
        versions_path.as_path(),
        variables_path.as_path(),
        import_path.as_path(),
        snippets_dir.as_path(),
    ])?;

    let property = api.find_property(&args.name)?;
    let version = api.get_version(&property, property.latest_version)?;
    let tree = api.get_rule_tree(&property, property.latest_version)?;
    let group = api.find_group(&property.group_id)?;
    let product = api.find_product(&property.contract_id, &version.product_id)?;
    let hostnames: Vec<Hostname> = api
        .list_hostnames(&property, property.latest_version)?
        .into_iter()
        .filter(|h| !h.edge_hostname_id.is_empty())
        .collect();

    let mut edge_hostnames = BTreeMap::new();
    for hostname in &hostnames {
        let label = tf_name(&hostname.cname_to);
        if !edge_hostnames.contains_key(&label) {
            let detail = api.get_edge_hostname(&hostname.edge_hostname_id)?;
            edge_hostnames.insert(
                label,
                EdgeHostnameResource {
                    cname_to: hostname.cname_to.clone(),
                    detail,
                },
            );
        }
    }

    // A property that was never activated has no contact to carry over
    let emails = api.activation_emails(&property).unwrap_or_default();

    if ctx.verbose > 0 {
        ui::kv("Property", &property.property_id);
        ui::kv("Version", &version.property_version.to_string());
        ui::kv("Rule format", &version.rule_format);
        ui::kv("Product", &product.product_name);
    }

    write_snippets(&snippets_dir, &tree)?;
    fs::write(
        &property_path,
        property_tf(
            section,
            &property,
            &version,
            &group,
            &emails,
            &edge_hostnames,
            &hostnames,
        ),
    )?;
    fs::write(&versions_path, versions_tf())?;
    fs::write(&variables_path, variables_tf())?;
    import::write_import_script(&import_path, &import_sh(&property, &edge_hostnames))?;

    ui::success(&format!(
        "Property export complete: {} ({}, {})",
        property.property_name,
        ui::count_noun(hostnames.len(), "hostname"),
        ui::count_noun(edge_hostnames.len(), "edge hostname"),
    ));
    Ok(())
}

// ============================================================================
// Rule-tree snippets
// ============================================================================

/// Write `property-snippets/`: one JSON file per top-level child rule and
/// a `main.json` whose children are `#include:` references to them.
/// Spaces in rule names become underscores in the file names.
fn write_snippets(dir: &Path, tree: &RuleTree) -> Result<()> {
    fs::create_dir_all(dir)?;

    let mut top = tree.rule.clone();
    let children = std::mem::take(&mut top.children);
    let mut includes = Vec::new();
    for child in &children {
        let file_name = format!("{}.json", child.name.replace(' ', "_"));
        fs::write(dir.join(&file_name), serde_json::to_string_pretty(child)?)?;
        includes.push(format!("#include:{file_name}"));
    }

    let mut rules = serde_json::to_value(&top)?;
    if !includes.is_empty() {
        rules["children"] = serde_json::json!(includes);
    }
    let main = serde_json::json!({
        "ruleFormat": tree.rule_format,
        "rules": rules,
    });
    fs::write(dir.join("main.json"), serde_json::to_string_pretty(&main)?)?;
    Ok(())
}

// ============================================================================
// Terraform text
// ============================================================================

/// Terraform resource label: dots become dashes, everything else stays.
fn tf_name(raw: &str) -> String {
    raw.replace('.', "-")
}

fn quoted_list(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|i| format!("\"{i}\"")).collect();
    format!("[{}]", inner.join(", "))
}

fn property_tf(
    section: &str,
    property: &Property,
    version: &PropertyVersion,
    group: &Group,
    emails: &[String],
    edge_hostnames: &BTreeMap<String, EdgeHostnameResource>,
    hostnames: &[Hostname],
) -> String {
    let label = tf_name(&property.property_name);
    let mut out = String::new();
    writeln!(out, "provider \"cdn\" {{").unwrap();
    writeln!(out, "  section = \"{section}\"").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "data \"cdn_group\" \"group\" {{").unwrap();
    writeln!(out, "  group_name = \"{}\"", group.group_name).unwrap();
    writeln!(out, "  contract_id = \"{}\"", property.contract_id).unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "data \"cdn_contract\" \"contract\" {{").unwrap();
    writeln!(out, "  group_name = data.cdn_group.group.name").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "data \"cdn_property_rules_template\" \"rules\" {{").unwrap();
    writeln!(
        out,
        "  template_file = abspath(\"${{path.module}}/property-snippets/main.json\")"
    )
    .unwrap();
    writeln!(out, "}}").unwrap();

    for (ehn_label, resource) in edge_hostnames {
        writeln!(out).unwrap();
        writeln!(out, "resource \"cdn_edge_hostname\" \"{ehn_label}\" {{").unwrap();
        writeln!(out, "  product_id = \"{}\"", version.product_id).unwrap();
        writeln!(out, "  contract_id = data.cdn_contract.contract.id").unwrap();
        writeln!(out, "  group_id = data.cdn_group.group.id").unwrap();
        writeln!(
            out,
            "  ip_behavior = \"{}\"",
            resource.detail.ip_version_behavior
        )
        .unwrap();
        writeln!(out, "  edge_hostname = \"{}\"", resource.cname_to).unwrap();
        if let Some(slot) = resource.detail.slot_number {
            writeln!(out, "  certificate = {slot}").unwrap();
        }
        writeln!(out, "}}").unwrap();
    }

    writeln!(out).unwrap();
    writeln!(out, "resource \"cdn_property\" \"{label}\" {{").unwrap();
    writeln!(out, "  name = \"{}\"", property.property_name).unwrap();
    writeln!(out, "  contract_id = data.cdn_contract.contract.id").unwrap();
    writeln!(out, "  group_id = data.cdn_group.group.id").unwrap();
    writeln!(out, "  product_id = \"{}\"", version.product_id).unwrap();
    writeln!(out, "  rule_format = \"{}\"", version.rule_format).unwrap();
    for hostname in hostnames {
        writeln!(out, "  hostnames {{").unwrap();
        writeln!(out, "    cname_from = \"{}\"", hostname.cname_from).unwrap();
        writeln!(
            out,
            "    cname_to = cdn_edge_hostname.{}.edge_hostname",
            tf_name(&hostname.cname_to)
        )
        .unwrap();
        writeln!(
            out,
            "    cert_provisioning_type = \"{}\"",
            hostname.cert_provisioning_type.as_deref().unwrap_or("CPS_MANAGED")
        )
        .unwrap();
        writeln!(out, "  }}").unwrap();
    }
    writeln!(out, "  rules = data.cdn_property_rules_template.rules.json").unwrap();
    writeln!(out, "}}").unwrap();

    writeln!(out).unwrap();
    writeln!(out, "resource \"cdn_property_activation\" \"{label}\" {{").unwrap();
    writeln!(out, "  property_id = cdn_property.{label}.id").unwrap();
    writeln!(out, "  contact = {}", quoted_list(emails)).unwrap();
    writeln!(out, "  version = cdn_property.{label}.latest_version").unwrap();
    writeln!(out, "  network = upper(var.env)").unwrap();
    writeln!(out, "}}").unwrap();
    out
}

fn versions_tf() -> String {
    let mut out = String::new();
    writeln!(out, "terraform {{").unwrap();
    writeln!(out, "  required_providers {{").unwrap();
    writeln!(out, "    cdn = {{").unwrap();
    writeln!(out, "      source = \"cdn/cdn\"").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "  }}").unwrap();
    writeln!(out, "  required_version = \">= 1.0\"").unwrap();
    writeln!(out, "}}").unwrap();
    out
}

fn variables_tf() -> String {
    let mut out = String::new();
    writeln!(out, "variable \"env\" {{").unwrap();
    writeln!(out, "  default = \"staging\"").unwrap();
    writeln!(out, "}}").unwrap();
    out
}

fn import_sh(
    property: &Property,
    edge_hostnames: &BTreeMap<String, EdgeHostnameResource>,
) -> String {
    let mut out = String::new();
    writeln!(out, "terraform init").unwrap();
    for (label, resource) in edge_hostnames {
        writeln!(
            out,
            "terraform import cdn_edge_hostname.{label} {},{},{}",
            resource.detail.edge_hostname_id, property.contract_id, property.group_id
        )
        .unwrap();
    }
    writeln!(
        out,
        "terraform import cdn_property.{} {},{},{}",
        tf_name(&property.property_name),
        property.property_id,
        property.contract_id,
        property.group_id
    )
    .unwrap();
    out
}

// ============================================================================
// Tests
// ============================================================================
