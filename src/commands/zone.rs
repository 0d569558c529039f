//! Zone export: inventory fetch, merged config generation, import script.
//!
//! Three optional steps over one work directory, each gated by a flag.
//! `--inventory` snapshots the zone's record names and types into a side
//! file, `--config` merges that inventory into the zone's Terraform
//! declarations (flat or segmented), and `--import-script` emits the
//! script that binds freshly declared resources to live state. Steps
//! combine freely in one invocation and hand their output to the next
//! step in memory instead of re-reading the side files.

use anyhow::{Result, bail};
use edgeapi::EdgeClient;
use edgeapi::dns::DnsApi;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use tfkit::WorkDir;
use tfkit::address::{RecordId, is_declared, name_label};
use tfkit::inventory::{RecordSets, ZoneConfig, ZoneInventory};
use tfkit::render::{self, RecordResource, ZoneResource};
use tfkit::{import, reconcile, scan};

use crate::Context as AppContext;
use crate::cli::ZoneArgs;
use crate::paths;
use crate::ui;

// ============================================================================
// Public entry points
// ============================================================================

/// Zone export against the live API (`tfport zone`)
pub fn run(ctx: &AppContext, args: ZoneArgs) -> Result<()> {
    let section = paths::section(ctx.section.as_deref());
    let credentials = paths::credentials_file(ctx.credentials.as_deref())?;
    let creds = edgeapi::credentials::load(&credentials, &section)?;
    let client = EdgeClient::new(&creds);
    export(ctx, &client, &section, args)
}

/// Run the selected pipeline steps against any DNS API implementation.
pub fn export(ctx: &AppContext, api: &dyn DnsApi, section: &str, args: ZoneArgs) -> Result<()> {
    if !args.inventory && !args.config && !args.import_script {
        bail!("nothing to do: pass --inventory, --config, or --import-script");
    }

    let zone = args.zone.to_lowercase();
    let work = WorkDir::new(paths::expand(&args.work_dir))?;
    ui::header(&format!("Zone export: {zone}"));

    let mut fetched: Option<ZoneInventory> = None;
    if args.inventory {
        let inventory = collect_inventory(ctx, api, &zone, &args.records, args.names_only)?;
        let path = work.inventory_file(&zone);
        inventory.save(&path)?;
        ui::success(&format!(
            "Inventory written: {} ({} names, {})",
            path.display(),
            inventory.recordsets.len(),
            ui::count_noun(inventory.len(), "recordset")
        ));
        fetched = Some(inventory);
    }

    let mut generated: Option<ZoneConfig> = None;
    if args.config {
        let inventory = if args.config_only {
            ZoneInventory::new(zone.clone())
        } else if let Some(inventory) = fetched.take() {
            inventory
        } else {
            ZoneInventory::load(&work.inventory_file(&zone))?
        };
        let config = write_config(ctx, api, section, &work, &inventory, args.segment)?;
        config.save(&work.zone_config_file(&zone))?;
        generated = Some(config);
    }

    if args.import_script {
        let config = match generated.take() {
            Some(config) => config,
            None => ZoneConfig::load(&work.zone_config_file(&zone))?,
        };
        write_script(&work, &config)?;
    }

    Ok(())
}

// ============================================================================
// Inventory step
// ============================================================================

/// Fetch the zone's recordsets into an inventory.
///
/// `records` restricts the fetch to specific names; `names_only` skips the
/// per-name type listing and records empty type sets.
fn collect_inventory(
    ctx: &AppContext,
    api: &dyn DnsApi,
    zone: &str,
    records: &[String],
    names_only: bool,
) -> Result<ZoneInventory> {
    let names = if records.is_empty() {
        api.list_record_names(zone)?
    } else {
        records.to_vec()
    };

    let mut inventory = ZoneInventory::new(zone);
    if names_only {
        for name in &names {
            inventory.insert_name(name);
        }
        return Ok(inventory);
    }

    let pb = fetch_bar(ctx, names.len() as u64);
    for name in &names {
        pb.set_message(name.clone());
        for rtype in api.list_record_types(zone, name)? {
            inventory.insert(name, &rtype);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(inventory)
}

fn fetch_bar(ctx: &AppContext, len: u64) -> ProgressBar {
    if ctx.quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb
}

// ============================================================================
// Config step
// ============================================================================

/// Merge the inventory into the zone's declaration files.
///
/// Reads the existing root text once, appends at most once, and returns
/// the generated map (residual recordsets plus whether this run created
/// the zone block) for the import-script step.
fn write_config(
    ctx: &AppContext,
    api: &dyn DnsApi,
    section: &str,
    work: &WorkDir,
    inventory: &ZoneInventory,
    segment: bool,
) -> Result<ZoneConfig> {
    let zone = inventory.zone.as_str();
    let root_path = work.zone_config(zone);
    let existing = scan::read_existing(&root_path)?;
    scan::ensure_layout(&existing, segment)?;

    let meta = api.get_zone(zone)?;
    let zone_created = existing.trim().is_empty();

    let mut root_text = String::new();
    if zone_created {
        root_text.push_str(&render::zone_block(&ZoneResource {
            zone: meta.zone.clone(),
            kind: meta.kind.clone(),
            comment: meta.comment.clone(),
            sign_and_serve: meta.sign_and_serve,
            masters: meta.masters.clone(),
        }));
    }

    let residual = if segment {
        segmented_config(ctx, api, work, inventory, &existing, &mut root_text)?
    } else {
        let outcome = reconcile::reconcile(inventory, &existing);
        notice_skipped(&outcome.skipped);
        for (name, types) in &outcome.residual {
            for rtype in types {
                push_block(&mut root_text, &record_block_for(ctx, api, zone, name, rtype)?);
            }
        }
        outcome.residual
    };

    if !existing.is_empty() && !root_text.is_empty() {
        root_text.insert(0, '\n');
    }
    scan::append_to(&root_path, &root_text)?;

    fs::write(work.dnsvars(), render::dnsvars(section, &meta.contract_id))?;

    let appended: usize = residual.values().map(Vec::len).sum();
    ui::success(&format!(
        "Config merged: {} ({} appended)",
        root_path.display(),
        ui::count_noun(appended, "recordset")
    ));

    Ok(ZoneConfig {
        zone: zone.to_string(),
        zone_created,
        recordsets: residual,
    })
}

/// Segmented variant: each record name's resources live in their own
/// module file, reconciled name by name; the root file only collects
/// module blocks.
fn segmented_config(
    ctx: &AppContext,
    api: &dyn DnsApi,
    work: &WorkDir,
    inventory: &ZoneInventory,
    root_existing: &str,
    root_text: &mut String,
) -> Result<RecordSets> {
    let zone = inventory.zone.as_str();
    let mut residual = RecordSets::new();

    for (name, types) in &inventory.recordsets {
        let module_path = work.module_config(zone, name);
        let module_existing = scan::read_existing(&module_path)?;
        let (missing, found) = reconcile::residual_types(zone, name, types, &module_existing);
        notice_skipped(&found);

        // The module block is keyed on the root text, not the module file:
        // a hand-declared module file still needs its root wiring.
        let label = name_label(zone, name);
        if !is_declared(root_existing, &label) && !is_declared(root_text, &label) {
            work.ensure_module_dir(zone, name)?;
            push_block(root_text, &render::module_block(zone, name));
        }

        if !missing.is_empty() {
            work.ensure_module_dir(zone, name)?;
            let mut module_text = String::new();
            for rtype in &missing {
                push_block(&mut module_text, &record_block_for(ctx, api, zone, name, rtype)?);
            }
            if !module_existing.is_empty() {
                module_text.insert(0, '\n');
            }
            scan::append_to(&module_path, &module_text)?;
            residual.insert(name.clone(), missing);
        }
    }

    Ok(residual)
}

/// Fetch one recordset's data and render its resource block.
fn record_block_for(
    ctx: &AppContext,
    api: &dyn DnsApi,
    zone: &str,
    name: &str,
    rtype: &str,
) -> Result<String> {
    let recordset = api.get_recordset(zone, name, rtype)?;
    if ctx.verbose > 0 {
        ui::dim(&format!("  fetched {name} {rtype} (ttl {})", recordset.ttl));
    }
    Ok(render::record_block(&RecordResource {
        id: RecordId::new(zone, name, rtype),
        ttl: recordset.ttl,
        rdata: recordset.rdata,
    }))
}

fn notice_skipped(skipped: &[RecordId]) {
    for id in skipped {
        ui::dim(&format!("  already declared: {id}"));
    }
}

/// Blocks are separated by one blank line inside a single run's output.
fn push_block(text: &mut String, block: &str) {
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(block);
}

// ============================================================================
// Import-script step
// ============================================================================

fn write_script(work: &WorkDir, config: &ZoneConfig) -> Result<()> {
    let path = work.import_script(&config.zone);
    if path.exists() {
        ui::warn(&format!(
            "{} already exists; leaving it unchanged",
            path.display()
        ));
        return Ok(());
    }
    let script = import::build_import_script(config);
    import::write_import_script(&path, &script)?;
    ui::success(&format!("Import script written: {}", path.display()));
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
