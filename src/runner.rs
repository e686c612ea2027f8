use crate::config::Settings;
use anyhow::{bail, Context, Result};
use parcel_parser::{Loader, Parser};
use pcc_artifact::{ArtifactWriter, GeneratedArtifact, Generator, WriteReport};
use pcc_bind_core::CoreBinding;
use pcc_bind_host::{touch_dependents, HostBinding, HostOutput};
use pcc_hierarchy::Hierarchy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Name of the file which describes the linked classes
pub const HIERARCHY_JSON: &str = "hierarchy.json";

#[derive(Debug)]
pub struct BuildSummary {
    pub report: WriteReport,
    /// Extension sources whose mtime was updated
    pub touched: Vec<PathBuf>,
}

/// Parse and link the declarations under the source and include
/// directories. A parcel is taken from the sources if declared there,
/// otherwise from the first include directory declaring it.
pub fn link(sources: &[PathBuf], includes: &[PathBuf]) -> Result<Hierarchy> {
    let mut loader = Loader::new();
    let mut records = Parser::parse_files(&loader.load_dirs(sources)?)?;
    log::debug!("parsed {} units", records.len());
    let mut known = records
        .iter()
        .map(|r| r.parcel.clone())
        .collect::<HashSet<_>>();
    for dir in includes {
        let mut found = HashSet::new();
        for record in Parser::parse_files(&loader.load_include_dirs(&[dir])?)? {
            if known.contains(&record.parcel) {
                log::debug!(
                    "{}: {} is skipped (parcel {} is already loaded)",
                    dir.display(),
                    record.fullname,
                    record.parcel
                );
                continue;
            }
            found.insert(record.parcel.clone());
            records.push(record);
        }
        known.extend(found);
    }
    let hierarchy = Hierarchy::build(records)?;
    log::debug!("linked hierarchy ({} classes)", hierarchy.len());
    Ok(hierarchy)
}

/// Link the directories of `settings` and check its prerequisites
fn link_settings(settings: &Settings) -> Result<Hierarchy> {
    let hierarchy = link(settings.sources()?, &settings.includes)?;
    for parcel in &settings.prereqs {
        if hierarchy.find_parcel(parcel).is_none() {
            bail!("prerequisite parcel `{}` is not found", parcel);
        }
    }
    Ok(hierarchy)
}

/// Generate the bindings and write the changed ones into the output directory
pub fn build(settings: &Settings) -> Result<BuildSummary> {
    let dest = settings.dest()?;
    let hierarchy = link_settings(settings)?;
    if let Some(host) = &settings.host {
        for parcel in &host.parcels {
            if hierarchy.find_parcel(parcel).is_none() {
                bail!("host parcel `{}` is not declared", parcel);
            }
        }
    }

    let (mut artifacts, mut host_output) = generate(&hierarchy, settings);
    artifacts.push(GeneratedArtifact::new(
        Generator::Core,
        HIERARCHY_JSON,
        serde_json::to_string_pretty(&hierarchy).context("failed to serialize the hierarchy")?,
    ));
    if let Some(output) = host_output.as_mut() {
        artifacts.append(&mut output.artifacts);
    }
    log::debug!("generated {} artifacts", artifacts.len());

    let mut writer = ArtifactWriter::new(dest)?;
    writer.write_all(&artifacts)?;
    let report = writer.finish()?;

    let touched = match (&settings.host, &host_output) {
        (Some(host), Some(output)) => {
            let symbols = output.symbols_of(&report.written);
            touch_dependents(&host.ext_sources, &symbols)?
        }
        _ => vec![],
    };
    log::info!(
        "{}: {} written, {} unchanged, {} removed, {} sources touched",
        dest.display(),
        report.written.len(),
        report.unchanged.len(),
        report.removed.len(),
        touched.len()
    );
    Ok(BuildSummary { report, touched })
}

/// Run the generators. They only read the hierarchy, so the host glue is
/// generated on its own thread.
fn generate(hierarchy: &Hierarchy, settings: &Settings) -> (Vec<GeneratedArtifact>, Option<HostOutput>) {
    std::thread::scope(|s| {
        let host = s.spawn(|| {
            settings.host.as_ref().map(|host| {
                HostBinding::new(hierarchy, host.options(), &settings.header, &settings.footer)
                    .generate()
            })
        });
        let core = CoreBinding::new(hierarchy, &settings.header, &settings.footer).generate();
        let host = host
            .join()
            .unwrap_or_else(|e| std::panic::resume_unwind(e));
        (core, host)
    })
}

/// Parse and link only. Returns the class ladder for printing.
pub fn check(settings: &Settings) -> Result<Vec<String>> {
    let hierarchy = link_settings(settings)?;
    let lines = hierarchy
        .ladder()
        .map(|node| {
            let depth = hierarchy.ancestors(node).len();
            format!("{}{}", "  ".repeat(depth), node.fullname)
        })
        .collect();
    Ok(lines)
}

/// Remove the files of the last build
pub fn clean(dest: &Path) -> Result<Vec<PathBuf>> {
    let removed = pcc_artifact::clean(dest)?;
    log::info!("removed {} files from {}", removed.len(), dest.display());
    Ok(removed)
}
