//! Generates the C binding of a class hierarchy: one header and one source
//! per class, a header and a source per parcel, and the shared runtime
//! header.
pub mod c_type;
mod class_header;
mod class_source;
mod parcel_files;
mod runtime_header;
use pcc_artifact::{GeneratedArtifact, Generator};
use pcc_hierarchy::Hierarchy;
pub use runtime_header::{runtime_header, HANDLE_KINDS, RUNTIME_HEADER};

pub const DEFAULT_HEADER: &str = "This file was generated by parcelc. DO NOT EDIT.";

pub struct CoreBinding<'h> {
    hierarchy: &'h Hierarchy,
    /// Comment placed at the top of every file
    header: String,
    /// Comment placed at the bottom of every file
    footer: String,
}

impl<'h> CoreBinding<'h> {
    pub fn new(hierarchy: &'h Hierarchy, header: &str, footer: &str) -> CoreBinding<'h> {
        CoreBinding {
            hierarchy,
            header: header.to_string(),
            footer: footer.to_string(),
        }
    }

    /// Generate all the files. The output only depends on the hierarchy and
    /// the configured comments.
    pub fn generate(&self) -> Vec<GeneratedArtifact> {
        let h = self.hierarchy;
        let mut artifacts = vec![self.artifact(RUNTIME_HEADER, runtime_header::runtime_header())];
        // Included parcels and classes are generated by their own build
        for parcel in h.parcels().iter().filter(|p| !p.included) {
            artifacts.push(self.artifact(
                parcel_files::parcel_header_path(parcel),
                parcel_files::parcel_header(h, parcel),
            ));
            artifacts.push(self.artifact(
                parcel_files::parcel_source_path(parcel),
                parcel_files::parcel_source(h, parcel),
            ));
        }
        for node in h.ladder().filter(|n| !n.is_included) {
            let path_part = node.fullname.path_part();
            artifacts.push(self.artifact(
                format!("include/{}.h", path_part),
                class_header::class_header(h, node),
            ));
            artifacts.push(self.artifact(
                format!("source/{}.c", path_part),
                class_source::class_source(h, node),
            ));
        }
        log::debug!("core binding: {} files", artifacts.len());
        artifacts
    }

    fn artifact(&self, path: impl Into<std::path::PathBuf>, body: String) -> GeneratedArtifact {
        GeneratedArtifact::new(
            Generator::Core,
            path,
            decorate(&self.header, &self.footer, &body),
        )
    }
}

/// Wrap `body` with the header and footer comments
pub fn decorate(header: &str, footer: &str, body: &str) -> String {
    let mut s = c_type::comment_block(header);
    s.push_str(body);
    if !footer.is_empty() {
        s.push('\n');
        for line in footer.lines() {
            s.push_str(&format!("/* {} */\n", line));
        }
    }
    s
}
