//! Shared fixtures for package validation scenarios.

#![allow(dead_code)]

use csar_core::constants::*;
use csar_core::{PackageFileStore, ValidationResult};
use csar_validate::{ManifestBuilder, Sol004Validator};

pub const DEFINITIONS_PATH: &str = "Definitions/MainServiceTemplate.yaml";
pub const MANIFEST_PATH: &str = "Definitions/MainServiceTemplate.mf";
pub const CHANGE_LOG_PATH: &str = "Artifacts/changeLog.text";
pub const SAMPLE_SOURCE: &str = "Artifacts/Deployment/Events/ves_events.yaml";
pub const SAMPLE_IMPORT_PATH: &str = "Definitions/etsi_nfv_sol001_pnfd_2_5_1_types.yaml";

pub const META: &str = "TOSCA-Meta-File-Version: 1.0\n\
    CSAR-Version: 1.1\n\
    Created-By: Vendor\n\
    Entry-Definitions: Definitions/MainServiceTemplate.yaml\n\
    ETSI-Entry-Manifest: Definitions/MainServiceTemplate.mf\n\
    ETSI-Entry-Change-Log: Artifacts/changeLog.text\n";

/// Definitions document without imports.
pub const SAMPLE_DEFINITION: &str = "tosca_definitions_version: tosca_simple_yaml_1_1\n\
    description: sample definitions\n\
    topology_template:\n  node_templates: {}\n";

/// Imports `etsi_nfv_sol001_pnfd_2_5_1_types.yaml`.
pub const DEFINITION_WITH_VALID_IMPORTS: &str = "tosca_definitions_version: tosca_simple_yaml_1_2\n\
    imports:\n  - etsi_nfv_sol001_pnfd_2_5_1_types.yaml\n";

/// Imports `etsi_nfv_sol001_pnfd_2_5_1_types.yaml`.
pub const SAMPLE_DEFINITION_1: &str = "tosca_definitions_version: tosca_simple_yaml_1_2\n\
    imports:\n  - file: etsi_nfv_sol001_pnfd_2_5_1_types.yaml\n";

/// Imports `etsi_nfv_sol001_pnfd_2_5_2_types.yaml`.
pub const SAMPLE_DEFINITION_2: &str = "tosca_definitions_version: tosca_simple_yaml_1_2\n\
    imports:\n  - etsi_nfv_sol001_pnfd_2_5_2_types.yaml\n";

/// Imports `importOne.yaml`.
pub const DEFINITION_WITH_ONE_IMPORT: &str = "tosca_definitions_version: tosca_simple_yaml_1_2\n\
    imports:\n  - importOne.yaml\n";

/// Holds an empty import entry.
pub const DEFINITION_WITH_INVALID_IMPORT: &str = "tosca_definitions_version: tosca_simple_yaml_1_2\n\
    imports:\n  -\n";

pub const INVALID_DEFINITION: &str = "tosca_definitions_version: tosca_simple_yaml_1_2\n\
    imports: [etsi_nfv_sol001_pnfd_2_5_1_types.yaml\n\
    node_types: : :\n";

pub fn vnf_manifest() -> ManifestBuilder {
    ManifestBuilder::new()
        .with_metadata(VNF_PRODUCT_NAME, "RadioNode")
        .with_metadata(VNF_PROVIDER_ID, "ACME")
        .with_metadata(VNF_PACKAGE_VERSION, "1.0")
        .with_metadata(VNF_RELEASE_DATE_TIME, "2019-03-11T11:25:00+00:00")
}

pub fn pnf_manifest() -> ManifestBuilder {
    ManifestBuilder::new()
        .with_metadata(PNFD_NAME, "myPnf")
        .with_metadata(PNFD_PROVIDER, "ACME")
        .with_metadata(PNFD_ARCHIVE_VERSION, "1.0")
        .with_metadata(PNFD_RELEASE_DATE_TIME, "2019-03-11T11:25:00+00:00")
}

/// A package under construction: files go into the store and, unless
/// added with [`Package::undeclared`], are declared as manifest sources.
pub struct Package {
    store: PackageFileStore,
    manifest: ManifestBuilder,
    folders: Vec<String>,
}

impl Package {
    pub fn new(manifest: ManifestBuilder) -> Self {
        Self {
            store: PackageFileStore::new(),
            manifest,
            folders: Vec::new(),
        }
    }

    pub fn vnf() -> Self {
        Self::new(vnf_manifest())
    }

    pub fn pnf() -> Self {
        Self::new(pnf_manifest())
    }

    /// TOSCA.meta, change log and main definitions, all declared.
    pub fn with_standard_files(self, meta: &str, definitions: &str) -> Self {
        self.file(TOSCA_META_PATH, meta)
            .file(CHANGE_LOG_PATH, "")
            .file(DEFINITIONS_PATH, definitions)
    }

    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.store.add_file(path, content).unwrap();
        self.manifest = self.manifest.with_source(path);
        self
    }

    pub fn undeclared(mut self, path: &str, content: &str) -> Self {
        self.store.add_file(path, content).unwrap();
        self
    }

    pub fn source(mut self, path: &str) -> Self {
        self.manifest = self.manifest.with_source(path);
        self
    }

    pub fn non_mano(mut self, artifact_type: &str, path: &str) -> Self {
        self.manifest = self.manifest.with_non_mano_artifact(artifact_type, path);
        self
    }

    pub fn known_folder(mut self, folder: &str) -> Self {
        self.folders.push(folder.to_string());
        self
    }

    pub fn map_manifest(mut self, f: impl FnOnce(ManifestBuilder) -> ManifestBuilder) -> Self {
        self.manifest = f(self.manifest);
        self
    }

    /// Declare the manifest as its own source, write it at `path`, and
    /// return the finished store with the known folders.
    pub fn build_at(self, path: &str) -> (PackageFileStore, Vec<String>) {
        let Self {
            mut store,
            manifest,
            folders,
        } = self;
        let text = manifest.with_source(path).build();
        store.add_file(path, text).unwrap();
        (store, folders)
    }

    pub fn build(self) -> (PackageFileStore, Vec<String>) {
        self.build_at(MANIFEST_PATH)
    }

    pub fn validate(self) -> ValidationResult {
        let (store, folders) = self.build();
        Sol004Validator::default().validate(&store, &folders)
    }
}

/// Messages reported under the upload category.
pub fn messages(result: &ValidationResult) -> Vec<String> {
    result
        .get(UPLOAD_FILE_CATEGORY)
        .unwrap_or_default()
        .iter()
        .map(|e| e.message.clone())
        .collect()
}

/// Assert the exact number of violations, printing them on failure.
pub fn assert_error_count(result: &ValidationResult, expected: usize) {
    let msgs = messages(result);
    assert_eq!(msgs.len(), expected, "unexpected violations: {msgs:#?}");
    if expected == 0 {
        assert_eq!(result.category_count(), 0);
    } else {
        assert_eq!(result.category_count(), 1);
    }
}
