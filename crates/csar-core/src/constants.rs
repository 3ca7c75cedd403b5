//! # SOL004 Meta-Directory Constants
//!
//! Fixed names from the ETSI SOL004 package layout and the manifest
//! metadata vocabulary.

/// Location of the root meta file inside the package.
pub const TOSCA_META_PATH: &str = "TOSCA-Metadata/TOSCA.meta";

/// Category under which package upload violations are reported.
pub const UPLOAD_FILE_CATEGORY: &str = "uploadFile";

/// Required manifest file extension (without the dot).
pub const MANIFEST_EXTENSION: &str = "mf";

/// Accepted `TOSCA-Meta-File-Version` value.
pub const META_FILE_VERSION: &str = "1.0";

/// Accepted `CSAR-Version` value.
pub const CSAR_VERSION: &str = "1.1";

/// Maximum number of entries in a manifest metadata block.
pub const MANIFEST_METADATA_LIMIT: usize = 4;

/// `vnf_product_name` metadata key.
pub const VNF_PRODUCT_NAME: &str = "vnf_product_name";
/// `vnf_provider_id` metadata key.
pub const VNF_PROVIDER_ID: &str = "vnf_provider_id";
/// `vnf_package_version` metadata key.
pub const VNF_PACKAGE_VERSION: &str = "vnf_package_version";
/// `vnf_release_date_time` metadata key.
pub const VNF_RELEASE_DATE_TIME: &str = "vnf_release_date_time";

/// `pnfd_name` metadata key.
pub const PNFD_NAME: &str = "pnfd_name";
/// `pnfd_provider` metadata key.
pub const PNFD_PROVIDER: &str = "pnfd_provider";
/// `pnfd_archive_version` metadata key.
pub const PNFD_ARCHIVE_VERSION: &str = "pnfd_archive_version";
/// `pnfd_release_date_time` metadata key.
pub const PNFD_RELEASE_DATE_TIME: &str = "pnfd_release_date_time";

/// Mandatory metadata keys of a VNF package, in canonical order.
pub const VNF_MANDATORY_METADATA: [&str; 4] = [
    VNF_PRODUCT_NAME,
    VNF_PROVIDER_ID,
    VNF_PACKAGE_VERSION,
    VNF_RELEASE_DATE_TIME,
];

/// Mandatory metadata keys of a PNF package, in canonical order.
pub const PNF_MANDATORY_METADATA: [&str; 4] = [
    PNFD_NAME,
    PNFD_PROVIDER,
    PNFD_ARCHIVE_VERSION,
    PNFD_RELEASE_DATE_TIME,
];
