mod license_merge;

pub use license_merge::LicenseMergePolicy;
