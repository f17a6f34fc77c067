//! Crate-wide constants.

/// Application name, used in generated file names.
pub const APP_NAME: &str = "genrule";

/// Environment variable overriding the output root.
pub const OUT_DIR_ENV: &str = "GENRULE_OUT_DIR";

/// Default output root, relative to the blueprint directory.
pub const DEFAULT_OUT_DIR: &str = "out";

/// Directory under the output root holding every module's generation directory.
pub const GEN_DIR_NAME: &str = "gen";

/// File name of the serialized action manifest written by `genrule plan`.
pub const MANIFEST_FILE_NAME: &str = "genrule.manifest.json";

/// File name of the Ninja file written by `genrule ninja`.
pub const NINJA_FILE_NAME: &str = "build.ninja";

/// Prefix marking a source entry as a reference to another module's outputs.
pub const MODULE_REF_PREFIX: char = ':';
