// Security module for path validation and access control
//
// When a root directory is configured, the directories Repomix runs in and
// the files it writes must stay inside it.

pub mod path_validator;

pub use path_validator::{PathSecurityError, validate_output_path, validate_path};
