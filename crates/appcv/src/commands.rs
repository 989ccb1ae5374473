pub mod install;
pub mod use_version;
