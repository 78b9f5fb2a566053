//! CLI command implementations

pub mod add_module;
pub mod extract_rules;
pub mod init;
pub mod init_config;
pub mod inject;
pub mod list;
pub mod update_rules;

pub use add_module::AddModuleCommand;
pub use extract_rules::ExtractRulesCommand;
pub use init::{ExportCommand, InitCommand, ProcessCommand};
pub use init_config::InitConfigCommand;
pub use inject::InjectCommand;
pub use list::{ListCommand, ListKind};
pub use update_rules::UpdateRulesCommand;
