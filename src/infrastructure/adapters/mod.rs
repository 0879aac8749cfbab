//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod file_store;
mod memory_store;
mod settings_repository;
mod source_lookup;
mod stdin_prompt;
mod store_factory;

pub use file_store::FileSecretStore;
pub use memory_store::MemorySecretStore;
pub use settings_repository::JsonSettingsRepository;
pub use source_lookup::SourceLookup;
pub use stdin_prompt::StdinPrompt;
pub use store_factory::build_secret_store;
