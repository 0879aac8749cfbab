//! Infrastructure layer
//! 외부 시스템(비밀 저장소/파일시스템/stdin)과 직접 통신하는 구현체 집합.

pub mod adapters;
pub mod secret_manager;
pub mod settings;
