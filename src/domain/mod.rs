//! Domain layer
//! 설정 스키마, blob, 강타입 설정, 오류를 외부 의존성 없이 표현한다.

pub mod blob;
pub mod error;
pub mod registry;
pub mod resolved;
pub mod schema;
