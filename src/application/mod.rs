//! Application layer
//! 동기화 로직과 유스케이스를 정의하고 포트(추상 인터페이스)를 통해 인프라를 사용한다.

pub mod ports;
pub mod reconciler;
pub mod resolver;
pub mod settings;
pub mod usecases;

#[cfg(test)]
pub(crate) mod test_support;
