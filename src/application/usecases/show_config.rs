//! 저장된 최신 blob을 동기화 없이 조회하는 유스케이스.

use crate::application::ports::SecretStore;
use crate::domain::blob::ConfigBlob;
use crate::domain::error::ConfigResult;

pub struct ShowConfigUseCase<'a> {
    pub store: &'a dyn SecretStore,
    pub secret_name: &'a str,
}

impl<'a> ShowConfigUseCase<'a> {
    pub async fn execute(&self) -> ConfigResult<Option<ConfigBlob>> {
        self.store.read_latest(self.secret_name).await
    }
}
