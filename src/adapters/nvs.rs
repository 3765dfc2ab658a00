//! NVS-backed configuration store.
//!
//! Persists [`SystemConfig`] as a postcard blob in the default NVS
//! partition. Tuned PID gains are intentionally not written here — they
//! live only in RAM and reset to the configured defaults on reboot.

use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use log::warn;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

const NAMESPACE: &str = "dewguard";
const KEY: &str = "config";
const MAX_BLOB: usize = 256;

pub struct NvsConfigStore {
    nvs: EspNvs<NvsDefault>,
}

impl NvsConfigStore {
    pub fn new() -> anyhow::Result<Self> {
        let partition = EspDefaultNvsPartition::take()?;
        let nvs = EspNvs::new(partition, NAMESPACE, true)?;
        Ok(Self { nvs })
    }
}

impl ConfigPort for NvsConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let mut buf = [0u8; MAX_BLOB];
        match self.nvs.get_raw(KEY, &mut buf) {
            Ok(Some(bytes)) => {
                let config: SystemConfig =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupt)?;
                config
                    .validate()
                    .map_err(ConfigError::ValidationFailed)?;
                Ok(config)
            }
            Ok(None) => Ok(SystemConfig::default()),
            Err(e) => {
                warn!("nvs: read failed ({e})");
                Err(ConfigError::StoreUnavailable)
            }
        }
    }

    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::ValidationFailed)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::Corrupt)?;
        self.nvs
            .set_raw(KEY, &bytes)
            .map_err(|_| ConfigError::StoreUnavailable)?;
        Ok(())
    }
}
