use serde::{Serialize, de::DeserializeOwned};
use crate::log;

// ----------------------------------------------
// Configs
// ----------------------------------------------

// Configuration documents are stored by the host's config store. This crate
// only converts between the JSON text and the typed config structs; reading
// and writing files stays on the host side.
pub trait Configs {
    // Fix up any out of range values after loading.
    fn post_load(&mut self) {
    }

    // Serializes current configs to a JSON string.
    fn to_json_string(&self, pretty_print: bool) -> Result<String, String>
        where Self: Sized + Serialize
    {
        let result = {
            if pretty_print {
                serde_json::to_string_pretty(self)
            } else {
                serde_json::to_string(self)
            }
        };

        result.map_err(|err| {
            log::error!(log::channel!("config"), "Failed to serialize configs: {err}");
            err.to_string()
        })
    }

    // Either succeeds parsing the JSON document or returns a default config.
    // post_load() runs in both cases.
    fn from_json_str<T>(json: &str) -> T
        where T: Configs + Sized + Default + DeserializeOwned
    {
        let mut configs = {
            if json.trim().is_empty() {
                log::info!(log::channel!("config"), "Empty config document, using defaults.");
                T::default()
            } else {
                match serde_json::from_str::<T>(json) {
                    Ok(configs) => configs,
                    Err(err) => {
                        log::error!(log::channel!("config"), "Failed to deserialize configs: {err}");
                        T::default()
                    }
                }
            }
        };

        configs.post_load();
        configs
    }
}
