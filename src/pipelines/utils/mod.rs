//! Choosing where the classifier's weights live.
//!
//! Only the linear classifier touches a `candle` device; the vectorizer and
//! normalizer always run on the host.

use crate::core::ModelOptions;
use candle_core::Device;

/// CUDA device `index`, or with no index the first GPU when one is present
/// and the CPU otherwise.
pub fn classifier_device(index: Option<usize>) -> anyhow::Result<Device> {
    match index {
        Some(i) => Ok(Device::new_cuda(i)?),
        None => Ok(Device::cuda_if_available(0)?),
    }
}

/// Device choice recorded by a builder and resolved when it builds.
#[derive(Clone, Debug, Default)]
pub enum DeviceRequest {
    /// First GPU if present, else CPU.
    #[default]
    Default,
    Cpu,
    Cuda(usize),
    /// A device the caller already opened, e.g. to share it with other models.
    Explicit(Device),
}

impl DeviceRequest {
    pub fn resolve(self) -> anyhow::Result<Device> {
        match self {
            DeviceRequest::Default => classifier_device(None),
            DeviceRequest::Cpu => Ok(Device::Cpu),
            DeviceRequest::Cuda(i) => classifier_device(Some(i)),
            DeviceRequest::Explicit(d) => Ok(d),
        }
    }
}

/// Device setters shared by builders that load a classifier.
///
/// Implementors only expose their stored [`DeviceRequest`]; the setters
/// overwrite it, so the last call wins.
pub trait DeviceSelectable: Sized {
    fn device_request_mut(&mut self) -> &mut DeviceRequest;

    /// Keep the classifier on the CPU even when a GPU is available.
    fn cpu(mut self) -> Self {
        *self.device_request_mut() = DeviceRequest::Cpu;
        self
    }

    /// Put the classifier on CUDA device `index`; building fails if it is missing.
    fn cuda_device(mut self, index: usize) -> Self {
        *self.device_request_mut() = DeviceRequest::Cuda(index);
        self
    }

    fn device(mut self, device: Device) -> Self {
        *self.device_request_mut() = DeviceRequest::Explicit(device);
        self
    }
}

/// Cache key for an artifact loaded onto `device`: the same classifier file
/// on two devices is two cache entries.
pub fn build_cache_key<O: ModelOptions>(options: &O, device: &Device) -> String {
    format!("{}-{:?}", options.cache_key(), device.location())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl ModelOptions for Named {
        fn cache_key(&self) -> String {
            self.0.to_string()
        }
    }

    #[derive(Default)]
    struct Settings {
        device: DeviceRequest,
    }

    impl DeviceSelectable for Settings {
        fn device_request_mut(&mut self) -> &mut DeviceRequest {
            &mut self.device
        }
    }

    #[test]
    fn cpu_request_resolves_to_cpu() {
        let device = DeviceRequest::Cpu.resolve().unwrap();
        assert!(device.is_cpu());
    }

    #[test]
    fn last_setter_wins() {
        let settings = Settings::default().cuda_device(3).cpu();
        assert!(matches!(settings.device, DeviceRequest::Cpu));

        let settings = Settings::default().cpu().device(Device::Cpu);
        assert!(settings.device.resolve().unwrap().is_cpu());
    }

    #[test]
    fn cache_key_includes_device() {
        let key = build_cache_key(&Named("clf.json"), &Device::Cpu);
        assert!(key.starts_with("clf.json-"));
        assert!(key.contains("Cpu"));
    }
}
