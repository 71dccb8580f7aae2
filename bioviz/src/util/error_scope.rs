use wgpu::{Device, ErrorFilter};

/// Validation error scope around one stage of GPU work.
///
/// Created with [`GpuErrorCheck::debug_only`] the scope only exists with
/// `debug_assertions`; release builds push and pop nothing. Created with
/// [`GpuErrorCheck::always`] it also captures out-of-memory errors and is
/// never compiled out.
///
/// Any captured error is fatal.
#[must_use = "All error checks must end in a call to `end`"]
pub struct GpuErrorCheck<'a> {
    device: &'a Device,
    stage: &'static str,
    scopes: u8,
}

impl<'a> GpuErrorCheck<'a> {
    pub fn debug_only(device: &'a Device, stage: &'static str) -> Self {
        let scopes = if cfg!(debug_assertions) {
            device.push_error_scope(ErrorFilter::Validation);
            1
        } else {
            0
        };
        Self { device, stage, scopes }
    }

    pub fn always(device: &'a Device, stage: &'static str) -> Self {
        device.push_error_scope(ErrorFilter::OutOfMemory);
        device.push_error_scope(ErrorFilter::Validation);
        Self {
            device,
            stage,
            scopes: 2,
        }
    }

    /// Pops the scopes, panicking with the stage name if anything was captured.
    pub fn end(mut self) {
        let mut first_error = None;
        while self.scopes > 0 {
            self.scopes -= 1;
            if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
                first_error.get_or_insert(error);
            }
        }
        if let Some(error) = first_error {
            panic!("GPU error during {}: {}", self.stage, error);
        }
    }
}

impl<'a> Drop for GpuErrorCheck<'a> {
    fn drop(&mut self) {
        if self.scopes > 0 && !std::thread::panicking() {
            log::error!("GpuErrorCheck for {} dropped without calling `end`", self.stage);
        }
    }
}
