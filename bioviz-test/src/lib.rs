mod helpers;
mod runner;

pub use bioviz;
pub use tokio::test as test_attr;

pub use helpers::*;
pub use runner::{TestRunner, TEST_SIZE};

/// Unwraps the result of [`bioviz::create_iad`], returning `Ok(())` from the
/// enclosing test when the machine has no usable adapter.
#[macro_export]
macro_rules! no_gpu_return {
    ($value:expr) => {
        match $value {
            Err($crate::bioviz::RendererInitializationError::MissingAdapter) => {
                eprintln!("No usable adapter found, skipping test");
                return Ok(());
            }
            other => other,
        }
    };
}
