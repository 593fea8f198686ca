use thiserror::Error;

use crate::filters::FilterError;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider '{provider}' does not support {capability}")]
    Unsupported { provider: String, capability: &'static str },

    #[error(transparent)]
    Filter(#[from] FilterError),
}
