use derive_builder::Builder;

/// Protocol configuration.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ProtocolConfig {
    /// Largest modulus bit length `L` a run accepts.
    #[builder(default = "4096")]
    max_modulus_bits: usize,
    /// Number of encoded positions `k` beyond the `L` bits of the modulus.
    #[builder(default = "512")]
    statistical_parameter: usize,
}

impl ProtocolConfig {
    /// Creates a new builder for the protocol configuration.
    pub fn builder() -> ProtocolConfigBuilder {
        ProtocolConfigBuilder::default()
    }

    /// Returns the largest modulus bit length a run accepts.
    pub fn max_modulus_bits(&self) -> usize {
        self.max_modulus_bits
    }

    /// Returns `k`, the number of encoded positions beyond the bit length of the modulus.
    ///
    /// A run transfers `L + k` positions. Larger values hide the receiver's input better from
    /// the coefficients it reveals.
    pub fn statistical_parameter(&self) -> usize {
        self.statistical_parameter
    }
}

impl ProtocolConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_modulus_bits == Some(0) {
            return Err("max modulus bits must be nonzero".to_string());
        }
        Ok(())
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfigBuilder::default().build().unwrap()
    }
}
