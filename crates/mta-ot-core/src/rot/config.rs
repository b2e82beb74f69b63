use derive_builder::Builder;

/// Random OT channel configuration.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct RandomOTConfig {
    /// Number of random OTs dealt each time the table runs empty.
    #[builder(default = "128")]
    batch_size: usize,
}

impl RandomOTConfig {
    /// Creates a new builder for the random OT configuration.
    pub fn builder() -> RandomOTConfigBuilder {
        RandomOTConfigBuilder::default()
    }

    /// Returns the number of random OTs dealt per batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl RandomOTConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == Some(0) {
            return Err("batch size must be nonzero".to_string());
        }
        Ok(())
    }
}

impl Default for RandomOTConfig {
    fn default() -> Self {
        RandomOTConfigBuilder::default().build().unwrap()
    }
}
