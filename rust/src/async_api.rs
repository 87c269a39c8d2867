//! Async convenience API built on top of the sync generator.

use crate::{GeneratorConfig, IdError, create_generator};

/// Get one identifier in async contexts.
pub async fn async_generate(config: GeneratorConfig) -> Result<String, IdError> {
    let generator = create_generator(config)?;
    generator.generate()
}

/// Generate a finite batch of identifiers in async contexts.
pub async fn async_generate_batch(
    config: GeneratorConfig,
    count: usize,
) -> Result<Vec<String>, IdError> {
    let generator = create_generator(config)?;
    generator.generate_n(count)
}
