//! Shared declarations: accessors are declared without values and no native
//! files are produced.

use crate::{
    code::Initializer, error::Error, traits::PlatformResourceGenerator,
    types::ResourceMetadata,
};

/// Declaration-only generator used for every kind on the common platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonGenerator;

impl<M: ResourceMetadata> PlatformResourceGenerator<M> for CommonGenerator {
    fn generate_initializer(&self, _metadata: &M) -> Option<Initializer> {
        None
    }

    fn generate_resource_files(&self, _data: &[M]) -> Result<(), Error> {
        Ok(())
    }
}
