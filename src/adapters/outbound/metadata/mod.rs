/// Metadata adapters supplying component metadata from outside the resolution export
mod descriptor_repository;

pub use descriptor_repository::DescriptorRepository;
