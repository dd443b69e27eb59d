//! Database repositories for the API service

pub mod media_group;
pub mod media_item;

pub use media_group::MediaGroupRepository;
pub use media_item::MediaItemRepository;
