pub mod actions;
pub mod details;
pub mod list;

pub use actions::ChannelActions;
pub use details::{ChannelAction, ChannelDetails, ChannelDetailsView};
pub use list::{ChannelEntry, ChannelList};
