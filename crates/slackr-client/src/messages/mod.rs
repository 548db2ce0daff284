//! Messages of the open channel: loading, rendering, paging, writes,
//! reactions, images and new-message notifications.

pub mod actions;
pub mod feed;
pub mod images;
pub mod notifications;
pub mod reactions;
pub mod renderer;
pub mod scroll;

pub use feed::{LoadMore, MessageFeed};
pub use notifications::{BannerBoard, NotificationPoller};
pub use renderer::{FeedView, MessageView};
