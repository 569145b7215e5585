pub mod badge;
pub mod bucket_item;
pub mod bucket_list;
pub mod feed;
pub mod follow;
pub mod leaderboard;
pub mod memory;
pub mod notification;
pub mod profile;
