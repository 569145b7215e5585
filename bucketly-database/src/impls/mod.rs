pub mod badges;
pub mod feed;
pub mod follows;
pub mod items;
pub mod leaderboard;
pub mod lists;
pub mod memories;
pub mod notifications;
pub mod profiles;
