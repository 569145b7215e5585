//! User-facing operations. Each validates and sanitizes its input, talks to
//! the database and returns either a value or an error the caller can turn
//! into a toast with `bucketly_core::feedback::toast_for_error`.

pub mod admin;
pub mod badges;
pub mod feed;
pub mod follows;
pub mod inbox;
pub mod items;
pub mod leaderboard;
pub mod lists;
pub mod memories;
pub mod notify;
pub mod profile;
