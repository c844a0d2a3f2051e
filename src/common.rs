pub mod db_utils;
pub mod error;
pub mod formats;
pub mod i18n;
