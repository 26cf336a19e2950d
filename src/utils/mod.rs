pub mod db_utils;
pub mod staff_code_cache;
pub mod staff_code_filter;
