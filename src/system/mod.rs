// Host system inspection.
pub mod os_info;
