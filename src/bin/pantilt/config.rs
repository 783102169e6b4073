pub mod sys_config;
pub mod tuning;
