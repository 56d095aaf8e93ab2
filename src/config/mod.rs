//! 配置管理模块
//!
//! 提供客户端配置加载和校验功能，支持 TOML / YAML 配置文件和环境变量覆盖。

pub mod config;
pub mod loader;
