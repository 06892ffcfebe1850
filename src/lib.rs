//! StudyDesk - 课程管理与闪卡学习平台
//!
//! 基于 Actix Web 的请求处理层，数据与认证托管在 Postgres 后端（REST 查询接口 + 认证服务）。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），缓存已校验的会话用户
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `identity`: 认证服务客户端
//! - `middlewares`: 会话、导航守卫、角色与限流中间件
//! - `models`: 数据行、表单与页面数据
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（REST 查询接口）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod errors;
pub mod identity;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
