//! EvalSystem - 教师绩效评估平台后端服务
//!
//! 基于 Actix Web 与 SeaORM 构建。
//!
//! # 架构
//! - `capability`: 角色权限判定
//! - `catalog`: 问卷与问题规则
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `lifecycle`: 分配状态机
//! - `middlewares`: 认证中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `scoring`: 作答校验与计分
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod capability;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod errors;
pub mod lifecycle;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod scoring;
pub mod services;
pub mod storage;
pub mod utils;
