// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了服务器在一次连接的生命周期中可能出现的异常情况。
//!
//! ## 分类
//! - **传输层**：读取 Socket 失败，连接直接关闭，不产生响应。
//! - **资源限制**：报文超过大小上限，连接直接关闭，不产生响应。
//! - **处理器故障**：处理请求时出现意外错误，由分发器转换为 `500 Internal Server Error`。
//!
//! 畸形请求、方法不被允许等情况不属于异常，它们直接对应普通的 HTTP 响应。

use std::fmt;

/// 服务器处理连接过程中发生的异常类型。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Exception {
    /// 报文（头部或头部加声明的正文）超过了大小上限。
    MessageTooLarge,
    /// 从连接读取数据时发生 I/O 错误。
    ReadFailed,
    /// 目标文件存在，但读取其内容失败。对应 `500 Internal Server Error`。
    FileReadFailed,
}

use Exception::*;

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageTooLarge => write!(f, "Message exceeds the size limit"),
            ReadFailed => write!(f, "Couldn't read from the connection"),
            FileReadFailed => write!(f, "Couldn't read the requested file"),
        }
    }
}

impl std::error::Error for Exception {}
