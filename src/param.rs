// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 协议参数与常量模块
//!
//! 该模块定义了 `tinyhttpd` 遵循的 HTTP 协议相关常量和数据结构，包括：
//! - 服务器支持的状态码及其原因短语（Reason Phrase）。
//! - 文件扩展名到 MIME 类型的映射表。
//! - 每个响应都会合并的默认响应头。
//! - 允许处理的 HTTP 方法枚举。

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

/// 服务器名称标识，用于 HTTP 响应头的 `Server` 字段
pub const SERVER_NAME: &str = "tinyhttpd";

/// HTTP 协议规定的换行符（Carriage Return Line Feed）
pub const CRLF: &str = "\r\n";

/// 头部与正文之间的分隔序列
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// 单个请求报文的默认大小上限（1 MiB）
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// 每次从 Socket 读取的默认字节数
pub const READ_CHUNK_SIZE: usize = 1024;

/// 无法识别扩展名时使用的兜底类型
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// 默认响应头。
///
/// 每个响应从这份只读列表出发，合并处理器给出的额外头部后生成自己的头部列表，
/// 任何处理器都不会修改它。
pub const DEFAULT_HEADERS: [(&str, &str); 2] =
    [("Server", SERVER_NAME), ("Content-Type", "text/html")];

/// 服务器允许处理的 HTTP 方法列表，顺序即 `Allow` 头中的顺序。
pub const ALLOWED_METHODS: [HttpRequestMethod; 4] = [
    HttpRequestMethod::Get,
    HttpRequestMethod::Post,
    HttpRequestMethod::Put,
    HttpRequestMethod::Delete,
];

lazy_static! {
    /// HTTP 状态码与其对应的标准原因短语映射表。
    ///
    /// 参考标准：[RFC 9110: HTTP Semantics](https://www.rfc-editor.org/rfc/rfc9110.html)。
    pub static ref STATUS_CODES: HashMap<u16, &'static str> = {
        let mut map = HashMap::new();
        // 2xx: 成功响应 (Successful)
        map.insert(200, "OK");
        map.insert(201, "Created");
        map.insert(204, "No Content");

        // 4xx: 客户端错误 (Client Error)
        map.insert(400, "Bad Request");
        map.insert(403, "Forbidden");
        map.insert(404, "Not Found");
        map.insert(405, "Method Not Allowed");

        // 5xx: 服务端错误 (Server Error)
        map.insert(500, "Internal Server Error");
        map.insert(501, "Not Implemented");
        map
    };
}

lazy_static! {
    /// 文件后缀名到 MIME 类型（Media Type）的映射表。
    ///
    /// 用于设置 GET 响应中的 `Content-Type` 字段。键均为小写。
    pub static ref MIME_TYPES: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        map.insert("aac", "audio/aac");
        map.insert("avi", "video/x-msvideo");
        map.insert("avif", "image/avif");
        map.insert("bin", "application/octet-stream");
        map.insert("bmp", "image/bmp");
        map.insert("bz2", "application/x-bzip2");
        map.insert("css", "text/css");
        map.insert("csv", "text/csv");
        map.insert("doc", "application/msword");
        map.insert("epub", "application/epub+zip");
        map.insert("gif", "image/gif");
        map.insert("gz", "application/gzip");
        map.insert("htm", "text/html");
        map.insert("html", "text/html");
        map.insert("ico", "image/x-icon");
        map.insert("ics", "text/calendar");
        map.insert("jar", "application/java-archive");
        map.insert("js", "text/javascript");
        map.insert("json", "application/json");
        map.insert("jpg", "image/jpeg");
        map.insert("jpeg", "image/jpeg");
        map.insert("md", "text/markdown");
        map.insert("mjs", "text/javascript");
        map.insert("mp3", "audio/mpeg");
        map.insert("mp4", "video/mp4");
        map.insert("mpeg", "video/mpeg");
        map.insert("oga", "audio/ogg");
        map.insert("ogv", "video/ogg");
        map.insert("otf", "font/otf");
        map.insert("pdf", "application/pdf");
        map.insert("png", "image/png");
        map.insert("rtf", "application/rtf");
        map.insert("sh", "application/x-sh");
        map.insert("svg", "image/svg+xml");
        map.insert("tar", "application/x-tar");
        map.insert("tif", "image/tiff");
        map.insert("tiff", "image/tiff");
        map.insert("ttf", "font/ttf");
        map.insert("txt", "text/plain");
        map.insert("wasm", "application/wasm");
        map.insert("wav", "audio/wav");
        map.insert("webm", "video/webm");
        map.insert("webp", "image/webp");
        map.insert("woff", "font/woff");
        map.insert("woff2", "font/woff2");
        map.insert("xhtml", "application/xhtml+xml");
        map.insert("xml", "text/xml");
        map.insert("zip", "application/zip");
        map.insert("7z", "application/x-7z-compressed");
        map
    };
}

/// 允许处理的 HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpRequestMethod {
    /// 读取服务根目录下的静态文件
    Get,
    /// 提交数据，服务器回显收到的内容
    Post,
    /// 上传数据，服务器回显正文长度
    Put,
    /// 删除资源，服务器仅回显 URI
    Delete,
}

impl HttpRequestMethod {
    /// 将请求行中的方法记号映射为枚举。
    ///
    /// 匹配区分大小写，不在允许列表中的记号返回 `None`。
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(HttpRequestMethod::Get),
            "POST" => Some(HttpRequestMethod::Post),
            "PUT" => Some(HttpRequestMethod::Put),
            "DELETE" => Some(HttpRequestMethod::Delete),
            _ => None,
        }
    }

    /// 生成 `Allow` 响应头的值，例如 `GET, POST, PUT, DELETE`
    pub fn allow_header() -> String {
        ALLOWED_METHODS
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for HttpRequestMethod {
    /// 将枚举格式化为 HTTP 标准大写方法名
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HttpRequestMethod::Get => write!(f, "GET"),
            HttpRequestMethod::Post => write!(f, "POST"),
            HttpRequestMethod::Put => write!(f, "PUT"),
            HttpRequestMethod::Delete => write!(f, "DELETE"),
        }
    }
}
