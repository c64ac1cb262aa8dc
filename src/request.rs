// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求处理模块
//!
//! 该模块负责将分帧器交来的原始字节解析为 `Request` 结构体。它涵盖了：
//! 1. 请求行（Request-Line）的解析（方法、路径、版本）。
//! 2. HTTP 标头（Headers）的提取，键统一为小写。
//! 3. 请求体（Body）的切分。
//!
//! 解析永远不会失败：任何不符合规则的输入都只会把 `malformed` 置为 `true`。

use crate::param::{CRLF, HEADER_TERMINATOR};

use bytes::Bytes;
use std::collections::HashMap;

/// 表示一个解析后的 HTTP 请求。
///
/// 当 `malformed` 为 `true` 时，其余字段均不可信，只能返回 400。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    /// 请求方法记号，原样保留
    method: String,
    /// 客户端发送的请求路径，未经规范化
    uri: String,
    /// 协议版本记号，不做校验
    http_version: String,
    /// 小写键 -> 去除首尾空白的值。同名标头出现多次时，最后一次生效
    headers: HashMap<String, String>,
    /// 原始请求体
    body: Bytes,
    /// 请求行或解析过程不合法
    malformed: bool,
}

impl Request {
    /// 从原始字节构建 `Request`。
    ///
    /// # 逻辑步骤
    /// 1. 在第一个 `\r\n\r\n` 处切分头部与正文，没有分隔符时全部视为头部。
    /// 2. 按 `\r\n` 切分头部，第一行为请求行。
    /// 3. 请求行按单个空格切分，必须恰好得到三个合法 UTF-8 记号。
    /// 4. 其余各行在第一个冒号处切分为键值；没有冒号的行直接忽略。
    pub fn parse(buffer: &[u8]) -> Self {
        let (header_part, body) = match find(buffer, HEADER_TERMINATOR) {
            Some(pos) => (
                &buffer[..pos],
                Bytes::copy_from_slice(&buffer[pos + HEADER_TERMINATOR.len()..]),
            ),
            None => (buffer, Bytes::new()),
        };

        let mut lines = split_lines(header_part);
        let request_line = lines.next().unwrap_or_default();

        let (method, uri, http_version) = match parse_request_line(request_line) {
            Some(parts) => parts,
            None => return Self::malformed(),
        };

        let mut headers = HashMap::new();
        for line in lines {
            if let Some(colon) = line.iter().position(|&b| b == b':') {
                let key = latin1(&line[..colon]).trim().to_lowercase();
                let value = latin1(&line[colon + 1..]).trim().to_string();
                headers.insert(key, value);
            }
        }

        Self {
            method,
            uri,
            http_version,
            headers,
            body,
            malformed: false,
        }
    }

    fn malformed() -> Self {
        Self {
            malformed: true,
            ..Default::default()
        }
    }
}

/// 请求行必须是 `METHOD SP URI SP VERSION`，且每个记号都是合法的 UTF-8。
fn parse_request_line(line: &[u8]) -> Option<(String, String, String)> {
    let words: Vec<&[u8]> = line.split(|&b| b == b' ').collect();
    if words.len() != 3 {
        return None;
    }
    let method = std::str::from_utf8(words[0]).ok()?;
    let uri = std::str::from_utf8(words[1]).ok()?;
    let version = std::str::from_utf8(words[2]).ok()?;
    Some((method.to_string(), uri.to_string(), version.to_string()))
}

/// 按 `\r\n` 切分，裸 `\n` 不视为换行。
pub(crate) fn split_lines(block: &[u8]) -> impl Iterator<Item = &[u8]> {
    let sep = CRLF.as_bytes();
    let mut rest = Some(block);
    std::iter::from_fn(move || {
        let current = rest?;
        match find(current, sep) {
            Some(pos) => {
                rest = Some(&current[pos + sep.len()..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// ISO-8859-1 解码：每个字节对应一个字符，不会失败。
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

// --- Getter 访问器实现 ---

impl Request {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn http_version(&self) -> &str {
        &self.http_version
    }

    /// 按小写键查询标头
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed
    }
}
