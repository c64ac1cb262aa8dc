// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 报文分帧模块
//!
//! 从 TCP 字节流中切分出一条完整的 HTTP 报文：先读到头部结束符 `\r\n\r\n`，
//! 再根据 `Content-Length` 继续读取正文。整个过程受报文大小上限约束。

use crate::{exception::Exception, param::HEADER_TERMINATOR, request::split_lines};

use log::{debug, warn};
use std::num::IntErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt};

/// 从连接中读取一条完整的 HTTP 报文。
///
/// # 返回
/// * `Ok(bytes)` - 头部加正文的原始字节。对端提前关闭时返回已读到的部分，
///   正文不足声明长度时同样照常返回。
/// * `Err(Exception::MessageTooLarge)` - 头部未结束就超过上限，或头部加声明的正文超过上限。
/// * `Err(Exception::ReadFailed)` - 读取 Socket 出错。
pub async fn read_message<R>(
    reader: &mut R,
    max_size: usize,
    chunk_size: usize,
) -> Result<Vec<u8>, Exception>
where
    R: AsyncRead + Unpin,
{
    let mut data: Vec<u8> = Vec::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut scanned = 0;

    // 1. 读取头部
    let header_end = loop {
        if let Some(end) = find_header_end(&data, scanned) {
            break end;
        }
        scanned = data.len();

        let n = reader
            .read(&mut chunk)
            .await
            .map_err(|_| Exception::ReadFailed)?;
        if n == 0 {
            debug!("对端在头部结束前关闭了连接，已读取{}字节", data.len());
            return Ok(data);
        }
        data.extend_from_slice(&chunk[..n]);
        if data.len() > max_size {
            warn!("头部超过{}字节仍未结束，放弃该连接", max_size);
            return Err(Exception::MessageTooLarge);
        }
    };

    // 2. 根据 Content-Length 计算报文总长度
    let content_length = content_length_of(&data[..header_end]);
    let total = header_end.saturating_add(content_length);
    if total > max_size {
        warn!(
            "报文声明的总长度{}超过上限{}，放弃该连接",
            total, max_size
        );
        return Err(Exception::MessageTooLarge);
    }

    // 3. 读取正文，每次最多读取剩余的声明长度
    while data.len() < total {
        let want = (total - data.len()).min(chunk.len());
        let n = reader
            .read(&mut chunk[..want])
            .await
            .map_err(|_| Exception::ReadFailed)?;
        if n == 0 {
            debug!(
                "对端在正文结束前关闭了连接，期望{}字节，实际{}字节",
                content_length,
                data.len() - header_end
            );
            break;
        }
        data.extend_from_slice(&chunk[..n]);
    }
    data.truncate(total);

    Ok(data)
}

/// 查找头部结束符，返回结束符之后第一个字节的下标。
///
/// `from` 是上一次已经搜索过的长度，结束符可能跨越两次读取，因此回退 3 个字节再搜索。
pub fn find_header_end(data: &[u8], from: usize) -> Option<usize> {
    let start = from.saturating_sub(HEADER_TERMINATOR.len() - 1);
    data.get(start..)?
        .windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| start + pos + HEADER_TERMINATOR.len())
}

/// 在头部块中查找第一个 `Content-Length` 行，按 `\r\n` 分行，与请求解析器保持一致。
///
/// 缺失或不是非负整数时视为 0；数字过大无法表示时取 `usize::MAX`，由调用方按超限处理。
pub fn content_length_of(header_block: &[u8]) -> usize {
    let value = split_lines(header_block)
        .find(|line| {
            line.len() >= 15 && line[..15].eq_ignore_ascii_case(b"content-length:")
        })
        .and_then(|line| std::str::from_utf8(&line[15..]).ok());
    let value = match value {
        Some(value) => value.trim(),
        None => return 0,
    };
    match value.parse::<usize>() {
        Ok(length) => length,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => usize::MAX,
        Err(_) => 0,
    }
}
